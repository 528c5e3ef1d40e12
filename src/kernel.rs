//! Data-parallel kernels over flat element slices.
//!
//! Each kernel splits its input into `parts` contiguous chunks (see
//! [`threading::chunks`](crate::threading::chunks)), runs one task per chunk
//! and joins before returning. With the `parallel` feature the tasks run on
//! the rayon pool; without it they run one after another on the caller's
//! thread. A single part always runs inline.
//!
//! Chunks are disjoint, so results of [`pointwise`] and [`elementwise`] do not
//! depend on `parts`. [`reduce`] combines per-chunk partials in chunk order.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::raise;
use crate::threading::{chunks, clamp_parts};
use crate::{Result, TensorError};

/// Run `task` once per item, fanned out when there is more than one.
fn fan_out<C: Send>(items: Vec<C>, task: impl Fn(C) + Send + Sync) {
    #[cfg(feature = "parallel")]
    {
        if items.len() > 1 {
            tracing::debug!(parts = items.len(), "kernel fan-out");
            items.into_par_iter().for_each(task);
            return;
        }
    }
    items.into_iter().for_each(task);
}

/// Split `data` into mutable chunks following the chunk bounds.
fn split_chunks_mut<T>(mut data: &mut [T], parts: usize) -> Vec<&mut [T]> {
    let len = data.len();
    let mut out = Vec::with_capacity(parts);
    for range in chunks(len, parts) {
        let (head, tail) = std::mem::take(&mut data).split_at_mut(range.len());
        out.push(head);
        data = tail;
    }
    out
}

/// `out[j] = f(input[j])` for every `j`.
///
/// # Errors
/// Returns [`TensorError::BadShape`] if the lengths differ.
pub fn pointwise<T, U, F>(input: &[T], out: &mut [U], parts: usize, f: F) -> Result<()>
where
    T: Copy + Sync,
    U: Send,
    F: Fn(T) -> U + Sync + Send,
{
    if input.len() != out.len() {
        return raise(TensorError::BadShape);
    }
    let parts = clamp_parts(input.len(), parts);
    let work: Vec<_> = chunks(input.len(), parts)
        .map(|r| &input[r])
        .zip(split_chunks_mut(out, parts))
        .collect();
    fan_out(work, |(src, dst)| {
        for (o, &x) in dst.iter_mut().zip(src) {
            *o = f(x);
        }
    });
    Ok(())
}

/// `data[j] = f(data[j])` for every `j`; the aliased form of [`pointwise`].
pub fn pointwise_in_place<T, F>(data: &mut [T], parts: usize, f: F)
where
    T: Copy + Send,
    F: Fn(T) -> T + Sync + Send,
{
    let parts = clamp_parts(data.len(), parts);
    fan_out(split_chunks_mut(data, parts), |chunk| {
        for x in chunk.iter_mut() {
            *x = f(*x);
        }
    });
}

/// `out[j] = f(lhs[j], rhs[j])` for every `j`.
///
/// # Errors
/// Returns [`TensorError::BadShape`] unless all three lengths match.
pub fn elementwise<T, F>(lhs: &[T], rhs: &[T], out: &mut [T], parts: usize, f: F) -> Result<()>
where
    T: Copy + Send + Sync,
    F: Fn(T, T) -> T + Sync + Send,
{
    if lhs.len() != rhs.len() || lhs.len() != out.len() {
        return raise(TensorError::BadShape);
    }
    let len = lhs.len();
    let parts = clamp_parts(len, parts);
    let work: Vec<_> = chunks(len, parts)
        .map(|r| (&lhs[r.clone()], &rhs[r]))
        .zip(split_chunks_mut(out, parts))
        .collect();
    fan_out(work, |((a, b), dst)| {
        for ((o, &x), &y) in dst.iter_mut().zip(a).zip(b) {
            *o = f(x, y);
        }
    });
    Ok(())
}

/// `lhs[j] = f(lhs[j], rhs[j])` for every `j`; the aliased form of
/// [`elementwise`].
///
/// # Errors
/// Returns [`TensorError::BadShape`] if the lengths differ.
pub fn elementwise_in_place<T, F>(lhs: &mut [T], rhs: &[T], parts: usize, f: F) -> Result<()>
where
    T: Copy + Send + Sync,
    F: Fn(T, T) -> T + Sync + Send,
{
    if lhs.len() != rhs.len() {
        return raise(TensorError::BadShape);
    }
    let len = lhs.len();
    let parts = clamp_parts(len, parts);
    let work: Vec<_> = split_chunks_mut(lhs, parts)
        .into_iter()
        .zip(chunks(len, parts).map(|r| &rhs[r]))
        .collect();
    fan_out(work, |(dst, b)| {
        for (o, &y) in dst.iter_mut().zip(b) {
            *o = f(*o, y);
        }
    });
    Ok(())
}

/// Fold `input` with `f`: each chunk yields `f(chunk)`, then the partials,
/// kept in chunk order, are folded with `f` once more.
///
/// `f` must be associative for the result to be independent of `parts`.
/// It always receives a non-empty slice.
///
/// # Errors
/// Returns [`TensorError::BadShape`] if `input` is empty.
///
/// # Example
/// ```rust
/// use strided_tensor::kernel;
///
/// let data: Vec<i64> = (1..=10).collect();
/// let max = kernel::reduce(&data, 3, |xs| *xs.iter().max().unwrap()).unwrap();
/// assert_eq!(max, 10);
/// ```
pub fn reduce<T, F>(input: &[T], parts: usize, f: F) -> Result<T>
where
    T: Copy + Send + Sync,
    F: Fn(&[T]) -> T + Sync + Send,
{
    if input.is_empty() {
        return raise(TensorError::BadShape);
    }
    let parts = clamp_parts(input.len(), parts);
    let partials: Vec<T> = partials(input, parts, &f);
    Ok(f(&partials))
}

#[cfg(feature = "parallel")]
fn partials<T, F>(input: &[T], parts: usize, f: &F) -> Vec<T>
where
    T: Copy + Send + Sync,
    F: Fn(&[T]) -> T + Sync + Send,
{
    if parts > 1 {
        tracing::debug!(len = input.len(), parts, "reduce fan-out");
        let bounds: Vec<_> = chunks(input.len(), parts).collect();
        // indexed collect keeps the partials in chunk order
        return bounds.into_par_iter().map(|r| f(&input[r])).collect();
    }
    vec![f(input)]
}

#[cfg(not(feature = "parallel"))]
fn partials<T, F>(input: &[T], parts: usize, f: &F) -> Vec<T>
where
    T: Copy + Send + Sync,
    F: Fn(&[T]) -> T + Sync + Send,
{
    chunks(input.len(), parts).map(|r| f(&input[r])).collect()
}
