//! Shape and stride algebra.
//!
//! Pure functions over dimension vectors. Strides are in elements and
//! row-major: the last axis varies fastest.

use crate::{Dims, Result, TensorError};

/// Total number of elements described by `shape`. The empty shape holds one.
#[inline]
pub fn numel(shape: &[usize]) -> usize {
    shape.iter().product()
}

/// Row-major strides for `shape`: `s[i] = shape[i+1] * ... * shape[n-1]`.
pub fn canonical_stride(shape: &[usize]) -> Dims {
    let mut stride: Dims = smallvec::smallvec![0; shape.len()];
    let mut acc = 1usize;
    for i in (0..shape.len()).rev() {
        stride[i] = acc;
        acc *= shape[i];
    }
    stride
}

/// [`numel`], or `None` if the product overflows `usize`.
#[inline]
pub fn checked_numel(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
}

/// A shape is valid when it is non-empty, every dimension is positive and
/// the element count fits in `usize`.
pub fn valid_shape(shape: &[usize]) -> Result<()> {
    if shape.is_empty() || shape.contains(&0) || checked_numel(shape).is_none() {
        return Err(TensorError::BadShape);
    }
    Ok(())
}

/// Checks `lo <= start < end <= hi`.
pub fn valid_interval(start: usize, end: usize, lo: usize, hi: usize) -> Result<()> {
    if start >= end || start < lo || end > hi {
        return Err(TensorError::BadInterval);
    }
    Ok(())
}

/// Checks that `axis` addresses an existing axis (`axis < rank`).
pub fn valid_axis(axis: usize, rank: usize) -> Result<()> {
    if axis >= rank {
        return Err(TensorError::AxisBounds);
    }
    Ok(())
}

/// Checks that `axis` is an insertion point (`axis <= rank`).
pub fn valid_insert_axis(axis: usize, rank: usize) -> Result<()> {
    if axis > rank {
        return Err(TensorError::AxisBounds);
    }
    Ok(())
}

/// Checks that no more than `max` arguments were supplied.
pub fn valid_args(nargs: usize, max: usize) -> Result<()> {
    if nargs > max {
        return Err(TensorError::ArgsBounds);
    }
    Ok(())
}

/// Left-pads `shape` with ones up to `rank` axes.
fn pad_to(shape: &[usize], rank: usize) -> Dims {
    let mut padded: Dims = smallvec::smallvec![1; rank.saturating_sub(shape.len())];
    padded.extend_from_slice(shape);
    padded
}

/// Whether `src` can be broadcast to `dst`.
///
/// `src` is left-padded with ones to the rank of `dst`; then every axis must
/// either match or be 1 in `src`. `dst` must itself be a valid shape of at
/// least the same rank.
pub fn broadable(src: &[usize], dst: &[usize]) -> bool {
    if valid_shape(dst).is_err() || src.len() > dst.len() {
        return false;
    }
    pad_to(src, dst.len())
        .iter()
        .zip(dst)
        .all(|(&s, &d)| s == d || s == 1)
}

/// Left-pads the shorter of two shapes with ones so both share a rank.
pub fn align(s1: &[usize], s2: &[usize]) -> (Dims, Dims) {
    let rank = s1.len().max(s2.len());
    (pad_to(s1, rank), pad_to(s2, rank))
}

/// Compute the common broadcast shape of two shapes.
///
/// Axes are right-aligned; each output axis is the pairwise maximum with 1
/// acting as the identity. Returns `None` if the shapes are incompatible.
pub fn broadcast_shape(a: &[usize], b: &[usize]) -> Option<Dims> {
    let (a, b) = align(a, b);
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| match (x, y) {
            _ if x == y => Some(x),
            (1, _) => Some(y),
            (_, 1) => Some(x),
            _ => None,
        })
        .collect()
}

/// Check whether a layout is contiguous in row-major order.
///
/// Axes of size 1 never contribute to addressing, so their strides are ignored.
pub fn is_contiguous(shape: &[usize], stride: &[usize]) -> bool {
    let mut expected = 1usize;
    for (&dim, &s) in shape.iter().zip(stride).rev() {
        if dim <= 1 {
            continue;
        }
        if s != expected {
            return false;
        }
        expected *= dim;
    }
    true
}

/// Whether `axes` is a permutation of `0..axes.len()`.
pub(crate) fn is_permutation(axes: &[usize]) -> bool {
    let mut seen: smallvec::SmallVec<[bool; 8]> = smallvec::smallvec![false; axes.len()];
    for &a in axes {
        if a >= axes.len() || seen[a] {
            return false;
        }
        seen[a] = true;
    }
    true
}
