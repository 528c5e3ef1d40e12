//! Worker-count policy and chunking for the parallel kernels.
//!
//! A flat range `[0, L)` is split into `P` contiguous chunks with bounds
//! `[floor(i*L/P), floor((i+1)*L/P))`. The chunks are disjoint, cover the
//! range, and differ in length by at most one.

use std::ops::Range;

use crate::config;

/// Number of elements each automatically chosen worker is expected to handle.
pub const ELEMENTS_PER_WORKER: usize = 4096;

/// Number of hardware threads available to the kernels.
///
/// With the `parallel` feature this is the size of the current rayon pool.
pub fn hardware_threads() -> usize {
    #[cfg(feature = "parallel")]
    {
        rayon::current_num_threads()
    }
    #[cfg(not(feature = "parallel"))]
    {
        std::thread::available_parallelism().map_or(1, |n| n.get())
    }
}

/// Number of workers for a kernel over `len` elements under the current
/// [`EnvConfig`](crate::EnvConfig).
pub fn worker_count(len: usize) -> usize {
    select_workers(len, config::env().num_cpu, hardware_threads())
}

/// The worker-count policy with its inputs made explicit.
///
/// An explicit `num_cpu` caps the count at `len`. Otherwise one worker is
/// assigned per [`ELEMENTS_PER_WORKER`] elements (rounded), between 1 and
/// `hardware`.
pub fn select_workers(len: usize, num_cpu: usize, hardware: usize) -> usize {
    if num_cpu != 0 {
        return len.min(num_cpu);
    }
    let bias = len as f64 / ELEMENTS_PER_WORKER as f64;
    if bias < 1.0 {
        1
    } else if bias < hardware as f64 {
        bias.round() as usize
    } else {
        hardware
    }
}

/// Bounds of chunk `index` when `len` elements are split in `parts`.
#[inline]
pub fn chunk_bounds(len: usize, parts: usize, index: usize) -> Range<usize> {
    debug_assert!(parts > 0 && index < parts);
    (index * len / parts)..((index + 1) * len / parts)
}

/// All chunk bounds for `len` elements split in `parts`, in order.
pub fn chunks(len: usize, parts: usize) -> impl Iterator<Item = Range<usize>> {
    (0..parts).map(move |i| chunk_bounds(len, parts, i))
}

/// Clamp a requested part count to `[1, len]` (at least 1 for empty input).
#[inline]
pub(crate) fn clamp_parts(len: usize, parts: usize) -> usize {
    parts.clamp(1, len.max(1))
}
