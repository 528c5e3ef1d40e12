//! Strided n-dimensional numeric tensors.
//!
//! A [`Tensor`] is a `(shape, stride, offset)` window over a shared,
//! contiguous [`Buffer`]. Manipulations such as [`Tensor::reshape`],
//! [`Tensor::index`], [`Tensor::slice`] and [`Tensor::permute`] return new
//! views over the same storage; broadcasting, concatenation, stacking,
//! repetition and casting materialize a fresh, canonically strided buffer.
//!
//! # Core Types
//!
//! - [`Tensor`]: a strided view, cheap to clone (clones share storage)
//! - [`Buffer`]: reference-counted contiguous storage shared by views
//! - [`Element`]: the numeric element kinds (`i8`..`isize`, `u8`..`usize`, `f32`, `f64`)
//! - [`Backing`] / [`Input`]: anything a tensor can be ingested from
//!
//! # Operations
//!
//! ## Pointwise
//!
//! - [`Tensor::map`] plus named math wrappers ([`Tensor::sin`], [`Tensor::sqrt`], ...)
//!
//! ## Elementwise (broadcasting)
//!
//! - [`Tensor::ewise`], [`Tensor::add`], [`Tensor::sub`], [`Tensor::mul`], [`Tensor::div`]
//! - free functions [`ewise`], [`add`], [`sub`], [`mul`], [`div`] returning fresh tensors
//!
//! ## Reductions
//!
//! - [`Tensor::reduce`], [`Tensor::min`], [`Tensor::max`], [`Tensor::sum`],
//!   [`Tensor::mean`], [`Tensor::prod`]
//!
//! # Example
//!
//! ```rust
//! use strided_tensor::Tensor;
//!
//! let t = Tensor::<i64>::range(0, 6, 1).unwrap().reshape(&[2, 3]).unwrap();
//! assert_eq!(t.shape(), &[2, 3]);
//! assert_eq!(t.permute(&[1, 0]).unwrap().ravel(), vec![0, 3, 1, 4, 2, 5]);
//!
//! // [3, 1] + [3] broadcasts to [3, 3]
//! let a = Tensor::<i64>::from_backing(&[[1], [2], [3]]).unwrap();
//! let b = a.add(&[10, 20, 30]).unwrap();
//! assert_eq!(b.shape(), &[3, 3]);
//! assert_eq!(b.sum().unwrap().scalar().unwrap(), 6 * 3 + 60 * 3);
//! ```
//!
//! # Failure policy
//!
//! Fallible operations return [`Result`]. A failed step short-circuits every
//! later step chained with `?` or `and_then`, so the first error is what
//! reaches the caller. When [`EnvConfig::interactive`] is set, failures panic
//! at the API boundary instead of being returned.

mod broadcast;
mod buffer;
pub mod config;
mod element;
mod factory;
mod ingest;
pub mod kernel;
mod manip;
mod map;
mod reduce;
pub mod shape;
mod special;
pub mod threading;
mod view;

// ============================================================================
// Storage and views
// ============================================================================
pub use buffer::Buffer;
pub use view::Tensor;

// ============================================================================
// Element kinds and ingestion
// ============================================================================
pub use element::{Element, ElementKind, Scalar};
pub use ingest::{Backing, DynTensor, Input};

// ============================================================================
// Elementwise free functions
// ============================================================================
pub use broadcast::{add, div, ewise, mul, sub};

// ============================================================================
// Configuration
// ============================================================================
pub use config::{EnvConfig, FmtConfig};

/// Small-vector storage for shapes and strides.
///
/// Eight inline slots cover the ranks seen in practice without touching the heap.
pub type Dims = smallvec::SmallVec<[usize; 8]>;

// ============================================================================
// Error types
// ============================================================================

/// Errors that can occur during tensor operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TensorError {
    /// A shape is empty or has an axis whose dimension is zero.
    #[error("received a bad shape")]
    BadShape,

    /// A step size is zero or points away from the interval's end.
    #[error("received a bad step size")]
    BadStep,

    /// An interval is empty, descending, or outside the allowed limits.
    #[error("received a bad interval")]
    BadInterval,

    /// Two shapes cannot be reconciled by the broadcasting rule.
    #[error("could not broadcast tensor to shape")]
    NotBroadable,

    /// A backing could not be unwrapped into a rectangular numeric buffer.
    #[error("could not unwrap backing to tensor")]
    UnwrapBacking,

    /// A function received more arguments than allowed.
    #[error("received more arguments than allowed")]
    ArgsBounds,

    /// An axis or index is outside its allowed bounds.
    #[error("axis out of bounds")]
    AxisBounds,

    /// A flat sequence could not be written into a tensor's storage.
    #[error("could not dump data buffer to storage")]
    StorageDump,
}

/// Result type for tensor operations.
pub type Result<T> = std::result::Result<T, TensorError>;
