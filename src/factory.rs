//! Tensor constructors.

use crate::buffer::Buffer;
use crate::config::{check, raise};
use crate::element::{Element, Scalar};
use crate::ingest::{unwrap_backing, Backing};
use crate::shape::{self, numel};
use crate::view::Tensor;
use crate::{Dims, Result, TensorError};

impl<T: Element> Tensor<T> {
    /// Build an owned tensor from any [`Backing`]: a scalar, string, sequence
    /// of any nesting depth, another tensor, or an [`Input`](crate::Input).
    ///
    /// Elements are converted to `T` with `as` semantics; tensor backings are
    /// always copied, never shared.
    ///
    /// # Errors
    /// Returns [`TensorError::UnwrapBacking`] for empty or ragged sequences.
    ///
    /// # Example
    /// ```rust
    /// use strided_tensor::Tensor;
    ///
    /// let t = Tensor::<u8>::from_backing("abc").unwrap();
    /// assert_eq!(t.ravel(), vec![97, 98, 99]);
    ///
    /// let s = Tensor::<f64>::from_backing(&4i32).unwrap();
    /// assert_eq!(s.rank(), 0);
    /// assert_eq!(s.scalar().unwrap(), 4.0);
    /// ```
    pub fn from_backing<B: Backing + ?Sized>(backing: &B) -> Result<Self> {
        let (shape, data) = check(unwrap_backing(backing))?;
        Ok(Self::owned(data, shape))
    }

    /// Takes ownership of `data` as a rank 1 tensor.
    pub fn from_vec(data: Vec<T>) -> Result<Self> {
        if data.is_empty() {
            return raise(TensorError::UnwrapBacking);
        }
        let shape = smallvec::smallvec![data.len()];
        Ok(Self::owned(data, shape))
    }

    /// Copies `data` into a rank 1 tensor, converting each element.
    pub fn from_slice<U: Element>(data: &[U]) -> Result<Self> {
        if data.is_empty() {
            return raise(TensorError::UnwrapBacking);
        }
        let converted = data.iter().map(|&x| x.cast::<T>()).collect();
        Ok(Self::owned(converted, smallvec::smallvec![data.len()]))
    }

    /// A rank 0 tensor holding `value`.
    pub fn from_scalar(value: T) -> Self {
        Self::owned(vec![value], Dims::new())
    }

    /// A rank 1 tensor sharing `buffer`, with stride 1 and offset 0.
    ///
    /// # Errors
    /// Returns [`TensorError::BadShape`] for an empty buffer.
    pub fn from_buffer(buffer: &Buffer<T>) -> Result<Self> {
        if buffer.is_empty() {
            return raise(TensorError::BadShape);
        }
        Ok(Self::from_parts(
            buffer.clone(),
            smallvec::smallvec![buffer.len()],
            smallvec::smallvec![1],
            0,
        ))
    }

    /// A tensor of `shape` with every element set to `value`.
    ///
    /// # Errors
    /// Returns [`TensorError::BadShape`] if `shape` is empty or has a zero axis.
    pub fn full(value: T, shape: &[usize]) -> Result<Self> {
        check(shape::valid_shape(shape))?;
        Ok(Self::owned(vec![value; numel(shape)], Dims::from_slice(shape)))
    }

    /// A tensor shaped like `other` with every element set to `value`.
    pub fn full_like<U>(value: T, other: &Tensor<U>) -> Self {
        Self::owned(vec![value; other.numel()], Dims::from_slice(other.shape()))
    }

    /// A tensor of `shape` filled with zeros.
    pub fn zeros(shape: &[usize]) -> Result<Self> {
        Self::full(T::zero(), shape)
    }

    /// A tensor shaped like `other` filled with zeros.
    pub fn zeros_like<U>(other: &Tensor<U>) -> Self {
        Self::full_like(T::zero(), other)
    }

    /// A tensor of `shape` filled with ones.
    pub fn ones(shape: &[usize]) -> Result<Self> {
        Self::full(T::one(), shape)
    }

    /// A tensor shaped like `other` filled with ones.
    pub fn ones_like<U>(other: &Tensor<U>) -> Self {
        Self::full_like(T::one(), other)
    }

    /// A rank 1 tensor holding `start, start + step, ...`.
    ///
    /// The length is `floor(|end - start| / |step|)`, so `end` is never
    /// included and a trailing partial step is dropped.
    ///
    /// # Errors
    /// - [`TensorError::BadStep`] if `step` is zero or points away from `end`
    /// - [`TensorError::BadInterval`] if the range holds no element
    ///
    /// # Example
    /// ```rust
    /// use strided_tensor::Tensor;
    ///
    /// let t = Tensor::<i32>::range(10, 0, -3).unwrap();
    /// assert_eq!(t.ravel(), vec![10, 7, 4]);
    /// ```
    pub fn range(start: isize, end: isize, step: isize) -> Result<Self> {
        if step == 0 || (step > 0 && end < start) || (step < 0 && end > start) {
            return raise(TensorError::BadStep);
        }
        let len = start.abs_diff(end) / step.unsigned_abs();
        if len == 0 {
            return raise(TensorError::BadInterval);
        }
        let data = (0..len)
            .map(|i| Scalar::Isize(start + i as isize * step).cast::<T>())
            .collect();
        Ok(Self::owned(data, smallvec::smallvec![len]))
    }
}
