//! Strided tensor views.
//!
//! A [`Tensor`] is a window over a shared [`Buffer`]: the element at logical
//! index `(i_0, ..., i_{n-1})` lives at `offset + sum(i_k * stride_k)`.
//! Logical iteration is row-major over the shape (last index fastest).
//!
//! Key properties:
//! - Cloning a tensor is cheap and shares storage
//! - Rank 0 tensors hold exactly one element at `offset`
//! - Freshly materialized tensors are canonical: row-major strides, offset 0

use std::fmt;

use crate::buffer::Buffer;
use crate::config::check;
use crate::element::Element;
use crate::shape::{self, canonical_stride, numel};
use crate::{Dims, Result, TensorError};

/// A strided n-dimensional view over shared numeric storage.
///
/// # Example
/// ```rust
/// use strided_tensor::Tensor;
///
/// let t = Tensor::<f64>::from_backing(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
/// assert_eq!(t.shape(), &[2, 3]);
/// assert_eq!(t.stride(), &[3, 1]);
/// assert_eq!(t.get(&[1, 2]).unwrap(), 6.0);
///
/// // Index and slice share storage with `t`.
/// let row = t.index(&[1]).unwrap();
/// assert_eq!(row.ravel(), vec![4.0, 5.0, 6.0]);
/// assert!(row.shares_storage(&t));
/// ```
#[derive(Clone)]
pub struct Tensor<T> {
    data: Buffer<T>,
    shape: Dims,
    stride: Dims,
    offset: usize,
}

impl<T> Tensor<T> {
    /// Assemble a view from its parts. The caller guarantees every reachable
    /// index lies within `data`.
    pub(crate) fn from_parts(data: Buffer<T>, shape: Dims, stride: Dims, offset: usize) -> Self {
        debug_assert_eq!(shape.len(), stride.len());
        Self {
            data,
            shape,
            stride,
            offset,
        }
    }

    /// Wrap freshly allocated elements as an owned canonical tensor.
    pub(crate) fn owned(data: Vec<T>, shape: Dims) -> Self {
        debug_assert_eq!(data.len(), numel(&shape));
        let stride = canonical_stride(&shape);
        Self::from_parts(Buffer::new(data), shape, stride, 0)
    }

    /// Returns the size of each axis.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the stride of each axis, in elements.
    #[inline]
    pub fn stride(&self) -> &[usize] {
        &self.stride
    }

    /// Returns the view's starting offset into its buffer.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the number of logical elements. Rank 0 tensors hold one.
    #[inline]
    pub fn numel(&self) -> usize {
        numel(&self.shape)
    }

    /// Returns the number of axes.
    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Returns the size of axis `axis`.
    pub fn size(&self, axis: usize) -> Result<usize> {
        check(shape::valid_axis(axis, self.rank()))?;
        Ok(self.shape[axis])
    }

    /// Whether the tensor can be broadcast to `shape`.
    pub fn broadable(&self, shape: &[usize]) -> bool {
        shape::broadable(&self.shape, shape)
    }

    /// Check if the view is contiguous in memory (row-major order).
    #[inline]
    pub fn is_contiguous(&self) -> bool {
        shape::is_contiguous(&self.shape, &self.stride)
    }

    /// Returns the shared storage behind this view.
    #[inline]
    pub fn buffer(&self) -> &Buffer<T> {
        &self.data
    }

    /// Whether `self` and `other` view the same storage.
    #[inline]
    pub fn shares_storage(&self, other: &Tensor<T>) -> bool {
        self.data.ptr_eq(&other.data)
    }

    /// Iterate over the buffer offsets of the logical elements, row-major.
    pub(crate) fn offsets(&self) -> Offsets<'_> {
        Offsets::new(&self.shape, &self.stride, self.offset)
    }

    /// Buffer offset of the element at `index`.
    fn linear_index(&self, index: &[usize]) -> Result<usize> {
        if index.len() != self.rank() {
            return Err(TensorError::ArgsBounds);
        }
        let mut idx = self.offset;
        for ((&i, &dim), &stride) in index.iter().zip(&self.shape).zip(&self.stride) {
            if i >= dim {
                return Err(TensorError::AxisBounds);
            }
            idx += i * stride;
        }
        Ok(idx)
    }
}

impl<T: Element> Tensor<T> {
    /// Copies the logical elements out, in row-major order of the view.
    pub fn ravel(&self) -> Vec<T> {
        self.with_logical(|elems| elems.to_vec())
    }

    /// The value of a rank 0 tensor.
    ///
    /// # Errors
    /// Returns [`TensorError::BadShape`] if the tensor's rank is not 0.
    pub fn scalar(&self) -> Result<T> {
        if self.rank() != 0 {
            return crate::config::raise(TensorError::BadShape);
        }
        Ok(self.data.read()[self.offset])
    }

    /// Get the element at `index` (one coordinate per axis).
    pub fn get(&self, index: &[usize]) -> Result<T> {
        let idx = check(self.linear_index(index))?;
        Ok(self.data.read()[idx])
    }

    /// Set the element at `index`. Every view of the storage observes the write.
    pub fn set(&self, index: &[usize], value: T) -> Result<()> {
        let idx = check(self.linear_index(index))?;
        self.data.write()[idx] = value;
        Ok(())
    }

    /// Write `values`, in logical order, into the view's positions.
    ///
    /// # Errors
    /// Returns [`TensorError::StorageDump`] if `values.len() != self.numel()`.
    pub fn assign(&self, values: &[T]) -> Result<()> {
        if values.len() != self.numel() {
            return crate::config::raise(TensorError::StorageDump);
        }
        self.with_logical_mut(|elems| elems.copy_from_slice(values));
        Ok(())
    }

    /// Run `f` over the logical elements.
    ///
    /// Contiguous views lend their buffer window directly; other layouts are
    /// gathered into a scratch vector first.
    pub(crate) fn with_logical<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        let data = self.data.read();
        if self.is_contiguous() {
            return f(&data[self.offset..self.offset + self.numel()]);
        }
        let gathered: Vec<T> = self.offsets().map(|o| data[o]).collect();
        drop(data);
        f(&gathered)
    }

    /// Run `f` over the logical elements with write access, in place.
    ///
    /// Non-contiguous views are gathered, handed to `f`, and scattered back
    /// while the write lock is held.
    pub(crate) fn with_logical_mut<R>(&self, f: impl FnOnce(&mut [T]) -> R) -> R {
        let mut data = self.data.write();
        if self.is_contiguous() {
            let start = self.offset;
            return f(&mut data[start..start + self.numel()]);
        }
        let mut gathered: Vec<T> = self.offsets().map(|o| data[o]).collect();
        let out = f(&mut gathered);
        for (o, v) in self.offsets().zip(gathered) {
            data[o] = v;
        }
        out
    }
}

impl<T: Element> fmt::Debug for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape.as_slice())
            .field("stride", &self.stride.as_slice())
            .field("offset", &self.offset)
            .field("data", &self.ravel())
            .finish()
    }
}

// ============================================================================
// Iterator support
// ============================================================================

/// Iterator over the buffer offsets of a strided layout, in row-major order.
pub(crate) struct Offsets<'a> {
    shape: &'a [usize],
    stride: &'a [usize],
    index: Dims,
    current: usize,
    remaining: usize,
}

impl<'a> Offsets<'a> {
    pub(crate) fn new(shape: &'a [usize], stride: &'a [usize], offset: usize) -> Self {
        Self {
            shape,
            stride,
            index: smallvec::smallvec![0; shape.len()],
            current: offset,
            remaining: numel(shape),
        }
    }
}

impl Iterator for Offsets<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let out = self.current;
        self.remaining -= 1;

        // Advance indices (row-major order: last index changes fastest)
        for axis in (0..self.shape.len()).rev() {
            self.index[axis] += 1;
            self.current += self.stride[axis];
            if self.index[axis] < self.shape[axis] {
                break;
            }
            self.current -= self.stride[axis] * self.shape[axis];
            self.index[axis] = 0;
        }
        Some(out)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Offsets<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> Tensor<i32> {
        Tensor::owned((0..6).collect(), smallvec::smallvec![2, 3])
    }

    #[test]
    fn test_attributes() {
        let t = matrix();
        assert_eq!(t.shape(), &[2, 3]);
        assert_eq!(t.stride(), &[3, 1]);
        assert_eq!(t.offset(), 0);
        assert_eq!(t.numel(), 6);
        assert_eq!(t.rank(), 2);
        assert_eq!(t.size(1), Ok(3));
        assert_eq!(t.size(2), Err(TensorError::AxisBounds));
        assert!(t.is_contiguous());
    }

    #[test]
    fn test_offsets_transposed() {
        let shape = [3usize, 2];
        let stride = [1usize, 3];
        let offsets: Vec<usize> = Offsets::new(&shape, &stride, 0).collect();
        assert_eq!(offsets, vec![0, 3, 1, 4, 2, 5]);
    }

    #[test]
    fn test_offsets_rank0() {
        let offsets: Vec<usize> = Offsets::new(&[], &[], 4).collect();
        assert_eq!(offsets, vec![4]);
    }

    #[test]
    fn test_offsets_size_hint() {
        let shape = [2usize, 2, 2];
        let stride = [4usize, 2, 1];
        let mut it = Offsets::new(&shape, &stride, 0);
        assert_eq!(it.len(), 8);
        it.next();
        assert_eq!(it.len(), 7);
    }

    #[test]
    fn test_get_set_shared() {
        let t = matrix();
        let alias = t.clone();
        t.set(&[1, 0], 30).unwrap();
        assert_eq!(alias.get(&[1, 0]), Ok(30));
        assert_eq!(t.get(&[2, 0]), Err(TensorError::AxisBounds));
        assert_eq!(t.get(&[0]), Err(TensorError::ArgsBounds));
    }

    #[test]
    fn test_scalar() {
        let t = Tensor::owned(vec![7u8], Dims::new());
        assert_eq!(t.rank(), 0);
        assert_eq!(t.numel(), 1);
        assert_eq!(t.scalar(), Ok(7));
        assert_eq!(matrix().scalar(), Err(TensorError::BadShape));
    }

    #[test]
    fn test_ravel_non_contiguous() {
        let t = matrix();
        let transposed = Tensor::from_parts(
            t.buffer().clone(),
            smallvec::smallvec![3, 2],
            smallvec::smallvec![1, 3],
            0,
        );
        assert!(!transposed.is_contiguous());
        assert_eq!(transposed.ravel(), vec![0, 3, 1, 4, 2, 5]);
    }

    #[test]
    fn test_assign_scatters_through_strides() {
        let t = matrix();
        let column = Tensor::from_parts(
            t.buffer().clone(),
            smallvec::smallvec![2],
            smallvec::smallvec![3],
            1,
        );
        column.assign(&[10, 40]).unwrap();
        assert_eq!(t.ravel(), vec![0, 10, 2, 3, 40, 5]);
        assert_eq!(column.assign(&[1]), Err(TensorError::StorageDump));
    }
}
