//! View manipulation.
//!
//! `reshape` (on contiguous input), `index`, `slice`, `permute`, `squeeze`
//! and `unsqueeze` return views sharing storage. `reverse` and `flip` mutate
//! the viewed elements in place. `broadcast`, `repeat`, `cat`, `stack`,
//! `cast` and `deep_clone` materialize a fresh canonical tensor.

use crate::config::{check, raise};
use crate::element::Element;
use crate::shape::{self, canonical_stride, numel};
use crate::view::{Offsets, Tensor};
use crate::{Dims, Result, TensorError};

impl<T: Element> Tensor<T> {
    /// Reinterpret the elements under a new shape.
    ///
    /// An empty `shape` is accepted only for single-element tensors and yields
    /// rank 0. Contiguous views keep sharing storage; other layouts are
    /// materialized first so the logical order is preserved.
    ///
    /// # Errors
    /// Returns [`TensorError::BadShape`] if `shape` is invalid or holds a
    /// different number of elements.
    pub fn reshape(&self, shape: &[usize]) -> Result<Self> {
        if shape.is_empty() {
            if self.numel() != 1 {
                return raise(TensorError::BadShape);
            }
            // the single element sits at `offset` regardless of strides
            return Ok(Self::from_parts(
                self.buffer().clone(),
                Dims::new(),
                Dims::new(),
                self.offset(),
            ));
        }
        check(shape::valid_shape(shape))?;
        if numel(shape) != self.numel() {
            return raise(TensorError::BadShape);
        }
        if !self.is_contiguous() {
            tracing::debug!(shape = ?self.shape(), "materializing non-contiguous view for reshape");
            return self.deep_clone().reshape(shape);
        }
        Ok(Self::from_parts(
            self.buffer().clone(),
            Dims::from_slice(shape),
            canonical_stride(shape),
            self.offset(),
        ))
    }

    /// View the sub-tensor at the leading `indices`.
    ///
    /// # Errors
    /// - [`TensorError::ArgsBounds`] if more indices than axes are given
    /// - [`TensorError::AxisBounds`] if an index exceeds its axis
    pub fn index(&self, indices: &[usize]) -> Result<Self> {
        check(shape::valid_args(indices.len(), self.rank()))?;
        let mut offset = self.offset();
        for (axis, &i) in indices.iter().enumerate() {
            if i >= self.shape()[axis] {
                return raise(TensorError::AxisBounds);
            }
            offset += i * self.stride()[axis];
        }
        let k = indices.len();
        Ok(Self::from_parts(
            self.buffer().clone(),
            Dims::from_slice(&self.shape()[k..]),
            Dims::from_slice(&self.stride()[k..]),
            offset,
        ))
    }

    /// View rows `start..end` along axis 0.
    ///
    /// # Errors
    /// - [`TensorError::BadShape`] on a rank 0 tensor
    /// - [`TensorError::BadInterval`] unless `0 <= start < end <= shape[0]`
    pub fn slice(&self, start: usize, end: usize) -> Result<Self> {
        check(shape::valid_shape(self.shape()))?;
        check(shape::valid_interval(start, end, 0, self.shape()[0]))?;
        let mut shape = Dims::from_slice(self.shape());
        shape[0] = end - start;
        Ok(Self::from_parts(
            self.buffer().clone(),
            shape,
            Dims::from_slice(self.stride()),
            self.offset() + start * self.stride()[0],
        ))
    }

    /// Reorder the axes: axis `i` of the result is axis `axes[i]` of `self`.
    ///
    /// # Errors
    /// - [`TensorError::ArgsBounds`] if `axes.len() != rank`
    /// - [`TensorError::AxisBounds`] if `axes` is not a permutation
    pub fn permute(&self, axes: &[usize]) -> Result<Self> {
        if axes.len() != self.rank() {
            return raise(TensorError::ArgsBounds);
        }
        if !shape::is_permutation(axes) {
            return raise(TensorError::AxisBounds);
        }
        let shape = axes.iter().map(|&a| self.shape()[a]).collect();
        let stride = axes.iter().map(|&a| self.stride()[a]).collect();
        Ok(Self::from_parts(
            self.buffer().clone(),
            shape,
            stride,
            self.offset(),
        ))
    }

    /// Remove the size-1 axis `axis`.
    ///
    /// # Errors
    /// - [`TensorError::AxisBounds`] if `axis >= rank`
    /// - [`TensorError::BadShape`] if that axis is not of size 1
    pub fn squeeze(&self, axis: usize) -> Result<Self> {
        check(shape::valid_axis(axis, self.rank()))?;
        if self.shape()[axis] != 1 {
            return raise(TensorError::BadShape);
        }
        let mut shape = Dims::from_slice(self.shape());
        let mut stride = Dims::from_slice(self.stride());
        shape.remove(axis);
        stride.remove(axis);
        Ok(Self::from_parts(
            self.buffer().clone(),
            shape,
            stride,
            self.offset(),
        ))
    }

    /// Insert a size-1 axis before `axis` (`axis == rank` appends).
    ///
    /// # Errors
    /// Returns [`TensorError::AxisBounds`] if `axis > rank`.
    pub fn unsqueeze(&self, axis: usize) -> Result<Self> {
        check(shape::valid_insert_axis(axis, self.rank()))?;
        let inserted = if axis < self.rank() {
            self.shape()[axis] * self.stride()[axis]
        } else {
            1
        };
        let mut shape = Dims::from_slice(self.shape());
        let mut stride = Dims::from_slice(self.stride());
        shape.insert(axis, 1);
        stride.insert(axis, inserted);
        Ok(Self::from_parts(
            self.buffer().clone(),
            shape,
            stride,
            self.offset(),
        ))
    }

    /// Reverse the logical element sequence in place.
    pub fn reverse(&self) -> Self {
        self.with_logical_mut(|elems| elems.reverse());
        self.clone()
    }

    /// Reverse the elements along `axis` in place.
    ///
    /// # Errors
    /// Returns [`TensorError::AxisBounds`] if `axis >= rank`.
    pub fn flip(&self, axis: usize) -> Result<Self> {
        check(shape::valid_axis(axis, self.rank()))?;
        let dim = self.shape()[axis];
        let inner: usize = self.shape()[axis + 1..].iter().product();
        let block = dim * inner;
        self.with_logical_mut(|elems| {
            for outer in elems.chunks_exact_mut(block) {
                let (mut j, mut k) = (0, dim - 1);
                while j < k {
                    let (head, tail) = outer.split_at_mut(k * inner);
                    head[j * inner..(j + 1) * inner].swap_with_slice(&mut tail[..inner]);
                    j += 1;
                    k -= 1;
                }
            }
        });
        Ok(self.clone())
    }

    /// Stack `n` copies of the tensor along a new leading axis.
    ///
    /// # Errors
    /// Returns [`TensorError::BadShape`] if `n == 0`.
    pub fn repeat(&self, n: usize) -> Result<Self> {
        if n == 0 {
            return raise(TensorError::BadShape);
        }
        let data = self.with_logical(|elems| elems.repeat(n));
        let mut shape = Dims::with_capacity(self.rank() + 1);
        shape.push(n);
        shape.extend_from_slice(self.shape());
        Ok(Self::owned(data, shape))
    }

    /// Concatenate `other` after `self` along `axis`.
    ///
    /// # Errors
    /// - [`TensorError::AxisBounds`] if `axis >= rank`
    /// - [`TensorError::BadShape`] if the shapes differ on any other axis
    pub fn cat(&self, other: &Self, axis: usize) -> Result<Self> {
        check(shape::valid_axis(axis, self.rank()))?;
        let compatible = self.rank() == other.rank()
            && self
                .shape()
                .iter()
                .zip(other.shape())
                .enumerate()
                .all(|(i, (a, b))| i == axis || a == b);
        if !compatible {
            return raise(TensorError::BadShape);
        }

        let lhs = self.ravel();
        let rhs = other.ravel();
        let inner: usize = self.shape()[axis + 1..].iter().product();
        let lhs_block = self.shape()[axis] * inner;
        let rhs_block = other.shape()[axis] * inner;

        let mut data = Vec::with_capacity(lhs.len() + rhs.len());
        for (a, b) in lhs.chunks_exact(lhs_block).zip(rhs.chunks_exact(rhs_block)) {
            data.extend_from_slice(a);
            data.extend_from_slice(b);
        }
        let mut shape = Dims::from_slice(self.shape());
        shape[axis] += other.shape()[axis];
        Ok(Self::owned(data, shape))
    }

    /// Join `other` and `self` along a new axis inserted at `axis`.
    ///
    /// # Errors
    /// - [`TensorError::AxisBounds`] if `axis > rank`
    /// - [`TensorError::BadShape`] if the shapes differ
    pub fn stack(&self, other: &Self, axis: usize) -> Result<Self> {
        check(shape::valid_insert_axis(axis, self.rank()))?;
        self.unsqueeze(axis)?.cat(&other.unsqueeze(axis)?, axis)
    }

    /// Materialize the tensor expanded to `target`.
    ///
    /// Every destination coordinate reads the source at the same coordinate
    /// with size-1 axes pinned to 0. The result is owned and starts at
    /// offset 0.
    ///
    /// # Errors
    /// Returns [`TensorError::NotBroadable`] unless `self.broadable(target)`.
    ///
    /// # Example
    /// ```rust
    /// use strided_tensor::Tensor;
    ///
    /// let col = Tensor::<i32>::from_backing(&[[1], [2]]).unwrap();
    /// let b = col.broadcast(&[2, 3]).unwrap();
    /// assert_eq!(b.ravel(), vec![1, 1, 1, 2, 2, 2]);
    /// ```
    pub fn broadcast(&self, target: &[usize]) -> Result<Self> {
        if !self.broadable(target) {
            return raise(TensorError::NotBroadable);
        }
        tracing::debug!(from = ?self.shape(), to = ?target, "materializing broadcast");

        let (padded, _) = shape::align(self.shape(), target);
        let mut stride = canonical_stride(&padded);
        for (s, &d) in stride.iter_mut().zip(&padded) {
            if d == 1 {
                *s = 0;
            }
        }
        let src = self.ravel();
        let data = Offsets::new(target, &stride, 0).map(|o| src[o]).collect();
        Ok(Self::owned(data, Dims::from_slice(target)))
    }

    /// Copy the elements into an owned tensor of element type `U`, converting
    /// each with `as` semantics.
    pub fn cast<U: Element>(&self) -> Tensor<U> {
        let data = self.with_logical(|elems| elems.iter().map(|&x| x.cast::<U>()).collect());
        Tensor::owned(data, Dims::from_slice(self.shape()))
    }

    /// Copy the logical elements into fresh canonical storage.
    pub fn deep_clone(&self) -> Self {
        Self::owned(self.ravel(), Dims::from_slice(self.shape()))
    }
}
