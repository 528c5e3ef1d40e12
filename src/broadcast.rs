//! Elementwise binary operations with broadcasting.
//!
//! The operand is first ingested as a tensor of the receiver's element type
//! (so tensor operands are always copied, never aliased). The common shape is
//! resolved in one pass with [`broadcast_shape`]; each side whose shape
//! differs is materialized once at that shape before the kernel runs.
//!
//! The instance forms write into the receiver's storage when the receiver
//! already has the common shape, so every alias observes the result. When the
//! receiver itself must grow, the result lands in its broadcast copy. The
//! free functions always allocate a fresh output.
//!
//! Integer arithmetic wraps on overflow in every build profile. Integer
//! division by zero panics, as it does for the primitive types.

use crate::config::raise;
use crate::element::Element;
use crate::ingest::Backing;
use crate::kernel;
use crate::shape::{broadcast_shape, numel};
use crate::threading::worker_count;
use crate::view::Tensor;
use crate::{Dims, Result, TensorError};

/// Common shape of two operands.
fn common_shape(lhs: &[usize], rhs: &[usize]) -> Result<Dims> {
    match broadcast_shape(lhs, rhs) {
        Some(shape) => Ok(shape),
        None => raise(TensorError::NotBroadable),
    }
}

/// `t` itself if it already has `shape`, else its materialized broadcast.
fn expand<T: Element>(t: Tensor<T>, shape: &[usize]) -> Result<Tensor<T>> {
    if t.shape() == shape {
        Ok(t)
    } else {
        t.broadcast(shape)
    }
}

impl<T: Element> Tensor<T> {
    /// Combine with `other` elementwise, `self[j] = f(self[j], other[j])`,
    /// after broadcasting both to their common shape.
    ///
    /// # Errors
    /// - [`TensorError::UnwrapBacking`] if `other` cannot be ingested
    /// - [`TensorError::NotBroadable`] if the shapes are incompatible
    ///
    /// # Example
    /// ```rust
    /// use strided_tensor::Tensor;
    ///
    /// let t = Tensor::<i32>::from_backing(&[[1, 2], [3, 4]]).unwrap();
    /// let alias = t.clone();
    /// t.ewise(&[10, 100], |a, b| a * b).unwrap();
    /// assert_eq!(alias.ravel(), vec![10, 200, 30, 400]);
    /// ```
    pub fn ewise<B, F>(&self, other: &B, f: F) -> Result<Self>
    where
        B: Backing + ?Sized,
        F: Fn(T, T) -> T + Sync + Send,
    {
        let other = Tensor::<T>::from_backing(other)?;
        let shape = common_shape(self.shape(), other.shape())?;
        let rhs = expand(other, &shape)?;
        let out = expand(self.clone(), &shape)?;
        let parts = worker_count(numel(&shape));
        // `rhs` always owns fresh storage, so holding its read lock while
        // `out` is written cannot deadlock.
        rhs.with_logical(|b| {
            out.with_logical_mut(|a| kernel::elementwise_in_place(a, b, parts, f))
        })?;
        Ok(out)
    }

    /// `self + other`, broadcasting.
    pub fn add<B: Backing + ?Sized>(&self, other: &B) -> Result<Self> {
        self.ewise(other, T::wrapping_add)
    }

    /// `self - other`, broadcasting.
    pub fn sub<B: Backing + ?Sized>(&self, other: &B) -> Result<Self> {
        self.ewise(other, T::wrapping_sub)
    }

    /// `self * other`, broadcasting.
    pub fn mul<B: Backing + ?Sized>(&self, other: &B) -> Result<Self> {
        self.ewise(other, T::wrapping_mul)
    }

    /// `self / other`, broadcasting.
    ///
    /// # Panics
    /// Panics on integer division by zero.
    pub fn div<B: Backing + ?Sized>(&self, other: &B) -> Result<Self> {
        self.ewise(other, T::wrapping_div)
    }
}

/// Combine `lhs` and `rhs` elementwise into a fresh tensor of their common
/// shape.
///
/// # Errors
/// - [`TensorError::UnwrapBacking`] if either operand cannot be ingested
/// - [`TensorError::NotBroadable`] if the shapes are incompatible
///
/// # Example
/// ```rust
/// use strided_tensor::{ewise, Tensor};
///
/// let a = Tensor::<f64>::from_backing(&[1.0, 2.0]).unwrap();
/// let c: Tensor<f64> = ewise(&a, &[[1.0], [2.0]], f64::max).unwrap();
/// assert_eq!(c.shape(), &[2, 2]);
/// assert_eq!(c.ravel(), vec![1.0, 2.0, 2.0, 2.0]);
/// assert_eq!(a.ravel(), vec![1.0, 2.0]);
/// ```
pub fn ewise<T, L, R, F>(lhs: &L, rhs: &R, f: F) -> Result<Tensor<T>>
where
    T: Element,
    L: Backing + ?Sized,
    R: Backing + ?Sized,
    F: Fn(T, T) -> T + Sync + Send,
{
    let lhs = Tensor::<T>::from_backing(lhs)?;
    let rhs = Tensor::<T>::from_backing(rhs)?;
    let shape = common_shape(lhs.shape(), rhs.shape())?;
    let lhs = expand(lhs, &shape)?;
    let rhs = expand(rhs, &shape)?;

    let len = numel(&shape);
    let mut data = vec![T::zero(); len];
    let parts = worker_count(len);
    lhs.with_logical(|a| {
        rhs.with_logical(|b| kernel::elementwise(a, b, &mut data, parts, f))
    })?;
    Ok(Tensor::owned(data, shape))
}

/// `lhs + rhs` into a fresh tensor.
pub fn add<T, L, R>(lhs: &L, rhs: &R) -> Result<Tensor<T>>
where
    T: Element,
    L: Backing + ?Sized,
    R: Backing + ?Sized,
{
    ewise(lhs, rhs, T::wrapping_add)
}

/// `lhs - rhs` into a fresh tensor.
pub fn sub<T, L, R>(lhs: &L, rhs: &R) -> Result<Tensor<T>>
where
    T: Element,
    L: Backing + ?Sized,
    R: Backing + ?Sized,
{
    ewise(lhs, rhs, T::wrapping_sub)
}

/// `lhs * rhs` into a fresh tensor.
pub fn mul<T, L, R>(lhs: &L, rhs: &R) -> Result<Tensor<T>>
where
    T: Element,
    L: Backing + ?Sized,
    R: Backing + ?Sized,
{
    ewise(lhs, rhs, T::wrapping_mul)
}

/// `lhs / rhs` into a fresh tensor.
///
/// # Panics
/// Panics on integer division by zero.
pub fn div<T, L, R>(lhs: &L, rhs: &R) -> Result<Tensor<T>>
where
    T: Element,
    L: Backing + ?Sized,
    R: Backing + ?Sized,
{
    ewise(lhs, rhs, T::wrapping_div)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_scalar_in_place() {
        let t = Tensor::<i32>::range(0, 4, 1).unwrap();
        let alias = t.clone();
        let r = t.add(&5).unwrap();
        assert!(r.shares_storage(&t));
        assert_eq!(alias.ravel(), vec![5, 6, 7, 8]);
    }

    #[test]
    fn test_receiver_broadcast_copies() {
        let a = Tensor::<i32>::from_backing(&[[1], [2], [3]]).unwrap();
        let b = a.add(&[10, 20, 30]).unwrap();
        assert_eq!(b.shape(), &[3, 3]);
        assert_eq!(b.ravel(), vec![11, 21, 31, 12, 22, 32, 13, 23, 33]);
        assert!(!b.shares_storage(&a));
        assert_eq!(a.ravel(), vec![1, 2, 3]);
    }

    #[test]
    fn test_operand_tensor_is_cast() {
        let t = Tensor::<f64>::from_backing(&[1.0, 2.0]).unwrap();
        let ints = Tensor::<i8>::from_backing(&[3, 4]).unwrap();
        t.mul(&ints).unwrap();
        assert_eq!(t.ravel(), vec![3.0, 8.0]);
    }

    #[test]
    fn test_self_operand() {
        let t = Tensor::<i64>::range(1, 4, 1).unwrap();
        t.mul(&t.clone()).unwrap();
        assert_eq!(t.ravel(), vec![1, 4, 9]);
    }

    #[test]
    fn test_strided_receiver() {
        let t = Tensor::<i32>::range(0, 6, 1).unwrap().reshape(&[2, 3]).unwrap();
        let col = t.permute(&[1, 0]).unwrap().index(&[0]).unwrap();
        col.sub(&[100, 200]).unwrap();
        assert_eq!(t.ravel(), vec![-100, 1, 2, -197, 4, 5]);
    }

    #[test]
    fn test_not_broadable() {
        let t = Tensor::<f32>::zeros(&[2, 3]).unwrap();
        assert_eq!(t.add(&[1.0, 2.0]).unwrap_err(), TensorError::NotBroadable);
        let empty: Vec<f32> = Vec::new();
        assert_eq!(t.add(&empty).unwrap_err(), TensorError::UnwrapBacking);
    }

    #[test]
    fn test_div_semantics() {
        let ints = Tensor::<i32>::from_backing(&[7, -7]).unwrap();
        assert_eq!(ints.div(&2).unwrap().ravel(), vec![3, -3]);
        let floats = Tensor::<f64>::from_backing(&[1.0, -1.0]).unwrap();
        assert_eq!(
            floats.div(&0.0).unwrap().ravel(),
            vec![f64::INFINITY, f64::NEG_INFINITY]
        );
    }

    #[test]
    #[should_panic]
    fn test_integer_div_by_zero_panics() {
        let ints = Tensor::<u8>::from_backing(&[1u8]).unwrap();
        let _ = ints.div(&0u8);
    }

    #[test]
    fn test_free_functions_allocate() {
        let a = Tensor::<i32>::from_backing(&[1, 2, 3]).unwrap();
        let s: Tensor<i32> = add(&a, &1).unwrap();
        assert!(!s.shares_storage(&a));
        assert_eq!(s.ravel(), vec![2, 3, 4]);
        assert_eq!(a.ravel(), vec![1, 2, 3]);

        let d: Tensor<i32> = sub(&10, &a).unwrap();
        assert_eq!(d.ravel(), vec![9, 8, 7]);
        let m: Tensor<f32> = mul(&[[1], [2]], &a).unwrap();
        assert_eq!(m.shape(), &[2, 3]);
        assert_eq!(m.ravel(), vec![1.0, 2.0, 3.0, 2.0, 4.0, 6.0]);
        let q: Tensor<f64> = div(&a, &2).unwrap();
        assert_eq!(q.ravel(), vec![0.5, 1.0, 1.5]);
    }

    #[test]
    fn test_integer_overflow_wraps() {
        let t = Tensor::<u8>::from_backing(&[250u8, 5]).unwrap();
        t.add(&10).unwrap();
        assert_eq!(t.ravel(), vec![4, 15]);
        t.sub(&[5, 20]).unwrap();
        assert_eq!(t.ravel(), vec![255, 251]);
        t.mul(&2).unwrap();
        assert_eq!(t.ravel(), vec![254, 246]);

        let q: Tensor<i8> = div(&[i8::MIN], &-1).unwrap();
        assert_eq!(q.ravel(), vec![i8::MIN]);
        let s: Tensor<i16> = add(&[i16::MAX], &1).unwrap();
        assert_eq!(s.ravel(), vec![i16::MIN]);
    }

    #[test]
    fn test_free_not_broadable() {
        let r: Result<Tensor<u8>> = add(&[1u8, 2], &[1u8, 2, 3]);
        assert_eq!(r.unwrap_err(), TensorError::NotBroadable);
    }

    #[test]
    fn test_rank0_operands() {
        let s = Tensor::from_scalar(2.0f64);
        s.add(&3.0).unwrap();
        assert_eq!(s.scalar(), Ok(5.0));
        let grown = s.mul(&[1.0, 2.0]).unwrap();
        assert_eq!(grown.ravel(), vec![5.0, 10.0]);
    }
}
