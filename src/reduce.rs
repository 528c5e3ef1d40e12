//! Whole-tensor reductions to rank 0.
//!
//! Reductions fold per chunk and then across the chunk partials (see
//! [`kernel::reduce`]). Integer results do not depend on the worker count;
//! floating-point sums and means may differ in the last bits.

use crate::element::Element;
use crate::kernel;
use crate::threading::worker_count;
use crate::view::Tensor;
use crate::Result;

fn fold_min<T: Element>(xs: &[T]) -> T {
    xs[1..].iter().fold(xs[0], |acc, &x| if x < acc { x } else { acc })
}

fn fold_max<T: Element>(xs: &[T]) -> T {
    xs[1..].iter().fold(xs[0], |acc, &x| if x > acc { x } else { acc })
}

fn fold_sum<T: Element>(xs: &[T]) -> T {
    xs.iter().fold(T::zero(), |acc, &x| acc.wrapping_add(x))
}

fn fold_prod<T: Element>(xs: &[T]) -> T {
    xs.iter().fold(T::one(), |acc, &x| acc.wrapping_mul(x))
}

impl<T: Element> Tensor<T> {
    /// Reduce all elements to a rank 0 tensor with the associative fold `f`.
    ///
    /// `f` is applied to each chunk of the logical elements and then to the
    /// chunk results; it always receives a non-empty slice.
    ///
    /// # Example
    /// ```rust
    /// use strided_tensor::Tensor;
    ///
    /// let t = Tensor::<u32>::range(1, 6, 1).unwrap();
    /// let r = t.reduce(|xs| xs.iter().fold(0, |acc, &x| acc ^ x)).unwrap();
    /// assert_eq!(r.scalar().unwrap(), 1 ^ 2 ^ 3 ^ 4 ^ 5);
    /// ```
    pub fn reduce<F>(&self, f: F) -> Result<Self>
    where
        F: Fn(&[T]) -> T + Sync + Send,
    {
        let parts = worker_count(self.numel());
        let value = self.with_logical(|elems| kernel::reduce(elems, parts, f))?;
        Ok(Self::from_scalar(value))
    }

    /// Smallest element. NaNs are skipped unless they come first.
    pub fn min(&self) -> Result<Self> {
        self.reduce(fold_min)
    }

    /// Largest element. NaNs are skipped unless they come first.
    pub fn max(&self) -> Result<Self> {
        self.reduce(fold_max)
    }

    /// Sum of the elements. Integer sums wrap on overflow.
    pub fn sum(&self) -> Result<Self> {
        self.reduce(fold_sum)
    }

    /// Product of the elements. Integer products wrap on overflow.
    pub fn prod(&self) -> Result<Self> {
        self.reduce(fold_prod)
    }

    /// Sum divided by the element count. Integer means truncate.
    ///
    /// When the count does not fit in `T` (more than 255 `u8` elements, say)
    /// the mean is taken in `f64` and converted back.
    pub fn mean(&self) -> Result<Self> {
        let n = self.numel();
        match T::from_usize(n) {
            Some(count) => {
                let total = self.sum()?.scalar()?;
                Ok(Self::from_scalar(total.wrapping_div(count)))
            }
            None => {
                let total: f64 =
                    self.with_logical(|elems| elems.iter().map(|&x| x.to_f64()).sum());
                Ok(Self::from_scalar(T::cast_f64(total / n as f64)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_named_reductions() {
        let t = Tensor::<i64>::from_backing(&[[3, -1], [4, 2]]).unwrap();
        assert_eq!(t.min().unwrap().scalar(), Ok(-1));
        assert_eq!(t.max().unwrap().scalar(), Ok(4));
        assert_eq!(t.sum().unwrap().scalar(), Ok(8));
        assert_eq!(t.prod().unwrap().scalar(), Ok(-24));
        assert_eq!(t.mean().unwrap().scalar(), Ok(2));
    }

    #[test]
    fn test_result_is_rank0() {
        let r = Tensor::<f32>::ones(&[2, 2]).unwrap().sum().unwrap();
        assert_eq!(r.rank(), 0);
        assert!(r.shape().is_empty());
        assert_eq!(r.scalar(), Ok(4.0));
    }

    #[test]
    fn test_mean_float() {
        let t = Tensor::<f64>::range(0, 10, 1).unwrap();
        assert_relative_eq!(t.mean().unwrap().scalar().unwrap(), 4.5);
    }

    #[test]
    fn test_reduce_strided_view() {
        let t = Tensor::<i32>::range(0, 6, 1).unwrap().reshape(&[2, 3]).unwrap();
        let col = t.permute(&[1, 0]).unwrap().index(&[2]).unwrap();
        assert_eq!(col.sum().unwrap().scalar(), Ok(2 + 5));
        assert_eq!(col.min().unwrap().scalar(), Ok(2));
    }

    #[test]
    fn test_min_max_float_nan() {
        let t = Tensor::<f64>::from_backing(&[2.0, f64::NAN, -1.0]).unwrap();
        assert_eq!(t.min().unwrap().scalar(), Ok(-1.0));
        assert_eq!(t.max().unwrap().scalar(), Ok(2.0));
    }

    #[test]
    fn test_mean_count_wider_than_element() {
        let zeros = Tensor::<u8>::zeros(&[256]).unwrap();
        assert_eq!(zeros.mean().unwrap().scalar(), Ok(0));
        let threes = Tensor::<u8>::full(3, &[300]).unwrap();
        assert_eq!(threes.mean().unwrap().scalar(), Ok(3));
        let twos = Tensor::<i8>::full(2, &[200]).unwrap();
        assert_eq!(twos.mean().unwrap().scalar(), Ok(2));
        let negatives = Tensor::<i8>::full(-1, &[10, 20]).unwrap();
        assert_eq!(negatives.mean().unwrap().scalar(), Ok(-1));
    }

    #[test]
    fn test_integer_sum_prod_wrap() {
        let t = Tensor::<u8>::from_backing(&[200u8, 100]).unwrap();
        assert_eq!(t.sum().unwrap().scalar(), Ok(44));
        let p = Tensor::<i8>::from_backing(&[16i8, 16, 3]).unwrap();
        assert_eq!(p.prod().unwrap().scalar(), Ok(0));
        let m = Tensor::<i16>::from_backing(&[i16::MAX, 1]).unwrap();
        assert_eq!(m.sum().unwrap().scalar(), Ok(i16::MIN));
    }

    #[test]
    fn test_fold_helpers() {
        assert_eq!(fold_min(&[5u8]), 5);
        assert_eq!(fold_max(&[1i16, 9, 3]), 9);
        assert_eq!(fold_sum::<u32>(&[]), 0);
        assert_eq!(fold_prod(&[2.0f32, 0.5]), 1.0);
    }
}
