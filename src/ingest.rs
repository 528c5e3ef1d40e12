//! Ingestion of host values into tensors.
//!
//! [`Backing`] is implemented for everything [`Tensor::from_backing`] accepts:
//! scalars of every element kind, strings (as bytes), flat and nested
//! sequences (`Vec`, slices, arrays) of any depth, tensors of any element
//! kind, and the dynamic [`Input`] variant.
//!
//! A backing describes itself in two passes: [`Backing::backing_shape`]
//! validates rectangularity and yields the shape, then
//! [`Backing::write_elements`] appends the elements in row-major order,
//! converted to the target element type.
//!
//! [`Tensor::from_backing`]: crate::Tensor::from_backing

use std::fmt;

use crate::element::{Element, Scalar};
use crate::view::Tensor;
use crate::{Dims, Result, TensorError};

/// A value that can be unwrapped into a rectangular numeric buffer.
pub trait Backing {
    /// The shape of the backing.
    ///
    /// # Errors
    /// Returns [`TensorError::UnwrapBacking`] if any nested sequence is empty
    /// or siblings disagree on their shape.
    fn backing_shape(&self) -> Result<Dims>;

    /// Appends the elements in row-major order, converted with `as` semantics.
    ///
    /// Only meaningful after [`Backing::backing_shape`] succeeded.
    fn write_elements<T: Element>(&self, out: &mut Vec<T>);
}

macro_rules! impl_scalar_backing {
    ($($t:ty),* $(,)?) => {
        $(
            impl Backing for $t {
                #[inline]
                fn backing_shape(&self) -> Result<Dims> {
                    Ok(Dims::new())
                }

                #[inline]
                fn write_elements<T: Element>(&self, out: &mut Vec<T>) {
                    out.push(<$t as Element>::cast::<T>(*self));
                }
            }
        )*
    };
}

impl_scalar_backing!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl Backing for Scalar {
    fn backing_shape(&self) -> Result<Dims> {
        Ok(Dims::new())
    }

    fn write_elements<T: Element>(&self, out: &mut Vec<T>) {
        out.push(self.cast::<T>());
    }
}

/// Shape of a sequence whose items all share one shape.
fn sequence_shape<B: Backing>(items: &[B]) -> Result<Dims> {
    let (first, rest) = items.split_first().ok_or(TensorError::UnwrapBacking)?;
    let inner = first.backing_shape()?;
    for item in rest {
        if item.backing_shape()? != inner {
            return Err(TensorError::UnwrapBacking);
        }
    }
    let mut shape = Dims::with_capacity(inner.len() + 1);
    shape.push(items.len());
    shape.extend_from_slice(&inner);
    Ok(shape)
}

impl<B: Backing> Backing for [B] {
    fn backing_shape(&self) -> Result<Dims> {
        sequence_shape(self)
    }

    fn write_elements<T: Element>(&self, out: &mut Vec<T>) {
        for item in self {
            item.write_elements(out);
        }
    }
}

impl<B: Backing, const N: usize> Backing for [B; N] {
    fn backing_shape(&self) -> Result<Dims> {
        sequence_shape(self.as_slice())
    }

    fn write_elements<T: Element>(&self, out: &mut Vec<T>) {
        self.as_slice().write_elements(out);
    }
}

impl<B: Backing> Backing for Vec<B> {
    fn backing_shape(&self) -> Result<Dims> {
        sequence_shape(self.as_slice())
    }

    fn write_elements<T: Element>(&self, out: &mut Vec<T>) {
        self.as_slice().write_elements(out);
    }
}

impl<B: Backing + ?Sized> Backing for &B {
    fn backing_shape(&self) -> Result<Dims> {
        (**self).backing_shape()
    }

    fn write_elements<T: Element>(&self, out: &mut Vec<T>) {
        (**self).write_elements(out);
    }
}

impl Backing for str {
    fn backing_shape(&self) -> Result<Dims> {
        self.as_bytes().backing_shape()
    }

    fn write_elements<T: Element>(&self, out: &mut Vec<T>) {
        self.as_bytes().write_elements(out);
    }
}

impl Backing for String {
    fn backing_shape(&self) -> Result<Dims> {
        self.as_str().backing_shape()
    }

    fn write_elements<T: Element>(&self, out: &mut Vec<T>) {
        self.as_str().write_elements(out);
    }
}

impl<U: Element> Backing for Tensor<U> {
    fn backing_shape(&self) -> Result<Dims> {
        Ok(Dims::from_slice(self.shape()))
    }

    fn write_elements<T: Element>(&self, out: &mut Vec<T>) {
        self.with_logical(|elems| out.extend(elems.iter().map(|&x| x.cast::<T>())));
    }
}

// ============================================================================
// Dynamic input
// ============================================================================

/// A tensor whose element type has been erased.
pub trait DynTensor: Send + Sync + fmt::Debug {
    /// The tensor's shape.
    fn dims(&self) -> Dims;

    /// The logical elements, row-major.
    fn scalars(&self) -> Vec<Scalar>;
}

impl<U: Element> DynTensor for Tensor<U> {
    fn dims(&self) -> Dims {
        Dims::from_slice(self.shape())
    }

    fn scalars(&self) -> Vec<Scalar> {
        self.with_logical(|elems| elems.iter().map(|&x| x.into_scalar()).collect())
    }
}

/// A dynamically typed backing, for inputs whose structure is only known at
/// runtime.
///
/// # Example
/// ```rust
/// use strided_tensor::{Input, Scalar, Tensor};
///
/// let input = Input::Nested(vec![
///     Input::Seq(vec![Scalar::I32(1), Scalar::F64(2.5)]),
///     Input::Seq(vec![Scalar::U8(3), Scalar::I64(-4)]),
/// ]);
/// let t = Tensor::<f32>::from_backing(&input).unwrap();
/// assert_eq!(t.shape(), &[2, 2]);
/// assert_eq!(t.ravel(), vec![1.0, 2.5, 3.0, -4.0]);
/// ```
#[derive(Debug)]
pub enum Input {
    /// A single value; rank 0.
    Scalar(Scalar),
    /// Raw bytes; rank 1.
    Bytes(Vec<u8>),
    /// A flat sequence; rank 1.
    Seq(Vec<Scalar>),
    /// A sequence of equally shaped inputs; rank is one more than theirs.
    Nested(Vec<Input>),
    /// A tensor of any element kind.
    Tensor(Box<dyn DynTensor>),
}

impl Backing for Input {
    fn backing_shape(&self) -> Result<Dims> {
        match self {
            Input::Scalar(_) => Ok(Dims::new()),
            Input::Bytes(bytes) => bytes.backing_shape(),
            Input::Seq(items) => items.backing_shape(),
            Input::Nested(items) => items.backing_shape(),
            Input::Tensor(t) => Ok(t.dims()),
        }
    }

    fn write_elements<T: Element>(&self, out: &mut Vec<T>) {
        match self {
            Input::Scalar(s) => s.write_elements(out),
            Input::Bytes(bytes) => bytes.write_elements(out),
            Input::Seq(items) => items.write_elements(out),
            Input::Nested(items) => items.write_elements(out),
            Input::Tensor(t) => t.scalars().write_elements(out),
        }
    }
}

impl From<Scalar> for Input {
    fn from(s: Scalar) -> Self {
        Input::Scalar(s)
    }
}

impl From<&str> for Input {
    fn from(s: &str) -> Self {
        Input::Bytes(s.as_bytes().to_vec())
    }
}

impl From<Vec<Scalar>> for Input {
    fn from(items: Vec<Scalar>) -> Self {
        Input::Seq(items)
    }
}

impl From<Vec<Input>> for Input {
    fn from(items: Vec<Input>) -> Self {
        Input::Nested(items)
    }
}

impl<U: Element> From<Tensor<U>> for Input {
    fn from(t: Tensor<U>) -> Self {
        Input::Tensor(Box::new(t))
    }
}

/// Unwraps `backing` into its shape and elements converted to `T`.
pub(crate) fn unwrap_backing<T: Element, B: Backing + ?Sized>(
    backing: &B,
) -> Result<(Dims, Vec<T>)> {
    let shape = backing.backing_shape()?;
    let mut data = Vec::with_capacity(crate::shape::numel(&shape));
    backing.write_elements(&mut data);
    debug_assert_eq!(data.len(), crate::shape::numel(&shape));
    Ok((shape, data))
}
