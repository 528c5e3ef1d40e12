//! Numeric element kinds.
//!
//! [`Element`] is implemented for the twelve primitive numeric types a tensor
//! may hold. Every element converts to and from the tagged [`Scalar`], which
//! is how values cross element types: `U::from_scalar(x.into_scalar())` is
//! exactly Rust's `x as U`.

use std::fmt::Debug;

use num_traits::{AsPrimitive, FromPrimitive, Num, WrappingAdd, WrappingMul, WrappingSub};

/// The numeric kind of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
}

impl ElementKind {
    /// Whether the kind is a floating-point type.
    pub fn is_float(self) -> bool {
        matches!(self, ElementKind::F32 | ElementKind::F64)
    }
}

/// A single numeric value tagged with its kind.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum Scalar {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Usize(usize),
    F32(f32),
    F64(f64),
}

impl Scalar {
    /// The kind of the wrapped value.
    pub fn kind(&self) -> ElementKind {
        match self {
            Scalar::I8(_) => ElementKind::I8,
            Scalar::I16(_) => ElementKind::I16,
            Scalar::I32(_) => ElementKind::I32,
            Scalar::I64(_) => ElementKind::I64,
            Scalar::Isize(_) => ElementKind::Isize,
            Scalar::U8(_) => ElementKind::U8,
            Scalar::U16(_) => ElementKind::U16,
            Scalar::U32(_) => ElementKind::U32,
            Scalar::U64(_) => ElementKind::U64,
            Scalar::Usize(_) => ElementKind::Usize,
            Scalar::F32(_) => ElementKind::F32,
            Scalar::F64(_) => ElementKind::F64,
        }
    }

    /// Converts the wrapped value to `T` with `as` semantics.
    #[inline]
    pub fn cast<T: Element>(self) -> T {
        T::from_scalar(self)
    }
}

/// Numeric types usable as tensor elements.
///
/// The arithmetic bounds come from [`num_traits::Num`]; ordering is partial so
/// that floats qualify. `Send + Sync` lets kernels share element slices
/// across worker threads. Conversions go through [`AsPrimitive`] and
/// [`FromPrimitive`].
///
/// Integer arithmetic in the tensor operations wraps on overflow regardless
/// of the build profile; see [`Element::wrapping_add`].
pub trait Element:
    Copy
    + Send
    + Sync
    + PartialOrd
    + Debug
    + Default
    + Num
    + AsPrimitive<f64>
    + FromPrimitive
    + 'static
{
    /// The kind tag of this type.
    const KIND: ElementKind;

    /// Wraps the value in a [`Scalar`].
    fn into_scalar(self) -> Scalar;

    /// Converts any scalar to this type with `as` semantics.
    fn from_scalar(s: Scalar) -> Self;

    /// `x as Self` (saturating for integers, NaN maps to zero).
    fn cast_f64(x: f64) -> Self;

    /// `self + rhs`, wrapping for integers.
    fn wrapping_add(self, rhs: Self) -> Self;

    /// `self - rhs`, wrapping for integers.
    fn wrapping_sub(self, rhs: Self) -> Self;

    /// `self * rhs`, wrapping for integers.
    fn wrapping_mul(self, rhs: Self) -> Self;

    /// `self / rhs`, wrapping for integers (`MIN / -1 == MIN`).
    ///
    /// # Panics
    /// Panics on integer division by zero.
    fn wrapping_div(self, rhs: Self) -> Self;

    /// `self as f64`.
    #[inline]
    fn to_f64(self) -> f64 {
        self.as_()
    }

    /// Converts to another element type with `as` semantics.
    #[inline]
    fn cast<U: Element>(self) -> U {
        U::from_scalar(self.into_scalar())
    }
}

macro_rules! wrapping_arith {
    (wrapping) => {
        #[inline]
        fn wrapping_add(self, rhs: Self) -> Self {
            WrappingAdd::wrapping_add(&self, &rhs)
        }

        #[inline]
        fn wrapping_sub(self, rhs: Self) -> Self {
            WrappingSub::wrapping_sub(&self, &rhs)
        }

        #[inline]
        fn wrapping_mul(self, rhs: Self) -> Self {
            WrappingMul::wrapping_mul(&self, &rhs)
        }

        #[inline]
        fn wrapping_div(self, rhs: Self) -> Self {
            // inherent integer method
            self.wrapping_div(rhs)
        }
    };
    (ieee) => {
        #[inline]
        fn wrapping_add(self, rhs: Self) -> Self {
            self + rhs
        }

        #[inline]
        fn wrapping_sub(self, rhs: Self) -> Self {
            self - rhs
        }

        #[inline]
        fn wrapping_mul(self, rhs: Self) -> Self {
            self * rhs
        }

        #[inline]
        fn wrapping_div(self, rhs: Self) -> Self {
            self / rhs
        }
    };
}

macro_rules! impl_element {
    ($arith:ident: $($t:ty => $kind:ident),* $(,)?) => {
        $(
            impl Element for $t {
                const KIND: ElementKind = ElementKind::$kind;

                #[inline]
                fn into_scalar(self) -> Scalar {
                    Scalar::$kind(self)
                }

                #[inline]
                fn from_scalar(s: Scalar) -> Self {
                    match s {
                        Scalar::I8(v) => AsPrimitive::<$t>::as_(v),
                        Scalar::I16(v) => AsPrimitive::<$t>::as_(v),
                        Scalar::I32(v) => AsPrimitive::<$t>::as_(v),
                        Scalar::I64(v) => AsPrimitive::<$t>::as_(v),
                        Scalar::Isize(v) => AsPrimitive::<$t>::as_(v),
                        Scalar::U8(v) => AsPrimitive::<$t>::as_(v),
                        Scalar::U16(v) => AsPrimitive::<$t>::as_(v),
                        Scalar::U32(v) => AsPrimitive::<$t>::as_(v),
                        Scalar::U64(v) => AsPrimitive::<$t>::as_(v),
                        Scalar::Usize(v) => AsPrimitive::<$t>::as_(v),
                        Scalar::F32(v) => AsPrimitive::<$t>::as_(v),
                        Scalar::F64(v) => AsPrimitive::<$t>::as_(v),
                    }
                }

                #[inline]
                fn cast_f64(x: f64) -> Self {
                    AsPrimitive::<$t>::as_(x)
                }

                wrapping_arith!($arith);
            }
        )*
    };
}

impl_element! {
    wrapping:
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
}

impl_element! {
    ieee:
    f32 => F32,
    f64 => F64,
}
