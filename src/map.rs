//! Pointwise operations.
//!
//! [`Tensor::map`] rewrites the viewed elements in place and returns the same
//! view, so every alias of the storage observes the result. The named
//! wrappers evaluate in `f64` and convert back to the element type with `as`
//! semantics (integers truncate toward zero and saturate).

use crate::element::Element;
use crate::kernel;
use crate::special;
use crate::threading::worker_count;
use crate::view::Tensor;

impl<T: Element> Tensor<T> {
    /// Replace each element `x` with `f(x)`, in place.
    ///
    /// # Example
    /// ```rust
    /// use strided_tensor::Tensor;
    ///
    /// let t = Tensor::<i32>::range(0, 4, 1).unwrap();
    /// let alias = t.clone();
    /// t.map(|x| x * x);
    /// assert_eq!(alias.ravel(), vec![0, 1, 4, 9]);
    /// ```
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(T) -> T + Sync + Send,
    {
        let parts = worker_count(self.numel());
        self.with_logical_mut(|elems| kernel::pointwise_in_place(elems, parts, f));
        self.clone()
    }

    #[inline]
    fn map_f64<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> f64 + Sync + Send,
    {
        self.map(|x| T::cast_f64(f(x.to_f64())))
    }

    /// Absolute value.
    pub fn abs(&self) -> Self {
        self.map_f64(f64::abs)
    }

    /// Arccosine, in radians.
    pub fn acos(&self) -> Self {
        self.map_f64(f64::acos)
    }

    /// Inverse hyperbolic cosine.
    pub fn acosh(&self) -> Self {
        self.map_f64(f64::acosh)
    }

    /// Arcsine, in radians.
    pub fn asin(&self) -> Self {
        self.map_f64(f64::asin)
    }

    /// Inverse hyperbolic sine.
    pub fn asinh(&self) -> Self {
        self.map_f64(f64::asinh)
    }

    /// Arctangent, in radians.
    pub fn atan(&self) -> Self {
        self.map_f64(f64::atan)
    }

    /// Arctangent of `y / x` using the signs of both to pick the quadrant,
    /// where `x` is each element.
    pub fn atan2(&self, y: f64) -> Self {
        self.map_f64(move |x| y.atan2(x))
    }

    /// Inverse hyperbolic tangent.
    pub fn atanh(&self) -> Self {
        self.map_f64(f64::atanh)
    }

    /// Cube root.
    pub fn cbrt(&self) -> Self {
        self.map_f64(f64::cbrt)
    }

    /// Least integer value not less than each element.
    pub fn ceil(&self) -> Self {
        self.map_f64(f64::ceil)
    }

    /// Magnitude of each element with the sign of `y`.
    pub fn copysign(&self, y: f64) -> Self {
        self.map_f64(move |x| x.copysign(y))
    }

    /// Cosine, in radians.
    pub fn cos(&self) -> Self {
        self.map_f64(f64::cos)
    }

    /// Hyperbolic cosine.
    pub fn cosh(&self) -> Self {
        self.map_f64(f64::cosh)
    }

    /// Positive difference `max(x - y, 0)`.
    pub fn dim(&self, y: f64) -> Self {
        self.map_f64(move |x| libm::fdim(x, y))
    }

    /// Error function.
    pub fn erf(&self) -> Self {
        self.map_f64(libm::erf)
    }

    /// Complementary error function.
    pub fn erfc(&self) -> Self {
        self.map_f64(libm::erfc)
    }

    /// Inverse complementary error function.
    pub fn erfcinv(&self) -> Self {
        self.map_f64(special::erfcinv)
    }

    /// Inverse error function.
    pub fn erfinv(&self) -> Self {
        self.map_f64(special::erfinv)
    }

    /// `e^x`.
    pub fn exp(&self) -> Self {
        self.map_f64(f64::exp)
    }

    /// `2^x`.
    pub fn exp2(&self) -> Self {
        self.map_f64(f64::exp2)
    }

    /// `e^x - 1`, accurate near zero.
    pub fn expm1(&self) -> Self {
        self.map_f64(f64::exp_m1)
    }

    /// Fused multiply-add `x * y + z` with a single rounding.
    pub fn fma(&self, y: f64, z: f64) -> Self {
        self.map_f64(move |x| x.mul_add(y, z))
    }

    /// Greatest integer value not greater than each element.
    pub fn floor(&self) -> Self {
        self.map_f64(f64::floor)
    }

    /// Gamma function.
    pub fn gamma(&self) -> Self {
        self.map_f64(libm::tgamma)
    }

    /// Binary exponent as an integer.
    pub fn ilogb(&self) -> Self {
        self.map_f64(|x| f64::from(libm::ilogb(x)))
    }

    /// `+inf` where the element truncates to a non-negative value, `-inf`
    /// otherwise. Integer elements saturate.
    pub fn inf(&self) -> Self {
        self.map_f64(|x| {
            if x.trunc() < 0.0 {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            }
        })
    }

    /// Order-zero Bessel function of the first kind.
    pub fn j0(&self) -> Self {
        self.map_f64(libm::j0)
    }

    /// Order-one Bessel function of the first kind.
    pub fn j1(&self) -> Self {
        self.map_f64(libm::j1)
    }

    /// Order-`n` Bessel function of the first kind.
    pub fn jn(&self, n: i32) -> Self {
        self.map_f64(move |x| libm::jn(n, x))
    }

    /// `x * 2^exp`.
    pub fn ldexp(&self, exp: i32) -> Self {
        self.map_f64(move |x| libm::ldexp(x, exp))
    }

    /// Natural logarithm.
    pub fn log(&self) -> Self {
        self.map_f64(f64::ln)
    }

    /// Base-10 logarithm.
    pub fn log10(&self) -> Self {
        self.map_f64(f64::log10)
    }

    /// `ln(1 + x)`, accurate near zero.
    pub fn log1p(&self) -> Self {
        self.map_f64(f64::ln_1p)
    }

    /// Base-2 logarithm.
    pub fn log2(&self) -> Self {
        self.map_f64(f64::log2)
    }

    /// Binary exponent as a float.
    pub fn logb(&self) -> Self {
        self.map_f64(special::logb)
    }

    /// Floating-point remainder of `x / y`, with the sign of `x`.
    pub fn rem(&self, y: f64) -> Self {
        self.map_f64(move |x| libm::fmod(x, y))
    }

    /// Replace every element with NaN (zero for integer elements).
    pub fn nan(&self) -> Self {
        self.map_f64(|_| f64::NAN)
    }

    /// Next representable `f64` after each element toward `y`.
    pub fn nextafter(&self, y: f64) -> Self {
        self.map_f64(move |x| libm::nextafter(x, y))
    }

    /// Next representable `f32` after each element toward `y`.
    pub fn nextafter32(&self, y: f32) -> Self {
        self.map_f64(move |x| f64::from(libm::nextafterf(x as f32, y)))
    }

    /// Each element raised to the power `y`.
    pub fn pow(&self, y: f64) -> Self {
        self.map_f64(move |x| x.powf(y))
    }

    /// Set every element to `10^n`.
    pub fn pow10(&self, n: i32) -> Self {
        let value = libm::exp10(f64::from(n));
        self.map_f64(move |_| value)
    }

    /// IEEE 754 remainder of `x / y`.
    pub fn remainder(&self, y: f64) -> Self {
        self.map_f64(move |x| libm::remainder(x, y))
    }

    /// Nearest integer, rounding half away from zero.
    pub fn round(&self) -> Self {
        self.map_f64(f64::round)
    }

    /// Nearest integer, rounding half to even.
    pub fn round_to_even(&self) -> Self {
        self.map_f64(f64::round_ties_even)
    }

    /// Sine, in radians.
    pub fn sin(&self) -> Self {
        self.map_f64(f64::sin)
    }

    /// Hyperbolic sine.
    pub fn sinh(&self) -> Self {
        self.map_f64(f64::sinh)
    }

    /// Square root.
    pub fn sqrt(&self) -> Self {
        self.map_f64(f64::sqrt)
    }

    /// Tangent, in radians.
    pub fn tan(&self) -> Self {
        self.map_f64(f64::tan)
    }

    /// Hyperbolic tangent.
    pub fn tanh(&self) -> Self {
        self.map_f64(f64::tanh)
    }

    /// Integer part, rounding toward zero.
    pub fn trunc(&self) -> Self {
        self.map_f64(f64::trunc)
    }

    /// Order-zero Bessel function of the second kind.
    pub fn y0(&self) -> Self {
        self.map_f64(libm::y0)
    }

    /// Order-one Bessel function of the second kind.
    pub fn y1(&self) -> Self {
        self.map_f64(libm::y1)
    }

    /// Order-`n` Bessel function of the second kind.
    pub fn yn(&self, n: i32) -> Self {
        self.map_f64(move |x| libm::yn(n, x))
    }
}
