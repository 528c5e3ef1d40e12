//! Special functions missing from `libm`.

use std::f64::consts::PI;

/// Inverse error function.
///
/// Returns NaN outside `[-1, 1]` and `±inf` at `±1`. Starts from Giles'
/// single-precision polynomial and polishes with two Newton steps on
/// `erf(y) - x`.
pub(crate) fn erfinv(x: f64) -> f64 {
    if x.is_nan() || !(-1.0..=1.0).contains(&x) {
        return f64::NAN;
    }
    if x == 1.0 {
        return f64::INFINITY;
    }
    if x == -1.0 {
        return f64::NEG_INFINITY;
    }

    let w = -((1.0 - x) * (1.0 + x)).ln();
    let p = if w < 5.0 {
        let w = w - 2.5;
        [
            2.810_226_36e-08,
            3.432_739_39e-07,
            -3.523_387_7e-06,
            -4.391_506_54e-06,
            2.185_808_7e-04,
            -1.253_725_03e-03,
            -4.177_681_64e-03,
            2.466_407_27e-01,
            1.501_409_41,
        ]
        .iter()
        .fold(0.0, |acc, &c| acc * w + c)
    } else {
        let w = w.sqrt() - 3.0;
        [
            -2.002_142_57e-04,
            1.009_505_58e-04,
            1.349_343_22e-03,
            -3.673_428_44e-03,
            5.739_507_73e-03,
            -7.622_461_3e-03,
            9.438_870_47e-03,
            1.001_674_06,
            2.832_976_82,
        ]
        .iter()
        .fold(0.0, |acc, &c| acc * w + c)
    };

    let mut y = p * x;
    let scale = 2.0 / PI.sqrt();
    for _ in 0..2 {
        let slope = scale * (-y * y).exp();
        if slope == 0.0 {
            break;
        }
        y -= (libm::erf(y) - x) / slope;
    }
    y
}

/// Inverse complementary error function, `erfinv(1 - x)`.
pub(crate) fn erfcinv(x: f64) -> f64 {
    erfinv(1.0 - x)
}

/// Binary exponent of `x` as a float.
///
/// `logb(0) = -inf`, `logb(±inf) = inf`, `logb(nan) = nan`.
pub(crate) fn logb(x: f64) -> f64 {
    if x == 0.0 {
        f64::NEG_INFINITY
    } else if x.is_infinite() {
        f64::INFINITY
    } else if x.is_nan() {
        x
    } else {
        f64::from(libm::ilogb(x))
    }
}
