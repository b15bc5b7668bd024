//! Standard normal distribution.
//!
//! The CDF is built on the Abramowitz-Stegun 7.1.26 rational approximation of
//! `erfc`, accurate to about 1.5e-7. Both functions are generic over
//! [`num_traits::Float`] so they serve `f32` and `f64` callers alike.

use num_traits::Float;

/// 1 / sqrt(2 * pi)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

// Abramowitz and Stegun 7.1.26
const AS_P: f64 = 0.327_591_1;
const AS_A: [f64; 5] = [
    0.254_829_592,
    -0.284_496_736,
    1.421_413_741,
    -1.453_152_027,
    1.061_405_429,
];

#[inline]
fn lit<T: Float>(v: f64) -> T {
    T::from(v).unwrap_or_else(T::nan)
}

/// Complementary error function, `erfc(x) = 1 - erf(x)`.
///
/// Negative arguments use the reflection `erfc(-x) = 2 - erfc(x)`.
#[inline]
pub fn erfc<T: Float>(x: T) -> T {
    let ax = x.abs();
    let t = T::one() / (T::one() + lit::<T>(AS_P) * ax);

    // Horner evaluation of a1 t + a2 t^2 + ... + a5 t^5
    let poly = AS_A
        .iter()
        .rev()
        .fold(T::zero(), |acc, &a| acc * t + lit::<T>(a));
    let tail = t * poly * (-ax * ax).exp();

    if x < T::zero() {
        lit::<T>(2.0) - tail
    } else {
        tail
    }
}

/// Standard normal cumulative distribution, `Φ(x) = erfc(-x / √2) / 2`.
///
/// # Examples
/// ```
/// use hedge_core::math::distributions::norm_cdf;
///
/// assert!((norm_cdf(0.0_f64) - 0.5).abs() < 1e-7);
/// assert!(norm_cdf(-4.0_f64) < 1e-4);
/// ```
#[inline]
pub fn norm_cdf<T: Float>(x: T) -> T {
    lit::<T>(0.5) * erfc(-x / lit::<T>(std::f64::consts::SQRT_2))
}

/// Standard normal density, `φ(x) = exp(-x² / 2) / √(2π)`.
#[inline]
pub fn norm_pdf<T: Float>(x: T) -> T {
    lit::<T>(FRAC_1_SQRT_2PI) * (-x * x / lit::<T>(2.0)).exp()
}
