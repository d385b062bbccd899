//! Special functions used by the Mie expansion and the discrete Hankel transform.
//!
//! - Spherical Bessel functions jₙ, yₙ and their derivatives, for real and complex arguments
//! - Legendre polynomials Pₙ
//! - Ordinary Bessel functions J₀, J₁ (evaluated by `spec_math`) and the positive zeros of J₀
//!
//! Sequence functions return every order from 0 up to and including `n_max`.

use num_complex::Complex64;
use spec_math::Bessel;
use std::f64::consts::{FRAC_PI_2, PI};

const RESCALE_LIMIT: f64 = 1e250;

/// Spherical Bessel functions of the first kind jₙ(z), n = 0..=n_max, for complex z.
///
/// Miller's downward recurrence
/// ```text
/// j_{n-1}(z) = (2n+1)/z * j_n(z) - j_{n+1}(z)
/// ```
/// normalised against whichever of j₀ = sin z / z or j₁ = sin z / z² - cos z / z is larger,
/// so the normalisation stays well conditioned near the zeros of sin z.
///
/// The recurrence starts past the turning point n ≈ |z| by a margin that grows like |z|^(1/3),
/// the width of the transition region, so yₙ has died out before the orders that are kept.
pub fn spherical_jn_complex(n_max: usize, z: Complex64) -> Vec<Complex64> {
    let mut result = vec![Complex64::new(0.0, 0.0); n_max + 1];

    if z.norm() < 1e-15 {
        result[0] = Complex64::new(1.0, 0.0);
        return result;
    }

    let mag = z.norm();
    let start_n = n_max.max(mag as usize) + 20 + (15.0 * mag.cbrt()) as usize;
    let mut values = vec![Complex64::new(0.0, 0.0); start_n + 2];
    values[start_n] = Complex64::new(1e-30, 0.0);

    for k in (0..start_n).rev() {
        values[k] = values[k + 1] * (2 * k + 3) as f64 / z - values[k + 2];
        // the recurrence grows quickly for n >> |z|
        if values[k].norm() > RESCALE_LIMIT {
            for v in values.iter_mut().skip(k) {
                *v /= RESCALE_LIMIT;
            }
        }
    }

    let (sin_z, cos_z) = (z.sin(), z.cos());
    let true_j0 = sin_z / z;
    let true_j1 = sin_z / (z * z) - cos_z / z;
    let scale = if true_j0.norm() >= true_j1.norm() {
        true_j0 / values[0]
    } else {
        true_j1 / values[1]
    };

    for (r, v) in result.iter_mut().zip(values.iter()) {
        *r = v * scale;
    }
    result
}

/// Spherical Bessel functions of the first kind jₙ(x), n = 0..=n_max, for real x.
///
/// `jₙ(x) = √(π/2x) J_{n+1/2}(x)`, with jₙ(-x) = (-1)ⁿ jₙ(x).
pub fn spherical_jn(n_max: usize, x: f64) -> Vec<f64> {
    let ax = x.abs();
    if ax < 1e-15 {
        let mut result = vec![0.0; n_max + 1];
        result[0] = 1.0;
        return result;
    }
    let prefix = (FRAC_PI_2 / ax).sqrt();
    (0..=n_max)
        .map(|n| {
            let j = prefix * ax.bessel_jv(n as f64 + 0.5);
            if x < 0.0 && n % 2 == 1 {
                -j
            } else {
                j
            }
        })
        .collect()
}

/// Spherical Bessel functions of the second kind yₙ(z), n = 0..=n_max, for complex z.
///
/// Upward recurrence, which is stable for yₙ:
/// ```text
/// y_{n+1}(z) = (2n+1)/z * y_n(z) - y_{n-1}(z)
/// ```
pub fn spherical_yn_complex(n_max: usize, z: Complex64) -> Vec<Complex64> {
    let mut result = vec![Complex64::new(0.0, 0.0); n_max + 1];

    if z.norm() < 1e-15 {
        // y_n → -∞ as z → 0
        for r in result.iter_mut() {
            *r = Complex64::new(f64::NEG_INFINITY, 0.0);
        }
        return result;
    }

    let (sin_z, cos_z) = (z.sin(), z.cos());
    result[0] = -cos_z / z;
    if n_max == 0 {
        return result;
    }
    result[1] = -cos_z / (z * z) - sin_z / z;

    for n in 2..=n_max {
        result[n] = result[n - 1] * (2 * n - 1) as f64 / z - result[n - 2];
    }
    result
}

/// Spherical Bessel functions of the second kind yₙ(x), n = 0..=n_max, for real x.
pub fn spherical_yn(n_max: usize, x: f64) -> Vec<f64> {
    spherical_yn_complex(n_max, Complex64::new(x, 0.0))
        .into_iter()
        .map(|v| v.re)
        .collect()
}

/// Derivatives of any spherical Bessel sequence fₙ (first or second kind) at z.
///
/// ```text
/// f_0'(z) = -f_1(z)
/// f_n'(z) = f_{n-1}(z) - (n+1)/z * f_n(z)
/// ```
/// `values` must hold orders 0..=n_max+1; the result holds 0..=n_max.
fn derivative_from_sequence(values: &[Complex64], z: Complex64) -> Vec<Complex64> {
    let n_max = values.len() - 2;
    (0..=n_max)
        .map(|n| {
            if n == 0 {
                -values[1]
            } else {
                values[n - 1] - values[n] * (n + 1) as f64 / z
            }
        })
        .collect()
}

/// jₙ(z) and jₙ'(z) for n = 0..=n_max.
pub fn spherical_jn_with_derivative(n_max: usize, z: Complex64) -> (Vec<Complex64>, Vec<Complex64>) {
    let mut j = spherical_jn_complex(n_max + 1, z);
    let jp = derivative_from_sequence(&j, z);
    j.truncate(n_max + 1);
    (j, jp)
}

/// yₙ(z) and yₙ'(z) for n = 0..=n_max.
pub fn spherical_yn_with_derivative(n_max: usize, z: Complex64) -> (Vec<Complex64>, Vec<Complex64>) {
    let mut y = spherical_yn_complex(n_max + 1, z);
    let yp = derivative_from_sequence(&y, z);
    y.truncate(n_max + 1);
    (y, yp)
}

/// Spherical Hankel functions of the first kind hₙ⁽¹⁾(x) = jₙ(x) + i yₙ(x), n = 0..=n_max.
pub fn spherical_h1n(n_max: usize, x: f64) -> Vec<Complex64> {
    let j = spherical_jn(n_max, x);
    let y = spherical_yn(n_max, x);
    j.into_iter()
        .zip(y)
        .map(|(j, y)| Complex64::new(j, y))
        .collect()
}

/// Legendre polynomials Pₙ(x) for n = 0..=n_max.
///
/// ```text
/// (n+1) P_{n+1}(x) = (2n+1) x P_n(x) - n P_{n-1}(x)
/// ```
pub fn legendre_polynomials(n_max: usize, x: f64) -> Vec<f64> {
    let mut result = vec![0.0; n_max + 1];
    result[0] = 1.0;
    if n_max == 0 {
        return result;
    }
    result[1] = x;

    for n in 2..=n_max {
        let n_f64 = n as f64;
        result[n] =
            ((2.0 * n_f64 - 1.0) * x * result[n - 1] - (n_f64 - 1.0) * result[n - 2]) / n_f64;
    }
    result
}

/// Bessel function of the first kind J₀(x).
pub fn bessel_j0(x: f64) -> f64 {
    x.abs().bessel_jv(0.0)
}

/// Bessel function of the first kind J₁(x).
pub fn bessel_j1(x: f64) -> f64 {
    // odd in x
    x.signum() * x.abs().bessel_jv(1.0)
}

/// The first `count` positive zeros of J₀, in increasing order.
///
/// McMahon's expansion gives the starting point, Newton's method (J₀' = -J₁) refines it.
pub fn bessel_j0_zeros(count: usize) -> Vec<f64> {
    (1..=count)
        .map(|m| {
            let beta = (m as f64 - 0.25) * PI;
            let b8 = 8.0 * beta;
            let mut x = beta + 1.0 / b8 - 124.0 / (3.0 * b8.powi(3)) + 120928.0 / (15.0 * b8.powi(5));
            for _ in 0..20 {
                let step = bessel_j0(x) / bessel_j1(x);
                x += step;
                if step.abs() < 1e-14 * x {
                    break;
                }
            }
            x
        })
        .collect()
}
