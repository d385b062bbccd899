//! Inverse discrete Hankel transform of radially symmetric fields.

use crate::error::{MieError, Result};
use crate::geometry::Sampling;
use crate::special::{bessel_j0, bessel_j0_zeros, bessel_j1};
use ndarray::{Array1, ArrayView1, Zip};
use num_complex::Complex64;

/// A radial profile sampled on the non-uniform grid of J₀ zeros.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialProfile {
    pub values: Array1<Complex64>,
    /// Radius of each sample, increasing to the half field of view.
    pub radii: Array1<f64>,
}

impl RadialProfile {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Inverse discrete Hankel transform (order 0) of a radial frequency profile.
///
/// With `X = trunc(fov / 2)`, `N = res / 2` and `j_1 .. j_N` the first zeros of J₀:
/// ```text
/// F[k] = 2/X² Σ_{m=1}^{N-1} J₀(j_m j_k / j_N) / J₁(j_m)² · y[m]
/// r[k] = j_k X / j_N
/// ```
/// The sample `y[0]` and anything past `y[N - 1]` do not contribute.
pub fn idhf(sampling: Sampling, y: ArrayView1<Complex64>) -> Result<RadialProfile> {
    let x_max = (sampling.fov / 2.0).trunc();
    if x_max <= 0.0 {
        return Err(MieError::InvalidParameter {
            name: "field of view",
            value: sampling.fov,
        });
    }
    let n = sampling.resolution / 2;
    if y.len() < n {
        return Err(MieError::ShapeMismatch {
            expected: vec![n],
            found: vec![y.len()],
        });
    }
    log::trace!("idhf over {} zeros, half width {}", n, x_max);

    if n == 0 {
        return Ok(RadialProfile {
            values: Array1::zeros(0),
            radii: Array1::zeros(0),
        });
    }
    let zeros = Array1::from(bessel_j0_zeros(n));
    let j_big = zeros[n - 1];
    let terms = n - 1;
    let weights: Vec<(f64, Complex64)> = (0..terms)
        .map(|m| {
            let j1 = bessel_j1(zeros[m]);
            (zeros[m], y[m + 1] / (j1 * j1))
        })
        .collect();

    let prefix = 2.0 / (x_max * x_max);
    let mut values = Array1::zeros(n);
    Zip::from(&mut values).and(&zeros).par_for_each(|f, &j_k| {
        let sum: Complex64 = weights
            .iter()
            .map(|&(j_m, w)| w * bessel_j0(j_m * j_k / j_big))
            .sum();
        *f = sum * prefix;
    });

    let radii = zeros.mapv(|j_k| j_k * x_max / j_big);
    Ok(RadialProfile { values, radii })
}
