//! Scatter matrix assembly and field synthesis.

use crate::basis::{asymptotic_hankel, asymptotic_legendre, near_field_legendre, spherical_hankel};
use crate::coefficients::coeff_b;
use crate::error::{MieError, Result};
use crate::fft2::ifftshift2;
use crate::geometry::{horizontal_canvas, Geometry, Sampling};
use crate::order::{get_order, Orders};
use crate::Field;
use ndarray::{Array1, Array2, ArrayD, Axis, Ix1, Ix2, RemoveAxis, Zip};
use num_complex::Complex64;
use std::f64::consts::PI;

/// How the angular and radial terms are evaluated.
///
/// `Asymptotic` is the far-field (Fourier optics) model and works on either geometry.
/// `Exact` is the near-field model, only defined on a 2-D plane, so it carries no geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EvaluationMode {
    Asymptotic { geometry: Geometry },
    Exact { k_dir: [f64; 3] },
}

/// Illumination along +z.
pub const DEFAULT_K_DIR: [f64; 3] = [0.0, 0.0, 1.0];

impl EvaluationMode {
    /// Parses the `"far"` / `"near"` option.
    ///
    /// Near-field evaluation on a radial line is rejected, and a missing `k_dir` defaults to +z.
    pub fn from_option(option: &str, geometry: Geometry, k_dir: Option<[f64; 3]>) -> Result<Self> {
        match option {
            "far" => Ok(EvaluationMode::Asymptotic { geometry }),
            "near" => match geometry {
                Geometry::Cartesian2D => Ok(EvaluationMode::Exact {
                    k_dir: k_dir.unwrap_or(DEFAULT_K_DIR),
                }),
                Geometry::Radial1D => Err(MieError::UnsupportedGeometry),
            },
            other => Err(MieError::InvalidOption(other.to_string())),
        }
    }

    pub fn geometry(&self) -> Geometry {
        match self {
            EvaluationMode::Asymptotic { geometry } => *geometry,
            EvaluationMode::Exact { .. } => Geometry::Cartesian2D,
        }
    }
}

/// Multipole weight `(2l + 1) i^l` of each order.
fn multipole_weights(orders: &Orders) -> Array1<Complex64> {
    orders
        .iter()
        .map(|l| {
            let i_pow = match l % 4 {
                0 => Complex64::new(1.0, 0.0),
                1 => Complex64::new(0.0, 1.0),
                2 => Complex64::new(-1.0, 0.0),
                _ => Complex64::new(0.0, -1.0),
            };
            i_pow * (2 * l + 1) as f64
        })
        .collect()
}

/// The scatter tensor `h_l(kr) P_l(cos θ) (2l + 1) i^l` over the plane at height `z`,
/// with the order on the last axis.
///
/// * `a` - Sphere radius
/// * `lambda` - Wavelength of the incident field
pub fn scatter_matrix(
    sampling: Sampling,
    z: f64,
    a: f64,
    lambda: f64,
    mode: EvaluationMode,
) -> Result<ArrayD<Complex64>> {
    let orders = get_order(a, lambda)?;
    let geometry = mode.geometry();

    let k = 2.0 * PI / lambda;
    let kr = horizontal_canvas(sampling, z, geometry).mapv_into(|r| r * k);

    let (pl_cos_theta, mut scatter) = match mode {
        EvaluationMode::Asymptotic { geometry } => {
            log::debug!("asymptotic basis, {:?}, {} orders", geometry, orders.len());
            (
                asymptotic_legendre(sampling, &orders, geometry),
                asymptotic_hankel(&kr, &orders)?,
            )
        }
        EvaluationMode::Exact { k_dir } => {
            log::debug!("exact basis, k_dir {:?}, {} orders", k_dir, orders.len());
            (
                near_field_legendre(sampling, z, k_dir, &orders).into_dyn(),
                spherical_hankel(&kr, &orders)?,
            )
        }
    };

    let alpha = multipole_weights(&orders);
    let last = Axis(scatter.ndim() - 1);
    Zip::from(scatter.lanes_mut(last))
        .and(pl_cos_theta.lanes(last))
        .par_for_each(|mut h, p| {
            for ((h, p), alpha) in h.iter_mut().zip(p.iter()).zip(alpha.iter()) {
                *h = *h * *p * alpha;
            }
        });

    Ok(scatter)
}

/// Sums the scatter tensor against the coefficient vector along the order axis.
fn contract(scatter: &ArrayD<Complex64>, b: &Array1<Complex64>) -> ArrayD<Complex64> {
    let last = Axis(scatter.ndim() - 1);
    let mut field = ArrayD::zeros(scatter.raw_dim().remove_axis(last));
    Zip::from(&mut field)
        .and(scatter.lanes(last))
        .par_for_each(|e, lane| {
            *e = lane.iter().zip(b.iter()).map(|(s, b)| s * b).sum();
        });
    field
}

pub(crate) fn into_2d(field: ArrayD<Complex64>) -> Result<Array2<Complex64>> {
    let found = field.shape().to_vec();
    field
        .into_dimensionality::<Ix2>()
        .map_err(|_| MieError::ShapeMismatch {
            expected: vec![0, 0],
            found,
        })
}

pub(crate) fn into_1d(field: ArrayD<Complex64>) -> Result<Array1<Complex64>> {
    let found = field.shape().to_vec();
    field
        .into_dimensionality::<Ix1>()
        .map_err(|_| MieError::ShapeMismatch {
            expected: vec![0],
            found,
        })
}

/// The far field of a sphere at the origin, in the Fourier domain.
///
/// * `z` - Height of the evaluation plane
/// * `a` - Sphere radius
/// * `n` - Complex refractive index of the sphere
/// * `lambda` - Wavelength of the incident field
/// * `scale` - Calibration factor applied to the whole field (e.g. source amplitude)
///
/// On a 2-D plane the result is inverse fft-shifted for display; the radial line is returned as is.
pub fn far_field(
    sampling: Sampling,
    z: f64,
    a: f64,
    n: Complex64,
    lambda: f64,
    scale: f64,
    geometry: Geometry,
) -> Result<Field> {
    let b = scattering_coefficients(a, n, lambda)?;
    let scatter = scatter_matrix(sampling, z, a, lambda, EvaluationMode::Asymptotic { geometry })?;
    let e_far = contract(&scatter, &b).mapv_into(|e| e * scale);

    match geometry {
        Geometry::Cartesian2D => Ok(Field::Cartesian(ifftshift2(into_2d(e_far)?))),
        Geometry::Radial1D => Ok(Field::Radial(into_1d(e_far)?)),
    }
}

/// The near field on the 2-D plane at height `z`, using exact special functions.
///
/// `k_dir` is the propagation direction of the incident plane wave.
pub fn near_field(
    sampling: Sampling,
    a: f64,
    n: Complex64,
    lambda: f64,
    z: f64,
    k_dir: [f64; 3],
) -> Result<Array2<Complex64>> {
    let b = scattering_coefficients(a, n, lambda)?;
    let scatter = scatter_matrix(sampling, z, a, lambda, EvaluationMode::Exact { k_dir })?;
    into_2d(contract(&scatter, &b))
}

// get_order rejects a non-positive radius or wavelength before k = 2π/λ is formed
fn scattering_coefficients(a: f64, n: Complex64, lambda: f64) -> Result<Array1<Complex64>> {
    let orders = get_order(a, lambda)?;
    coeff_b(&orders, 2.0 * PI / lambda, n, a)
}
