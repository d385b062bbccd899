//! Scattered-field images of a homogeneous dielectric sphere under plane-wave illumination,
//! computed from the Mie series.
//!
//! A typical pipeline picks the truncation order and scattering coefficients for the sphere,
//! synthesizes the far field on the Fourier grid of the imaging window, filters it through the
//! objective's pass band and returns to the spatial domain:
//!
//! ```no_run
//! use mie_field::{apply_filter, bandpass_filter, far_field, Geometry, Sampling};
//! use num_complex::Complex64;
//!
//! let sampling = Sampling::new(128, 30.0)?;
//! let n = Complex64::new(1.5, 0.01);
//! let far = far_field(sampling, 0.0, 1.0, n, 0.5, 1.0, Geometry::Cartesian2D)?;
//! let mask = bandpass_filter(sampling, 0.0, 0.8, Geometry::Cartesian2D);
//! let image = apply_filter(sampling, &far, &mask)?;
//! # Ok::<(), mie_field::MieError>(())
//! ```

use ndarray::{Array1, Array2};
use num_complex::Complex64;

pub mod basis;
pub mod coefficients;
pub mod error;
mod fft2;
pub mod frames;
pub mod geometry;
pub mod hankel;
pub mod order;
pub mod params;
pub mod scatter;
pub mod special;
pub mod transform;

pub use crate::coefficients::coeff_b;
pub use crate::error::{MieError, Result};
pub use crate::fft2::{fft2, fftshift2, ifft2, ifftshift2};
pub use crate::frames::{display_range, select_channel, stack_frames, Channel, FrameSink};
pub use crate::geometry::{crop_field, horizontal_canvas, pad, Geometry, Sampling};
pub use crate::hankel::{idhf, RadialProfile};
pub use crate::order::{get_order, Orders};
pub use crate::params::SimulationParams;
pub use crate::scatter::{far_field, near_field, scatter_matrix, EvaluationMode};
pub use crate::transform::{
    apply_filter, bandpass_filter, far2near, get_phase_shift, near2far, propagate, FilterMask, Filtered,
};

/// A complex scalar field sampled on one of the evaluation geometries.
///
/// Far fields are in the Fourier domain, near fields in the spatial domain; the variant only
/// records the sampling layout.
#[derive(Clone, Debug, PartialEq)]
pub enum Field {
    Cartesian(Array2<Complex64>),
    Radial(Array1<Complex64>),
}

impl Field {
    pub fn geometry(&self) -> Geometry {
        match self {
            Field::Cartesian(_) => Geometry::Cartesian2D,
            Field::Radial(_) => Geometry::Radial1D,
        }
    }

    pub fn shape(&self) -> &[usize] {
        match self {
            Field::Cartesian(e) => e.shape(),
            Field::Radial(e) => e.shape(),
        }
    }

    pub fn into_cartesian(self) -> Result<Array2<Complex64>> {
        match self {
            Field::Cartesian(e) => Ok(e),
            Field::Radial(_) => Err(MieError::GeometryMismatch),
        }
    }

    pub fn into_radial(self) -> Result<Array1<Complex64>> {
        match self {
            Field::Radial(e) => Ok(e),
            Field::Cartesian(_) => Err(MieError::GeometryMismatch),
        }
    }

    /// `true` when no sample is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        match self {
            Field::Cartesian(e) => e.iter().all(|v| v.is_finite()),
            Field::Radial(e) => e.iter().all(|v| v.is_finite()),
        }
    }

    /// Sum of the squared norm of every sample.
    pub fn intensity_sum(&self) -> f64 {
        let sum = |acc: f64, v: &Complex64| acc + v.norm_sqr();
        match self {
            Field::Cartesian(e) => e.iter().fold(0.0, sum),
            Field::Radial(e) => e.iter().fold(0.0, sum),
        }
    }
}
