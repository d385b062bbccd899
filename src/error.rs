//! Error types for field synthesis and its transforms.
//!
//! Every error here is an input-domain failure raised before any output is produced.
//! Numerical degeneracy (resonant coefficients, asymptotic forms used out of range)
//! is not an error and shows up as large or non-finite values instead.

use thiserror::Error;

/// Errors raised by the scattering pipeline.
#[derive(Debug, Error)]
pub enum MieError {
    /// Only 1-D (radial) and 2-D (Cartesian) planes exist.
    #[error("invalid dimension: {0} (must be 1 or 2)")]
    InvalidDimension(usize),

    /// Field evaluation option other than `far` or `near`.
    #[error("invalid field option: {0:?} (must be \"far\" or \"near\")")]
    InvalidOption(String),

    /// Display channel other than `Real` or `Imaginary`.
    #[error("invalid channel: {0:?} (must be \"Real\" or \"Imaginary\")")]
    InvalidChannel(String),

    /// Exact near-field evaluation is only defined on a 2-D plane.
    #[error("near field evaluation requires a 2-D plane")]
    UnsupportedGeometry,

    /// An order vector must hold at least one order.
    #[error("order vector is empty")]
    EmptyOrders,

    /// A physical parameter outside its domain.
    #[error("invalid {name}: {value}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// The rejected value
        value: f64,
    },

    /// Field and filter (or two fields) live on different geometries.
    #[error("field and filter geometries differ")]
    GeometryMismatch,

    /// Array lengths or shapes that do not line up.
    #[error("shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        /// Required shape
        expected: Vec<usize>,
        /// Shape that was supplied
        found: Vec<usize>,
    },

    /// Cropping can only shrink a field.
    #[error("cannot crop a {size}x{size} field to {target}x{target}")]
    CropTooLarge {
        /// Edge length of the input field
        size: usize,
        /// Requested edge length
        target: usize,
    },

    /// Malformed parameter file.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Reading parameters or writing frames failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, MieError>;

impl MieError {
    /// Returns `true` for the invalid-argument family: bad dimension, option, channel or parameter.
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            MieError::InvalidDimension(_)
                | MieError::InvalidOption(_)
                | MieError::InvalidChannel(_)
                | MieError::InvalidParameter { .. }
                | MieError::UnsupportedGeometry
                | MieError::EmptyOrders
        )
    }

    /// Returns `true` if array shapes or geometries failed to line up.
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            MieError::ShapeMismatch { .. } | MieError::GeometryMismatch | MieError::CropTooLarge { .. }
        )
    }
}

/// Rejects non-finite and non-positive physical parameters.
pub(crate) fn check_positive(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(MieError::InvalidParameter { name, value })
    }
}
