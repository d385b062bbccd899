//! Parameters of a single simulation run, loadable from TOML.

use crate::error::{check_positive, MieError, Result};
use crate::geometry::{Geometry, Sampling};
use crate::scatter::EvaluationMode;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::f64::consts::PI;
use std::path::Path;

/// Description of a sphere, its illumination and the plane it is imaged on.
///
/// Missing keys take their values from [`Default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// Samples per axis.
    pub resolution: usize,
    /// Physical width of the window, same units as the wavelength.
    pub fov: f64,
    /// Height of the evaluation plane above the sphere center.
    pub z: f64,
    pub radius: f64,
    pub wavelength: f64,
    pub index_re: f64,
    pub index_im: f64,
    pub scale: f64,
    /// 1 for a radial profile, 2 for a full plane.
    pub dimension: usize,
    /// `"far"` or `"near"`.
    pub option: String,
    pub k_dir: Option<[f64; 3]>,
    pub padding: usize,
    pub na_in: f64,
    pub na_out: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        SimulationParams {
            resolution: 128,
            fov: 30.0,
            z: 0.0,
            radius: 1.0,
            wavelength: 0.5,
            index_re: 1.5,
            index_im: 0.01,
            scale: 1.0,
            dimension: 2,
            option: "far".to_string(),
            k_dir: None,
            padding: 0,
            na_in: 0.0,
            na_out: 1.0,
        }
    }
}

impl SimulationParams {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let params: SimulationParams = toml::from_str(s)?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("loading simulation parameters from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Input-domain checks, the same ones each pipeline stage would raise.
    pub fn validate(&self) -> Result<()> {
        self.sampling()?;
        self.evaluation_mode()?;
        check_positive("radius", self.radius)?;
        check_positive("wavelength", self.wavelength)?;
        if !self.z.is_finite() {
            return Err(MieError::InvalidParameter {
                name: "z",
                value: self.z,
            });
        }
        if !(self.na_in >= 0.0 && self.na_in <= self.na_out) {
            return Err(MieError::InvalidParameter {
                name: "na_in",
                value: self.na_in,
            });
        }
        Ok(())
    }

    pub fn sampling(&self) -> Result<Sampling> {
        Sampling::new(self.resolution, self.fov)
    }

    pub fn geometry(&self) -> Result<Geometry> {
        Geometry::try_from(self.dimension)
    }

    pub fn evaluation_mode(&self) -> Result<EvaluationMode> {
        EvaluationMode::from_option(&self.option, self.geometry()?, self.k_dir)
    }

    pub fn refractive_index(&self) -> Complex64 {
        Complex64::new(self.index_re, self.index_im)
    }

    /// Wavenumber `2π / λ`.
    pub fn wavenumber(&self) -> f64 {
        2.0 * PI / self.wavelength
    }
}
