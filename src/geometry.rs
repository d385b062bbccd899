//! Evaluation planes and their Fourier-domain sampling.

use crate::error::{check_positive, MieError, Result};
use ndarray::{s, Array1, Array2, Array3, ArrayD, ArrayView2, Zip};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

/// A square evaluation window: `resolution` samples per axis spanning `fov` physical units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sampling {
    pub resolution: usize,
    pub fov: f64,
}

impl Sampling {
    pub fn new(resolution: usize, fov: f64) -> Result<Self> {
        if resolution == 0 {
            return Err(MieError::InvalidParameter {
                name: "resolution",
                value: 0.0,
            });
        }
        check_positive("field of view", fov)?;
        Ok(Sampling { resolution, fov })
    }

    /// Half extent of the spatial grid, rounded up so the grid is centered on the origin.
    pub fn half_grid(&self) -> f64 {
        (self.fov / 2.0).ceil()
    }

    /// Spatial sample positions along one axis: `resolution` points over `[-half_grid, half_grid]`.
    pub fn axis(&self) -> Array1<f64> {
        let h = self.half_grid();
        Array1::linspace(-h, h, self.resolution)
    }

    /// Number of samples on the radial half-line.
    pub fn radial_len(&self) -> usize {
        self.resolution / 2 + 1
    }

    /// DFT sample frequencies along one axis, in unshifted order.
    pub fn frequencies(&self) -> Array1<f64> {
        fft_freq(self.resolution, self.fov / self.resolution as f64)
    }
}

/// Grows the window by `2 * padding + 1` in both resolution and field of view.
///
/// The pixel pitch is unchanged, so a padded simulation can be cropped back to the unpadded
/// window with [`crop_field`].
pub fn pad(sampling: Sampling, padding: usize) -> Sampling {
    let factor = 2 * padding + 1;
    Sampling {
        resolution: sampling.resolution * factor,
        fov: sampling.fov * factor as f64,
    }
}

/// Dimensionality of the evaluation plane.
///
/// `Radial1D` assumes azimuthal symmetry and samples only the half-line from the edge to the center.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Geometry {
    Cartesian2D,
    Radial1D,
}

impl TryFrom<usize> for Geometry {
    type Error = MieError;

    fn try_from(dimension: usize) -> Result<Self> {
        match dimension {
            2 => Ok(Geometry::Cartesian2D),
            1 => Ok(Geometry::Radial1D),
            d => Err(MieError::InvalidDimension(d)),
        }
    }
}

impl Geometry {
    pub fn dimension(&self) -> usize {
        match self {
            Geometry::Cartesian2D => 2,
            Geometry::Radial1D => 1,
        }
    }

    /// Shape of a canvas (and of any field) sampled on this geometry.
    pub fn shape(&self, sampling: Sampling) -> Vec<usize> {
        match self {
            Geometry::Cartesian2D => vec![sampling.resolution, sampling.resolution],
            Geometry::Radial1D => vec![sampling.radial_len()],
        }
    }
}

/// Distance from the origin of every sample on the horizontal plane at height `z`.
///
/// The sphere sits at the origin. For `Radial1D` the half-line keeps `y` equal to the first `x`
/// sample rather than zero, so it lies on the grid diagonal edge and not on the axis.
pub fn horizontal_canvas(sampling: Sampling, z: f64, geometry: Geometry) -> ArrayD<f64> {
    let gx = sampling.axis();
    match geometry {
        Geometry::Cartesian2D => {
            let res = sampling.resolution;
            let mut r_mag = Array2::zeros((res, res));
            Zip::indexed(&mut r_mag).par_for_each(|(row, col), r| {
                let (x, y) = (gx[col], gx[row]);
                *r = (x * x + y * y + z * z).sqrt();
            });
            r_mag.into_dyn()
        }
        Geometry::Radial1D => {
            let gx = gx.slice(s![..sampling.radial_len()]);
            let gy = gx[0];
            gx.mapv(|x| (x * x + gy * gy + z * z).sqrt()).into_dyn()
        }
    }
}

/// Position vectors `(x, y, z)` of every pixel on the 2-D plane at height `z`, shape `(res, res, 3)`.
pub fn position_vectors(sampling: Sampling, z: f64) -> Array3<f64> {
    let gx = sampling.axis();
    let res = sampling.resolution;
    Array3::from_shape_fn((res, res, 3), |(row, col, c)| match c {
        0 => gx[col],
        1 => gx[row],
        _ => z,
    })
}

/// Sample frequencies of a DFT of length `n` with sample spacing `d`, matching numpy's `fftfreq`.
///
/// `[0, 1, ..., ceil(n/2) - 1, -floor(n/2), ..., -1] / (d * n)`
pub fn fft_freq(n: usize, d: f64) -> Array1<f64> {
    if n == 0 {
        return Array1::zeros(0);
    }
    let scale = 1.0 / (d * n as f64);
    let positive = (n - 1) / 2 + 1;
    Array1::from_shape_fn(n, |i| {
        if i < positive {
            i as f64 * scale
        } else {
            (i as f64 - n as f64) * scale
        }
    })
}

/// `kx² + ky²` over the DFT frequency grid, in unshifted order.
///
/// For `Radial1D` this is the first `floor(res/2) + 1` frequencies with `ky` fixed to the first
/// frequency sample.
pub fn frequency_grid(sampling: Sampling, geometry: Geometry) -> ArrayD<f64> {
    let fx = sampling.frequencies();
    match geometry {
        Geometry::Cartesian2D => {
            let res = sampling.resolution;
            Array2::from_shape_fn((res, res), |(row, col)| {
                fx[col] * fx[col] + fx[row] * fx[row]
            })
            .into_dyn()
        }
        Geometry::Radial1D => {
            let fy = fx[0];
            fx.slice(s![..sampling.radial_len()])
                .mapv(|f| f * f + fy * fy)
                .into_dyn()
        }
    }
}

/// Extracts the centered `target × target` block of a field.
///
/// The block starts at `floor(N/2) - floor(target/2)` on each axis, which keeps the sample at
/// `N/2` (the origin of a padded grid) at `target/2` in the result.
pub fn crop_field<T: Clone>(target: usize, field: ArrayView2<T>) -> Result<Array2<T>> {
    let (h, w) = field.dim();
    if target > h || target > w {
        return Err(MieError::CropTooLarge {
            size: h.min(w),
            target,
        });
    }
    let start0 = h / 2 - target / 2;
    let start1 = w / 2 - target / 2;
    Ok(field
        .slice(s![start0..start0 + target, start1..start1 + target])
        .to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_fft_freq_matches_numpy() {
        let f = fft_freq(5, 0.5);
        let expected = [0.0, 0.4, 0.8, -0.8, -0.4];
        for (a, b) in f.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }

        let f = fft_freq(4, 1.0);
        let expected = [0.0, 0.25, -0.5, -0.25];
        for (a, b) in f.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_fft_freq_empty_and_single() {
        assert_eq!(fft_freq(0, 1.0).len(), 0);
        assert_eq!(fft_freq(1, 0.5).to_vec(), vec![0.0]);
    }

    #[test]
    fn test_geometry_from_dimension() {
        assert_eq!(Geometry::try_from(2).unwrap(), Geometry::Cartesian2D);
        assert_eq!(Geometry::try_from(1).unwrap(), Geometry::Radial1D);
        assert!(matches!(
            Geometry::try_from(3),
            Err(MieError::InvalidDimension(3))
        ));
    }

    #[test]
    fn test_canvas_2d_symmetric() {
        let sampling = Sampling::new(8, 10.0).unwrap();
        let canvas = horizontal_canvas(sampling, 0.0, Geometry::Cartesian2D);
        assert_eq!(canvas.shape(), &[8, 8]);
        // corners sit at (±5, ±5)
        assert_abs_diff_eq!(canvas[[0, 0]], 50.0_f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(canvas[[0, 0]], canvas[[7, 7]], epsilon = 1e-12);
        assert_abs_diff_eq!(canvas[[2, 5]], canvas[[5, 2]], epsilon = 1e-12);
    }

    #[test]
    fn test_canvas_z_offset() {
        let sampling = Sampling::new(3, 4.0).unwrap();
        let canvas = horizontal_canvas(sampling, 3.0, Geometry::Cartesian2D);
        // odd resolution has a sample on the axis
        assert_abs_diff_eq!(canvas[[1, 1]], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_canvas_1d_keeps_first_sample_as_y() {
        let sampling = Sampling::new(8, 10.0).unwrap();
        let canvas = horizontal_canvas(sampling, 0.0, Geometry::Radial1D);
        assert_eq!(canvas.shape(), &[5]);
        let gx = sampling.axis();
        for i in 0..5 {
            let expected = (gx[i] * gx[i] + gx[0] * gx[0]).sqrt();
            assert_abs_diff_eq!(canvas[[i]], expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_pad_scales_both() {
        let sampling = Sampling::new(64, 20.0).unwrap();
        assert_eq!(pad(sampling, 0), sampling);
        let padded = pad(sampling, 2);
        assert_eq!(padded.resolution, 320);
        assert_abs_diff_eq!(padded.fov, 100.0);
    }

    #[test]
    fn test_crop_recovers_center() {
        for &padding in &[0usize, 1, 2] {
            let sampling = Sampling::new(16, 10.0).unwrap();
            let padded = pad(sampling, padding);
            let n = padded.resolution;
            let field = Array2::from_shape_fn((n, n), |(r, c)| (r as isize - (n / 2) as isize, c as isize - (n / 2) as isize));

            let cropped = crop_field(16, field.view()).unwrap();
            assert_eq!(cropped.dim(), (16, 16));
            assert_eq!(cropped[[8, 8]], (0, 0));
            assert_eq!(cropped[[0, 0]], (-8, -8));
        }
    }

    #[test]
    fn test_crop_too_large() {
        let field = Array2::<f64>::zeros((4, 4));
        assert!(matches!(
            crop_field(8, field.view()),
            Err(MieError::CropTooLarge { size: 4, target: 8 })
        ));
    }

    #[test]
    fn test_frequency_grid_origin_first() {
        let sampling = Sampling::new(4, 2.0).unwrap();
        let grid = frequency_grid(sampling, Geometry::Cartesian2D);
        assert_abs_diff_eq!(grid[[0, 0]], 0.0);
        // fftfreq(4, 0.5) = [0, 0.5, -1, -0.5]
        assert_abs_diff_eq!(grid[[0, 2]], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(grid[[1, 3]], 0.5, epsilon = 1e-12);

        let radial = frequency_grid(sampling, Geometry::Radial1D);
        assert_eq!(radial.shape(), &[3]);
        assert_abs_diff_eq!(radial[[2]], 1.0, epsilon = 1e-12);
    }
}
