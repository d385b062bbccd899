//! Moving fields between the Fourier and spatial domains, filtering them through an objective
//! and propagating them between planes.

use crate::error::{MieError, Result};
use crate::fft2::{fft2, fftshift2, ifft2, ifftshift2};
use crate::geometry::{frequency_grid, Geometry, Sampling};
use crate::hankel::{idhf, RadialProfile};
use crate::scatter::into_2d;
use crate::Field;
use ndarray::{Array1, Array2, Zip};
use num_complex::Complex64;

/// Far field (Fourier domain, fft-shifted for display) to near field (spatial domain).
pub fn far2near(far: Array2<Complex64>) -> Array2<Complex64> {
    ifftshift2(ifft2(fftshift2(far)))
}

/// Inverse of [`far2near`].
pub fn near2far(near: Array2<Complex64>) -> Array2<Complex64> {
    ifftshift2(fft2(fftshift2(near)))
}

/// A 0/1 mask over the unshifted DFT frequency grid.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterMask {
    Cartesian(Array2<f64>),
    Radial(Array1<f64>),
}

impl FilterMask {
    pub fn geometry(&self) -> Geometry {
        match self {
            FilterMask::Cartesian(_) => Geometry::Cartesian2D,
            FilterMask::Radial(_) => Geometry::Radial1D,
        }
    }

    pub fn shape(&self) -> &[usize] {
        match self {
            FilterMask::Cartesian(m) => m.shape(),
            FilterMask::Radial(m) => m.shape(),
        }
    }

    /// Fraction of frequency samples that pass.
    pub fn fill_factor(&self) -> f64 {
        let (sum, len) = match self {
            FilterMask::Cartesian(m) => (m.sum(), m.len()),
            FilterMask::Radial(m) => (m.sum(), m.len()),
        };
        if len == 0 {
            0.0
        } else {
            sum / len as f64
        }
    }
}

/// Annular pass band of an objective with central obscuration `na_in` and back aperture `na_out`.
///
/// A frequency passes when `na_in <= sqrt(kx² + ky²) <= na_out`. The radial mask is the first
/// `res / 2 + 1` entries of the first row of the 2-D mask.
pub fn bandpass_filter(sampling: Sampling, na_in: f64, na_out: f64, geometry: Geometry) -> FilterMask {
    let pass = |k2: f64| {
        let rho = k2.sqrt();
        if rho >= na_in && rho <= na_out {
            1.0
        } else {
            0.0
        }
    };
    let f = sampling.frequencies();
    let mask = match geometry {
        Geometry::Cartesian2D => {
            let res = sampling.resolution;
            FilterMask::Cartesian(Array2::from_shape_fn((res, res), |(row, col)| {
                pass(f[col] * f[col] + f[row] * f[row])
            }))
        }
        Geometry::Radial1D => FilterMask::Radial(Array1::from_shape_fn(sampling.radial_len(), |i| {
            pass(f[i] * f[i] + f[0] * f[0])
        })),
    };
    log::trace!("bandpass [{}, {}] over {:?}", na_in, na_out, mask.shape());
    mask
}

/// A field after filtering.
///
/// The radial variant lives on the Bessel-zero grid of the inverse Hankel transform.
#[derive(Clone, Debug, PartialEq)]
pub enum Filtered {
    Cartesian(Array2<Complex64>),
    Radial(RadialProfile),
}

fn check_shape(expected: &[usize], found: &[usize]) -> Result<()> {
    if expected != found {
        return Err(MieError::ShapeMismatch {
            expected: expected.to_vec(),
            found: found.to_vec(),
        });
    }
    Ok(())
}

/// Passes a field through `filter`.
///
/// A 2-D field is transformed, masked and transformed back. A radial field is taken to be a
/// Hankel-domain profile: it is masked directly and returned through [`idhf`].
pub fn apply_filter(sampling: Sampling, field: &Field, filter: &FilterMask) -> Result<Filtered> {
    match (field, filter) {
        (Field::Cartesian(e), FilterMask::Cartesian(mask)) => {
            check_shape(mask.shape(), e.shape())?;
            let mut e_fft = fft2(e.clone());
            Zip::from(&mut e_fft).and(mask).par_for_each(|e, &m| *e *= m);
            Ok(Filtered::Cartesian(ifft2(e_fft)))
        }
        (Field::Radial(e), FilterMask::Radial(mask)) => {
            check_shape(mask.shape(), e.shape())?;
            let masked = e * &mask.mapv(|m| Complex64::new(m, 0.0));
            Ok(Filtered::Radial(idhf(sampling, masked.view())?))
        }
        _ => Err(MieError::GeometryMismatch),
    }
}

/// Angular-spectrum phase mask for propagating a distance `d`.
///
/// `exp(i kz d)` with `kz = sqrt(k² - (kx² + ky²))`. Evanescent frequencies get `kz = 0`, so
/// they pass with unit phase.
pub fn get_phase_shift(sampling: Sampling, k: f64, d: f64) -> Result<Array2<Complex64>> {
    let kxky = frequency_grid(sampling, Geometry::Cartesian2D);
    let k2 = k * k;
    let phase = kxky.mapv(|f2| {
        let kz = if f2 > k2 { 0.0 } else { (k2 - f2).sqrt() };
        Complex64::new(0.0, kz * d).exp()
    });
    into_2d(phase)
}

/// Propagates a spatial field by `d` along the optical axis.
pub fn propagate(sampling: Sampling, field: Array2<Complex64>, k: f64, d: f64) -> Result<Array2<Complex64>> {
    let phase = get_phase_shift(sampling, k, d)?;
    check_shape(phase.shape(), field.shape())?;
    let mut spectrum = fft2(field);
    Zip::from(&mut spectrum).and(&phase).par_for_each(|e, &p| *e *= p);
    Ok(ifft2(spectrum))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scatter::far_field;

    fn test_field(n: usize) -> Array2<Complex64> {
        Array2::from_shape_fn((n, n), |(r, c)| {
            Complex64::new((r as f64 * 0.3).sin() + c as f64, (c as f64 * 0.7).cos() - r as f64 * 0.1)
        })
    }

    #[test]
    fn test_far_near_round_trip() {
        for &n in &[8usize, 9] {
            let f = test_field(n);
            let back = near2far(far2near(f.clone()));
            for (a, b) in f.iter().zip(back.iter()) {
                assert!((a - b).norm() < 1e-10);
            }
        }
    }

    #[test]
    fn test_far2near_of_centered_impulse_is_flat() {
        let mut far = Array2::zeros((8, 8));
        far[[4, 4]] = Complex64::new(64.0, 0.0);
        let near = far2near(far);
        for v in near.iter() {
            assert!((v - Complex64::new(1.0, 0.0)).norm() < 1e-12);
        }
    }

    #[test]
    fn test_bandpass_disk() {
        let sampling = Sampling::new(64, 20.0).unwrap();
        let mask = match bandpass_filter(sampling, 0.0, 0.5, Geometry::Cartesian2D) {
            FilterMask::Cartesian(m) => m,
            FilterMask::Radial(_) => panic!("expected a 2-D mask"),
        };
        assert_eq!(mask.dim(), (64, 64));

        let f = sampling.frequencies();
        for r in 0..64 {
            for c in 0..64 {
                let rho = (f[r] * f[r] + f[c] * f[c]).sqrt();
                let expected = if rho <= 0.5 { 1.0 } else { 0.0 };
                assert_eq!(mask[[r, c]], expected, "({}, {})", r, c);
                // 180 degree rotation about the zero frequency
                assert_eq!(mask[[r, c]], mask[[(64 - r) % 64, (64 - c) % 64]]);
            }
        }
    }

    #[test]
    fn test_bandpass_idempotent() {
        let sampling = Sampling::new(32, 12.0).unwrap();
        match bandpass_filter(sampling, 0.2, 1.0, Geometry::Cartesian2D) {
            FilterMask::Cartesian(m) => assert_eq!(&m * &m, m),
            FilterMask::Radial(_) => panic!("expected a 2-D mask"),
        }
        match bandpass_filter(sampling, 0.2, 1.0, Geometry::Radial1D) {
            FilterMask::Radial(m) => assert_eq!(&m * &m, m),
            FilterMask::Cartesian(_) => panic!("expected a radial mask"),
        }
    }

    #[test]
    fn test_bandpass_radial_is_first_row() {
        let sampling = Sampling::new(32, 12.0).unwrap();
        let full = match bandpass_filter(sampling, 0.3, 0.9, Geometry::Cartesian2D) {
            FilterMask::Cartesian(m) => m,
            FilterMask::Radial(_) => panic!("expected a 2-D mask"),
        };
        let radial = bandpass_filter(sampling, 0.3, 0.9, Geometry::Radial1D);
        assert_eq!(radial.shape(), &[17]);
        if let FilterMask::Radial(m) = radial {
            for i in 0..17 {
                assert_eq!(m[i], full[[0, i]]);
            }
        }
    }

    #[test]
    fn test_all_pass_filter_keeps_field() {
        let sampling = Sampling::new(16, 8.0).unwrap();
        let field = Field::Cartesian(test_field(16));
        let mask = bandpass_filter(sampling, 0.0, f64::INFINITY, Geometry::Cartesian2D);
        assert_eq!(mask.fill_factor(), 1.0);
        match apply_filter(sampling, &field, &mask).unwrap() {
            Filtered::Cartesian(e) => {
                for (a, b) in e.iter().zip(test_field(16).iter()) {
                    assert!((a - b).norm() < 1e-10);
                }
            }
            Filtered::Radial(_) => panic!("expected a 2-D field"),
        }
    }

    #[test]
    fn test_apply_filter_radial() {
        let sampling = Sampling::new(32, 10.0).unwrap();
        let field = far_field(sampling, 0.0, 1.0, Complex64::new(1.2, 0.0), 0.5, 1.0, Geometry::Radial1D).unwrap();
        let mask = bandpass_filter(sampling, 0.0, 1.0, Geometry::Radial1D);
        match apply_filter(sampling, &field, &mask).unwrap() {
            Filtered::Radial(profile) => {
                assert_eq!(profile.len(), 16);
                assert!(profile.values.iter().all(|v| v.is_finite()));
            }
            Filtered::Cartesian(_) => panic!("expected a radial profile"),
        }
    }

    #[test]
    fn test_apply_filter_mismatch() {
        let sampling = Sampling::new(16, 8.0).unwrap();
        let field = Field::Cartesian(test_field(16));
        let radial = bandpass_filter(sampling, 0.0, 1.0, Geometry::Radial1D);
        assert!(matches!(
            apply_filter(sampling, &field, &radial),
            Err(MieError::GeometryMismatch)
        ));

        let small = bandpass_filter(Sampling::new(8, 8.0).unwrap(), 0.0, 1.0, Geometry::Cartesian2D);
        assert!(matches!(
            apply_filter(sampling, &field, &small),
            Err(MieError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_phase_shift() {
        let sampling = Sampling::new(16, 4.0).unwrap();
        let k = 1.5;
        let phase = get_phase_shift(sampling, k, 2.0).unwrap();
        // zero frequency picks up the full phase k d
        assert!((phase[[0, 0]] - Complex64::new(0.0, 3.0).exp()).norm() < 1e-12);

        let f = sampling.frequencies();
        for r in 0..16 {
            for c in 0..16 {
                assert!((phase[[r, c]].norm() - 1.0).abs() < 1e-12);
                if f[r] * f[r] + f[c] * f[c] > k * k {
                    assert_eq!(phase[[r, c]], Complex64::new(1.0, 0.0));
                }
            }
        }
    }

    #[test]
    fn test_propagate_there_and_back() {
        let sampling = Sampling::new(16, 4.0).unwrap();
        let field = test_field(16);
        let forward = propagate(sampling, field.clone(), 2.0, 1.5).unwrap();
        let back = propagate(sampling, forward, 2.0, -1.5).unwrap();
        for (a, b) in field.iter().zip(back.iter()) {
            assert!((a - b).norm() < 1e-10);
        }
    }
}
