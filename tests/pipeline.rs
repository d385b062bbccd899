use approx::assert_abs_diff_eq;
use mie_field::{
    apply_filter, bandpass_filter, crop_field, far2near, far_field, get_order, idhf, near2far, near_field, pad,
    Channel, EvaluationMode, Field, Filtered, Geometry, MieError, Sampling, SimulationParams,
};
use ndarray::Array1;
use num_complex::Complex64;
use std::convert::TryFrom;

fn scenario() -> SimulationParams {
    SimulationParams::default()
}

#[test]
fn test_scenario_far_field_is_finite() {
    let params = scenario();
    let sampling = params.sampling().unwrap();
    let far = far_field(
        sampling,
        params.z,
        params.radius,
        params.refractive_index(),
        params.wavelength,
        params.scale,
        params.geometry().unwrap(),
    )
    .unwrap();
    assert_eq!(far.shape(), &[128, 128]);
    assert!(far.is_finite());
    assert!(far.intensity_sum() > 0.0);
}

#[test]
fn test_zero_frequency_falls_with_contrast() {
    let params = scenario();
    let sampling = params.sampling().unwrap();

    let mut previous = f64::INFINITY;
    for &delta in &[0.02, 0.01, 0.005, 0.0] {
        let n = Complex64::new(1.0 + delta, 0.0);
        let far = far_field(sampling, 0.0, params.radius, n, params.wavelength, 1.0, Geometry::Cartesian2D)
            .unwrap()
            .into_cartesian()
            .unwrap();
        // zero frequency sits at the center after the shift
        let dc = far[[64, 64]].norm();
        assert!(dc < previous, "delta {}: {} >= {}", delta, dc, previous);
        previous = dc;
    }
    assert!(previous < 1e-9);
}

#[test]
fn test_far_near_round_trip_of_simulated_field() {
    let sampling = Sampling::new(32, 12.0).unwrap();
    let far = far_field(sampling, 0.0, 1.0, Complex64::new(1.33, 0.0), 0.5, 1.0, Geometry::Cartesian2D)
        .unwrap()
        .into_cartesian()
        .unwrap();
    let back = near2far(far2near(far.clone()));
    let scale = far.iter().fold(0.0_f64, |m, v| m.max(v.norm()));
    for (a, b) in far.iter().zip(back.iter()) {
        assert!((a - b).norm() <= 1e-12 * scale);
    }
}

#[test]
fn test_padded_image_crops_to_window() {
    let sampling = Sampling::new(16, 8.0).unwrap();
    for &padding in &[0usize, 1, 2] {
        let padded = pad(sampling, padding);
        let far = far_field(padded, 0.0, 0.5, Complex64::new(1.2, 0.0), 0.5, 1.0, Geometry::Cartesian2D).unwrap();
        let near = Field::Cartesian(far2near(far.into_cartesian().unwrap()));
        let mask = bandpass_filter(padded, 0.0, 1.0, Geometry::Cartesian2D);
        let image = match apply_filter(padded, &near, &mask).unwrap() {
            Filtered::Cartesian(e) => e,
            Filtered::Radial(_) => panic!("expected a 2-D image"),
        };
        assert_eq!(image.dim(), (padded.resolution, padded.resolution));

        let cropped = crop_field(16, image.view()).unwrap();
        assert_eq!(cropped.dim(), (16, 16));
        assert!(cropped.iter().all(|v| v.is_finite()));
    }
}

#[test]
fn test_radial_pipeline() {
    let sampling = Sampling::new(64, 20.0).unwrap();
    let far = far_field(sampling, 0.0, 1.0, Complex64::new(1.5, 0.01), 0.5, 1.0, Geometry::Radial1D).unwrap();
    assert_eq!(far.shape(), &[33]);

    let mask = bandpass_filter(sampling, 0.0, 1.0, Geometry::Radial1D);
    let profile = match apply_filter(sampling, &far, &mask).unwrap() {
        Filtered::Radial(p) => p,
        Filtered::Cartesian(_) => panic!("expected a radial profile"),
    };
    assert_eq!(profile.len(), 32);
    assert_abs_diff_eq!(profile.radii[31], 10.0, epsilon = 1e-12);
    assert!(profile.values.iter().all(|v| v.is_finite()));
}

#[test]
fn test_near_field_from_params() {
    let params = SimulationParams::from_toml_str(
        r#"
        resolution = 24
        fov = 12.0
        z = 3.0
        radius = 0.5
        wavelength = 1.0
        index_re = 1.4
        index_im = 0.0
        option = "near"
        "#,
    )
    .unwrap();
    let k_dir = match params.evaluation_mode().unwrap() {
        EvaluationMode::Exact { k_dir } => k_dir,
        EvaluationMode::Asymptotic { .. } => panic!("expected near field"),
    };
    let e = near_field(
        params.sampling().unwrap(),
        params.radius,
        params.refractive_index(),
        params.wavelength,
        params.z,
        k_dir,
    )
    .unwrap();
    assert_eq!(e.dim(), (24, 24));
    assert!(e.iter().all(|v| v.is_finite()));

    // scattered amplitude falls off away from the axis
    let center = e[[11, 11]].norm();
    let corner = e[[0, 0]].norm();
    assert!(corner < center);
}

#[test]
fn test_invalid_arguments() {
    assert!(matches!(Geometry::try_from(0), Err(MieError::InvalidDimension(0))));
    assert!(matches!(
        EvaluationMode::from_option("NEAR", Geometry::Cartesian2D, None),
        Err(MieError::InvalidOption(_))
    ));
    assert!(matches!(
        EvaluationMode::from_option("near", Geometry::Radial1D, None),
        Err(MieError::UnsupportedGeometry)
    ));
    assert!(matches!("Magnitude".parse::<Channel>(), Err(MieError::InvalidChannel(_))));
    assert!(matches!(get_order(0.0, 0.5), Err(MieError::InvalidParameter { .. })));
    assert!(Sampling::new(0, 10.0).is_err());

    let sampling = Sampling::new(16, 10.0).unwrap();
    assert!(matches!(
        idhf(sampling, Array1::zeros(3).view()),
        Err(MieError::ShapeMismatch { .. })
    ));
    let small = ndarray::Array2::<Complex64>::zeros((4, 4));
    assert!(matches!(
        crop_field(5, small.view()),
        Err(MieError::CropTooLarge { .. })
    ));
}
