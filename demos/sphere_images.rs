use image::{Rgb, RgbImage};
use mie_field::{
    apply_filter, bandpass_filter, crop_field, display_range, far2near, far_field, pad, propagate,
    select_channel, stack_frames, Channel, Field, Filtered, FrameSink, Geometry, MieError, SimulationParams,
};
use ndarray::{ArrayView2, ArrayView4, Axis};
use num_complex::Complex;
use palette::{Lch, Srgb};
use std::path::Path;

/// Renders a sphere's scattered field through an objective, then walks the image plane along the
/// optical axis and writes each step as a PNG.
///
/// `cargo run --example sphere_images [params.toml]`
pub fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let params = match std::env::args().nth(1) {
        Some(path) => SimulationParams::from_file(path)?,
        None => SimulationParams::default(),
    };
    let sampling = params.sampling()?;
    let padded = pad(sampling, params.padding);

    let far = far_field(
        padded,
        params.z,
        params.radius,
        params.refractive_index(),
        params.wavelength,
        params.scale,
        Geometry::Cartesian2D,
    )?;
    save_complex_image("sphere_far.png", far.clone().into_cartesian()?.view())?;

    let near = Field::Cartesian(far2near(far.into_cartesian()?));
    let mask = bandpass_filter(padded, params.na_in, params.na_out, Geometry::Cartesian2D);
    let image = match apply_filter(padded, &near, &mask)? {
        Filtered::Cartesian(e) => crop_field(sampling.resolution, e.view())?,
        Filtered::Radial(_) => return Err(Box::new(MieError::GeometryMismatch)),
    };
    save_complex_image("sphere_near.png", image.view())?;

    let k = params.wavenumber();
    let steps = 16;
    let mut fields = Vec::with_capacity(steps);
    for i in 0..steps {
        let d = i as f64 * params.wavelength;
        fields.push(propagate(sampling, image.clone(), k, d)?);
    }
    let views: Vec<_> = fields.iter().map(|f| f.view()).collect();
    let frames = stack_frames(&views, 2)?;

    let mut sink = PngSequence;
    sink.write_sequence(frames.view(), 8, Path::new("."), "sphere", Channel::Real, true)?;
    Ok(())
}

/// Writes `<dir>/<name>_NNN.png`, one file per frame.
struct PngSequence;

impl FrameSink for PngSequence {
    fn write_sequence(
        &mut self,
        frames: ArrayView4<f64>,
        fps: u32,
        dir: &Path,
        name: &str,
        channel: Channel,
        autoscale: bool,
    ) -> mie_field::Result<()> {
        std::fs::create_dir_all(dir)?;
        let ranges = display_range(frames, channel, autoscale);
        let values = select_channel(frames, channel);
        println!("{} frames at {} fps - {:?}", values.len_of(Axis(0)), fps, dir.join(name));

        for (i, (frame, range)) in values.outer_iter().zip(ranges).enumerate() {
            let path = dir.join(format!("{}_{:03}.png", name, i));
            save_real_image(&path, frame, range)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        }
        Ok(())
    }
}

pub fn save_real_image<T: AsRef<Path> + std::fmt::Debug>(
    file_name: T,
    arr: ArrayView2<f64>,
    (min, max): (f64, f64),
) -> Result<(), image::ImageError> {
    let (h, w) = arr.dim();
    let span = if max > min { max - min } else { 1.0 };

    let mut img = RgbImage::new(w as u32, h as u32);
    for (x, y, p) in img.enumerate_pixels_mut() {
        let value = ((arr[[y as usize, x as usize]] - min) / span).min(1.0).max(0.0);

        let colour = Srgb::from(Lch::new(value * 70.0, value * 128.0, 280.0 - 245.0 * value));
        *p = Rgb([
            (colour.red * 255.0) as u8,
            (colour.green * 255.0) as u8,
            (colour.blue * 255.0) as u8,
        ]);
    }

    img.save(file_name)
}

pub fn save_complex_image<T: AsRef<Path> + std::fmt::Debug>(
    file_name: T,
    arr: ArrayView2<Complex<f64>>,
) -> Result<(), image::ImageError> {
    let (h, w) = arr.dim();
    let max_sqr: f64 = arr.iter().fold(0.0, |max, val| val.norm_sqr().max(max));
    let sum_sqr: f64 = arr.iter().fold(0.0, |sum, val| val.norm_sqr() + sum);
    println!(
        "h:{} w:{} max_sqr:{} sum_sqr:{} - {:?}",
        h, w, max_sqr, sum_sqr, file_name
    );

    let max = if max_sqr > 0.0 { max_sqr.sqrt() } else { 1.0 };

    let mut img = RgbImage::new(w as u32, h as u32);
    for (x, y, p) in img.enumerate_pixels_mut() {
        let (r, theta) = arr[[y as usize, x as usize]].to_polar();
        let r = r / max;

        let colour = Srgb::from(Lch::new(
            r * 100.0,
            r * 128.0,
            360.0 * (theta / ::std::f64::consts::PI + 1.0) * 0.5,
        ));
        *p = Rgb([
            (colour.red * 255.0) as u8,
            (colour.green * 255.0) as u8,
            (colour.blue * 255.0) as u8,
        ]);
    }

    img.save(file_name)
}
