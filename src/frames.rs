//! Frame sequences of simulated fields, and the boundary to whatever renders them.

use crate::error::{MieError, Result};
use ndarray::{s, Array4, ArrayView2, ArrayView3, ArrayView4, Axis};
use num_complex::Complex64;
use std::path::Path;
use std::str::FromStr;

/// Which part of a complex field is displayed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    Real,
    Imaginary,
}

impl FromStr for Channel {
    type Err = MieError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Real" => Ok(Channel::Real),
            "Imaginary" => Ok(Channel::Imaginary),
            other => Err(MieError::InvalidChannel(other.to_string())),
        }
    }
}

impl Channel {
    fn index(self) -> usize {
        match self {
            Channel::Real => 0,
            Channel::Imaginary => 1,
        }
    }
}

/// Stacks 2-D fields into a `(frame, row, col, channel)` sequence.
///
/// `channels` is 1 (real part only) or 2 (real and imaginary parts). All fields must share a shape.
pub fn stack_frames(fields: &[ArrayView2<Complex64>], channels: usize) -> Result<Array4<f64>> {
    if channels != 1 && channels != 2 {
        return Err(MieError::InvalidParameter {
            name: "channel count",
            value: channels as f64,
        });
    }
    let (h, w) = fields.first().map(|f| f.dim()).unwrap_or((0, 0));

    let mut frames = Array4::zeros((fields.len(), h, w, channels));
    for (i, field) in fields.iter().enumerate() {
        if field.dim() != (h, w) {
            return Err(MieError::ShapeMismatch {
                expected: vec![h, w],
                found: field.shape().to_vec(),
            });
        }
        frames
            .slice_mut(s![i, .., .., 0])
            .assign(&field.mapv(|e| e.re));
        if channels == 2 {
            frames
                .slice_mut(s![i, .., .., 1])
                .assign(&field.mapv(|e| e.im));
        }
    }
    Ok(frames)
}

/// The `(frame, row, col)` values shown for `channel`.
///
/// A single-channel sequence always shows its only channel.
pub fn select_channel(frames: ArrayView4<f64>, channel: Channel) -> ArrayView3<f64> {
    let index = if frames.len_of(Axis(3)) == 1 { 0 } else { channel.index() };
    frames.index_axis_move(Axis(3), index)
}

fn min_max<'a>(values: impl Iterator<Item = &'a f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

/// Colour map limits for each frame.
///
/// With `autoscale` every frame shares the limits of the whole sequence, otherwise each frame
/// is scaled on its own.
pub fn display_range(frames: ArrayView4<f64>, channel: Channel, autoscale: bool) -> Vec<(f64, f64)> {
    let values = select_channel(frames, channel);
    if autoscale {
        let range = min_max(values.iter());
        vec![range; values.len_of(Axis(0))]
    } else {
        values
            .outer_iter()
            .map(|frame| min_max(frame.iter()))
            .collect()
    }
}

/// Writes a frame sequence somewhere a person can look at it (video, image sequence, window).
pub trait FrameSink {
    /// * `frames` - `(frame, row, col, channel)` sequence from [`stack_frames`]
    /// * `fps` - Playback rate
    /// * `dir` - Output directory
    /// * `name` - Base name of the output, without extension
    /// * `channel` - Channel to display
    /// * `autoscale` - Share one colour range across all frames, see [`display_range`]
    fn write_sequence(
        &mut self,
        frames: ArrayView4<f64>,
        fps: u32,
        dir: &Path,
        name: &str,
        channel: Channel,
        autoscale: bool,
    ) -> Result<()>;
}
