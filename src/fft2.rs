use ndarray::parallel::prelude::{IntoParallelIterator, ParallelIterator};
use ndarray::{Array2, ArrayViewMut1, ArrayViewMut2, Axis, Zip};
use num_complex::Complex64;
use num_integer::Integer;
use rustfft::num_traits::Zero;
use rustfft::{FftDirection, FftPlanner};

/// Unscaled forward 2D DFT.
pub fn fft2(input: Array2<Complex64>) -> Array2<Complex64> {
    let mut input = standard_layout(input);
    _fft2(input.view_mut(), FftDirection::Forward);
    input
}

/// Inverse 2D DFT, scaled by 1/N so that `ifft2(fft2(x)) == x`.
pub fn ifft2(input: Array2<Complex64>) -> Array2<Complex64> {
    let mut input = standard_layout(input);
    _fft2(input.view_mut(), FftDirection::Inverse);
    input
}

fn standard_layout(input: Array2<Complex64>) -> Array2<Complex64> {
    if input.is_standard_layout() {
        input
    } else {
        input.as_standard_layout().into_owned()
    }
}

// rows that are not contiguous go through a buffer
fn _fft2(mut input: ArrayViewMut2<Complex64>, direction: FftDirection) {
    let mut planner = FftPlanner::new();
    let fft_row = planner.plan_fft(input.shape()[1], direction);
    let fft_col = planner.plan_fft(input.shape()[0], direction);
    let normalisation = match direction {
        FftDirection::Forward => 1.0,
        FftDirection::Inverse => 1.0 / (input.shape()[0] * input.shape()[1]) as f64,
    };

    Zip::from(input.rows_mut()).into_par_iter().for_each_init(
        || {
            (
                vec![Zero::zero(); fft_row.len()],
                vec![Zero::zero(); fft_row.get_inplace_scratch_len()],
            )
        },
        |(temp, scratch), mut row| match row.0.as_slice_mut() {
            Some(row) => fft_row.process_with_scratch(row, scratch),
            None => {
                for (t, r) in temp.iter_mut().zip(row.0.iter()) {
                    *t = *r;
                }
                fft_row.process_with_scratch(temp, scratch);
                for (r, t) in row.0.iter_mut().zip(temp.iter()) {
                    *r = *t;
                }
            }
        },
    );

    Zip::from(input.columns_mut())
        .into_par_iter()
        .for_each_init(
            || {
                (
                    vec![Zero::zero(); fft_col.len()],
                    vec![Zero::zero(); fft_col.get_inplace_scratch_len()],
                )
            },
            |(temp, scratch), mut col| {
                debug_assert_eq!(col.0.len(), temp.len());
                for (t, c) in temp.iter_mut().zip(col.0.iter()) {
                    *t = *c;
                }
                fft_col.process_with_scratch(temp, scratch);
                for (c, t) in col.0.iter_mut().zip(temp.iter()) {
                    *c = *t * normalisation;
                }
            },
        );
}

/// Moves the origin (0, 0) to the "center" of the array (H/2, W/2), like numpy's `fftshift`.
pub fn fftshift2(mut input: Array2<Complex64>) -> Array2<Complex64> {
    fft2_shift_inplace(input.view_mut());
    input
}

/// Moves the "center" of the array (H/2, W/2) to the origin (0, 0), like numpy's `ifftshift`.
pub fn ifftshift2(mut input: Array2<Complex64>) -> Array2<Complex64> {
    ifft2_shift_inplace(input.view_mut());
    input
}

/// Moves the origin (0, 0) to the "center" of the array (H/2, W/2)
///
/// For even array lengths, which have no center value, this moves the value to the next value after the center
pub fn fft2_shift_inplace(mut input: ArrayViewMut2<Complex64>) {
    Zip::from(input.lanes_mut(Axis(1))).par_for_each(|row| {
        fft_shift_inplace(row);
    });

    Zip::from(input.lanes_mut(Axis(0))).par_for_each(|col| {
        fft_shift_inplace(col);
    });
}

/// Moves the "center" of the array (H/2, W/2) to the origin (0, 0)
///
/// Inverts fft_shift exactly, accounting for the asymmetry of even arrays
pub fn ifft2_shift_inplace(mut input: ArrayViewMut2<Complex64>) {
    Zip::from(input.lanes_mut(Axis(1))).par_for_each(|row| {
        ifft_shift_inplace(row);
    });

    Zip::from(input.lanes_mut(Axis(0))).par_for_each(|col| {
        ifft_shift_inplace(col);
    });
}

/// Moves the origin (0) to the "center" of the array (N/2)
///
/// For even array lengths, which have no center value, this moves the value to the next value after the center
pub fn fft_shift_inplace(mut input: ArrayViewMut1<Complex64>) {
    if input.len().is_even() {
        return fft_shift_even(input);
    }

    let len = input.len();
    let half = len / 2;

    let mut i = input.len();
    let mut j = half;
    let mut temp1 = input[half];
    for _ in 0..half {
        i -= 1;
        j -= 1;
        std::mem::swap(&mut temp1, &mut input[i]);

        std::mem::swap(&mut temp1, &mut input[j]);
    }
    input[half] = temp1;
}

/// Moves the "center" of the array (N/2) to the origin (0)
///
/// Inverts fft_shift exactly, accounting for the asymmetry of even arrays
pub fn ifft_shift_inplace(mut input: ArrayViewMut1<Complex64>) {
    if input.len().is_even() {
        return fft_shift_even(input);
    }

    let len = input.len();
    let half = len / 2;

    let mut j = half + 1;
    let mut temp1 = input[half];
    for i in 0..half {
        std::mem::swap(&mut temp1, &mut input[i]);

        std::mem::swap(&mut temp1, &mut input[j]);

        j += 1;
    }
    input[half] = temp1;
}

fn fft_shift_even(mut input: ArrayViewMut1<Complex64>) {
    let half = input.len() / 2;
    for i in 0..half {
        input.swap(i, i + half);
    }
}
