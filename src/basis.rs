//! Angular (Legendre) and radial (Hankel) terms of the Mie expansion over an evaluation plane.
//!
//! Every builder returns a tensor with the plane's shape plus a trailing order axis.

use crate::error::{MieError, Result};
use crate::geometry::{frequency_grid, position_vectors, Geometry, Sampling};
use crate::order::Orders;
use crate::special::{legendre_polynomials, spherical_h1n};
use ndarray::{Array3, ArrayD, Axis, IxDyn, Zip};
use num_complex::Complex64;
use rustfft::num_traits::Zero;
use std::f64::consts::FRAC_PI_2;

/// Legendre terms for the far field, evaluated on the DFT frequency grid.
///
/// The direction cosine of each plane-wave component is `sqrt(1 - (kx² + ky²))`. Components with
/// `kx² + ky² > 1` do not propagate and are zero for every order.
pub fn asymptotic_legendre(sampling: Sampling, orders: &Orders, geometry: Geometry) -> ArrayD<f64> {
    let kxky = frequency_grid(sampling, geometry);
    let l_max = orders.l_max();
    let l = orders.as_array();

    let mut pl_cos_theta = order_tensor(kxky.shape(), orders.len());
    let last = Axis(pl_cos_theta.ndim() - 1);
    Zip::from(pl_cos_theta.lanes_mut(last))
        .and(&kxky)
        .par_for_each(|mut lane, &k2| {
            if k2 > 1.0 {
                return;
            }
            let p = legendre_polynomials(l_max, (1.0 - k2).sqrt());
            for (e, &l) in lane.iter_mut().zip(l.iter()) {
                *e = p[l];
            }
        });

    pl_cos_theta
}

/// Large-argument form of the spherical Hankel function of the first kind for every order.
///
/// ```text
/// h_l(x) ≈ exp(i(x - lπ/2)) / (ix)
/// ```
/// Only valid for `x >> l_max`; that is left to the caller.
pub fn asymptotic_hankel(x: &ArrayD<f64>, orders: &Orders) -> Result<ArrayD<Complex64>> {
    if orders.is_empty() {
        return Err(MieError::EmptyOrders);
    }
    let l = orders.as_array();
    let i = Complex64::i();

    let mut hl_asym = order_tensor(x.shape(), orders.len());
    let last = Axis(hl_asym.ndim() - 1);
    Zip::from(hl_asym.lanes_mut(last))
        .and(x)
        .par_for_each(|mut lane, &x| {
            for (e, &l) in lane.iter_mut().zip(l.iter()) {
                *e = (i * (x - l as f64 * FRAC_PI_2)).exp() / (i * x);
            }
        });

    Ok(hl_asym)
}

/// Exact spherical Hankel function of the first kind `j_l(x) + i y_l(x)` for every order.
pub fn spherical_hankel(x: &ArrayD<f64>, orders: &Orders) -> Result<ArrayD<Complex64>> {
    if orders.is_empty() {
        return Err(MieError::EmptyOrders);
    }
    let l_max = orders.l_max();
    let l = orders.as_array();

    let mut hl = order_tensor(x.shape(), orders.len());
    let last = Axis(hl.ndim() - 1);
    Zip::from(hl.lanes_mut(last)).and(x).par_for_each(|mut lane, &x| {
        let h = spherical_h1n(l_max, x);
        for (e, &l) in lane.iter_mut().zip(l.iter()) {
            *e = h[l];
        }
    });

    Ok(hl)
}

/// Legendre terms for the near field on the 2-D plane at height `z`.
///
/// The angle is the true angle between each pixel's position vector and the illumination
/// direction `k_dir`. `k_dir` is used as given, so it should be a unit vector.
pub fn near_field_legendre(sampling: Sampling, z: f64, k_dir: [f64; 3], orders: &Orders) -> Array3<f64> {
    let r_vecs = position_vectors(sampling, z);
    let res = sampling.resolution;
    let l_max = orders.l_max();
    let l = orders.as_array();

    let mut plcos = Array3::zeros((res, res, orders.len()));
    Zip::from(plcos.lanes_mut(Axis(2)))
        .and(r_vecs.lanes(Axis(2)))
        .par_for_each(|mut lane, r| {
            let r_mag = r.dot(&r).sqrt();
            let cos_theta = (r[0] * k_dir[0] + r[1] * k_dir[1] + r[2] * k_dir[2]) / r_mag;
            let p = legendre_polynomials(l_max, cos_theta);
            for (e, &l) in lane.iter_mut().zip(l.iter()) {
                *e = p[l];
            }
        });

    plcos
}

fn order_tensor<A: Clone + Zero>(shape: &[usize], orders: usize) -> ArrayD<A> {
    let mut dims = shape.to_vec();
    dims.push(orders);
    ArrayD::zeros(IxDyn(&dims))
}
