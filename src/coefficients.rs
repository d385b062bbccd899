//! Scattering coefficients of a homogeneous sphere.

use crate::error::{check_positive, Result};
use crate::order::Orders;
use crate::special::{spherical_jn_with_derivative, spherical_yn_with_derivative};
use ndarray::Array1;
use num_complex::Complex64;

// below this the denominator is treated as resonant in the debug log
const RESONANCE_THRESHOLD: f64 = 1e-12;

/// Coefficient vector B, one value per order.
///
/// * `orders` - Multipole orders of the expansion
/// * `k` - Wavenumber of the incident field in the medium
/// * `n` - Complex refractive index of the sphere relative to the medium
/// * `a` - Sphere radius
///
/// ```text
/// B_l = (j_l(ka) j_l'(kna) n - j_l(kna) j_l'(ka)) / (j_l(kna) h_l'(ka) - h_l(ka) j_l'(kna) n)
/// ```
/// with h_l = j_l + i y_l. Near-zero denominators (morphology dependent resonances) are not
/// special-cased and may give very large or non-finite coefficients.
pub fn coeff_b(orders: &Orders, k: f64, n: Complex64, a: f64) -> Result<Array1<Complex64>> {
    let k = check_positive("wavenumber", k)?;
    let a = check_positive("radius", a)?;

    let l_max = orders.l_max();
    let ka = Complex64::new(k * a, 0.0);
    let kna = n * k * a;

    let (j_ka, jp_ka) = spherical_jn_with_derivative(l_max, ka);
    let (j_kna, jp_kna) = spherical_jn_with_derivative(l_max, kna);
    let (y_ka, yp_ka) = spherical_yn_with_derivative(l_max, ka);

    let i = Complex64::i();
    let b = orders
        .iter()
        .map(|l| {
            let h_ka = j_ka[l] + i * y_ka[l];
            let hp_ka = jp_ka[l] + i * yp_ka[l];

            let numerator = j_ka[l] * jp_kna[l] * n - j_kna[l] * jp_ka[l];
            let denominator = j_kna[l] * hp_ka - h_ka * jp_kna[l] * n;
            if denominator.norm() < RESONANCE_THRESHOLD {
                log::debug!("near-singular coefficient denominator at order {}: {}", l, denominator);
            }
            numerator / denominator
        })
        .collect::<Array1<_>>();

    log::debug!("computed {} scattering coefficients for n = {}", b.len(), n);
    Ok(b)
}
