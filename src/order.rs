use crate::error::{check_positive, MieError, Result};
use ndarray::Array1;
use std::f64::consts::PI;

/// Multipole orders `0..=l_max` kept in the Mie expansion.
#[derive(Clone, Debug, PartialEq)]
pub struct Orders {
    l: Array1<usize>,
}

impl Orders {
    /// Orders `0..=l_max`.
    pub fn up_to(l_max: usize) -> Self {
        Orders {
            l: Array1::from_iter(0..=l_max),
        }
    }

    /// Wraps an explicit order vector, which must not be empty.
    pub fn from_vec(l: Vec<usize>) -> Result<Self> {
        if l.is_empty() {
            return Err(MieError::EmptyOrders);
        }
        Ok(Orders { l: Array1::from(l) })
    }

    pub fn l_max(&self) -> usize {
        self.l.iter().copied().max().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.l.len()
    }

    pub fn is_empty(&self) -> bool {
        self.l.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.l.iter().copied()
    }

    pub fn as_array(&self) -> &Array1<usize> {
        &self.l
    }
}

/// Truncation order of the expansion for a sphere of radius `a` at wavelength `lambda`.
///
/// Uses the usual convergence bound on the size parameter x = 2πa/λ:
/// ```text
/// l_max = ceil(x + 4 x^(1/3) + 2)
/// ```
pub fn get_order(a: f64, lambda: f64) -> Result<Orders> {
    let a = check_positive("radius", a)?;
    let lambda = check_positive("wavelength", lambda)?;

    let x = 2.0 * PI * a / lambda;
    let l_max = (x + 4.0 * x.cbrt() + 2.0).ceil() as usize;
    log::trace!("size parameter {:.4} -> l_max {}", x, l_max);

    Ok(Orders::up_to(l_max))
}
