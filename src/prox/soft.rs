//! Soft-Thresholding

#![allow(non_snake_case)]

use ndarray::prelude::*;
use ndarray::{Data, DataMut, NdFloat};

/// Scalar soft-threshold
///
/// ```math
/// \mathrm{soft}(z, T) = \mathrm{sign}(z) \max(|z| - T, 0)
/// ```
/// Entries with $`|z| \leq T`$ are set to exactly zero.
#[inline]
pub fn soft<S: NdFloat>(z: S, T: S) -> S {
    let shrunk = z.abs() - T;
    if shrunk > S::zero() {
        z.signum() * shrunk
    } else {
        S::zero()
    }
}

/// Elementwise soft-threshold, the proximal operator of $`T\|\cdot\|_1`$
pub fn soft_threshold<S, D>(z: &ArrayBase<D, Ix1>, T: S) -> Array1<S>
where
    S: NdFloat,
    D: Data<Elem = S>,
{
    z.mapv(|zi| soft(zi, T))
}

/// Elementwise soft-threshold in-place
pub fn soft_threshold_mut<S, D>(z: &mut ArrayBase<D, Ix1>, T: S)
where
    S: NdFloat,
    D: DataMut<Elem = S>,
{
    z.mapv_inplace(|zi| soft(zi, T));
}
