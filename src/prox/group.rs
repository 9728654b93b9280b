//! Group Soft-Thresholding

#![allow(non_snake_case)]

use ndarray::prelude::*;
use ndarray::{Data, NdFloat};

use crate::error::{GmcError, Result};

/// An ordered collection of disjoint groups of (zero-based) column indices
///
/// Groups need not be contiguous nor of equal size. Indices not covered
/// by any group are left unpenalized.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupPartition {
    groups: Vec<Vec<usize>>,
}

impl GroupPartition {
    #[must_use]
    pub fn new(groups: Vec<Vec<usize>>) -> GroupPartition {
        GroupPartition { groups }
    }

    /// Consecutive groups of the given sizes, starting at column 0
    #[must_use]
    pub fn contiguous(sizes: &[usize]) -> GroupPartition {
        let mut start = 0;
        let groups = sizes
            .iter()
            .map(|&k| {
                let g = (start..start + k).collect();
                start += k;
                g
            })
            .collect();
        GroupPartition { groups }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[usize]> {
        self.groups.iter().map(Vec::as_slice)
    }

    /// Checks the partition against a design with `p` columns
    ///
    /// Fails if the partition is empty, a group is empty, an index is
    /// out of range, or an index belongs to more than one group.
    pub fn validate(&self, p: usize) -> Result<()> {
        if self.groups.is_empty() {
            return Err(GmcError::InvalidGroups("no groups given".into()));
        }
        let mut seen = vec![false; p];
        for (gi, g) in self.groups.iter().enumerate() {
            if g.is_empty() {
                return Err(GmcError::InvalidGroups(format!("group {} is empty", gi)));
            }
            for &j in g {
                if j >= p {
                    return Err(GmcError::InvalidGroups(format!(
                        "group {} references column {} but the design has {} columns",
                        gi, j, p
                    )));
                }
                if seen[j] {
                    return Err(GmcError::InvalidGroups(format!(
                        "column {} appears in more than one group",
                        j
                    )));
                }
                seen[j] = true;
            }
        }
        Ok(())
    }
}

impl From<Vec<Vec<usize>>> for GroupPartition {
    fn from(groups: Vec<Vec<usize>>) -> Self {
        GroupPartition::new(groups)
    }
}

/// Euclidean norm of the entries of `z` indexed by `g`
pub(crate) fn group_norm<S, D>(z: &ArrayBase<D, Ix1>, g: &[usize]) -> S
where
    S: NdFloat,
    D: Data<Elem = S>,
{
    g.iter()
        .fold(S::zero(), |acc, &j| acc + z[j] * z[j])
        .sqrt()
}

/// $`\sqrt{k}`$ for a group of size $`k`$
pub(crate) fn group_weight<S: NdFloat>(g: &[usize]) -> S {
    S::from(g.len()).unwrap().sqrt()
}

/// Group soft-threshold, the proximal operator of $`T\sum_g \sqrt{k_g}\|z_g\|_2`$
///
/// For each group $`g`$ of size $`k_g`$ with $`r = \|z_g\|_2`$,
/// ```math
/// x_g = \begin{cases}
///     \left(1 - \frac{T\sqrt{k_g}}{r}\right) z_g & r > T\sqrt{k_g} \\
///     0 & \text{otherwise}
/// \end{cases}
/// ```
/// A group with $`r = 0`$ is returned as exactly zero.
pub fn group_soft_threshold<S, D>(z: &ArrayBase<D, Ix1>, T: S, groups: &GroupPartition) -> Array1<S>
where
    S: NdFloat,
    D: Data<Elem = S>,
{
    let mut x = z.to_owned();
    for g in groups.iter() {
        let r = group_norm(z, g);
        let thresh = T * group_weight::<S>(g);
        if r == S::zero() || r <= thresh {
            for &j in g {
                x[j] = S::zero();
            }
        } else {
            let scale = S::one() - thresh / r;
            for &j in g {
                x[j] = z[j] * scale;
            }
        }
    }
    x
}
