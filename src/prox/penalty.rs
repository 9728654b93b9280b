#![allow(non_snake_case)]

use ndarray::prelude::*;
use ndarray::{Data, NdFloat};

use super::group::{group_norm, group_weight};
use super::{group_soft_threshold, soft_threshold, GroupPartition};
use crate::error::Result;

/// Sparsity structure of the estimate
#[derive(Debug, Clone, PartialEq)]
pub enum Penalty {
    /// Elementwise sparsity, $`P(x) = \|x\|_1`$
    L1,
    /// Group sparsity, $`P(x) = \sum_g \sqrt{k_g}\|x_g\|_2`$
    GroupL2(GroupPartition),
}

impl Default for Penalty {
    fn default() -> Self {
        Penalty::L1
    }
}

impl Penalty {
    /// Proximal operator of $`T P`$
    pub fn prox<S, D>(&self, z: &ArrayBase<D, Ix1>, T: S) -> Array1<S>
    where
        S: NdFloat,
        D: Data<Elem = S>,
    {
        match self {
            Penalty::L1 => soft_threshold(z, T),
            Penalty::GroupL2(groups) => group_soft_threshold(z, T, groups),
        }
    }

    /// Penalty value $`P(x)`$
    pub fn value<S, D>(&self, x: &ArrayBase<D, Ix1>) -> S
    where
        S: NdFloat,
        D: Data<Elem = S>,
    {
        match self {
            Penalty::L1 => x.fold(S::zero(), |acc, xi| acc + xi.abs()),
            Penalty::GroupL2(groups) => groups
                .iter()
                .fold(S::zero(), |acc, g| acc + group_weight::<S>(g) * group_norm(x, g)),
        }
    }

    /// Dual norm of the penalty
    ///
    /// Evaluated at $`X^Ty`$ this is the smallest regularization
    /// for which zero solves the penalized least squares problem:
    /// $`\|X^Ty\|_\infty`$ for L1, and $`\max_g \|(X^Ty)_g\|_2/\sqrt{k_g}`$
    /// for groups.
    pub fn dual_norm<S, D>(&self, z: &ArrayBase<D, Ix1>) -> S
    where
        S: NdFloat,
        D: Data<Elem = S>,
    {
        match self {
            Penalty::L1 => z.fold(S::zero(), |acc, zi| acc.max(zi.abs())),
            Penalty::GroupL2(groups) => groups.iter().fold(S::zero(), |acc, g| {
                acc.max(group_norm(z, g) / group_weight::<S>(g))
            }),
        }
    }

    /// Checks the penalty against a design with `p` columns
    pub fn validate(&self, p: usize) -> Result<()> {
        match self {
            Penalty::L1 => Ok(()),
            Penalty::GroupL2(groups) => groups.validate(p),
        }
    }
}
