//! Sparse Least Squares with the Generalized Minimax-Concave Penalty
//!
//! The GMC penalty [\[S17\]](#references) is a non-convex sparsity penalty
//! whose non-convexity is offset by the data fidelity term, so that the
//! overall problem
//! ```math
//! \min_x \tfrac12\|y - Xx\|_2^2 + \lambda \psi_B(x), \quad
//! \psi_B(x) = P(x) - \min_v \left\{ P(v) + \tfrac{1}{2\lambda}\|B(x - v)\|_2^2 \right\}
//! ```
//! with $`B^TB = \frac{\gamma}{\lambda}X^TX`$ stays convex for $`\gamma \in (0, 1)`$.
//! Compared to the lasso it shrinks large coefficients less, reducing the
//! estimation bias, while producing equally sparse estimates.
//!
//! The problem is solved as a saddle point of a convex-concave function
//! with forward-backward splitting ([`SaddleOperator`]), iterated to a
//! fixed point by [`fixed_point`](crate::fixed::fixed_point).
//!
//! The design is expected to be centered and to have unit-norm columns,
//! and the response standardized; no preprocessing is done here.
//!
//! References
//! ----------
//! \[S17\]: [ Selesnick I
//!             "Sparse Regularization via Convex Analysis",
//!             IEEE Trans. Signal Process., 65(17), 4481-4494 (2017) ](https://doi.org/10.1109/TSP.2017.2711501)

#![allow(non_snake_case)]

use log::info;
use ndarray::prelude::*;

use crate::error::{invalid, Result};
use crate::fixed::{fixed_point, nop, Acceleration, FixedPointOptions, FixedPointResult};
use crate::prox::Penalty;

mod setup;
pub use setup::*;
mod saddle;
pub use saddle::*;

/// Options of a GMC solve
#[derive(Debug, Clone)]
pub struct GmcOptions {
    /// Sparsity structure, elementwise or grouped
    pub penalty: Penalty,
    /// Concavity of the penalty, in (0, 1)
    pub gamma: f64,
    /// Acceleration of the fixed-point iteration
    pub acceleration: Acceleration,
    /// Budget, tolerance and logging of the fixed-point iteration
    pub fixed_point: FixedPointOptions<f64>,
}

impl Default for GmcOptions {
    fn default() -> Self {
        GmcOptions {
            penalty: Penalty::L1,
            gamma: 0.8,
            acceleration: Acceleration::default(),
            fixed_point: FixedPointOptions::default(),
        }
    }
}

impl GmcOptions {
    pub fn validate(&self) -> Result<()> {
        check_gamma(self.gamma)?;
        self.fixed_point.validate()
    }
}

/// Outcome of a GMC solve
#[derive(Debug, Clone)]
pub struct GmcResult {
    /// Sparse estimate $`\hat{x}`$
    pub x: Array1<f64>,
    /// Auxiliary saddle variable $`\hat{v}`$
    pub v: Array1<f64>,
    /// Regularization used, $`\lambda = \text{ratio} \cdot \lambda_{\max}`$
    pub lambda: f64,
    pub lambda_max: f64,
    /// Number of fixed-point iterations performed
    pub iterations: usize,
    /// Per-iteration residual norms of the fixed-point iteration
    pub residuals: Vec<f64>,
    tol: f64,
}

impl GmcResult {
    /// Splits the stacked state $`[x; v]`$ of length $`2p`$
    fn assemble(solution: FixedPointResult<f64>, setup: &Setup, lambda: f64, tol: f64) -> GmcResult {
        let p = setup.dim();
        let FixedPointResult {
            x: state,
            iterations,
            residuals,
        } = solution;
        GmcResult {
            x: state.slice(s![..p]).to_owned(),
            v: state.slice(s![p..]).to_owned(),
            lambda,
            lambda_max: setup.lambda_max,
            iterations,
            residuals,
            tol,
        }
    }

    /// Whether the last residual met the tolerance
    pub fn converged(&self) -> bool {
        self.residuals.last().map_or(false, |&r| r < self.tol)
    }
}

/// GMC regularized least squares
///
/// Minimizes $`\frac12\|y - Xx\|_2^2 + \lambda \psi_B(x)`$ at
/// $`\lambda = \text{ratio} \cdot \lambda_{\max}`$, where $`\lambda_{\max}`$
/// is the smallest regularization for which the (lasso or group lasso)
/// solution is zero.
///
/// Parameters
/// ----------
/// - __y:__         response, length n
/// - __X:__         design, n x p
/// - __ratio:__     regularization as a fraction of $`\lambda_{\max}`$, in [0, 1]
/// - __options:__   penalty structure, $`\gamma`$, acceleration and iteration options
///
/// All inputs are validated before iterating. Exhausting the iteration
/// budget is not an error, see [`GmcResult::converged`].
pub fn gmc(
    y: ArrayView1<f64>,
    X: ArrayView2<f64>,
    ratio: f64,
    options: &GmcOptions,
) -> Result<GmcResult> {
    if !(ratio >= 0. && ratio <= 1.) {
        return Err(invalid("ratio", format!("must lie in [0, 1], got {}", ratio)));
    }
    options.validate()?;
    let setup = Setup::new(X, y, &options.penalty, options.gamma)?;

    let op = SaddleOperator::new(&setup, ratio * setup.lambda_max);
    let x0 = Array1::zeros(op.dim());
    let solution = fixed_point(
        |state| op.apply(state),
        x0.view(),
        options.acceleration,
        &options.fixed_point,
        nop,
    );
    info!(
        "GMC: lambda = {}, iterations = {}",
        op.lambda(),
        solution.iterations
    );

    Ok(GmcResult::assemble(
        solution,
        &setup,
        op.lambda(),
        options.fixed_point.tol,
    ))
}
