//! Nesterov Accelerated Fixed-Point Iteration

use log::debug;
use ndarray::prelude::*;
use ndarray::NdFloat; // includes LinalgScalar and ScalarOperand
use num_traits::Float;

use super::{distance, Acceleration, FixedPointOptions, FixedPointResult, Monitor};

/// Fixed-point iteration with Nesterov momentum and adaptive restart
///
/// Algorithm
/// ---------
/// ```math
/// \begin{aligned}
/// x_{k+1} &= T(y_k) \\
/// \theta_{k+1} &= \frac{1 + \sqrt{4 \theta_k^2 + 1}}{2} \\
/// y_{k+1} &= x_{k+1} + \frac{\theta_k - 1}{\theta_{k+1}} (x_{k+1} - x_k)
/// \end{aligned}
/// ```
/// where $`\theta_0 := 1`$. The momentum is restarted ($`\theta = 1`$,
/// $`y_{k+1} = x_{k+1}`$) when the step $`x_{k+1} - x_k`$ points against the
/// fixed-point residual, $`\langle y_k - x_{k+1}, x_{k+1} - x_k \rangle > 0`$,
/// or when the residual grows, see [\[OC15\]](#references).
///
/// Parameters
/// ----------
/// - __op:__        the operator $`T`$
/// - __x0:__        initial guess
/// - __options:__   iteration budget, tolerance and logging
/// - __callback:__  user-defined function to be evaluated with two arguments (x,iter).
///                   It is evaluated at (x0,0) and then after each iteration.
///                   If it returns True, the function terminates early.
///
/// References
/// ----------
/// \[OC15\]: [ O'Donoghue B, Candes E
///             "Adaptive Restart for Accelerated Gradient Schemes",
///             Foundations of Computational Mathematics, 15, 715-732 (2015) ](https://arxiv.org/abs/1204.3982)
pub fn nesterov<S: NdFloat>(
    op: impl Fn(ArrayView1<S>) -> Array1<S>,
    x0: ArrayView1<S>,
    options: &FixedPointOptions<S>,
    mut callback: impl FnMut(ArrayView1<S>, usize) -> bool,
) -> FixedPointResult<S> {
    let mut monitor = Monitor::new(options, Acceleration::Nesterov);
    let mut x = x0.to_owned();
    let mut y = x0.to_owned();

    let mut theta = S::one();
    let mut residual_old = S::infinity();

    let two = S::from(2.).unwrap();
    let four = S::from(4.).unwrap();

    if callback(x.view(), 0) {
        return monitor.finish(x);
    }
    for iter in 1..=options.max_iter {
        let x_old = x;
        let theta_old = theta;

        x = op(y.view());
        theta = (S::one() + Float::sqrt(four * theta.powi(2) + S::one())) / two;
        let beta = (theta_old - S::one()) / theta; // "nesterov" momentum

        let step = &x - &x_old;
        let residual = distance(x.view(), x_old.view());
        let converged = monitor.record(residual, iter);

        // restart momentum if needed
        let reversed = (&y - &x).dot(&step) > S::zero();
        if reversed || residual > residual_old {
            if monitor.verbose() {
                debug!("nesterov iter {}: momentum restart", iter);
            }
            theta = S::one();
            y = x.to_owned();
        } else {
            y = &x + &(step * beta);
        }
        residual_old = residual;

        if converged || callback(x.view(), iter) {
            break;
        }
    }
    monitor.finish(x)
}
