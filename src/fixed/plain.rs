//! Plain Fixed-Point Iteration

use ndarray::prelude::*;
use ndarray::NdFloat;

use super::{distance, Acceleration, FixedPointOptions, FixedPointResult, Monitor};

/// Plain (unaccelerated) fixed-point iteration
///
/// Algorithm
/// ---------
/// ```math
/// x_{k+1} = T(x_k)
/// ```
/// For an averaged operator with a fixed point this is the
/// Krasnosel'skii-Mann iteration, and the residuals
/// $`\|x_{k+1} - x_k\|_2`$ are nonincreasing.
///
/// Parameters
/// ----------
/// - __op:__        the operator $`T`$  
/// - __x0:__        initial guess  
/// - __options:__   iteration budget, tolerance and logging  
/// - __callback:__  user-defined function to be evaluated with two arguments (x,iter).
///                   It is evaluated at (x0,0) and then after each iteration.
///                   If it returns True, the function terminates early.
pub fn plain<S: NdFloat>(
    op: impl Fn(ArrayView1<S>) -> Array1<S>,
    x0: ArrayView1<S>,
    options: &FixedPointOptions<S>,
    mut callback: impl FnMut(ArrayView1<S>, usize) -> bool,
) -> FixedPointResult<S> {
    let mut monitor = Monitor::new(options, Acceleration::Original);
    let mut x = x0.to_owned();

    if callback(x.view(), 0) {
        return monitor.finish(x);
    }
    for iter in 1..=options.max_iter {
        let x_new = op(x.view());
        let converged = monitor.record(distance(x_new.view(), x.view()), iter);
        x = x_new;

        if converged || callback(x.view(), iter) {
            break;
        }
    }
    monitor.finish(x)
}
