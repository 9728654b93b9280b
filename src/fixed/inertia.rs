//! Inertial Fixed-Point Iteration

use ndarray::prelude::*;
use ndarray::NdFloat;

use super::{distance, Acceleration, FixedPointOptions, FixedPointResult, Monitor};

/// Inertial (heavy-ball) fixed-point iteration
///
/// Algorithm
/// ---------
/// ```math
/// x_{k+1} = T\left(x_k + \alpha (x_k - x_{k-1})\right)
/// ```
/// with a fixed weight $`\alpha`$ = `options.inertia` and $`x_{-1} := x_0`$.
/// For averaged operators $`\alpha < 1/3`$ is a safe choice.
pub fn inertial<S: NdFloat>(
    op: impl Fn(ArrayView1<S>) -> Array1<S>,
    x0: ArrayView1<S>,
    options: &FixedPointOptions<S>,
    mut callback: impl FnMut(ArrayView1<S>, usize) -> bool,
) -> FixedPointResult<S> {
    let mut monitor = Monitor::new(options, Acceleration::Inertia);
    let alpha = options.inertia;
    let mut x = x0.to_owned();
    let mut x_prev = x0.to_owned();

    if callback(x.view(), 0) {
        return monitor.finish(x);
    }
    for iter in 1..=options.max_iter {
        let mut y = &x - &x_prev;
        y *= alpha;
        y += &x;

        let x_new = op(y.view());
        let converged = monitor.record(distance(x_new.view(), x.view()), iter);
        x_prev = std::mem::replace(&mut x, x_new);

        if converged || callback(x.view(), iter) {
            break;
        }
    }
    monitor.finish(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::nop;
    use crate::fixed::tests::affine;
    use approx::assert_abs_diff_eq;

    #[test]
    fn inertial_converges_on_affine_map() {
        let opts = FixedPointOptions {
            tol: 1e-12,
            ..FixedPointOptions::default()
        };
        let res = inertial(affine, array![-3., 7.].view(), &opts, nop);
        assert_abs_diff_eq!(res.x, array![1., -2.], epsilon = 1e-10);
    }

    #[test]
    fn zero_weight_is_plain() {
        let opts = FixedPointOptions {
            inertia: 0.,
            max_iter: 25,
            early_termination: false,
            ..FixedPointOptions::default()
        };
        let a = inertial(affine, array![-3., 7.].view(), &opts, nop);
        let b = crate::fixed::plain(affine, array![-3., 7.].view(), &opts, nop);
        assert_eq!(a.x, b.x);
        assert_eq!(a.residuals, b.residuals);
    }
}
