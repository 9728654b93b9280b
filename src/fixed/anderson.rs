//! Anderson Accelerated Fixed-Point Iteration

use std::collections::VecDeque;

use log::debug;
use ndarray::prelude::*;
use ndarray_linalg::Solve;

use super::{distance, Acceleration, FixedPointOptions, FixedPointResult, Monitor};

/// Relative Tikhonov weight on the Anderson normal equations
const RIDGE: f64 = 1e-10;

/// Type-II Anderson accelerated fixed-point iteration
///
/// Keeps a window of the last `options.mem_size` differences of the
/// residuals $`g_k = T(x_k) - x_k`$ and of the operator outputs, and
/// extrapolates with the combination that best cancels the current residual
/// [\[WN11\]](#references).
///
/// Algorithm
/// ---------
/// ```math
/// \begin{aligned}
/// g_k &= T(x_k) - x_k \\
/// \Delta G_k &= [g_{i+1} - g_i]_{i=k-m}^{k-1}, \quad
/// \Delta T_k = [T(x_{i+1}) - T(x_i)]_{i=k-m}^{k-1} \\
/// \theta_k &= \mathrm{arg}\!\min_\theta \|g_k - \Delta G_k \theta\|_2 \\
/// x_{k+1} &= T(x_k) - \Delta T_k \theta_k
/// \end{aligned}
/// ```
/// The least squares problem is solved through its (slightly regularized)
/// normal equations. If that solve fails or the extrapolation is not
/// finite, the window is cleared and the plain step $`T(x_k)`$ is taken.
///
/// References
/// ----------
/// \[WN11\]: [ Walker H, Ni P
///             "Anderson Acceleration for Fixed-Point Iterations",
///             SIAM J. Numer. Anal., 49(4), 1715-1735 (2011) ](https://doi.org/10.1137/10078356X)
pub fn anderson(
    op: impl Fn(ArrayView1<f64>) -> Array1<f64>,
    x0: ArrayView1<f64>,
    options: &FixedPointOptions<f64>,
    mut callback: impl FnMut(ArrayView1<f64>, usize) -> bool,
) -> FixedPointResult<f64> {
    let mut monitor = Monitor::new(options, Acceleration::Anderson);
    let mem_size = options.mem_size;

    // (Δg, ΔT) pairs, oldest first
    let mut memory: VecDeque<(Array1<f64>, Array1<f64>)> = VecDeque::with_capacity(mem_size);
    // (g, T(x)) of the previous iterate
    let mut last: Option<(Array1<f64>, Array1<f64>)> = None;
    let mut x = x0.to_owned();

    if callback(x.view(), 0) {
        return monitor.finish(x);
    }
    for iter in 1..=options.max_iter {
        let tx = op(x.view());
        let g = &tx - &x;

        if let Some((g_old, tx_old)) = last.take() {
            if memory.len() == mem_size {
                // forget
                memory.pop_front();
            }
            memory.push_back((&g - &g_old, &tx - &tx_old));
        }

        let x_new = match extrapolate(&memory, &g, &tx) {
            Some(x_acc) => x_acc,
            None => {
                if monitor.verbose() {
                    debug!("aa2 iter {}: clearing memory", iter);
                }
                memory.clear();
                tx.to_owned()
            }
        };

        let converged = monitor.record(distance(x_new.view(), x.view()), iter);
        last = Some((g, tx));
        x = x_new;

        if converged || callback(x.view(), iter) {
            break;
        }
    }
    monitor.finish(x)
}

/// Anderson extrapolation $`T(x_k) - \Delta T_k \theta_k`$, if well defined
fn extrapolate(
    memory: &VecDeque<(Array1<f64>, Array1<f64>)>,
    g: &Array1<f64>,
    tx: &Array1<f64>,
) -> Option<Array1<f64>> {
    let m = memory.len();
    if m == 0 {
        return Some(tx.to_owned());
    }

    let mut gram = Array2::<f64>::zeros((m, m));
    let mut rhs = Array1::<f64>::zeros(m);
    for (i, (dg_i, _)) in memory.iter().enumerate() {
        rhs[i] = dg_i.dot(g);
        for (j, (dg_j, _)) in memory.iter().enumerate().skip(i) {
            let gij = dg_i.dot(dg_j);
            gram[[i, j]] = gij;
            gram[[j, i]] = gij;
        }
    }
    let ridge = RIDGE * gram.diag().sum().max(std::f64::MIN_POSITIVE);
    gram.diag_mut().mapv_inplace(|d| d + ridge);

    let theta = gram.solve_into(rhs).ok()?;
    let mut x = tx.to_owned();
    for (&t, (_, dt)) in theta.iter().zip(memory.iter()) {
        x.scaled_add(-t, dt);
    }
    if x.iter().all(|v| v.is_finite()) {
        Some(x)
    } else {
        None
    }
}
