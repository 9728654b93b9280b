#![allow(non_snake_case)]

use ndarray::prelude::*;

use super::setup::Setup;
use crate::linop::LinearOperator;

/// One forward-backward step on the GMC saddle function
///
/// The GMC estimate is the $`x`$ part of a saddle point of
/// ```math
/// F(x, v) = \tfrac12\|y - Xx\|_2^2 + \lambda P(x)
///     - \tfrac{\gamma}{2}\|X(x - v)\|_2^2 - \lambda P(v)
/// ```
/// (minimized over $`x`$, maximized over $`v`$), see [\[S17\]](#references).
/// The operator acts on the stacked state $`[x; v] \in \mathbb{R}^{2p}`$:
/// ```math
/// \begin{aligned}
/// z_x &= x - \mu\left(X^TX(x + \gamma(v - x)) - X^Ty\right) \\
/// z_v &= v - \mu\gamma X^TX(v - x) \\
/// [x; v] &\leftarrow [\mathrm{prox}_{\mu\lambda P}(z_x); \mathrm{prox}_{\mu\lambda P}(z_v)]
/// \end{aligned}
/// ```
/// With $`\mu`$ from [`step_size`](super::step_size) this map is averaged,
/// so its fixed points are the saddle points of $`F`$. $`\gamma`$ and the
/// penalty are those the [`Setup`] was built with.
///
/// References
/// ----------
/// \[S17\]: [ Selesnick I
///             "Sparse Regularization via Convex Analysis",
///             IEEE Trans. Signal Process., 65(17), 4481-4494 (2017) ](https://doi.org/10.1109/TSP.2017.2711501)
#[derive(Debug, Clone)]
pub struct SaddleOperator<'s, 'a> {
    setup: &'s Setup<'a>,
    lambda: f64,
}

impl<'s, 'a> SaddleOperator<'s, 'a> {
    #[must_use]
    pub fn new(setup: &'s Setup<'a>, lambda: f64) -> SaddleOperator<'s, 'a> {
        SaddleOperator { setup, lambda }
    }

    /// Length $`2p`$ of the stacked state
    pub fn dim(&self) -> usize {
        2 * self.setup.dim()
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Applies the operator to the stacked state $`[x; v]`$
    pub fn apply(&self, state: ArrayView1<f64>) -> Array1<f64> {
        let p = self.setup.dim();
        let mu = self.setup.mu;
        let gamma = self.setup.gamma();
        let penalty = self.setup.penalty();
        let (x, v) = (state.slice(s![..p]), state.slice(s![p..]));

        let w = &v - &x;
        let Nx = self.setup.normal.apply(&x);
        let Nw = self.setup.normal.apply(&w);

        // gradient in x, evaluated at x + gamma (v - x)
        let mut zx = Nx;
        zx.scaled_add(gamma, &Nw);
        zx -= &self.setup.xty;
        zx *= -mu;
        zx += &x;

        // gradient in v
        let mut zv = Nw;
        zv *= -mu * gamma;
        zv += &v;

        let threshold = mu * self.lambda;
        let mut next = Array1::zeros(2 * p);
        next.slice_mut(s![..p])
            .assign(&penalty.prox(&zx, threshold));
        next.slice_mut(s![p..])
            .assign(&penalty.prox(&zv, threshold));
        next
    }

    /// Saddle function $`F(x, v)`$
    pub fn objective(&self, x: ArrayView1<f64>, v: ArrayView1<f64>) -> f64 {
        let normal = &self.setup.normal;
        let penalty = self.setup.penalty();
        let w = &x - &v;
        // ||y - Xx||^2 = y'y - 2 x'X'y + x'X'Xx
        let fit = self.setup.yty - 2. * x.dot(&self.setup.xty) + x.dot(&normal.apply(&x));
        let coupling = w.dot(&normal.apply(&w));
        0.5 * fit + self.lambda * penalty.value(&x)
            - 0.5 * self.setup.gamma() * coupling
            - self.lambda * penalty.value(&v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linop::Normal;
    use crate::prox::{group_soft_threshold, GroupPartition, Penalty};
    use approx::assert_abs_diff_eq;
    use ndarray_rand::rand_distr::Normal as Gaussian;
    use ndarray_rand::RandomExt;

    fn random_problem(n: usize, p: usize) -> (Array2<f64>, Array1<f64>, Array1<f64>) {
        let X = Array::random((n, p), Gaussian::new(0., 1.).unwrap());
        let y = Array::random(n, Gaussian::new(0., 1.).unwrap());
        let state = Array::random(2 * p, Gaussian::new(0., 1.).unwrap());
        (X, y, state)
    }

    #[test]
    fn wide_and_tall_paths_agree() {
        for &(n, p) in &[(12, 5), (5, 12), (7, 7)] {
            let (X, y, state) = random_problem(n, p);
            for penalty in &[
                Penalty::L1,
                Penalty::GroupL2(GroupPartition::contiguous(&[2, p - 2])),
            ] {
                let mut wide = Setup::new(X.view(), y.view(), penalty, 0.8).unwrap();
                let mut tall = wide.clone();
                wide.normal = Normal::wide(X.view());
                tall.normal = Normal::tall(X.view());

                let lambda = 0.3 * wide.lambda_max;
                let a = SaddleOperator::new(&wide, lambda).apply(state.view());
                let b = SaddleOperator::new(&tall, lambda).apply(state.view());
                assert_abs_diff_eq!(a, b, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn matches_explicit_step() {
        let (X, y, state) = random_problem(9, 4);
        let setup = Setup::new(X.view(), y.view(), &Penalty::L1, 0.6).unwrap();
        let lambda = 0.5 * setup.lambda_max;
        let next = SaddleOperator::new(&setup, lambda).apply(state.view());

        let (x, v) = (state.slice(s![..4]), state.slice(s![4..]));
        let G = X.t().dot(&X);
        let blend = &x + &((&v - &x) * 0.6);
        let zx = &x - &((G.dot(&blend) - X.t().dot(&y)) * setup.mu);
        let zv = &v - &(G.dot(&(&v - &x)) * (0.6 * setup.mu));
        let T = setup.mu * lambda;
        let soft = |z: f64| z.signum() * (z.abs() - T).max(0.);

        assert_abs_diff_eq!(next.slice(s![..4]), zx.mapv(soft), epsilon = 1e-12);
        assert_abs_diff_eq!(next.slice(s![4..]), zv.mapv(soft), epsilon = 1e-12);
    }

    #[test]
    fn step_uses_gamma_and_groups_of_setup() {
        let (X, y, state) = random_problem(8, 4);
        let groups = GroupPartition::contiguous(&[2, 2]);
        let penalty = Penalty::GroupL2(groups.clone());
        let setup = Setup::new(X.view(), y.view(), &penalty, 0.6).unwrap();
        let lambda = 0.4 * setup.lambda_max;
        let next = SaddleOperator::new(&setup, lambda).apply(state.view());

        let (x, v) = (state.slice(s![..4]), state.slice(s![4..]));
        let G = X.t().dot(&X);
        let blend = &x + &((&v - &x) * 0.6);
        let zx = &x - &((G.dot(&blend) - X.t().dot(&y)) * setup.mu);
        let zv = &v - &(G.dot(&(&v - &x)) * (0.6 * setup.mu));
        let T = setup.mu * lambda;

        assert_abs_diff_eq!(next.slice(s![..4]), group_soft_threshold(&zx, T, &groups), epsilon = 1e-12);
        assert_abs_diff_eq!(next.slice(s![4..]), group_soft_threshold(&zv, T, &groups), epsilon = 1e-12);
    }

    #[test]
    fn small_gamma_step_contracts() {
        // mu = 1.99 is only safe for the gamma it was derived from
        let X = Array2::<f64>::eye(3);
        let y = array![1., -2., 0.5];
        let setup = Setup::new(X.view(), y.view(), &Penalty::L1, 0.1).unwrap();
        assert_abs_diff_eq!(setup.mu, 1.99, epsilon = 1e-12);

        let op = SaddleOperator::new(&setup, 0.);
        let mut state = Array1::zeros(op.dim());
        for _ in 0..200 {
            state = op.apply(state.view());
        }
        assert_abs_diff_eq!(state.slice(s![..3]), y, epsilon = 1e-10);
        assert_abs_diff_eq!(state.slice(s![3..]), y, epsilon = 1e-10);
    }

    #[test]
    fn zero_is_fixed_above_lambda_max() {
        let (X, y, _) = random_problem(10, 6);
        let setup = Setup::new(X.view(), y.view(), &Penalty::L1, 0.8).unwrap();
        let op = SaddleOperator::new(&setup, setup.lambda_max);
        let zero = Array1::zeros(op.dim());
        assert_eq!(op.apply(zero.view()), zero);
    }

    #[test]
    fn objective_of_zero_state() {
        let (X, y, _) = random_problem(6, 3);
        let setup = Setup::new(X.view(), y.view(), &Penalty::L1, 0.8).unwrap();
        let op = SaddleOperator::new(&setup, 1.);
        let zero = Array1::zeros(3);
        assert_abs_diff_eq!(op.objective(zero.view(), zero.view()), 0.5 * y.dot(&y), epsilon = 1e-12);

        // v = x cancels both the coupling and the penalties
        let x = array![0.3, -0.2, 1.0];
        let r = &y - &X.dot(&x);
        assert_abs_diff_eq!(op.objective(x.view(), x.view()), 0.5 * r.dot(&r), epsilon = 1e-10);
    }
}

#[cfg(all(rustc_nightly, test))]
mod benches {
    use super::*;
    use crate::linop::Normal;
    use crate::prox::Penalty;
    use ndarray_rand::rand_distr::Normal as Gaussian;
    use ndarray_rand::RandomExt;
    use test::Bencher;

    fn bench_path(b: &mut Bencher, n: usize, p: usize, wide: bool) {
        let X = Array::random((n, p), Gaussian::new(0., 1.).unwrap());
        let y = Array::random(n, Gaussian::new(0., 1.).unwrap());
        let mut setup = Setup::new(X.view(), y.view(), &Penalty::L1, 0.8).unwrap();
        setup.normal = if wide {
            Normal::wide(X.view())
        } else {
            Normal::tall(X.view())
        };
        let op = SaddleOperator::new(&setup, 0.5 * setup.lambda_max);
        let state = Array1::zeros(op.dim());
        b.iter(|| op.apply(state.view()));
    }

    #[bench]
    fn tall_design_gram(b: &mut Bencher) {
        bench_path(b, 1000, 50, false);
    }

    #[bench]
    fn tall_design_matrix_free(b: &mut Bencher) {
        bench_path(b, 1000, 50, true);
    }

    #[bench]
    fn wide_design_matrix_free(b: &mut Bencher) {
        bench_path(b, 50, 1000, true);
    }
}
