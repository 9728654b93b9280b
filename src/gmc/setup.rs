#![allow(non_snake_case)]

use ndarray::prelude::*;
use ndarray_linalg::svd::SVD;

use crate::error::{invalid, GmcError, Result};
use crate::linop::Normal;
use crate::prox::Penalty;

/// Solve-scoped constants of a GMC problem
///
/// Built once per solve from the design, the response, the penalty and
/// $`\gamma`$; read only afterwards. The step size is only valid for the
/// $`\gamma`$ and penalty stored here, so the [`SaddleOperator`](super::SaddleOperator)
/// takes both from the setup.
#[derive(Debug, Clone)]
pub struct Setup<'a> {
    /// $`\rho = \lambda_{\max}(X^TX) = \sigma_1(X)^2`$
    pub rho: f64,
    /// Forward-backward step size
    pub mu: f64,
    /// Smallest regularization for which zero is the penalized solution
    pub lambda_max: f64,
    /// $`X^Ty`$
    pub xty: Array1<f64>,
    /// $`y^Ty`$
    pub yty: f64,
    gamma: f64,
    penalty: Penalty,
    pub(crate) normal: Normal<'a, f64>,
}

impl<'a> Setup<'a> {
    /// Validates the inputs and derives the solve constants
    ///
    /// Fails if `X` is empty, if `y` does not have one entry per row of
    /// `X`, if $`\gamma \notin (0, 1)`$, or if the penalty's groups do not fit `X`.
    pub fn new(
        X: ArrayView2<'a, f64>,
        y: ArrayView1<f64>,
        penalty: &Penalty,
        gamma: f64,
    ) -> Result<Setup<'a>> {
        let (n, p) = X.dim();
        if n == 0 || p == 0 {
            return Err(GmcError::EmptyDesign { rows: n, cols: p });
        }
        if y.len() != n {
            return Err(GmcError::ShapeMismatch {
                expected: n,
                got: y.len(),
            });
        }
        check_gamma(gamma)?;
        penalty.validate(p)?;

        let rho = lipschitz(X)?;
        let xty = X.t().dot(&y);
        let lambda_max = penalty.dual_norm(&xty);

        Ok(Setup {
            rho,
            mu: step_size(rho, gamma),
            lambda_max,
            xty,
            yty: y.dot(&y),
            gamma,
            penalty: penalty.clone(),
            normal: Normal::new(X),
        })
    }

    /// Number of coefficients $`p`$
    pub fn dim(&self) -> usize {
        self.normal.dim()
    }

    /// Concavity $`\gamma`$ the step size was derived for
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Validated penalty
    pub fn penalty(&self) -> &Penalty {
        &self.penalty
    }

    pub fn normal(&self) -> &Normal<'a, f64> {
        &self.normal
    }
}

pub(crate) fn check_gamma(gamma: f64) -> Result<()> {
    if gamma > 0. && gamma < 1. {
        Ok(())
    } else {
        Err(invalid("gamma", format!("must lie in (0, 1), got {}", gamma)))
    }
}

/// Lipschitz constant of $`\nabla \frac12\|Xx - y\|_2^2`$, i.e. $`\sigma_1(X)^2`$
pub fn lipschitz(X: ArrayView2<f64>) -> Result<f64> {
    let (_, sigma, _) = X.svd(false, false)?;
    let s1 = sigma.fold(0f64, |acc, &s| acc.max(s));
    Ok(s1 * s1)
}

/// Step size keeping the saddle-point forward-backward map averaged
///
/// ```math
/// \mu = \frac{1.99}{\rho \max\left(1, \frac{\gamma}{1 - \gamma}\right)}
/// ```
/// A zero design ($`\rho = 0`$) is treated as $`\rho = 1`$.
pub fn step_size(rho: f64, gamma: f64) -> f64 {
    let rho = if rho > 0. { rho } else { 1. };
    1.99 / (rho * f64::max(1., gamma / (1. - gamma)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prox::GroupPartition;
    use approx::assert_abs_diff_eq;

    #[test]
    fn single_mode_constants() {
        let X = array![[1., 0.], [0., 2.], [0., 0.]];
        let y = array![3., -1., 5.];
        let setup = Setup::new(X.view(), y.view(), &Penalty::L1, 0.8).unwrap();

        assert_abs_diff_eq!(setup.rho, 4., epsilon = 1e-12);
        assert_abs_diff_eq!(setup.mu, 1.99 / (4. * 4.), epsilon = 1e-12);
        assert_abs_diff_eq!(setup.xty, array![3., -2.]);
        assert_abs_diff_eq!(setup.lambda_max, 3.);
        assert_abs_diff_eq!(setup.yty, 35.);
        assert_eq!(setup.dim(), 2);
        assert_eq!(setup.gamma(), 0.8);
        assert_eq!(setup.penalty(), &Penalty::L1);
        assert!(!setup.normal().is_wide());
    }

    #[test]
    fn grouped_mode_normalizes_by_group_size() {
        let X = Array2::<f64>::eye(3);
        let y = array![1., 1., 1.5];
        let penalty = Penalty::GroupL2(GroupPartition::new(vec![vec![0, 1], vec![2]]));
        let setup = Setup::new(X.view(), y.view(), &penalty, 0.5).unwrap();

        // max(sqrt(2) / sqrt(2), 1.5 / 1)
        assert_abs_diff_eq!(setup.lambda_max, 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(setup.mu, 1.99, epsilon = 1e-12);
        assert!(setup.normal().is_wide());
        assert_eq!(setup.penalty(), &penalty);
    }

    #[test]
    fn step_size_small_gamma() {
        assert_abs_diff_eq!(step_size(2., 0.25), 0.995);
        assert_abs_diff_eq!(step_size(2., 0.9), 1.99 / 18., epsilon = 1e-12);
        assert_abs_diff_eq!(step_size(0., 0.5), 1.99);
    }

    #[test]
    fn rejects_invalid_inputs() {
        let X = Array2::<f64>::eye(3);
        let y = array![1., 2., 3.];

        assert!(matches!(
            Setup::new(X.view(), array![1., 2.].view(), &Penalty::L1, 0.8),
            Err(GmcError::ShapeMismatch { expected: 3, got: 2 })
        ));
        assert!(matches!(
            Setup::new(Array2::<f64>::zeros((3, 0)).view(), y.view(), &Penalty::L1, 0.8),
            Err(GmcError::EmptyDesign { .. })
        ));
        for &gamma in &[0., 1., -0.5, 1.5, std::f64::NAN] {
            assert!(matches!(
                Setup::new(X.view(), y.view(), &Penalty::L1, gamma),
                Err(GmcError::InvalidParameter { name: "gamma", .. })
            ));
        }
        let penalty = Penalty::GroupL2(GroupPartition::new(vec![vec![0, 1], vec![3]]));
        assert!(matches!(
            Setup::new(X.view(), y.view(), &penalty, 0.8),
            Err(GmcError::InvalidGroups(_))
        ));
    }

    #[test]
    fn lipschitz_of_random_design() {
        use ndarray_rand::rand_distr::Normal as Gaussian;
        use ndarray_rand::RandomExt;

        let X = Array::random((30, 8), Gaussian::new(0., 1.).unwrap());
        let rho = lipschitz(X.view()).unwrap();
        // rho bounds the Rayleigh quotient of X^T X
        let G = X.t().dot(&X);
        for j in 0..8 {
            assert!(G[[j, j]] <= rho * (1. + 1e-12));
        }
        assert!(rho <= G.diag().sum() * (1. + 1e-12));
    }
}
