//! Accelerated Fixed-Point Iteration
//!
//! Finds a fixed point $`x_* = T(x_*)`$ of an averaged nonexpansive
//! operator $`T`$ by repeated application, optionally accelerated.
//! The operator is treated as a black box: no differentiability or
//! strong convexity is assumed.
//!
//! Every scheme records one residual per iteration,
//! $`\|x_k - x_{k-1}\|_2`$, and stops early once it drops below the
//! tolerance (if early termination is enabled). Running out of
//! iterations is not an error; the last iterate is returned together
//! with the residual history so that the caller can judge convergence.

use std::fmt;
use std::str::FromStr;

use log::debug;
use ndarray::prelude::*;
use ndarray::{ArrayView, NdFloat};

use crate::error::{invalid, GmcError, Result};

mod plain;
pub use plain::*;
mod nesterov;
pub use nesterov::*;
mod inertia;
pub use inertia::*;
mod anderson;
pub use anderson::*;

/// Acceleration scheme of the fixed-point iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceleration {
    /// Plain repeated application, $`x_{k+1} = T(x_k)`$
    Original,
    /// Nesterov momentum with adaptive restart
    Nesterov,
    /// Fixed-weight inertial extrapolation from the last two iterates
    Inertia,
    /// Type-II Anderson acceleration over a sliding window
    Anderson,
}

impl Default for Acceleration {
    fn default() -> Self {
        Acceleration::Nesterov
    }
}

impl FromStr for Acceleration {
    type Err = GmcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "original" | "plain" => Ok(Acceleration::Original),
            "nesterov" => Ok(Acceleration::Nesterov),
            "inertia" | "inertial" => Ok(Acceleration::Inertia),
            "aa2" | "anderson" => Ok(Acceleration::Anderson),
            _ => Err(GmcError::UnknownAcceleration(s.to_string())),
        }
    }
}

impl fmt::Display for Acceleration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Acceleration::Original => "original",
            Acceleration::Nesterov => "nesterov",
            Acceleration::Inertia => "inertia",
            Acceleration::Anderson => "aa2",
        };
        f.write_str(name)
    }
}

/// Options shared by all fixed-point schemes
#[derive(Debug, Clone)]
pub struct FixedPointOptions<S> {
    /// Iteration budget
    pub max_iter: usize,
    /// Stop once the residual drops below this value
    pub tol: S,
    /// If false, always run the full budget
    pub early_termination: bool,
    /// Window length of Anderson acceleration
    pub mem_size: usize,
    /// Log every iteration at debug level
    pub verbose: bool,
    /// Extrapolation weight of inertial acceleration, in [0, 1)
    pub inertia: S,
}

impl<S: NdFloat> Default for FixedPointOptions<S> {
    fn default() -> Self {
        FixedPointOptions {
            max_iter: 10_000,
            tol: S::from(1e-5).unwrap(),
            early_termination: true,
            mem_size: 5,
            verbose: false,
            inertia: S::from(0.3).unwrap(),
        }
    }
}

impl<S: NdFloat> FixedPointOptions<S> {
    pub fn validate(&self) -> Result<()> {
        if self.max_iter == 0 {
            return Err(invalid("max_iter", "must be positive"));
        }
        if !(self.tol > S::zero()) {
            return Err(invalid("tol", format!("must be positive, got {}", self.tol)));
        }
        if self.mem_size == 0 {
            return Err(invalid("mem_size", "must be positive"));
        }
        if !(self.inertia >= S::zero() && self.inertia < S::one()) {
            return Err(invalid(
                "inertia",
                format!("must lie in [0, 1), got {}", self.inertia),
            ));
        }
        Ok(())
    }
}

/// Outcome of a fixed-point iteration
#[derive(Debug, Clone)]
pub struct FixedPointResult<S> {
    /// Last iterate
    pub x: Array1<S>,
    /// Number of operator applications performed
    pub iterations: usize,
    /// One residual $`\|x_k - x_{k-1}\|_2`$ per iteration
    pub residuals: Vec<S>,
}

/// Do nothing function for optional user callback (returns false)
#[allow(clippy::needless_pass_by_value)]
pub fn nop<T, D>(_x: ArrayView<T, D>, _itr: usize) -> bool {
    false
}

/// Runs the fixed-point iteration of `op` from `x0` with the chosen acceleration
///
/// The `callback` is evaluated at `(x0, 0)` and then after each iteration.
/// If it returns true, the iteration terminates early.
pub fn fixed_point(
    op: impl Fn(ArrayView1<f64>) -> Array1<f64>,
    x0: ArrayView1<f64>,
    acceleration: Acceleration,
    options: &FixedPointOptions<f64>,
    callback: impl FnMut(ArrayView1<f64>, usize) -> bool,
) -> FixedPointResult<f64> {
    match acceleration {
        Acceleration::Original => plain(op, x0, options, callback),
        Acceleration::Nesterov => nesterov(op, x0, options, callback),
        Acceleration::Inertia => inertial(op, x0, options, callback),
        Acceleration::Anderson => anderson(op, x0, options, callback),
    }
}

/// Euclidean distance between two iterates
pub(crate) fn distance<S: NdFloat>(a: ArrayView1<S>, b: ArrayView1<S>) -> S {
    a.iter()
        .zip(b.iter())
        .fold(S::zero(), |acc, (&ai, &bi)| acc + (ai - bi) * (ai - bi))
        .sqrt()
}

/// Residual bookkeeping shared by the schemes
pub(crate) struct Monitor<'o, S> {
    options: &'o FixedPointOptions<S>,
    scheme: Acceleration,
    residuals: Vec<S>,
    converged: bool,
}

impl<'o, S: NdFloat> Monitor<'o, S> {
    pub(crate) fn new(options: &'o FixedPointOptions<S>, scheme: Acceleration) -> Self {
        Monitor {
            options,
            scheme,
            residuals: Vec::with_capacity(options.max_iter.min(1 << 16)),
            converged: false,
        }
    }

    /// Records the residual of iteration `iter`, returns true once converged
    pub(crate) fn record(&mut self, residual: S, iter: usize) -> bool {
        if self.options.verbose {
            debug!("{} iter {}: residual = {:e}", self.scheme, iter, residual);
        }
        self.residuals.push(residual);
        self.converged = self.options.early_termination && residual < self.options.tol;
        self.converged
    }

    pub(crate) fn verbose(&self) -> bool {
        self.options.verbose
    }

    pub(crate) fn finish(self, x: Array1<S>) -> FixedPointResult<S> {
        let iterations = self.residuals.len();
        if !self.converged && iterations == self.options.max_iter {
            debug!(
                "{}: iteration budget of {} exhausted",
                self.scheme, self.options.max_iter
            );
        }
        FixedPointResult {
            x,
            iterations,
            residuals: self.residuals,
        }
    }
}
