//! The `gmc-optimize` crate computes sparse least-squares estimates under
//! the generalized minimax-concave (GMC) penalty, built on `ndarray`.
//!
//! The GMC penalty is non-convex, yet keeps the overall least-squares
//! problem convex, so it avoids the systematic shrinkage bias of the
//! Lasso without giving up a unique global solution. The estimate is
//! found as a saddle point of a convex-concave function, by a
//! forward-backward fixed-point iteration that can be accelerated with:
//! - Nesterov momentum with adaptive restart
//! - Inertial extrapolation
//! - Type-II Anderson acceleration
//!
//! Both the plain L1 penalty and the group L2 penalty (over a user
//! supplied partition of the coefficients) are supported.
//!
//! ```ignore
//! use gmc_optimize::{gmc, GmcOptions};
//! use ndarray::prelude::*;
//!
//! let X = array![[1., 0.], [0., 1.], [1., 1.]];
//! let y = array![1., 0., 1.];
//! let res = gmc(y.view(), X.view(), 0.5, &GmcOptions::default()).unwrap();
//! println!("{} after {} iterations", res.x, res.iterations);
//! ```

#![cfg_attr(all(rustc_nightly, test), feature(test))]
#[cfg(all(rustc_nightly, test))]
extern crate test;

#[cfg(test)]
extern crate intel_mkl_src;

pub mod error;
pub mod fixed;
pub mod gmc;
pub mod linop;
pub mod prox;

pub use error::{GmcError, Result};
pub use fixed::Acceleration;
pub use gmc::{gmc, GmcOptions, GmcResult};
pub use prox::{GroupPartition, Penalty};
