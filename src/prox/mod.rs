//! Proximal Operators of Sparsity Penalties
//!
//! The GMC saddle-point iteration resolves its non-smooth part through
//! the proximal operator of a sparsity penalty $`P`$,
//! ```math
//! \mathrm{prox}_{TP}(z) = \mathrm{arg}\!\min_x \tfrac12 \|x - z\|_2^2 + T P(x)
//! ```
//! which for the L1 norm is elementwise soft-thresholding, and for the
//! (size weighted) group L2 norm is group soft-thresholding.
//!
//! The choice of penalty is made once with [`Penalty`], which also carries
//! the dual norm used to find the smallest regularization zeroing the solution.

mod soft;
pub use soft::*;

mod group;
pub use group::*;

mod penalty;
pub use penalty::*;
