//! Abstract Linear Operators
//! building upon ndarray_linalg::operator

#![allow(non_snake_case)]

use ndarray::prelude::*;
use ndarray::{Data, DataMut, DataOwned, NdFloat};
pub use ndarray_linalg::operator::LinearOperator;
use ndarray_linalg::Scalar;

/// The normal operator $`X^TX`$ of a design matrix $`X \in \mathbb{R}^{n \times p}`$
///
/// Both variants apply the same map. Which one is cheaper depends on the
/// shape of $`X`$, so [`Normal::new`] picks once at construction:
/// - __Wide__ ($`p \geq n`$): matrix free, $`X^T(Xz)`$ costs $`O(np)`$
///   and never forms the $`p \times p`$ Gram matrix.
/// - __Tall__ ($`p < n`$): precomputed Gram matrix, $`(X^TX)z`$ costs $`O(p^2)`$.
#[derive(Debug, Clone)]
pub enum Normal<'a, A> {
    Wide(ArrayView2<'a, A>),
    Tall(Array2<A>),
}

impl<'a, A: NdFloat> Normal<'a, A> {
    /// Chooses the cheaper representation from the shape of `X`
    pub fn new(X: ArrayView2<'a, A>) -> Normal<'a, A> {
        if X.ncols() >= X.nrows() {
            Normal::wide(X)
        } else {
            Normal::tall(X)
        }
    }

    #[must_use]
    pub fn wide(X: ArrayView2<'a, A>) -> Normal<'a, A> {
        Normal::Wide(X)
    }

    #[must_use]
    pub fn tall(X: ArrayView2<'a, A>) -> Normal<'a, A> {
        Normal::Tall(X.t().dot(&X))
    }

    /// Dimension $`p`$ of the domain (and range)
    pub fn dim(&self) -> usize {
        match self {
            Normal::Wide(X) => X.ncols(),
            Normal::Tall(G) => G.nrows(),
        }
    }

    pub fn is_wide(&self) -> bool {
        match self {
            Normal::Wide(_) => true,
            Normal::Tall(_) => false,
        }
    }
}

impl<'a, A> LinearOperator for Normal<'a, A>
where
    A: NdFloat + Scalar,
{
    type Elem = A;

    /// Apply operator out-place
    #[inline]
    fn apply<S>(&self, a: &ArrayBase<S, Ix1>) -> Array1<S::Elem>
    where
        S: Data<Elem = Self::Elem>,
    {
        match self {
            Normal::Wide(X) => X.t().dot(&X.dot(a)),
            Normal::Tall(G) => G.dot(a),
        }
    }

    /// Apply operator in-place
    #[inline]
    fn apply_mut<S>(&self, a: &mut ArrayBase<S, Ix1>)
    where
        S: DataMut<Elem = Self::Elem>,
    {
        let b = self.apply(&*a);
        a.assign(&b);
    }

    /// Apply operator with move
    #[inline]
    fn apply_into<S>(&self, mut a: ArrayBase<S, Ix1>) -> ArrayBase<S, Ix1>
    where
        S: DataOwned<Elem = Self::Elem> + DataMut,
    {
        self.apply_mut(&mut a);
        a
    }

    /// Apply operator to matrix out-place
    #[inline]
    fn apply2<S>(&self, a: &ArrayBase<S, Ix2>) -> Array2<S::Elem>
    where
        S: Data<Elem = Self::Elem>,
    {
        match self {
            Normal::Wide(X) => X.t().dot(&X.dot(a)),
            Normal::Tall(G) => G.dot(a),
        }
    }

    /// Apply operator to matrix in-place
    #[inline]
    fn apply2_mut<S>(&self, a: &mut ArrayBase<S, Ix2>)
    where
        S: DataMut<Elem = Self::Elem>,
    {
        let b = self.apply2(&*a);
        a.assign(&b);
    }

    /// Apply operator to matrix with move
    #[inline]
    fn apply2_into<S>(&self, mut a: ArrayBase<S, Ix2>) -> ArrayBase<S, Ix2>
    where
        S: DataOwned<Elem = Self::Elem> + DataMut,
    {
        self.apply2_mut(&mut a);
        a
    }
}
