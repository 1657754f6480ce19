use crate::equivalence::EquivalenceSettings;
use crate::expr::Expr;
use crate::symbol::Symbol;
use nalgebra::Matrix3;
use std::collections::HashMap;
use std::ops::Mul;

/// A 3x3 matrix of symbolic expressions.
#[derive(Clone, Debug, PartialEq)]
pub struct SymbolicMatrix(pub Matrix3<Expr>);

impl SymbolicMatrix {
    pub fn from_fn(mut f: impl FnMut(usize, usize) -> Expr) -> Self {
        Self(Matrix3::from_fn(|r, c| f(r, c)))
    }

    /// Builds the matrix from its three columns.
    pub fn from_columns(columns: &[[Expr; 3]; 3]) -> Self {
        Self::from_fn(|r, c| columns[c][r].clone())
    }

    pub fn identity() -> Self {
        Self::from_fn(|r, c| if r == c { Expr::one() } else { Expr::zero() })
    }

    pub fn get(&self, row: usize, column: usize) -> &Expr {
        &self.0[(row, column)]
    }

    pub fn column(&self, column: usize) -> [Expr; 3] {
        [
            self.0[(0, column)].clone(),
            self.0[(1, column)].clone(),
            self.0[(2, column)].clone(),
        ]
    }

    pub fn transpose(&self) -> Self {
        Self::from_fn(|r, c| self.0[(c, r)].clone())
    }

    pub fn map(&self, f: impl Fn(&Expr) -> Expr) -> Self {
        Self::from_fn(|r, c| f(&self.0[(r, c)]))
    }

    pub fn mul_vector(&self, v: &[Expr; 3]) -> [Expr; 3] {
        let row = |r: usize| {
            Expr::sum(
                (0..3)
                    .map(|c| &self.0[(r, c)] * &v[c])
                    .collect(),
            )
        };
        [row(0), row(1), row(2)]
    }

    /// Determinant by cofactor expansion along the first row, not simplified.
    pub fn determinant(&self) -> Expr {
        let m = |r: usize, c: usize| &self.0[(r, c)];
        let minor = |r1: usize, r2: usize, c1: usize, c2: usize| {
            m(r1, c1) * m(r2, c2) - m(r1, c2) * m(r2, c1)
        };
        m(0, 0) * minor(1, 2, 1, 2) - m(0, 1) * minor(1, 2, 0, 2) + m(0, 2) * minor(1, 2, 0, 1)
    }

    pub fn simplify(&self) -> Self {
        self.map(Expr::simplify)
    }

    pub fn diff(&self, symbol: &Symbol) -> Self {
        self.map(|e| e.diff(symbol))
    }

    pub fn subs(&self, map: &HashMap<Symbol, Expr>) -> Self {
        self.map(|e| e.subs(map))
    }

    /// Element-wise `Expr::equivalent`.
    pub fn equivalent(&self, other: &SymbolicMatrix, settings: &EquivalenceSettings) -> bool {
        (0..3).all(|r| (0..3).all(|c| self.0[(r, c)].equivalent(&other.0[(r, c)], settings)))
    }
}

impl Mul<&SymbolicMatrix> for &SymbolicMatrix {
    type Output = SymbolicMatrix;
    fn mul(self, rhs: &SymbolicMatrix) -> SymbolicMatrix {
        SymbolicMatrix::from_fn(|r, c| {
            Expr::sum((0..3).map(|k| &self.0[(r, k)] * &rhs.0[(k, c)]).collect())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::Dimension;

    fn rotation_about_z(angle: &Expr) -> SymbolicMatrix {
        SymbolicMatrix::from_columns(&[
            [angle.cos(), angle.sin(), Expr::zero()],
            [-angle.sin(), angle.cos(), Expr::zero()],
            [Expr::zero(), Expr::zero(), Expr::one()],
        ])
    }

    #[test]
    fn test_rotation_is_orthonormal() {
        let phi = Expr::from(Symbol::new("phi", Dimension::ANGLE));
        let rotation = rotation_about_z(&phi);
        let product = (&rotation.transpose() * &rotation).simplify();
        assert_eq!(product, SymbolicMatrix::identity());
        assert!(rotation.determinant().simplify().is_one());
    }

    #[test]
    fn test_mul_vector() {
        let phi = Expr::from(Symbol::new("phi", Dimension::ANGLE));
        let rotated = rotation_about_z(&phi).mul_vector(&[Expr::one(), Expr::zero(), Expr::zero()]);
        assert_eq!(rotated[0].simplify(), phi.cos());
        assert_eq!(rotated[1].simplify(), phi.sin());
        assert!(rotated[2].simplify().is_zero());
    }

    #[test]
    fn test_column_and_transpose() {
        let m = SymbolicMatrix::from_fn(|r, c| Expr::number((3 * r + c) as f64));
        assert_eq!(m.column(1), [Expr::number(1.0), Expr::number(4.0), Expr::number(7.0)]);
        assert_eq!(m.transpose().get(0, 2), &Expr::number(6.0));
    }
}
