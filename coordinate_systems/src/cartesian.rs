use crate::coordinate_system::{Geometry, SystemKind};
use nalgebra::Vector3;
use symbolic::{Dimension, Expr, SymbolicMatrix};

/// Rectangular coordinates `(x, y, z)` with the constant basis `(i, j, k)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Cartesian;

impl Geometry for Cartesian {
    fn kind(&self) -> SystemKind {
        SystemKind::Cartesian
    }

    fn scalar_names(&self) -> [&'static str; 3] {
        ["x", "y", "z"]
    }

    fn vector_names(&self) -> [&'static str; 3] {
        ["i", "j", "k"]
    }

    fn scalar_dimensions(&self) -> [Dimension; 3] {
        [Dimension::LENGTH; 3]
    }

    fn is_position_independent(&self) -> bool {
        true
    }

    fn to_cartesian(&self, q: &[Expr; 3]) -> [Expr; 3] {
        q.clone()
    }

    fn from_cartesian(&self, p: &[Expr; 3]) -> [Expr; 3] {
        p.clone()
    }

    /// Converts a numeric `Cartesian` coordinate triple to Cartesian coordinates.
    ///
    /// # Arguments
    ///
    /// * `q` - The coordinates in base scalar order.
    ///
    /// # Returns
    ///
    /// The Cartesian `(x, y, z)` position.
    fn to_cartesian_f64(&self, q: &Vector3<f64>) -> Vector3<f64> {
        *q
    }

    /// Converts a Cartesian position to a numeric `Cartesian` coordinate triple.
    ///
    /// # Arguments
    ///
    /// * `p` - The Cartesian `(x, y, z)` position.
    ///
    /// # Returns
    ///
    /// The coordinates in base scalar order.
    fn from_cartesian_f64(&self, p: &Vector3<f64>) -> Vector3<f64> {
        *p
    }

    fn lame_coefficients(&self, _q: &[Expr; 3]) -> Option<[Expr; 3]> {
        Some([Expr::one(), Expr::one(), Expr::one()])
    }

    fn base_vector_matrix(&self, _q: &[Expr; 3]) -> Option<SymbolicMatrix> {
        Some(SymbolicMatrix::identity())
    }
}
