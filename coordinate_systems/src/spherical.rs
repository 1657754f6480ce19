use crate::coordinate_system::{Geometry, SystemKind};
use nalgebra::Vector3;
use std::f64::consts::PI;
use symbolic::{Dimension, Domain, Expr, SymbolicMatrix};

/// Spherical coordinates `(r, theta, phi)`: radius, inclination from the +z axis, and
/// azimuth measured from the x axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Spherical;

impl Geometry for Spherical {
    fn kind(&self) -> SystemKind {
        SystemKind::Spherical
    }

    fn scalar_names(&self) -> [&'static str; 3] {
        ["r", "theta", "phi"]
    }

    fn vector_names(&self) -> [&'static str; 3] {
        ["e_r", "e_theta", "e_phi"]
    }

    fn scalar_dimensions(&self) -> [Dimension; 3] {
        [Dimension::LENGTH, Dimension::ANGLE, Dimension::ANGLE]
    }

    fn scalar_domains(&self) -> [Domain; 3] {
        [
            Domain::NonNegative,
            Domain::Interval { low: 0.0, high: PI },
            Domain::Interval { low: -PI, high: PI },
        ]
    }

    fn to_cartesian(&self, q: &[Expr; 3]) -> [Expr; 3] {
        let [r, theta, phi] = q;
        [
            r * theta.sin() * phi.cos(),
            r * theta.sin() * phi.sin(),
            r * theta.cos(),
        ]
    }

    fn from_cartesian(&self, p: &[Expr; 3]) -> [Expr; 3] {
        let [x, y, z] = p;
        let planar = x.powi(2) + y.powi(2);
        [
            (&planar + z.powi(2)).sqrt(),
            planar.sqrt().atan2(z),
            y.atan2(x),
        ]
    }

    /// Converts a numeric `Spherical` coordinate triple to Cartesian coordinates.
    ///
    /// # Arguments
    ///
    /// * `q` - The coordinates in base scalar order.
    ///
    /// # Returns
    ///
    /// The Cartesian `(x, y, z)` position.
    fn to_cartesian_f64(&self, q: &Vector3<f64>) -> Vector3<f64> {
        let (radius, inclination, azimuth) = (q[0], q[1], q[2]);
        Vector3::new(
            radius * inclination.sin() * azimuth.cos(),
            radius * inclination.sin() * azimuth.sin(),
            radius * inclination.cos(),
        )
    }

    /// Converts a Cartesian position to a numeric `Spherical` coordinate triple.
    ///
    /// # Arguments
    ///
    /// * `p` - The Cartesian `(x, y, z)` position.
    ///
    /// # Returns
    ///
    /// The coordinates in base scalar order.
    fn from_cartesian_f64(&self, p: &Vector3<f64>) -> Vector3<f64> {
        let planar = (p[0].powi(2) + p[1].powi(2)).sqrt();
        let radius = (planar.powi(2) + p[2].powi(2)).sqrt();
        Vector3::new(radius, planar.atan2(p[2]), p[1].atan2(p[0]))
    }

    fn lame_coefficients(&self, q: &[Expr; 3]) -> Option<[Expr; 3]> {
        let [r, theta, _] = q;
        Some([Expr::one(), r.clone(), (r * theta.sin()).simplify()])
    }

    fn base_vector_matrix(&self, q: &[Expr; 3]) -> Option<SymbolicMatrix> {
        let [_, theta, phi] = q;
        Some(SymbolicMatrix::from_columns(&[
            [theta.sin() * phi.cos(), theta.sin() * phi.sin(), theta.cos()],
            [theta.cos() * phi.cos(), theta.cos() * phi.sin(), -theta.sin()],
            [-phi.sin(), phi.cos(), Expr::zero()],
        ]))
    }
}
