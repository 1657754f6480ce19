use crate::coordinate_system::{Geometry, SystemKind};
use nalgebra::Vector3;
use std::f64::consts::PI;
use symbolic::{Dimension, Domain, Expr, SymbolicMatrix};

/// Cylindrical coordinates `(rho, phi, z)`: radial distance from the z axis, azimuth
/// measured from the x axis, and height.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Cylindrical;

impl Geometry for Cylindrical {
    fn kind(&self) -> SystemKind {
        SystemKind::Cylindrical
    }

    fn scalar_names(&self) -> [&'static str; 3] {
        ["rho", "phi", "z"]
    }

    fn vector_names(&self) -> [&'static str; 3] {
        ["e_rho", "e_phi", "e_z"]
    }

    fn scalar_dimensions(&self) -> [Dimension; 3] {
        [Dimension::LENGTH, Dimension::ANGLE, Dimension::LENGTH]
    }

    fn scalar_domains(&self) -> [Domain; 3] {
        [
            Domain::NonNegative,
            Domain::Interval { low: -PI, high: PI },
            Domain::Real,
        ]
    }

    fn to_cartesian(&self, q: &[Expr; 3]) -> [Expr; 3] {
        let [rho, phi, z] = q;
        [rho * phi.cos(), rho * phi.sin(), z.clone()]
    }

    fn from_cartesian(&self, p: &[Expr; 3]) -> [Expr; 3] {
        let [x, y, z] = p;
        [(x.powi(2) + y.powi(2)).sqrt(), y.atan2(x), z.clone()]
    }

    /// Converts a numeric `Cylindrical` coordinate triple to Cartesian coordinates.
    ///
    /// # Arguments
    ///
    /// * `q` - The coordinates in base scalar order.
    ///
    /// # Returns
    ///
    /// The Cartesian `(x, y, z)` position.
    fn to_cartesian_f64(&self, q: &Vector3<f64>) -> Vector3<f64> {
        let (radius, azimuth, height) = (q[0], q[1], q[2]);
        Vector3::new(radius * azimuth.cos(), radius * azimuth.sin(), height)
    }

    /// Converts a Cartesian position to a numeric `Cylindrical` coordinate triple.
    ///
    /// # Arguments
    ///
    /// * `p` - The Cartesian `(x, y, z)` position.
    ///
    /// # Returns
    ///
    /// The coordinates in base scalar order.
    fn from_cartesian_f64(&self, p: &Vector3<f64>) -> Vector3<f64> {
        let radius = (p[0].powi(2) + p[1].powi(2)).sqrt();
        let azimuth = p[1].atan2(p[0]);
        Vector3::new(radius, azimuth, p[2])
    }

    fn lame_coefficients(&self, q: &[Expr; 3]) -> Option<[Expr; 3]> {
        Some([Expr::one(), q[0].clone(), Expr::one()])
    }

    fn base_vector_matrix(&self, q: &[Expr; 3]) -> Option<SymbolicMatrix> {
        let phi = &q[1];
        Some(SymbolicMatrix::from_columns(&[
            [phi.cos(), phi.sin(), Expr::zero()],
            [-phi.sin(), phi.cos(), Expr::zero()],
            [Expr::zero(), Expr::zero(), Expr::one()],
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate_system::CoordinateSystem;
    use approx::assert_abs_diff_eq;
    use symbolic::{EquivalenceSettings, Symbol};

    const TOL: f64 = 1e-12;

    #[test]
    fn test_round_trip_through_cartesian() {
        let system = CoordinateSystem::cylindrical();
        let q = system.base_scalar_exprs();
        let back = system.from_cartesian(&system.to_cartesian(&q));
        let settings = EquivalenceSettings::default();
        for (recovered, original) in back.iter().zip(&q) {
            assert!(recovered.equivalent(original, &settings), "{recovered} != {original}");
        }
    }

    #[test]
    fn test_numeric_round_trip() {
        let q = Vector3::new(2.0, 3.0 * PI / 4.0, -1.5);
        let p = Cylindrical.to_cartesian_f64(&q);
        assert_abs_diff_eq!(p[0], -2.0_f64.sqrt(), epsilon = TOL);
        assert_abs_diff_eq!(p[1], 2.0_f64.sqrt(), epsilon = TOL);
        assert_abs_diff_eq!(Cylindrical.from_cartesian_f64(&p), q, epsilon = TOL);
    }

    #[test]
    fn test_lame_coefficients_and_jacobian() {
        let system = CoordinateSystem::cylindrical();
        let q = system.base_scalar_exprs();
        let [h1, h2, h3] = system.lame_coefficients(&q);
        assert!(h1.is_one());
        assert_eq!(h2, q[0]);
        assert!(h3.is_one());
        assert!(system
            .jacobian(&q)
            .equivalent(&q[0], &EquivalenceSettings::default()));
    }

    #[test]
    fn test_base_vector_matrix_is_a_rotation() {
        let system = CoordinateSystem::cylindrical();
        let q = system.base_scalar_exprs();
        let m = system.base_vector_matrix(&q);
        assert_eq!((&m.transpose() * &m).simplify(), SymbolicMatrix::identity());
        assert!(m.determinant().simplify().is_one());
    }

    /// Along a trajectory, the radial unit vector turns at the azimuth rate:
    /// d(e_rho)/dt = phi' e_phi and d(e_phi)/dt = -phi' e_rho.
    #[test]
    fn test_base_vector_time_derivative() {
        let system = CoordinateSystem::cylindrical();
        let t = Symbol::new("t", Dimension::TIME);
        let [rho, phi, z] = system.base_scalars();
        let trajectory = [
            Expr::applied(rho, &t),
            Expr::applied(phi, &t),
            Expr::applied(z, &t),
        ];
        let derivative = system.base_vector_matrix_time_derivative(&trajectory, &t);

        let angle = &trajectory[1];
        let rate = angle.diff(&t);
        let expected = SymbolicMatrix::from_columns(&[
            [-&rate * angle.sin(), &rate * angle.cos(), Expr::zero()],
            [-&rate * angle.cos(), -&rate * angle.sin(), Expr::zero()],
            [Expr::zero(), Expr::zero(), Expr::zero()],
        ]);
        assert!(derivative.equivalent(&expected, &EquivalenceSettings::default()));
    }
}
