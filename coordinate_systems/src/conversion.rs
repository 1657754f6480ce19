use crate::coordinate_system::CoordinateSystem;
use crate::point::{AppliedPoint, Point};
use crate::scalar_conversion::express_base_scalars;
use crate::vector::VectorExpr;
use crate::vector_conversion::express_base_vectors;
use crate::CoordinateSystemError;
use tracing::{debug, trace};

/// Re-expresses `point` in `new_system`.
///
/// Each new coordinate is the new base scalar written in terms of the old system, evaluated at
/// the point's stored coordinates. Symbolic points have no coordinates and are returned as is.
///
/// # Arguments
///
/// * `point` - The point to convert.
/// * `new_system` - The target coordinate system.
///
/// # Returns
///
/// An applied point of `new_system` with simplified coordinates.
pub fn convert_point(point: &Point, new_system: &CoordinateSystem) -> Result<Point, CoordinateSystemError> {
    let Point::Applied(applied) = point else {
        return Ok(point.clone());
    };
    let mapping = express_base_scalars(new_system, applied.system())?;
    let old_values = applied.mapping();
    let mut coordinates = Vec::with_capacity(3);
    for scalar in new_system.base_scalars() {
        let expression = mapping
            .get(scalar)
            .ok_or_else(|| CoordinateSystemError::ForeignScalar {
                scalar: scalar.to_string(),
                system: new_system.to_string(),
            })?;
        let value = expression.subs(&old_values).simplify();
        trace!(%scalar, %value, "converted coordinate");
        coordinates.push(value);
    }
    Ok(Point::Applied(AppliedPoint::new(coordinates, new_system)?))
}

/// Re-expresses `vector`, applied at `old_point`, in the basis of `new_system` at the same
/// physical location.
///
/// The point is converted first, because the new basis depends on the new coordinates. The
/// old base vectors are then replaced by their images in the new basis and the new point's
/// coordinates are substituted into the result. A vector at a symbolic point is returned
/// unchanged.
///
/// # Arguments
///
/// * `vector` - A vector expressed in the basis of `old_point`'s system.
/// * `old_point` - Where the vector is applied.
/// * `new_system` - The system whose basis the result is written in.
///
/// # Returns
///
/// The simplified vector in the basis of `new_system` at the converted point.
pub fn convert_vector(
    vector: &VectorExpr,
    old_point: &Point,
    new_system: &CoordinateSystem,
) -> Result<VectorExpr, CoordinateSystemError> {
    let Point::Applied(applied) = old_point else {
        return Ok(vector.clone());
    };
    let new_point = convert_point(old_point, new_system)?;
    debug!(point = %old_point, converted = %new_point, "converting vector");

    let mapping = express_base_vectors(applied.system(), new_system, Some(old_point), Some(&new_point))?;
    let new_values = match &new_point {
        Point::Applied(point) => point.mapping(),
        Point::Symbolic(_) => Default::default(),
    };
    Ok(vector
        .subs_vectors(&mapping)
        .subs_scalars(&new_values)
        .simplify())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    use symbolic::{EquivalenceSettings, Expr};

    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    fn systems() -> [CoordinateSystem; 3] {
        [
            CoordinateSystem::cartesian(),
            CoordinateSystem::cylindrical(),
            CoordinateSystem::spherical(),
        ]
    }

    /// (x=-1, y=0, z=-1) with j + 2k becomes (rho=1, phi=pi, z=-1) with -e_phi + 2e_z.
    #[test]
    fn test_cartesian_to_cylindrical_example() {
        init_tracing();
        let cartesian = CoordinateSystem::cartesian();
        let cylindrical = CoordinateSystem::cylindrical();
        let point = Point::applied([-1.0, 0.0, -1.0], &cartesian).unwrap();
        let [_, j, k] = cartesian.base_vectors(None).unwrap();
        let vector = j + k * 2.0;

        let converted_point = convert_point(&point, &cylindrical).unwrap();
        let expected_point = Point::applied([1.0, PI, -1.0], &cylindrical).unwrap();
        assert_eq!(converted_point, expected_point);

        let converted = convert_vector(&vector, &point, &cylindrical).unwrap();
        let [_, e_phi, e_z] = cylindrical.base_vectors(Some(&expected_point)).unwrap();
        let expected = -e_phi + e_z * 2.0;
        assert_eq!(converted, expected);
        assert_eq!(converted.to_string(), "-e_phi + 2*e_z");
    }

    #[test]
    fn test_cartesian_ones_through_spherical() {
        let cartesian = CoordinateSystem::cartesian();
        let point = Point::applied([1.0, 1.0, 1.0], &cartesian).unwrap();
        let spherical = convert_point(&point, &CoordinateSystem::spherical()).unwrap();
        let back = convert_point(&spherical, &cartesian).unwrap();
        assert_eq!(back, point);

        let Point::Applied(applied) = &spherical else {
            panic!("expected an applied point");
        };
        let settings = EquivalenceSettings::default();
        assert!(applied.coordinates()[0].equivalent(&Expr::number(3.0).sqrt(), &settings));
        assert!(applied.coordinates()[2].equivalent(&Expr::number(PI / 4.0), &settings));
    }

    /// Converting a vector old -> new -> old returns the original vector for every pair of
    /// systems, and the converted vector describes the same Cartesian arrow.
    #[test]
    fn test_vector_round_trip_for_every_pair() {
        init_tracing();
        let settings = EquivalenceSettings::default();
        for old in systems() {
            for new in systems() {
                let point = Point::applied([1.5, 0.8, 2.1], &old).unwrap();
                let [a, b, c] = old.base_vectors(Some(&point)).unwrap();
                let vector = a * 2.0 - b * 0.5 + c * 3.0;

                let converted = convert_vector(&vector, &point, &new).unwrap();
                assert!(converted.equivalent(&vector, &settings).unwrap(), "{old} -> {new}");

                let new_point = convert_point(&point, &new).unwrap();
                let back = convert_vector(&converted, &new_point, &old).unwrap();
                let difference = (back - vector.clone()).simplify();
                assert!(
                    difference.norm_squared().unwrap().equivalent(&Expr::zero(), &settings),
                    "{old} -> {new} -> {old}: {difference}"
                );
            }
        }
    }

    #[test]
    fn test_symbolic_point_is_unchanged() {
        let point = Point::symbolic("P", None);
        let converted = convert_point(&point, &CoordinateSystem::spherical()).unwrap();
        assert_eq!(converted, point);

        let [e_r, ..] = CoordinateSystem::spherical().base_vectors(Some(&point)).unwrap();
        let vector = e_r * 2.0;
        let unchanged = convert_vector(&vector, &point, &CoordinateSystem::cartesian()).unwrap();
        assert_eq!(unchanged, vector);
    }

    #[test]
    fn test_symbolic_coordinates_convert_symbolically() {
        let cylindrical = CoordinateSystem::cylindrical();
        let [rho, phi, z] = cylindrical.base_scalar_exprs();
        let point = Point::applied([rho.clone(), phi.clone(), z.clone()], &cylindrical).unwrap();
        let converted = convert_point(&point, &CoordinateSystem::cartesian()).unwrap();
        let Point::Applied(applied) = converted else {
            panic!("expected an applied point");
        };
        assert_eq!(applied.coordinates()[0], (&rho * phi.cos()).simplify());
        assert_eq!(applied.coordinates()[2], z);
    }
}
