use crate::point::Point;
use crate::CoordinateSystemError;
use std::fmt;
use symbolic::{Expr, Symbol};

/// The value of base scalar `scalar` at `point`.
///
/// For an applied point this is the stored coordinate. For a symbolic point it is a fresh
/// scalar named after both, such as `x_PT1`, whose identity is fixed by the pair so that
/// repeated lookups agree.
#[derive(Clone, Debug, PartialEq)]
pub struct PointCoordinate {
    point: Point,
    scalar: Symbol,
}

impl PointCoordinate {
    /// Resolves the coordinate immediately.
    pub fn new(point: &Point, scalar: &Symbol) -> Result<Expr, CoordinateSystemError> {
        match point {
            Point::Symbolic(p) => {
                let name = format!("{scalar}_{p}");
                Ok(Expr::Symbol(Symbol::scoped(&p.id(), scalar, &name)))
            }
            Point::Applied(p) => p.get(scalar).cloned(),
        }
    }

    /// Keeps the lookup unevaluated until [`PointCoordinate::resolve`] is called.
    pub fn deferred(point: Point, scalar: Symbol) -> Self {
        Self { point, scalar }
    }

    pub fn point(&self) -> &Point {
        &self.point
    }

    pub fn scalar(&self) -> &Symbol {
        &self.scalar
    }

    pub fn resolve(&self) -> Result<Expr, CoordinateSystemError> {
        Self::new(&self.point, &self.scalar)
    }
}

impl fmt::Display for PointCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.point {
            Point::Symbolic(p) => write!(f, "{}_{p}", self.scalar),
            Point::Applied(p) => write!(f, "{p}.{}", self.scalar),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate_system::CoordinateSystem;
    use crate::point::PointFactory;
    use symbolic::Dimension;

    #[test]
    fn test_symbolic_point_coordinate_is_stable() {
        let system = CoordinateSystem::cartesian();
        let x = &system.base_scalars()[0];
        let point = Point::from(PointFactory::new().new_point(None, None));

        let first = PointCoordinate::new(&point, x).unwrap();
        let second = PointCoordinate::new(&point, x).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_string(), "x_PT1");

        let Expr::Symbol(symbol) = &first else {
            panic!("expected a symbol, got {first}");
        };
        assert_eq!(symbol.dimension(), Dimension::LENGTH);
        assert_ne!(symbol, x);
    }

    #[test]
    fn test_distinct_points_give_distinct_coordinates() {
        let system = CoordinateSystem::cartesian();
        let x = &system.base_scalars()[0];
        let a = Point::symbolic("P", None);
        let b = Point::symbolic("P", None);
        assert_ne!(
            PointCoordinate::new(&a, x).unwrap(),
            PointCoordinate::new(&b, x).unwrap()
        );
    }

    #[test]
    fn test_applied_point_coordinate() {
        let system = CoordinateSystem::cylindrical();
        let point = Point::applied([2.0, 0.5, 1.0], &system).unwrap();
        let phi = &system.base_scalars()[1];
        assert_eq!(PointCoordinate::new(&point, phi).unwrap(), Expr::number(0.5));

        let cartesian = CoordinateSystem::cartesian();
        let x = &cartesian.base_scalars()[0];
        assert!(PointCoordinate::new(&point, x).is_err());
    }

    #[test]
    fn test_deferred_resolution() {
        let system = CoordinateSystem::spherical();
        let theta = system.base_scalars()[1].clone();
        let point = Point::symbolic("Q", None);
        let deferred = PointCoordinate::deferred(point.clone(), theta.clone());
        assert_eq!(deferred.to_string(), "theta_Q");
        assert_eq!(deferred.resolve().unwrap(), point.coordinate(&theta).unwrap());
    }

    #[test]
    fn test_deferred_lookup_of_foreign_scalar_fails_on_resolve() {
        let cylindrical = CoordinateSystem::cylindrical();
        let point = Point::applied([2.0, 0.5, 1.0], &cylindrical).unwrap();
        let cartesian = CoordinateSystem::cartesian();
        let x = cartesian.base_scalars()[0].clone();

        let deferred = PointCoordinate::deferred(point, x);
        assert!(matches!(
            deferred.resolve(),
            Err(CoordinateSystemError::ForeignScalar { .. })
        ));
    }
}
