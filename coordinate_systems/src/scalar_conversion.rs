use crate::coordinate_system::{CoordinateSystem, Geometry, SystemKind};
use crate::cylindrical::Cylindrical;
use crate::spherical::Spherical;
use crate::CoordinateSystemError;
use std::collections::HashMap;
use symbolic::{Expr, Symbol};
use tracing::debug;

/// Each base scalar of the new system written in terms of the old system's base scalars.
pub type ScalarMapping = HashMap<Symbol, Expr>;

/// Maps the old system's coordinates to the new system's.
type ScalarRule = fn(&[Expr; 3]) -> [Expr; 3];

fn identity(old: &[Expr; 3]) -> [Expr; 3] {
    old.clone()
}

fn cartesian_from_cylindrical(old: &[Expr; 3]) -> [Expr; 3] {
    Cylindrical.to_cartesian(old)
}

fn cartesian_from_spherical(old: &[Expr; 3]) -> [Expr; 3] {
    Spherical.to_cartesian(old)
}

fn cylindrical_from_cartesian(old: &[Expr; 3]) -> [Expr; 3] {
    Cylindrical.from_cartesian(old)
}

fn cylindrical_from_spherical(old: &[Expr; 3]) -> [Expr; 3] {
    let [r, theta, phi] = old;
    [r * theta.sin(), phi.clone(), r * theta.cos()]
}

fn spherical_from_cartesian(old: &[Expr; 3]) -> [Expr; 3] {
    Spherical.from_cartesian(old)
}

fn spherical_from_cylindrical(old: &[Expr; 3]) -> [Expr; 3] {
    let [rho, phi, z] = old;
    [(rho.powi(2) + z.powi(2)).sqrt(), rho.atan2(z), phi.clone()]
}

/// Conversion table keyed by (new kind, old kind). Same-kind pairs, custom kinds included,
/// fall back to the identity.
fn scalar_rule(new: SystemKind, old: SystemKind) -> Option<ScalarRule> {
    match (new, old) {
        (SystemKind::Cartesian, SystemKind::Cylindrical) => Some(cartesian_from_cylindrical),
        (SystemKind::Cartesian, SystemKind::Spherical) => Some(cartesian_from_spherical),
        (SystemKind::Cylindrical, SystemKind::Cartesian) => Some(cylindrical_from_cartesian),
        (SystemKind::Cylindrical, SystemKind::Spherical) => Some(cylindrical_from_spherical),
        (SystemKind::Spherical, SystemKind::Cartesian) => Some(spherical_from_cartesian),
        (SystemKind::Spherical, SystemKind::Cylindrical) => Some(spherical_from_cylindrical),
        (new, old) if new == old => Some(identity),
        _ => None,
    }
}

/// Expresses each base scalar of `new_system` in terms of the base scalars of `old_system`.
///
/// # Arguments
///
/// * `new_system` - The system whose base scalars are the keys of the mapping.
/// * `old_system` - The system whose base scalars appear in the expressions.
///
/// # Returns
///
/// A `ScalarMapping` with one entry per base scalar of `new_system`.
///
/// # Errors
///
/// `UnsupportedConversion` if no rule relates the two kinds of system.
pub fn express_base_scalars(
    new_system: &CoordinateSystem,
    old_system: &CoordinateSystem,
) -> Result<ScalarMapping, CoordinateSystemError> {
    let rule = scalar_rule(new_system.kind(), old_system.kind()).ok_or(
        CoordinateSystemError::UnsupportedConversion {
            from: old_system.kind(),
            to: new_system.kind(),
        },
    )?;
    debug!(from = %old_system, to = %new_system, "expressing base scalars");
    let images = rule(&old_system.base_scalar_exprs());
    Ok(new_system
        .base_scalars()
        .iter()
        .cloned()
        .zip(images)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartesian::Cartesian;
    use nalgebra::Vector3;
    use symbolic::{Dimension, Environment, EquivalenceSettings};

    fn systems() -> [CoordinateSystem; 3] {
        [
            CoordinateSystem::cartesian(),
            CoordinateSystem::cylindrical(),
            CoordinateSystem::spherical(),
        ]
    }

    #[derive(Debug)]
    struct Skewed;

    #[derive(Debug)]
    struct Sheared;

    macro_rules! cartesian_like {
        ($geometry:ty) => {
            impl Geometry for $geometry {
                fn scalar_names(&self) -> [&'static str; 3] {
                    ["u", "v", "w"]
                }
                fn vector_names(&self) -> [&'static str; 3] {
                    ["e_u", "e_v", "e_w"]
                }
                fn scalar_dimensions(&self) -> [Dimension; 3] {
                    [Dimension::LENGTH; 3]
                }
                fn to_cartesian(&self, q: &[Expr; 3]) -> [Expr; 3] {
                    q.clone()
                }
                fn from_cartesian(&self, p: &[Expr; 3]) -> [Expr; 3] {
                    p.clone()
                }
                fn to_cartesian_f64(&self, q: &Vector3<f64>) -> Vector3<f64> {
                    *q
                }
                fn from_cartesian_f64(&self, p: &Vector3<f64>) -> Vector3<f64> {
                    *p
                }
            }
        };
    }

    cartesian_like!(Skewed);
    cartesian_like!(Sheared);

    #[test]
    fn test_cylindrical_from_cartesian() {
        let cartesian = CoordinateSystem::cartesian();
        let cylindrical = CoordinateSystem::cylindrical();
        let mapping = express_base_scalars(&cylindrical, &cartesian).unwrap();
        let [x, y, z] = cartesian.base_scalar_exprs();
        let [rho, phi, height] = cylindrical.base_scalars();
        assert_eq!(mapping[rho], (x.powi(2) + y.powi(2)).sqrt());
        assert_eq!(mapping[phi], y.atan2(&x));
        assert_eq!(mapping[height], z);
    }

    /// Converting new <- old <- new at a numeric point returns the starting coordinates, for
    /// every ordered pair of the built-in systems.
    #[test]
    fn test_round_trip_for_every_pair() {
        let settings = EquivalenceSettings::default();
        let values = [1.2, 0.7, 0.9];
        for old in systems() {
            for new in systems() {
                let forward = express_base_scalars(&new, &old).unwrap();
                let backward = express_base_scalars(&old, &new).unwrap();
                let start = old.substitution(&values.map(Expr::number));
                for scalar in old.base_scalars() {
                    let round_trip = backward[scalar].subs(&forward).subs(&start);
                    let expected = &start[scalar];
                    assert!(
                        round_trip.equivalent(expected, &settings),
                        "{old} -> {new}: {scalar} = {round_trip}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_cartesian_ones_through_spherical() {
        let cartesian = CoordinateSystem::cartesian();
        let spherical = CoordinateSystem::spherical();
        let to_spherical = express_base_scalars(&spherical, &cartesian).unwrap();
        let to_cartesian = express_base_scalars(&cartesian, &spherical).unwrap();
        let ones = cartesian.substitution(&[Expr::one(), Expr::one(), Expr::one()]);

        let mut env = Environment::new();
        for scalar in spherical.base_scalars() {
            let value = to_spherical[scalar].subs(&ones).to_f64().unwrap();
            env.bind(Expr::symbol(scalar), value);
        }
        for scalar in cartesian.base_scalars() {
            let value = to_cartesian[scalar].evaluate(&env).unwrap();
            approx::assert_abs_diff_eq!(value, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_same_kind_is_identity() {
        let a = CoordinateSystem::new(Cartesian);
        let b = CoordinateSystem::cartesian();
        let mapping = express_base_scalars(&a, &b).unwrap();
        for (new, old) in a.base_scalars().iter().zip(b.base_scalars()) {
            assert_eq!(mapping[new], Expr::symbol(old));
        }

        let skewed_a = CoordinateSystem::new(Skewed);
        let skewed_b = CoordinateSystem::new(Skewed);
        assert!(express_base_scalars(&skewed_a, &skewed_b).is_ok());
    }

    #[test]
    fn test_unrelated_custom_kinds_are_rejected() {
        let skewed = CoordinateSystem::new(Skewed);
        let sheared = CoordinateSystem::new(Sheared);
        assert!(matches!(
            express_base_scalars(&skewed, &sheared),
            Err(CoordinateSystemError::UnsupportedConversion { .. })
        ));
        assert!(express_base_scalars(&skewed, &CoordinateSystem::cartesian()).is_err());
    }
}
