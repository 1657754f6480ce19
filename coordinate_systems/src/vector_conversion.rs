use crate::coordinate_system::{CoordinateSystem, SystemKind};
use crate::point::Point;
use crate::vector::{BaseVector, VectorExpr};
use crate::CoordinateSystemError;
use symbolic::Expr;
use tracing::debug;

/// Each base vector of the old system written in terms of the new system's base vectors.
pub type VectorMapping = Vec<(BaseVector, VectorExpr)>;

/// The new system's basis and coordinates at the new point of application.
struct Frame {
    basis: [VectorExpr; 3],
    coordinates: [Expr; 3],
}

type VectorRule = fn(&Frame) -> [VectorExpr; 3];

fn identity(frame: &Frame) -> [VectorExpr; 3] {
    frame.basis.clone()
}

fn cartesian_to_cylindrical(frame: &Frame) -> [VectorExpr; 3] {
    let [e_rho, e_phi, e_z] = &frame.basis;
    let phi = &frame.coordinates[1];
    [
        e_rho * &phi.cos() - e_phi * &phi.sin(),
        e_rho * &phi.sin() + e_phi * &phi.cos(),
        e_z.clone(),
    ]
}

fn cartesian_to_spherical(frame: &Frame) -> [VectorExpr; 3] {
    let [e_r, e_theta, e_phi] = &frame.basis;
    let [_, theta, phi] = &frame.coordinates;
    let planar = e_r * &theta.sin() + e_theta * &theta.cos();
    [
        &planar * &phi.cos() - e_phi * &phi.sin(),
        &planar * &phi.sin() + e_phi * &phi.cos(),
        e_r * &theta.cos() - e_theta * &theta.sin(),
    ]
}

fn cylindrical_to_cartesian(frame: &Frame) -> [VectorExpr; 3] {
    let [i, j, k] = &frame.basis;
    let [x, y, _] = &frame.coordinates;
    let rho = (x.powi(2) + y.powi(2)).sqrt();
    [
        (i * x + j * y) * rho.recip(),
        (j * x - i * y) * rho.recip(),
        k.clone(),
    ]
}

fn cylindrical_to_spherical(frame: &Frame) -> [VectorExpr; 3] {
    let [e_r, e_theta, e_phi] = &frame.basis;
    let theta = &frame.coordinates[1];
    [
        e_r * &theta.sin() + e_theta * &theta.cos(),
        e_phi.clone(),
        e_r * &theta.cos() - e_theta * &theta.sin(),
    ]
}

fn spherical_to_cartesian(frame: &Frame) -> [VectorExpr; 3] {
    let [i, j, k] = &frame.basis;
    let [x, y, z] = &frame.coordinates;
    let rho = (x.powi(2) + y.powi(2)).sqrt();
    let r = (x.powi(2) + y.powi(2) + z.powi(2)).sqrt();
    let rho_r = &rho * &r;
    [
        (i * x + j * y + k * z) * r.recip(),
        i * &(x * z / &rho_r) + j * &(y * z / &rho_r) - k * &(&rho / &r),
        (j * x - i * y) * rho.recip(),
    ]
}

fn spherical_to_cylindrical(frame: &Frame) -> [VectorExpr; 3] {
    let [e_rho, e_phi, e_z] = &frame.basis;
    let [rho, _, z] = &frame.coordinates;
    let r = (rho.powi(2) + z.powi(2)).sqrt();
    [
        (e_rho * rho + e_z * z) * r.recip(),
        (e_rho * z - e_z * rho) * r.recip(),
        e_phi.clone(),
    ]
}

/// Conversion table keyed by (old kind, new kind).
fn vector_rule(old: SystemKind, new: SystemKind) -> Option<VectorRule> {
    match (old, new) {
        (SystemKind::Cartesian, SystemKind::Cylindrical) => Some(cartesian_to_cylindrical),
        (SystemKind::Cartesian, SystemKind::Spherical) => Some(cartesian_to_spherical),
        (SystemKind::Cylindrical, SystemKind::Cartesian) => Some(cylindrical_to_cartesian),
        (SystemKind::Cylindrical, SystemKind::Spherical) => Some(cylindrical_to_spherical),
        (SystemKind::Spherical, SystemKind::Cartesian) => Some(spherical_to_cartesian),
        (SystemKind::Spherical, SystemKind::Cylindrical) => Some(spherical_to_cylindrical),
        (old, new) if old == new => Some(identity),
        _ => None,
    }
}

/// Expresses each base vector of `old_system` at `old_point` in terms of the base vectors of
/// `new_system` at `new_point`.
///
/// Note the argument order is old then new, the reverse of
/// [`express_base_scalars`](crate::scalar_conversion::express_base_scalars). When both
/// systems are the same instance no substitution is needed and the mapping is empty.
///
/// # Arguments
///
/// * `old_system` - The system whose base vectors are rewritten.
/// * `old_point` - Where the old base vectors are applied, if anywhere.
/// * `new_system` - The system whose base vectors appear in the images.
/// * `new_point` - The same location written in `new_system`, used for the new basis and for
///   the coordinates the images depend on.
///
/// # Returns
///
/// A `VectorMapping` pairing each old base vector with its image, in index order.
///
/// # Errors
///
/// `UnsupportedConversion` if no rule relates the two kinds of system, and `ForeignScalar` if
/// `new_point` is an applied point of a different system.
pub fn express_base_vectors(
    old_system: &CoordinateSystem,
    new_system: &CoordinateSystem,
    old_point: Option<&Point>,
    new_point: Option<&Point>,
) -> Result<VectorMapping, CoordinateSystemError> {
    let rule = vector_rule(old_system.kind(), new_system.kind()).ok_or(
        CoordinateSystemError::UnsupportedConversion {
            from: old_system.kind(),
            to: new_system.kind(),
        },
    )?;
    if old_system == new_system {
        debug!(system = %old_system, "same system, no base vector substitution");
        return Ok(VectorMapping::new());
    }
    debug!(from = %old_system, to = %new_system, "expressing base vectors");

    let frame = Frame {
        basis: new_system.base_vectors(new_point)?,
        coordinates: new_system.coordinates_at(new_point)?,
    };
    Ok(rule(&frame)
        .into_iter()
        .enumerate()
        .map(|(i, image)| (old_system.base_vector(i, old_point), image))
        .collect())
}
