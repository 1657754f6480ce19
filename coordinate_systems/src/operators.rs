//! Differential operators in orthogonal curvilinear coordinates, written with Lamé
//! coefficients `h = (h1, h2, h3)`.
//!
//! Scalar fields are expressions over the system's own base scalars. Vector fields are
//! expressed in the system's basis field, i.e. base vectors without a point of application.

use crate::coordinate_system::CoordinateSystem;
use crate::vector::VectorExpr;
use crate::CoordinateSystemError;
use symbolic::Expr;

/// `grad f = sum_i (1/h_i) df/dq_i e_i`
pub fn gradient(field: &Expr, system: &CoordinateSystem) -> VectorExpr {
    let h = system.lame_coefficients(&system.base_scalar_exprs());
    let terms = system
        .base_scalars()
        .iter()
        .enumerate()
        .map(|(i, q)| (system.base_vector(i, None), field.diff(q) / &h[i]))
        .collect();
    VectorExpr::from_terms(terms).simplify()
}

/// `div F = 1/(h1 h2 h3) sum_i d(F_i h_j h_k)/dq_i`
pub fn divergence(vector: &VectorExpr, system: &CoordinateSystem) -> Result<Expr, CoordinateSystemError> {
    let f = vector.components_in(system)?;
    let h = system.lame_coefficients(&system.base_scalar_exprs());
    let q = system.base_scalars();
    let volume = &h[0] * &h[1] * &h[2];
    let flux = Expr::sum(
        (0..3)
            .map(|i| {
                let (j, k) = ((i + 1) % 3, (i + 2) % 3);
                (&f[i] * &h[j] * &h[k]).diff(&q[i])
            })
            .collect(),
    );
    Ok((flux / volume).simplify())
}

/// `(curl F)_i = 1/(h_j h_k) (d(h_k F_k)/dq_j - d(h_j F_j)/dq_k)` for cyclic `(i, j, k)`.
pub fn curl(vector: &VectorExpr, system: &CoordinateSystem) -> Result<VectorExpr, CoordinateSystemError> {
    let f = vector.components_in(system)?;
    let h = system.lame_coefficients(&system.base_scalar_exprs());
    let q = system.base_scalars();
    let terms = (0..3)
        .map(|i| {
            let (j, k) = ((i + 1) % 3, (i + 2) % 3);
            let circulation = (&h[k] * &f[k]).diff(&q[j]) - (&h[j] * &f[j]).diff(&q[k]);
            (system.base_vector(i, None), circulation / (&h[j] * &h[k]))
        })
        .collect();
    Ok(VectorExpr::from_terms(terms).simplify())
}

/// `lap f = div grad f`
pub fn laplacian(field: &Expr, system: &CoordinateSystem) -> Result<Expr, CoordinateSystemError> {
    divergence(&gradient(field, system), system)
}
