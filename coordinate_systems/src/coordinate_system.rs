use crate::cartesian::Cartesian;
use crate::cylindrical::Cylindrical;
use crate::point::Point;
use crate::point_coordinate::PointCoordinate;
use crate::spherical::Spherical;
use crate::vector::{BaseVector, VectorExpr};
use crate::CoordinateSystemError;
use lazy_static::lazy_static;
use nalgebra::Vector3;
use std::any::type_name;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use symbolic::{Dimension, Domain, Expr, Symbol, SymbolicMatrix};
use tracing::debug;
use uuid::Uuid;

/// Identifies which conversion rules apply to a coordinate system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SystemKind {
    Cartesian,
    Cylindrical,
    Spherical,
    /// A user-defined geometry, identified by its Rust type name.
    Custom(&'static str),
}

impl fmt::Display for SystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SystemKind::Cartesian => write!(f, "Cartesian"),
            SystemKind::Cylindrical => write!(f, "Cylindrical"),
            SystemKind::Spherical => write!(f, "Spherical"),
            SystemKind::Custom(name) => write!(f, "{name}"),
        }
    }
}

/// Geometry of an orthogonal coordinate system, described through its relation to Cartesian
/// coordinates.
///
/// Implementors only have to provide the forward and inverse transforms. Lamé coefficients
/// and the base-vector matrix are derived from the Jacobian of `to_cartesian` unless a closed
/// form is supplied.
pub trait Geometry: fmt::Debug + Send + Sync {
    fn kind(&self) -> SystemKind {
        SystemKind::Custom(type_name::<Self>())
    }

    /// Default names of the three base scalars.
    fn scalar_names(&self) -> [&'static str; 3];

    /// Default names of the three base vectors.
    fn vector_names(&self) -> [&'static str; 3];

    /// Required dimension of each base scalar.
    fn scalar_dimensions(&self) -> [Dimension; 3];

    /// Values each default base scalar ranges over. Unrestricted unless overridden.
    fn scalar_domains(&self) -> [Domain; 3] {
        [Domain::Real; 3]
    }

    /// True if the basis does not depend on the point it is evaluated at.
    fn is_position_independent(&self) -> bool {
        false
    }

    /// Cartesian `(x, y, z)` of the point with coordinates `q`.
    fn to_cartesian(&self, q: &[Expr; 3]) -> [Expr; 3];

    /// Coordinates of the point with Cartesian coordinates `p`.
    fn from_cartesian(&self, p: &[Expr; 3]) -> [Expr; 3];

    fn to_cartesian_f64(&self, q: &Vector3<f64>) -> Vector3<f64>;

    fn from_cartesian_f64(&self, p: &Vector3<f64>) -> Vector3<f64>;

    /// Closed-form Lamé coefficients at `q`, if known.
    fn lame_coefficients(&self, _q: &[Expr; 3]) -> Option<[Expr; 3]> {
        None
    }

    /// Closed-form base-vector matrix at `q`, if known. Column `i` holds the Cartesian
    /// components of base vector `i`.
    fn base_vector_matrix(&self, _q: &[Expr; 3]) -> Option<SymbolicMatrix> {
        None
    }
}

#[derive(Debug)]
struct SystemInner {
    id: Uuid,
    geometry: Box<dyn Geometry>,
    base_scalars: [Symbol; 3],
    base_vectors: [Symbol; 3],
}

/// A coordinate system: a geometry together with its base scalars and base vector labels.
///
/// Systems are immutable and cheap to clone. Clones share identity, and two systems are equal
/// only if they are clones of the same constructed instance.
#[derive(Clone, Debug)]
pub struct CoordinateSystem(Arc<SystemInner>);

lazy_static! {
    static ref CARTESIAN: CoordinateSystem = CoordinateSystem::new(Cartesian);
    static ref CYLINDRICAL: CoordinateSystem = CoordinateSystem::new(Cylindrical);
    static ref SPHERICAL: CoordinateSystem = CoordinateSystem::new(Spherical);
}

impl CoordinateSystem {
    /// Creates a new system with the geometry's default symbols.
    ///
    /// # Arguments
    ///
    /// * `geometry` - The transforms relating the new system to Cartesian coordinates.
    ///
    /// # Returns
    ///
    /// A `CoordinateSystem` with a fresh identity.
    pub fn new(geometry: impl Geometry + 'static) -> Self {
        let (base_scalars, base_vectors) = default_symbols(&geometry);
        Self::from_parts(Box::new(geometry), base_scalars, base_vectors)
    }

    /// Creates a new system, optionally overriding the base scalars and base vector labels.
    ///
    /// Custom base scalars must be exactly three and carry the dimension the geometry
    /// requires for each coordinate. Custom base vectors must be exactly three, dimensionless
    /// and pairwise distinct. Custom base scalars keep their own [`Domain`].
    ///
    /// # Arguments
    ///
    /// * `geometry` - The transforms relating the new system to Cartesian coordinates.
    /// * `base_scalars` - Replacement coordinate symbols, or `None` for the defaults.
    /// * `base_vectors` - Replacement base vector labels, or `None` for the defaults.
    ///
    /// # Returns
    ///
    /// A `CoordinateSystem` with a fresh identity.
    ///
    /// # Errors
    ///
    /// `WrongArity` if a list does not hold three symbols, `DimensionMismatch` if a symbol has
    /// the wrong dimension, and `DegenerateBasis` if two base vectors coincide.
    pub fn with_symbols(
        geometry: impl Geometry + 'static,
        base_scalars: Option<Vec<Symbol>>,
        base_vectors: Option<Vec<Symbol>>,
    ) -> Result<Self, CoordinateSystemError> {
        let (default_scalars, default_vectors) = default_symbols(&geometry);

        let base_scalars = match base_scalars {
            Some(scalars) => {
                let scalars = into_triple(scalars, "base scalars")?;
                let expected = geometry.scalar_dimensions();
                for (symbol, expected) in scalars.iter().zip(expected) {
                    if symbol.dimension() != expected {
                        return Err(CoordinateSystemError::DimensionMismatch {
                            symbol: symbol.name().to_string(),
                            expected,
                            found: symbol.dimension(),
                        });
                    }
                }
                scalars
            }
            None => default_scalars,
        };

        let base_vectors = match base_vectors {
            Some(vectors) => {
                let vectors = into_triple(vectors, "base vectors")?;
                for vector in &vectors {
                    if !vector.dimension().is_dimensionless() {
                        return Err(CoordinateSystemError::DimensionMismatch {
                            symbol: vector.name().to_string(),
                            expected: Dimension::DIMENSIONLESS,
                            found: vector.dimension(),
                        });
                    }
                }
                for (i, a) in vectors.iter().enumerate() {
                    if vectors[i + 1..]
                        .iter()
                        .any(|b| a == b || a.name() == b.name())
                    {
                        return Err(CoordinateSystemError::DegenerateBasis(a.name().to_string()));
                    }
                }
                vectors
            }
            None => default_vectors,
        };

        Ok(Self::from_parts(Box::new(geometry), base_scalars, base_vectors))
    }

    fn from_parts(
        geometry: Box<dyn Geometry>,
        base_scalars: [Symbol; 3],
        base_vectors: [Symbol; 3],
    ) -> Self {
        let inner = SystemInner {
            id: Uuid::new_v4(),
            geometry,
            base_scalars,
            base_vectors,
        };
        debug!(
            kind = %inner.geometry.kind(),
            scalars = ?inner.base_scalars.iter().map(Symbol::name).collect::<Vec<_>>(),
            "constructed coordinate system"
        );
        Self(Arc::new(inner))
    }

    /// The shared default Cartesian system `(x, y, z)` with basis `(i, j, k)`.
    pub fn cartesian() -> Self {
        CARTESIAN.clone()
    }

    /// The shared default cylindrical system `(rho, phi, z)`.
    pub fn cylindrical() -> Self {
        CYLINDRICAL.clone()
    }

    /// The shared default spherical system `(r, theta, phi)`.
    pub fn spherical() -> Self {
        SPHERICAL.clone()
    }

    pub fn id(&self) -> Uuid {
        self.0.id
    }

    pub fn kind(&self) -> SystemKind {
        self.0.geometry.kind()
    }

    pub fn geometry(&self) -> &dyn Geometry {
        self.0.geometry.as_ref()
    }

    pub fn base_scalars(&self) -> &[Symbol; 3] {
        &self.0.base_scalars
    }

    pub fn base_vector_labels(&self) -> &[Symbol; 3] {
        &self.0.base_vectors
    }

    pub fn base_scalar_exprs(&self) -> [Expr; 3] {
        self.0.base_scalars.clone().map(Expr::Symbol)
    }

    pub fn scalar_index(&self, scalar: &Symbol) -> Option<usize> {
        self.0.base_scalars.iter().position(|s| s == scalar)
    }

    pub fn is_position_independent(&self) -> bool {
        self.0.geometry.is_position_independent()
    }

    /// Map from this system's base scalars to `values`, for use with `Expr::subs`.
    pub fn substitution(&self, values: &[Expr; 3]) -> HashMap<Symbol, Expr> {
        self.0
            .base_scalars
            .iter()
            .cloned()
            .zip(values.iter().cloned())
            .collect()
    }

    /// Coordinates of `at` in this system, or the bare base scalars when no point is given.
    pub fn coordinates_at(&self, at: Option<&Point>) -> Result<[Expr; 3], CoordinateSystemError> {
        let Some(point) = at else {
            return Ok(self.base_scalar_exprs());
        };
        let [a, b, c] = &self.0.base_scalars;
        Ok([
            PointCoordinate::new(point, a)?,
            PointCoordinate::new(point, b)?,
            PointCoordinate::new(point, c)?,
        ])
    }

    /// Base vector `index` applied at `at`. The point is dropped for position-independent
    /// bases.
    pub fn base_vector(&self, index: usize, at: Option<&Point>) -> BaseVector {
        let at = if self.is_position_independent() {
            None
        } else {
            at.cloned()
        };
        BaseVector::new(self.clone(), index, at)
    }

    /// The three unit base vectors at `at`.
    ///
    /// Curvilinear bases need the point of application; without one the basis is returned in
    /// field form, as functions of the base scalars. Fails if `at` is an applied point of
    /// another system.
    pub fn base_vectors(&self, at: Option<&Point>) -> Result<[VectorExpr; 3], CoordinateSystemError> {
        if !self.is_position_independent() {
            self.coordinates_at(at)?;
        }
        Ok([0, 1, 2].map(|i| VectorExpr::from(self.base_vector(i, at))))
    }

    /// Transforms coordinates of this system to Cartesian coordinates.
    ///
    /// # Arguments
    ///
    /// * `q` - Coordinates in this system, in base scalar order.
    ///
    /// # Returns
    ///
    /// The Cartesian `(x, y, z)` expressions, unsimplified.
    pub fn to_cartesian(&self, q: &[Expr; 3]) -> [Expr; 3] {
        self.0.geometry.to_cartesian(q)
    }

    /// Transforms Cartesian coordinates to coordinates of this system.
    ///
    /// # Arguments
    ///
    /// * `p` - Cartesian `(x, y, z)` expressions.
    ///
    /// # Returns
    ///
    /// Coordinates in base scalar order, unsimplified.
    pub fn from_cartesian(&self, p: &[Expr; 3]) -> [Expr; 3] {
        self.0.geometry.from_cartesian(p)
    }

    /// Jacobian matrix of the Cartesian transform, `J[r][c] = d(cartesian_r)/d(q_c)`,
    /// evaluated at `q`.
    pub fn cartesian_derivative_matrix(&self, q: &[Expr; 3]) -> SymbolicMatrix {
        let position = self.to_cartesian(&self.base_scalar_exprs());
        let scalars = &self.0.base_scalars;
        let substitution = self.substitution(q);
        SymbolicMatrix::from_fn(|r, c| position[r].diff(&scalars[c]).subs(&substitution).simplify())
    }

    /// Scale factors of the three coordinate directions at `q`.
    pub fn lame_coefficients(&self, q: &[Expr; 3]) -> [Expr; 3] {
        if let Some(closed_form) = self.0.geometry.lame_coefficients(q) {
            return closed_form;
        }
        let jacobian = self.cartesian_derivative_matrix(q);
        [0, 1, 2].map(|c| {
            let [a, b, d] = jacobian.column(c);
            (a.powi(2) + b.powi(2) + d.powi(2)).sqrt().simplify()
        })
    }

    /// Volume-element scale factor at `q`, the product of the Lamé coefficients.
    pub fn jacobian(&self, q: &[Expr; 3]) -> Expr {
        let [h1, h2, h3] = self.lame_coefficients(q);
        (h1 * h2 * h3).simplify()
    }

    /// Matrix whose columns are the Cartesian components of the unit base vectors at `q`.
    pub fn base_vector_matrix(&self, q: &[Expr; 3]) -> SymbolicMatrix {
        if let Some(closed_form) = self.0.geometry.base_vector_matrix(q) {
            return closed_form;
        }
        let jacobian = self.cartesian_derivative_matrix(q);
        let lame = self.lame_coefficients(q);
        SymbolicMatrix::from_fn(|r, c| (jacobian.get(r, c) / &lame[c]).simplify())
    }

    /// Time derivative of the base-vector matrix along a trajectory.
    ///
    /// `trajectory` gives each coordinate as an expression in `time`, typically
    /// `Expr::applied(q, t)`, so the result is written in terms of the coordinates' own time
    /// derivatives.
    pub fn base_vector_matrix_time_derivative(
        &self,
        trajectory: &[Expr; 3],
        time: &Symbol,
    ) -> SymbolicMatrix {
        self.base_vector_matrix(trajectory).diff(time).simplify()
    }
}

fn default_symbols(geometry: &dyn Geometry) -> ([Symbol; 3], [Symbol; 3]) {
    let dimensions = geometry.scalar_dimensions();
    let domains = geometry.scalar_domains();
    let scalar_names = geometry.scalar_names();
    let base_scalars =
        [0, 1, 2].map(|i| Symbol::with_domain(scalar_names[i], dimensions[i], domains[i]));
    let base_vectors = geometry.vector_names().map(Symbol::dimensionless);
    (base_scalars, base_vectors)
}

fn into_triple(
    symbols: Vec<Symbol>,
    what: &'static str,
) -> Result<[Symbol; 3], CoordinateSystemError> {
    let got = symbols.len();
    <[Symbol; 3]>::try_from(symbols).map_err(|_| CoordinateSystemError::WrongArity { what, got })
}

impl PartialEq for CoordinateSystem {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for CoordinateSystem {}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = &self.0.base_scalars;
        write!(f, "{}({a}, {b}, {c})", self.kind())
    }
}
