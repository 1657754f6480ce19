//! Curvilinear coordinate systems over symbolic expressions: system descriptors, points,
//! base-vector expressions and the rules for converting points and vectors between
//! Cartesian, cylindrical and spherical coordinates.

pub mod cartesian;
pub mod conversion;
pub mod coordinate_system;
pub mod cylindrical;
pub mod operators;
pub mod point;
pub mod point_coordinate;
pub mod scalar_conversion;
pub mod spherical;
pub mod vector;
pub mod vector_conversion;

use symbolic::{Dimension, SymbolicError};
use thiserror::Error;

use coordinate_system::SystemKind;

#[derive(Debug, Error)]
pub enum CoordinateSystemError {
    #[error("base scalar `{symbol}` must have dimension {expected}, got {found}")]
    DimensionMismatch {
        symbol: String,
        expected: Dimension,
        found: Dimension,
    },
    #[error("expected exactly 3 {what}, got {got}")]
    WrongArity { what: &'static str, got: usize },
    #[error("base vectors must be pairwise distinct, `{0}` appears twice")]
    DegenerateBasis(String),
    #[error("no conversion rule from {from} to {to}")]
    UnsupportedConversion { from: SystemKind, to: SystemKind },
    #[error("`{scalar}` is not a base scalar of {system}")]
    ForeignScalar { scalar: String, system: String },
    #[error("vector has a component along `{vector}`, which is not a base vector of {system}")]
    ForeignBaseVector { vector: String, system: String },
    #[error("point coordinate `{0}` is not numeric")]
    NotNumeric(String),
    #[error("{0}")]
    Symbolic(#[from] SymbolicError),
}

pub mod prelude {
    pub use crate::cartesian::Cartesian;
    pub use crate::conversion::{convert_point, convert_vector};
    pub use crate::coordinate_system::{CoordinateSystem, Geometry, SystemKind};
    pub use crate::cylindrical::Cylindrical;
    pub use crate::operators::{curl, divergence, gradient, laplacian};
    pub use crate::point::{AppliedPoint, Point, PointFactory, PointSymbol};
    pub use crate::point_coordinate::PointCoordinate;
    pub use crate::scalar_conversion::{express_base_scalars, ScalarMapping};
    pub use crate::spherical::Spherical;
    pub use crate::vector::{BaseVector, VectorExpr};
    pub use crate::vector_conversion::{express_base_vectors, VectorMapping};
    pub use crate::CoordinateSystemError;
}
