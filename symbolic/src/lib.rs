//! A small computer-algebra layer: dimensioned symbols, expression trees, canonical
//! simplification, substitution, differentiation and numeric equivalence testing.
//!
//! It is intentionally scoped to what coordinate-system transforms need: sums, products,
//! powers, elementary functions, `atan2` and functions of time.

pub mod dimension;
pub mod equivalence;
pub mod evaluate;
pub mod expr;
pub mod matrix;
pub mod symbol;

mod diff;
mod display;
mod simplify;

use thiserror::Error;

pub use dimension::Dimension;
pub use equivalence::EquivalenceSettings;
pub use evaluate::Environment;
pub use expr::{Expr, Function};
pub use matrix::SymbolicMatrix;
pub use symbol::{Domain, Symbol};

#[derive(Debug, Error)]
pub enum SymbolicError {
    #[error("no value bound for `{0}`")]
    UnboundLeaf(String),
    #[error("expression `{0}` does not reduce to a number")]
    NotNumeric(String),
    #[error("{0}")]
    Ron(#[from] ron::error::SpannedError),
}

pub mod prelude {
    pub use crate::dimension::Dimension;
    pub use crate::equivalence::EquivalenceSettings;
    pub use crate::evaluate::Environment;
    pub use crate::expr::{Expr, Function};
    pub use crate::matrix::SymbolicMatrix;
    pub use crate::symbol::{Domain, Symbol};
    pub use crate::SymbolicError;
}
