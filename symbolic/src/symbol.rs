use crate::dimension::Dimension;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use uuid::Uuid;

/// Range of real values a symbol may take.
///
/// Equivalence testing only samples inside the domain, so an identity such as
/// `sqrt(r^2) = r` holds for a non-negative `r` but not for an unrestricted one.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Domain {
    #[default]
    Real,
    NonNegative,
    /// Open interval `(low, high)` with finite bounds.
    Interval { low: f64, high: f64 },
}

impl Domain {
    pub fn contains(&self, value: f64) -> bool {
        match *self {
            Domain::Real => value.is_finite(),
            Domain::NonNegative => value >= 0.0 && value.is_finite(),
            Domain::Interval { low, high } => value > low && value < high,
        }
    }
}

/// A named scalar symbol carrying a physical dimension and a value domain.
///
/// Symbols are compared by identity, not by name: two symbols both named `z` that were
/// created separately are different symbols. Clones share the identity of the original.
#[derive(Clone, Debug)]
pub struct Symbol {
    id: Uuid,
    name: Arc<str>,
    dimension: Dimension,
    domain: Domain,
}

impl Symbol {
    /// Creates a new real-valued symbol with a fresh identity.
    pub fn new(name: &str, dimension: Dimension) -> Self {
        Self::with_domain(name, dimension, Domain::Real)
    }

    /// Creates a new symbol restricted to `domain`.
    pub fn with_domain(name: &str, dimension: Dimension, domain: Domain) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: Arc::from(name),
            dimension,
            domain,
        }
    }

    /// Creates a dimensionless symbol with a fresh identity.
    pub fn dimensionless(name: &str) -> Self {
        Self::new(name, Dimension::DIMENSIONLESS)
    }

    /// Creates a symbol whose identity is derived from `scope` and `base`.
    ///
    /// Requesting the same `(scope, base)` pair twice yields the same symbol, which is what
    /// makes "coordinate `base` of the object identified by `scope`" a stable expression.
    /// The new symbol inherits the dimension and domain of `base`.
    pub fn scoped(scope: &Uuid, base: &Symbol, name: &str) -> Self {
        Self {
            id: Uuid::new_v5(scope, base.id.as_bytes()),
            name: Arc::from(name),
            dimension: base.dimension,
            domain: base.domain,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
