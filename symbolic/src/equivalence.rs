use crate::dimension::Dimension;
use crate::evaluate::Environment;
use crate::expr::Expr;
use crate::symbol::Domain;
use crate::SymbolicError;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tolerance::Tolerances;
use tracing::trace;

/// Controls how two expressions are decided to be equal when simplification alone does not
/// reduce their difference to zero.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EquivalenceSettings {
    /// Number of random points the difference is evaluated at.
    pub samples: usize,
    /// Seed for the sampler, so a given comparison always sees the same points.
    pub seed: u64,
    pub tolerances: Tolerances,
}

impl Default for EquivalenceSettings {
    fn default() -> Self {
        Self {
            samples: 8,
            seed: 0x5eed_c0de,
            tolerances: Tolerances::default(),
        }
    }
}

impl EquivalenceSettings {
    pub fn from_ron(source: &str) -> Result<Self, SymbolicError> {
        Ok(ron::from_str(source)?)
    }
}

/// Draws a value for `leaf` inside its domain, away from zero.
///
/// Unrestricted leaves take both signs. The sign of leaf `k` at sample `n` is bit `k % 3` of
/// `n`, so eight samples visit every sign combination of the first three leaves. Unrestricted
/// angles therefore cover (-3, 3), which stays inside the principal range of atan2.
fn sample_value(leaf: &Expr, leaf_index: usize, sample: usize, rng: &mut SmallRng) -> f64 {
    let (dimension, domain) = match leaf {
        Expr::Symbol(s) => (s.dimension(), s.domain()),
        Expr::Applied { function, .. } => (function.dimension(), function.domain()),
        _ => (Dimension::DIMENSIONLESS, Domain::Real),
    };
    let magnitude = if dimension == Dimension::ANGLE {
        0.1..3.0
    } else {
        0.5..3.0
    };
    match domain {
        Domain::NonNegative => rng.random_range(magnitude),
        Domain::Interval { low, high } if high > low && (high - low).is_finite() => {
            // endpoints of an angular interval are usually coordinate singularities
            let margin = 0.05 * (high - low);
            rng.random_range(low + margin..high - margin)
        }
        _ => {
            let value = rng.random_range(magnitude);
            if (sample >> (leaf_index % 3)) & 1 == 1 {
                -value
            } else {
                value
            }
        }
    }
}

impl Expr {
    /// Decides whether `self` and `other` are the same expression.
    ///
    /// The difference is simplified first; if it reduces to a number, that number must be
    /// zero within the absolute tolerance. Otherwise both sides are evaluated at
    /// `settings.samples` pseudo-random points drawn from each symbol's [`Domain`] and must
    /// agree at every point where both are finite. At least one finite sample is required.
    pub fn equivalent(&self, other: &Expr, settings: &EquivalenceSettings) -> bool {
        let difference = (self - other).simplify();
        if let Some(value) = difference.as_number() {
            return settings.tolerances.check_zero(value);
        }

        let mut leaves = self.atoms();
        other.collect_atoms(&mut leaves);
        let mut rng = SmallRng::seed_from_u64(settings.seed);
        let mut finite_samples = 0;
        for sample in 0..settings.samples {
            let mut env = Environment::new();
            for (leaf_index, leaf) in leaves.iter().enumerate() {
                let value = sample_value(leaf, leaf_index, sample, &mut rng);
                env.bind(leaf.clone(), value);
            }
            let (Ok(lhs), Ok(rhs)) = (self.evaluate(&env), other.evaluate(&env)) else {
                return false;
            };
            if !lhs.is_finite() || !rhs.is_finite() {
                continue;
            }
            finite_samples += 1;
            if !settings.tolerances.check_error(lhs, rhs) {
                trace!(lhs, rhs, %difference, "expressions differ at sample point");
                return false;
            }
        }
        finite_samples > 0
    }
}
