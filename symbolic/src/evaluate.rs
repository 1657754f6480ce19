use crate::expr::Expr;
use crate::symbol::Symbol;
use crate::SymbolicError;

/// Numeric values bound to the leaves of an expression.
///
/// Leaves are symbols, applied functions such as `phi(t)` and their derivatives; each is
/// bound independently.
#[derive(Clone, Debug, Default)]
pub struct Environment {
    bindings: Vec<(Expr, f64)>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `value` to `leaf`, replacing any previous binding.
    pub fn bind(&mut self, leaf: Expr, value: f64) {
        match self.bindings.iter_mut().find(|(existing, _)| *existing == leaf) {
            Some((_, v)) => *v = value,
            None => self.bindings.push((leaf, value)),
        }
    }

    pub fn with(mut self, symbol: &Symbol, value: f64) -> Self {
        self.bind(Expr::symbol(symbol), value);
        self
    }

    pub fn get(&self, leaf: &Expr) -> Option<f64> {
        self.bindings
            .iter()
            .find(|(existing, _)| existing == leaf)
            .map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Expr {
    /// Evaluates the expression numerically.
    ///
    /// Domain errors are not reported as errors; they surface as NaN or infinite values,
    /// which callers are expected to check with `f64::is_finite`.
    pub fn evaluate(&self, env: &Environment) -> Result<f64, SymbolicError> {
        let value = match self {
            Expr::Number(n) => *n,
            Expr::Symbol(_) | Expr::Applied { .. } | Expr::Derivative { .. } => env
                .get(self)
                .ok_or_else(|| SymbolicError::UnboundLeaf(self.to_string()))?,
            Expr::Add(terms) => {
                let mut sum = 0.0;
                for term in terms {
                    sum += term.evaluate(env)?;
                }
                sum
            }
            Expr::Mul(factors) => {
                let mut product = 1.0;
                for factor in factors {
                    product *= factor.evaluate(env)?;
                }
                product
            }
            Expr::Pow(base, exponent) => {
                let b = base.evaluate(env)?;
                let e = exponent.evaluate(env)?;
                if e.fract() == 0.0 && e.abs() <= i32::MAX as f64 {
                    b.powi(e as i32)
                } else {
                    b.powf(e)
                }
            }
            Expr::Function(function, argument) => function.apply_f64(argument.evaluate(env)?),
            Expr::Atan2(y, x) => y.evaluate(env)?.atan2(x.evaluate(env)?),
        };
        Ok(value)
    }

    /// Simplifies and returns the numeric value if no leaves remain.
    pub fn to_f64(&self) -> Result<f64, SymbolicError> {
        let simplified = self.simplify();
        match simplified.as_number() {
            Some(value) => Ok(value),
            None => simplified.evaluate(&Environment::new()).map_err(|_| {
                SymbolicError::NotNumeric(self.to_string())
            }),
        }
    }
}
