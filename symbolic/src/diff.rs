use crate::expr::{Expr, Function};
use crate::symbol::Symbol;

impl Expr {
    /// Derivative with respect to `symbol`, normalized.
    ///
    /// Applied functions of `symbol` differentiate to unevaluated derivatives, so the chain
    /// rule through a time-parametrized coordinate `q(t)` yields terms in `d(q(t))/dt`.
    pub fn diff(&self, symbol: &Symbol) -> Expr {
        self.derivative(symbol).normalize()
    }

    fn derivative(&self, s: &Symbol) -> Expr {
        if !self.contains_symbol(s) {
            return Expr::zero();
        }
        match self {
            Expr::Number(_) => Expr::zero(),
            Expr::Symbol(x) => {
                if x == s {
                    Expr::one()
                } else {
                    Expr::zero()
                }
            }
            Expr::Add(terms) => Expr::sum(terms.iter().map(|t| t.derivative(s)).collect()),
            Expr::Mul(factors) => {
                let mut terms = Vec::with_capacity(factors.len());
                for (i, factor) in factors.iter().enumerate() {
                    let d = factor.derivative(s);
                    if d.is_zero() {
                        continue;
                    }
                    let mut product = factors.clone();
                    product[i] = d;
                    terms.push(Expr::product(product));
                }
                Expr::sum(terms)
            }
            Expr::Pow(base, exponent) => {
                let db = base.derivative(s);
                if !exponent.contains_symbol(s) {
                    let lowered = Expr::sum(vec![exponent.as_ref().clone(), Expr::Number(-1.0)]);
                    return Expr::product(vec![exponent.as_ref().clone(), base.pow(lowered), db]);
                }
                let de = exponent.derivative(s);
                Expr::product(vec![
                    self.clone(),
                    Expr::sum(vec![
                        Expr::product(vec![de, base.ln()]),
                        Expr::product(vec![exponent.as_ref().clone(), db, base.recip()]),
                    ]),
                ])
            }
            Expr::Function(function, argument) => {
                let du = argument.derivative(s);
                let u = argument.as_ref();
                let outer = match function {
                    Function::Sin => u.cos(),
                    Function::Cos => -u.sin(),
                    Function::Tan => Expr::one() + u.tan().powi(2),
                    Function::Asin => (Expr::one() - u.powi(2)).sqrt().recip(),
                    Function::Acos => -(Expr::one() - u.powi(2)).sqrt().recip(),
                    Function::Atan => (Expr::one() + u.powi(2)).recip(),
                    Function::Exp => u.exp(),
                    Function::Ln => u.recip(),
                    Function::Abs => u * u.abs().recip(),
                };
                Expr::product(vec![outer, du])
            }
            Expr::Atan2(y, x) => {
                let dy = y.derivative(s);
                let dx = x.derivative(s);
                let numerator = x.as_ref() * dy - y.as_ref() * dx;
                let denominator = x.powi(2) + y.powi(2);
                numerator / denominator
            }
            Expr::Applied { function, argument } => {
                if argument == s {
                    Expr::Derivative {
                        function: function.clone(),
                        argument: argument.clone(),
                        order: 1,
                    }
                } else {
                    Expr::zero()
                }
            }
            Expr::Derivative {
                function,
                argument,
                order,
            } => {
                if argument == s {
                    Expr::Derivative {
                        function: function.clone(),
                        argument: argument.clone(),
                        order: order + 1,
                    }
                } else {
                    Expr::zero()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::dimension::Dimension;
    use crate::equivalence::EquivalenceSettings;
    use crate::expr::Expr;
    use crate::symbol::Symbol;

    #[test]
    fn test_polynomial_derivative() {
        let x = Symbol::new("x", Dimension::LENGTH);
        let e = Expr::from(&x).powi(3) + 2.0 * Expr::from(&x);
        let expected = 3.0 * Expr::from(&x).powi(2) + 2.0;
        assert!(e.diff(&x).equivalent(&expected, &EquivalenceSettings::default()));
    }

    #[test]
    fn test_chain_rule_through_applied_function() {
        let t = Symbol::new("t", Dimension::TIME);
        let phi = Symbol::new("phi", Dimension::ANGLE);
        let phi_t = Expr::applied(&phi, &t);
        let d = phi_t.sin().diff(&t);
        let phi_dot = Expr::Derivative {
            function: phi.clone(),
            argument: t.clone(),
            order: 1,
        };
        let expected = phi_t.cos() * &phi_dot;
        assert!((d - expected).simplify().is_zero());

        let second = phi_dot.diff(&t);
        assert!(matches!(second, Expr::Derivative { order: 2, .. }));
    }

    #[test]
    fn test_atan2_derivative() {
        let x = Symbol::new("x", Dimension::LENGTH);
        let y = Symbol::new("y", Dimension::LENGTH);
        let (ex, ey) = (Expr::from(&x), Expr::from(&y));
        let d = ey.atan2(&ex).diff(&x);
        let expected = -&ey / (ex.powi(2) + ey.powi(2));
        assert!(d.equivalent(&expected, &EquivalenceSettings::default()));
    }

    #[test]
    fn test_derivative_of_square_root() {
        let x = Symbol::new("x", Dimension::LENGTH);
        let ex = Expr::from(&x);
        let d = ex.sqrt().diff(&x);
        let expected = 0.5 / ex.sqrt();
        assert!(d.equivalent(&expected, &EquivalenceSettings::default()));
    }

    #[test]
    fn test_independent_symbol_differentiates_to_zero() {
        let x = Symbol::new("x", Dimension::LENGTH);
        let y = Symbol::new("y", Dimension::LENGTH);
        assert!(Expr::from(&y).cos().diff(&x).is_zero());
    }
}
