use crate::expr::Expr;
use std::f64::consts::PI;
use std::fmt;

fn format_number(value: f64) -> String {
    if (value - PI).abs() < 1e-15 {
        "pi".to_string()
    } else if (value + PI).abs() < 1e-15 {
        "-pi".to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Splits a leading negative numeric coefficient off a term for "a - b" style printing.
fn negated_term(expr: &Expr) -> Option<Expr> {
    match expr {
        Expr::Number(n) if *n < 0.0 => Some(Expr::Number(-n)),
        Expr::Mul(factors) => match factors.first() {
            Some(Expr::Number(n)) if *n < 0.0 => {
                let mut rest = factors.clone();
                rest[0] = Expr::Number(-n);
                Some(Expr::product(rest))
            }
            _ => None,
        },
        _ => None,
    }
}

fn needs_parens_as_factor(expr: &Expr) -> bool {
    matches!(expr, Expr::Add(_))
}

fn needs_parens_as_base(expr: &Expr) -> bool {
    match expr {
        Expr::Add(_) | Expr::Mul(_) | Expr::Pow(..) => true,
        Expr::Number(n) => *n < 0.0 || n.fract() != 0.0,
        _ => false,
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", format_number(*n)),
            Expr::Symbol(s) => write!(f, "{s}"),
            Expr::Add(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    match (i, negated_term(term)) {
                        (0, _) => write!(f, "{term}")?,
                        (_, Some(positive)) => write!(f, " - {positive}")?,
                        (_, None) => write!(f, " + {term}")?,
                    }
                }
                Ok(())
            }
            Expr::Mul(factors) => {
                let mut first = true;
                for factor in factors {
                    if first && matches!(factor, Expr::Number(n) if *n == -1.0) && factors.len() > 1 {
                        write!(f, "-")?;
                        continue;
                    }
                    if !first {
                        write!(f, "*")?;
                    }
                    if needs_parens_as_factor(factor) {
                        write!(f, "({factor})")?;
                    } else {
                        write!(f, "{factor}")?;
                    }
                    first = false;
                }
                Ok(())
            }
            Expr::Pow(base, exponent) => {
                if exponent.as_number() == Some(0.5) {
                    return write!(f, "sqrt({base})");
                }
                if needs_parens_as_base(base) {
                    write!(f, "({base})")?;
                } else {
                    write!(f, "{base}")?;
                }
                match exponent.as_ref() {
                    Expr::Number(n) if *n >= 0.0 => write!(f, "^{}", format_number(*n)),
                    Expr::Symbol(s) => write!(f, "^{s}"),
                    other => write!(f, "^({other})"),
                }
            }
            Expr::Function(function, argument) => write!(f, "{}({argument})", function.name()),
            Expr::Atan2(y, x) => write!(f, "atan2({y}, {x})"),
            Expr::Applied { function, argument } => write!(f, "{function}({argument})"),
            Expr::Derivative {
                function,
                argument,
                order,
            } => match order {
                1 => write!(f, "d({function}({argument}))/d{argument}"),
                n => write!(f, "d^{n}({function}({argument}))/d{argument}^{n}"),
            },
        }
    }
}
