use crate::expr::{Expr, Function};
use std::f64::consts::FRAC_PI_2;

/// Largest integer power of a sum that `expand` multiplies out.
const MAX_EXPANDED_POWER: f64 = 6.0;

impl Expr {
    /// Brings the expression into canonical form.
    ///
    /// The expression is normalized, expanded, and normalized again. Normalization flattens
    /// sums and products, folds numbers, collects like terms and like powers, and rewrites
    /// `c*sin(u)^2*R + c*cos(u)^2*R` to `c*R`.
    pub fn simplify(&self) -> Expr {
        self.normalize().expand().normalize()
    }

    /// Single canonicalization pass without distributing products over sums.
    pub fn normalize(&self) -> Expr {
        match self {
            Expr::Add(terms) => build_sum(terms.iter().map(Expr::normalize).collect()),
            Expr::Mul(factors) => build_product(factors.iter().map(Expr::normalize).collect()),
            Expr::Pow(base, exponent) => build_power(base.normalize(), exponent.normalize()),
            Expr::Function(function, argument) => build_function(*function, argument.normalize()),
            Expr::Atan2(y, x) => build_atan2(y.normalize(), x.normalize()),
            leaf => leaf.clone(),
        }
    }

    /// Distributes products over sums and multiplies out small integer powers of sums.
    pub fn expand(&self) -> Expr {
        match self {
            Expr::Add(terms) => Expr::sum(terms.iter().map(Expr::expand).collect()),
            Expr::Mul(factors) => distribute(factors.iter().map(Expr::expand).collect()),
            Expr::Pow(base, exponent) => {
                let base = base.expand();
                let exponent = exponent.expand();
                match (base, exponent.as_number()) {
                    (Expr::Add(terms), Some(n))
                        if n.fract() == 0.0 && (2.0..=MAX_EXPANDED_POWER).contains(&n) =>
                    {
                        distribute(vec![Expr::Add(terms); n as usize])
                    }
                    (Expr::Mul(factors), Some(n)) if n.fract() == 0.0 => Expr::product(
                        factors
                            .into_iter()
                            .map(|factor| Expr::Pow(Box::new(factor), Box::new(Expr::Number(n))))
                            .collect(),
                    ),
                    (base, _) => Expr::Pow(Box::new(base), Box::new(exponent)),
                }
            }
            other => other.map_children(&mut |child| child.expand()),
        }
    }
}

fn distribute(factors: Vec<Expr>) -> Expr {
    let mut terms = vec![Expr::one()];
    for factor in factors {
        match factor {
            Expr::Add(addends) => {
                let mut next = Vec::with_capacity(terms.len() * addends.len());
                for term in &terms {
                    for addend in &addends {
                        next.push(Expr::product(vec![term.clone(), addend.clone()]));
                    }
                }
                terms = next;
            }
            other => {
                for term in terms.iter_mut() {
                    *term = Expr::product(vec![term.clone(), other.clone()]);
                }
            }
        }
    }
    Expr::sum(terms)
}

fn sort_key(expr: &Expr) -> String {
    expr.to_string()
}

/// Splits a canonical term into its numeric coefficient and the remaining product.
pub(crate) fn split_coefficient(expr: &Expr) -> (f64, Expr) {
    match expr {
        Expr::Number(n) => (*n, Expr::one()),
        Expr::Mul(factors) => {
            let mut coefficient = 1.0;
            let mut rest = Vec::with_capacity(factors.len());
            for factor in factors {
                match factor {
                    Expr::Number(n) => coefficient *= n,
                    other => rest.push(other.clone()),
                }
            }
            let rest = match rest.len() {
                0 => Expr::one(),
                1 => rest.remove(0),
                _ => Expr::Mul(rest),
            };
            (coefficient, rest)
        }
        other => (1.0, other.clone()),
    }
}

fn factors_of(expr: &Expr) -> Vec<Expr> {
    match expr {
        Expr::Mul(factors) => factors.clone(),
        Expr::Number(n) if *n == 1.0 => Vec::new(),
        other => vec![other.clone()],
    }
}

fn squared_function_argument(factor: &Expr, function: Function) -> Option<&Expr> {
    match factor {
        Expr::Pow(base, exponent) if exponent.as_number() == Some(2.0) => match base.as_ref() {
            Expr::Function(f, argument) if *f == function => Some(argument),
            _ => None,
        },
        _ => None,
    }
}

fn merge_term(groups: &mut Vec<(Expr, f64)>, rest: Expr, coefficient: f64) {
    match groups.iter_mut().find(|(existing, _)| *existing == rest) {
        Some((_, c)) => *c += coefficient,
        None => groups.push((rest, coefficient)),
    }
}

/// Rewrites one `a*sin(u)^2*R + b*cos(u)^2*R` pair into `b*R + (a - b)*sin(u)^2*R`.
/// Returns false when no pair is left.
fn rewrite_pythagorean_pair(groups: &mut Vec<(Expr, f64)>) -> bool {
    for i in 0..groups.len() {
        let factors = factors_of(&groups[i].0);
        for (k, factor) in factors.iter().enumerate() {
            let Some(argument) = squared_function_argument(factor, Function::Sin) else {
                continue;
            };
            let mut others: Vec<Expr> = factors
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != k)
                .map(|(_, f)| f.clone())
                .collect();
            let remainder = build_product(others.clone());
            others.push(argument.cos().powi(2));
            let partner = build_product(others);
            let Some(j) = groups.iter().position(|(rest, _)| *rest == partner) else {
                continue;
            };
            let sin_coefficient = groups[i].1;
            let cos_coefficient = groups[j].1;
            groups[i].1 = sin_coefficient - cos_coefficient;
            groups.remove(j);
            merge_term(groups, remainder, cos_coefficient);
            return true;
        }
    }
    false
}

fn build_sum(terms: Vec<Expr>) -> Expr {
    let mut constant = 0.0;
    let mut groups: Vec<(Expr, f64)> = Vec::new();
    let mut pending = terms;
    while let Some(term) = pending.pop() {
        match term {
            Expr::Add(inner) => pending.extend(inner),
            Expr::Number(n) => constant += n,
            other => {
                let (coefficient, rest) = split_coefficient(&other);
                merge_term(&mut groups, rest, coefficient);
            }
        }
    }
    while rewrite_pythagorean_pair(&mut groups) {}

    let mut out: Vec<Expr> = Vec::with_capacity(groups.len() + 1);
    for (rest, coefficient) in groups {
        if coefficient == 0.0 {
            continue;
        }
        if rest.is_one() {
            constant += coefficient;
            continue;
        }
        out.push(build_product(vec![Expr::Number(coefficient), rest]));
    }
    out.sort_by_cached_key(sort_key);
    if constant != 0.0 {
        out.insert(0, Expr::Number(constant));
    }
    match out.len() {
        0 => Expr::zero(),
        1 => out.remove(0),
        _ => Expr::Add(out),
    }
}

fn build_product(factors: Vec<Expr>) -> Expr {
    let mut constant = 1.0;
    let mut bases: Vec<(Expr, Vec<Expr>)> = Vec::new();
    let mut pending = factors;
    while let Some(factor) = pending.pop() {
        match factor {
            Expr::Mul(inner) => pending.extend(inner),
            Expr::Number(n) => constant *= n,
            Expr::Pow(base, exponent) => push_power(&mut bases, *base, *exponent),
            other => push_power(&mut bases, other, Expr::one()),
        }
    }
    if constant == 0.0 {
        return Expr::zero();
    }

    let mut out: Vec<Expr> = Vec::with_capacity(bases.len() + 1);
    for (base, exponents) in bases {
        match build_power(base, build_sum(exponents)) {
            Expr::Number(n) => constant *= n,
            Expr::Mul(inner) => out.extend(inner),
            other => out.push(other),
        }
    }
    if constant == 0.0 {
        return Expr::zero();
    }
    out.sort_by_cached_key(sort_key);
    if constant != 1.0 {
        out.insert(0, Expr::Number(constant));
    }
    match out.len() {
        0 => Expr::one(),
        1 => out.remove(0),
        _ => Expr::Mul(out),
    }
}

fn push_power(bases: &mut Vec<(Expr, Vec<Expr>)>, base: Expr, exponent: Expr) {
    match bases.iter_mut().find(|(existing, _)| *existing == base) {
        Some((_, exponents)) => exponents.push(exponent),
        None => bases.push((base, vec![exponent])),
    }
}

fn is_integer(value: f64) -> bool {
    value.fract() == 0.0 && value.is_finite()
}

fn build_power(base: Expr, exponent: Expr) -> Expr {
    match exponent.as_number() {
        Some(e) if e == 0.0 => return Expr::one(),
        Some(e) if e == 1.0 => return base,
        _ => {}
    }
    if base.is_one() {
        return Expr::one();
    }
    match (base, exponent) {
        (Expr::Number(b), Expr::Number(e)) => {
            let value = b.powf(e);
            if value.is_finite() && (b >= 0.0 || is_integer(e)) {
                Expr::Number(value)
            } else {
                Expr::Pow(Box::new(Expr::Number(b)), Box::new(Expr::Number(e)))
            }
        }
        // (b^e1)^n = b^(e1*n) holds for integer n without any sign assumption on b
        (Expr::Pow(inner_base, inner_exponent), Expr::Number(n)) if is_integer(n) => {
            build_power(*inner_base, build_product(vec![*inner_exponent, Expr::Number(n)]))
        }
        (base, exponent) => Expr::Pow(Box::new(base), Box::new(exponent)),
    }
}

/// sin/cos of a nonzero multiple of pi/2, so that e.g. `sin(atan2(0, -1))` folds to zero.
///
/// The angle must match the multiple up to a few ulps of its own magnitude. Angles near zero
/// are left to `f64::sin`, which is already exact there.
fn quarter_turn_value(function: Function, angle: f64) -> Option<f64> {
    let quarter_turns = angle / FRAC_PI_2;
    let nearest = quarter_turns.round();
    if nearest == 0.0 || nearest.abs() > 1e9 {
        return None;
    }
    if (quarter_turns - nearest).abs() > 64.0 * f64::EPSILON * nearest.abs() {
        return None;
    }
    let k = (nearest as i64).rem_euclid(4);
    match (function, k) {
        (Function::Sin, 0) | (Function::Sin, 2) | (Function::Cos, 1) | (Function::Cos, 3) => Some(0.0),
        (Function::Sin, 1) | (Function::Cos, 0) => Some(1.0),
        (Function::Sin, 3) | (Function::Cos, 2) => Some(-1.0),
        _ => None,
    }
}

fn build_function(function: Function, argument: Expr) -> Expr {
    if let Expr::Number(v) = argument {
        if let Some(exact) = quarter_turn_value(function, v) {
            return Expr::Number(exact);
        }
        let value = function.apply_f64(v);
        if value.is_finite() {
            return Expr::Number(value);
        }
        return Expr::Function(function, Box::new(argument));
    }
    let (coefficient, _) = split_coefficient(&argument);
    if coefficient < 0.0 {
        let positive = build_product(vec![Expr::Number(-1.0), argument.clone()]);
        match function {
            Function::Cos | Function::Abs => {
                return Expr::Function(function, Box::new(positive));
            }
            Function::Sin | Function::Tan | Function::Asin | Function::Atan => {
                return build_product(vec![
                    Expr::Number(-1.0),
                    Expr::Function(function, Box::new(positive)),
                ]);
            }
            _ => {}
        }
    }
    if let Expr::Function(inner_function, inner) = &argument {
        if matches!(
            (function, inner_function),
            (Function::Exp, Function::Ln) | (Function::Ln, Function::Exp)
        ) {
            return inner.as_ref().clone();
        }
    }
    Expr::Function(function, Box::new(argument))
}

fn build_atan2(y: Expr, x: Expr) -> Expr {
    if let (Some(a), Some(b)) = (y.as_number(), x.as_number()) {
        return Expr::Number(a.atan2(b));
    }
    Expr::Atan2(Box::new(y), Box::new(x))
}

#[cfg(test)]
mod tests {
    use crate::dimension::Dimension;
    use approx::assert_relative_eq;
    use crate::expr::Expr;
    use crate::symbol::Symbol;
    use std::f64::consts::PI;

    fn length(name: &str) -> Expr {
        Expr::from(Symbol::new(name, Dimension::LENGTH))
    }

    fn angle(name: &str) -> Expr {
        Expr::from(Symbol::new(name, Dimension::ANGLE))
    }

    #[test]
    fn test_collects_like_terms() {
        let x = length("x");
        let e = &x + &x + 2.0 * &x - 4.0 * &x;
        assert!(e.simplify().is_zero());
    }

    #[test]
    fn test_collects_like_powers() {
        let x = length("x");
        let e = &x * &x / x.powi(2);
        assert!(e.simplify().is_one());
        let s = x.sqrt() * x.sqrt();
        assert_eq!(s.simplify(), x);
    }

    #[test]
    fn test_square_of_square_root() {
        let x = length("x");
        let y = length("y");
        let rho = (x.powi(2) + y.powi(2)).sqrt();
        let expected = (x.powi(2) + y.powi(2)).simplify();
        assert_eq!(rho.powi(2).simplify(), expected);
    }

    #[test]
    fn test_expands_products_of_sums() {
        let x = length("x");
        let y = length("y");
        let lhs = (&x + &y) * (&x - &y);
        let rhs = x.powi(2) - y.powi(2);
        assert!((lhs - rhs).simplify().is_zero());
    }

    #[test]
    fn test_pythagorean_identity() {
        let r = length("r");
        let theta = angle("theta");
        let e = &r * theta.sin().powi(2) + &r * theta.cos().powi(2);
        assert_eq!(e.simplify(), r);

        let unbalanced = 3.0 * theta.sin().powi(2) + 2.0 * theta.cos().powi(2) - 2.0;
        let expected = theta.sin().powi(2).simplify();
        assert_eq!(unbalanced.simplify(), expected);
    }

    #[test]
    fn test_folds_quarter_turns_exactly() {
        let pi = Expr::number(PI);
        assert!(pi.sin().simplify().is_zero());
        assert_eq!(pi.cos().simplify(), Expr::number(-1.0));
        assert!((pi / 2.0).cos().simplify().is_zero());
        let atan = Expr::number(0.0).atan2(&Expr::number(-1.0));
        assert_eq!(atan.simplify(), Expr::number(PI));
        assert!(Expr::number(3.0 * PI / 2.0).cos().simplify().is_zero());
        assert_eq!(Expr::number(-PI / 2.0).sin().simplify(), Expr::number(-1.0));
    }

    #[test]
    fn test_small_angles_are_not_folded() {
        let tiny = Expr::number(1e-13).sin().simplify();
        assert_relative_eq!(tiny.as_number().unwrap(), 1e-13, max_relative = 1e-12);

        let near_pi = Expr::number(PI + 1e-10).sin().simplify();
        assert_relative_eq!(near_pi.as_number().unwrap(), -1e-10, max_relative = 1e-5);
    }

    #[test]
    fn test_odd_and_even_functions() {
        let phi = angle("phi");
        assert!((((-&phi).sin()) + phi.sin()).simplify().is_zero());
        assert!((((-&phi).cos()) - phi.cos()).simplify().is_zero());
    }
}
