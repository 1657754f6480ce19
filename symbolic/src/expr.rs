use crate::symbol::Symbol;
use std::collections::{BTreeSet, HashMap};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Elementary functions of a single argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Exp,
    Ln,
    Abs,
}

impl Function {
    pub fn name(&self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Asin => "asin",
            Function::Acos => "acos",
            Function::Atan => "atan",
            Function::Exp => "exp",
            Function::Ln => "ln",
            Function::Abs => "abs",
        }
    }

    pub fn apply_f64(&self, v: f64) -> f64 {
        match self {
            Function::Sin => v.sin(),
            Function::Cos => v.cos(),
            Function::Tan => v.tan(),
            Function::Asin => v.asin(),
            Function::Acos => v.acos(),
            Function::Atan => v.atan(),
            Function::Exp => v.exp(),
            Function::Ln => v.ln(),
            Function::Abs => v.abs(),
        }
    }
}

/// A symbolic expression.
///
/// Sums and products hold their operands in a flat list. Square roots are powers with an
/// exponent of one half, and division is multiplication by a power of minus one.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    Symbol(Symbol),
    Add(Vec<Expr>),
    Mul(Vec<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Function(Function, Box<Expr>),
    Atan2(Box<Expr>, Box<Expr>),
    /// An undefined function applied to a symbol, e.g. `phi(t)`.
    Applied { function: Symbol, argument: Symbol },
    /// The unevaluated `order`-th derivative of `function(argument)` w.r.t. `argument`.
    Derivative {
        function: Symbol,
        argument: Symbol,
        order: u32,
    },
}

impl Default for Expr {
    fn default() -> Self {
        Expr::Number(0.0)
    }
}

impl Expr {
    pub fn zero() -> Self {
        Expr::Number(0.0)
    }

    pub fn one() -> Self {
        Expr::Number(1.0)
    }

    pub fn number(value: f64) -> Self {
        Expr::Number(value)
    }

    pub fn symbol(symbol: &Symbol) -> Self {
        Expr::Symbol(symbol.clone())
    }

    /// `function(argument)`, a coordinate that evolves with `argument` (usually time).
    pub fn applied(function: &Symbol, argument: &Symbol) -> Self {
        Expr::Applied {
            function: function.clone(),
            argument: argument.clone(),
        }
    }

    /// Sum of `terms`, flattening nested sums and dropping zeros.
    pub fn sum(terms: Vec<Expr>) -> Self {
        let mut flat = Vec::with_capacity(terms.len());
        for term in terms {
            match term {
                Expr::Add(inner) => flat.extend(inner),
                Expr::Number(n) if n == 0.0 => {}
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => Expr::zero(),
            1 => flat.remove(0),
            _ => Expr::Add(flat),
        }
    }

    /// Product of `factors`, flattening nested products and short-circuiting on zero.
    pub fn product(factors: Vec<Expr>) -> Self {
        let mut flat = Vec::with_capacity(factors.len());
        for factor in factors {
            match factor {
                Expr::Mul(inner) => flat.extend(inner),
                Expr::Number(n) if n == 1.0 => {}
                Expr::Number(n) if n == 0.0 => return Expr::zero(),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => Expr::one(),
            1 => flat.remove(0),
            _ => Expr::Mul(flat),
        }
    }

    pub fn pow(&self, exponent: impl Into<Expr>) -> Expr {
        let exponent = exponent.into();
        match (&exponent, self) {
            (Expr::Number(e), _) if *e == 1.0 => self.clone(),
            (Expr::Number(e), _) if *e == 0.0 => Expr::one(),
            (_, Expr::Number(b)) if *b == 1.0 => Expr::one(),
            _ => Expr::Pow(Box::new(self.clone()), Box::new(exponent)),
        }
    }

    pub fn powi(&self, n: i32) -> Expr {
        self.pow(Expr::Number(n as f64))
    }

    pub fn sqrt(&self) -> Expr {
        self.pow(Expr::Number(0.5))
    }

    pub fn recip(&self) -> Expr {
        self.powi(-1)
    }

    pub fn apply(&self, function: Function) -> Expr {
        Expr::Function(function, Box::new(self.clone()))
    }

    pub fn sin(&self) -> Expr {
        self.apply(Function::Sin)
    }

    pub fn cos(&self) -> Expr {
        self.apply(Function::Cos)
    }

    pub fn tan(&self) -> Expr {
        self.apply(Function::Tan)
    }

    pub fn asin(&self) -> Expr {
        self.apply(Function::Asin)
    }

    pub fn acos(&self) -> Expr {
        self.apply(Function::Acos)
    }

    pub fn atan(&self) -> Expr {
        self.apply(Function::Atan)
    }

    pub fn exp(&self) -> Expr {
        self.apply(Function::Exp)
    }

    pub fn ln(&self) -> Expr {
        self.apply(Function::Ln)
    }

    pub fn abs(&self) -> Expr {
        self.apply(Function::Abs)
    }

    /// Four-quadrant arctangent of `self / x`, with `self` as the ordinate.
    pub fn atan2(&self, x: &Expr) -> Expr {
        Expr::Atan2(Box::new(self.clone()), Box::new(x.clone()))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Expr::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// True only if the expression is literally the number zero. Use `simplify` or
    /// `equivalent` first when the expression may reduce to zero.
    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Number(n) if *n == 0.0)
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Number(n) if *n == 1.0)
    }

    /// True for leaves that numeric evaluation must be given a value for.
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            Expr::Symbol(_) | Expr::Applied { .. } | Expr::Derivative { .. }
        )
    }

    /// Direct children of this node.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::Add(items) | Expr::Mul(items) => items.iter().collect(),
            Expr::Pow(a, b) | Expr::Atan2(a, b) => vec![a.as_ref(), b.as_ref()],
            Expr::Function(_, a) => vec![a.as_ref()],
            _ => Vec::new(),
        }
    }

    /// Rebuilds this node with every child passed through `f`.
    pub fn map_children(&self, f: &mut impl FnMut(&Expr) -> Expr) -> Expr {
        match self {
            Expr::Add(items) => Expr::Add(items.iter().map(&mut *f).collect()),
            Expr::Mul(items) => Expr::Mul(items.iter().map(&mut *f).collect()),
            Expr::Pow(b, e) => Expr::Pow(Box::new(f(b.as_ref())), Box::new(f(e.as_ref()))),
            Expr::Function(func, a) => Expr::Function(*func, Box::new(f(a.as_ref()))),
            Expr::Atan2(y, x) => Expr::Atan2(Box::new(f(y.as_ref())), Box::new(f(x.as_ref()))),
            leaf => leaf.clone(),
        }
    }

    /// Symbols appearing anywhere in the expression, including function arguments.
    pub fn free_symbols(&self) -> BTreeSet<Symbol> {
        let mut symbols = BTreeSet::new();
        self.collect_symbols(&mut symbols);
        symbols
    }

    fn collect_symbols(&self, symbols: &mut BTreeSet<Symbol>) {
        match self {
            Expr::Symbol(s) => {
                symbols.insert(s.clone());
            }
            Expr::Applied { argument, .. } | Expr::Derivative { argument, .. } => {
                symbols.insert(argument.clone());
            }
            _ => {
                for child in self.children() {
                    child.collect_symbols(symbols);
                }
            }
        }
    }

    /// Distinct leaves (symbols, applied functions and derivatives) in first-seen order.
    pub fn atoms(&self) -> Vec<Expr> {
        let mut atoms = Vec::new();
        self.collect_atoms(&mut atoms);
        atoms
    }

    pub(crate) fn collect_atoms(&self, atoms: &mut Vec<Expr>) {
        if self.is_leaf() {
            if !atoms.contains(self) {
                atoms.push(self.clone());
            }
            return;
        }
        for child in self.children() {
            child.collect_atoms(atoms);
        }
    }

    pub fn contains_symbol(&self, symbol: &Symbol) -> bool {
        match self {
            Expr::Symbol(s) => s == symbol,
            Expr::Applied { argument, .. } | Expr::Derivative { argument, .. } => {
                argument == symbol
            }
            _ => self.children().iter().any(|c| c.contains_symbol(symbol)),
        }
    }

    /// Replaces symbols according to `map`. The result is not simplified.
    pub fn subs(&self, map: &HashMap<Symbol, Expr>) -> Expr {
        match self {
            Expr::Symbol(s) => map.get(s).cloned().unwrap_or_else(|| self.clone()),
            _ => self.map_children(&mut |child| child.subs(map)),
        }
    }

    /// Replaces every occurrence of the subtree `from` with `to`.
    pub fn subs_expr(&self, from: &Expr, to: &Expr) -> Expr {
        if self == from {
            return to.clone();
        }
        self.map_children(&mut |child| child.subs_expr(from, to))
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::Number(value)
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Expr::Number(value as f64)
    }
}

impl From<Symbol> for Expr {
    fn from(symbol: Symbol) -> Self {
        Expr::Symbol(symbol)
    }
}

impl From<&Symbol> for Expr {
    fn from(symbol: &Symbol) -> Self {
        Expr::Symbol(symbol.clone())
    }
}

impl From<&Expr> for Expr {
    fn from(expr: &Expr) -> Self {
        expr.clone()
    }
}

fn add_exprs(lhs: Expr, rhs: Expr) -> Expr {
    Expr::sum(vec![lhs, rhs])
}

fn sub_exprs(lhs: Expr, rhs: Expr) -> Expr {
    Expr::sum(vec![lhs, negate(rhs)])
}

fn mul_exprs(lhs: Expr, rhs: Expr) -> Expr {
    Expr::product(vec![lhs, rhs])
}

fn div_exprs(lhs: Expr, rhs: Expr) -> Expr {
    Expr::product(vec![lhs, rhs.recip()])
}

fn negate(expr: Expr) -> Expr {
    match expr {
        Expr::Number(n) => Expr::Number(-n),
        other => Expr::product(vec![Expr::Number(-1.0), other]),
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $build:ident) => {
        impl $trait<Expr> for Expr {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                $build(self, rhs)
            }
        }

        impl $trait<&Expr> for Expr {
            type Output = Expr;
            fn $method(self, rhs: &Expr) -> Expr {
                $build(self, rhs.clone())
            }
        }

        impl $trait<Expr> for &Expr {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                $build(self.clone(), rhs)
            }
        }

        impl $trait<&Expr> for &Expr {
            type Output = Expr;
            fn $method(self, rhs: &Expr) -> Expr {
                $build(self.clone(), rhs.clone())
            }
        }

        impl $trait<f64> for Expr {
            type Output = Expr;
            fn $method(self, rhs: f64) -> Expr {
                $build(self, Expr::Number(rhs))
            }
        }

        impl $trait<f64> for &Expr {
            type Output = Expr;
            fn $method(self, rhs: f64) -> Expr {
                $build(self.clone(), Expr::Number(rhs))
            }
        }

        impl $trait<Expr> for f64 {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                $build(Expr::Number(self), rhs)
            }
        }

        impl $trait<&Expr> for f64 {
            type Output = Expr;
            fn $method(self, rhs: &Expr) -> Expr {
                $build(Expr::Number(self), rhs.clone())
            }
        }
    };
}

impl_binary_op!(Add, add, add_exprs);
impl_binary_op!(Sub, sub, sub_exprs);
impl_binary_op!(Mul, mul, mul_exprs);
impl_binary_op!(Div, div, div_exprs);

impl Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        negate(self)
    }
}

impl Neg for &Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        negate(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::Dimension;

    #[test]
    fn test_operators_flatten() {
        let x = Expr::from(Symbol::new("x", Dimension::LENGTH));
        let y = Expr::from(Symbol::new("y", Dimension::LENGTH));
        let sum = &x + &y + 1.0;
        assert!(matches!(&sum, Expr::Add(terms) if terms.len() == 3));
        let product = 2.0 * &x * &y;
        assert!(matches!(&product, Expr::Mul(factors) if factors.len() == 3));
        assert!((0.0 * &x).is_zero());
        assert_eq!(1.0 * &x, x);
    }

    #[test]
    fn test_subs_replaces_symbols() {
        let s = Symbol::new("s", Dimension::DIMENSIONLESS);
        let e = Expr::from(&s).sin() + &Expr::from(&s);
        let mut map = HashMap::new();
        map.insert(s.clone(), Expr::number(2.0));
        let replaced = e.subs(&map);
        assert!(!replaced.contains_symbol(&s));
        assert!(replaced.free_symbols().is_empty());
    }

    #[test]
    fn test_atoms_include_applied_functions() {
        let t = Symbol::new("t", Dimension::TIME);
        let phi = Symbol::new("phi", Dimension::ANGLE);
        let e = Expr::applied(&phi, &t).cos() * Expr::from(&t);
        let atoms = e.atoms();
        assert_eq!(atoms.len(), 2);
        assert!(atoms.contains(&Expr::applied(&phi, &t)));
        assert!(e.contains_symbol(&t));
    }
}
