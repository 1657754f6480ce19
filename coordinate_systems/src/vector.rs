use crate::coordinate_system::CoordinateSystem;
use crate::point::Point;
use crate::vector_conversion::VectorMapping;
use crate::CoordinateSystemError;
use std::collections::HashMap;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use symbolic::{EquivalenceSettings, Expr, Symbol};

/// One of the three unit base vectors of a system, optionally tied to the point it is applied
/// at.
///
/// A base vector without a point stands for the basis field: its direction is a function of
/// the system's base scalars.
#[derive(Clone, Debug, PartialEq)]
pub struct BaseVector {
    system: CoordinateSystem,
    index: usize,
    at: Option<Point>,
}

impl BaseVector {
    pub(crate) fn new(system: CoordinateSystem, index: usize, at: Option<Point>) -> Self {
        Self { system, index, at }
    }

    pub fn system(&self) -> &CoordinateSystem {
        &self.system
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn at(&self) -> Option<&Point> {
        self.at.as_ref()
    }

    pub fn label(&self) -> &Symbol {
        &self.system.base_vector_labels()[self.index]
    }

    /// Cartesian components of this unit vector, in terms of the point's coordinates.
    pub fn cartesian_components(&self) -> Result<[Expr; 3], CoordinateSystemError> {
        let q = self.system.coordinates_at(self.at.as_ref())?;
        Ok(self.system.base_vector_matrix(&q).column(self.index))
    }

    /// Same system and direction, and the points agree where both are given.
    pub(crate) fn matches(&self, other: &BaseVector) -> bool {
        self.system == other.system
            && self.index == other.index
            && match (&self.at, &other.at) {
                (Some(a), Some(b)) => a == b,
                _ => true,
            }
    }
}

impl fmt::Display for BaseVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A linear combination of base vectors with symbolic coefficients.
///
/// Terms may mix systems and points of application. Equality compares the simplified
/// coefficient of every base vector.
#[derive(Clone, Debug, Default)]
pub struct VectorExpr {
    terms: Vec<(BaseVector, Expr)>,
}

impl VectorExpr {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn from_terms(terms: Vec<(BaseVector, Expr)>) -> Self {
        Self { terms }
    }

    pub fn terms(&self) -> &[(BaseVector, Expr)] {
        &self.terms
    }

    /// Sum of the coefficients of every term along `base`.
    pub fn coefficient(&self, base: &BaseVector) -> Expr {
        Expr::sum(
            self.terms
                .iter()
                .filter(|(b, _)| b == base)
                .map(|(_, c)| c.clone())
                .collect(),
        )
        .simplify()
    }

    pub fn scale(&self, factor: &Expr) -> VectorExpr {
        Self::from_terms(
            self.terms
                .iter()
                .map(|(b, c)| (b.clone(), factor * c))
                .collect(),
        )
    }

    /// Applies `f` to every coefficient.
    pub fn map_coefficients(&self, mut f: impl FnMut(&Expr) -> Expr) -> VectorExpr {
        Self::from_terms(self.terms.iter().map(|(b, c)| (b.clone(), f(c))).collect())
    }

    /// Collects like terms, simplifies the coefficients and drops zero terms.
    pub fn simplify(&self) -> VectorExpr {
        let mut collected: Vec<(BaseVector, Vec<Expr>)> = Vec::new();
        for (base, coefficient) in &self.terms {
            match collected.iter_mut().find(|(b, _)| b == base) {
                Some((_, coefficients)) => coefficients.push(coefficient.clone()),
                None => collected.push((base.clone(), vec![coefficient.clone()])),
            }
        }
        Self::from_terms(
            collected
                .into_iter()
                .map(|(base, coefficients)| (base, Expr::sum(coefficients).simplify()))
                .filter(|(_, coefficient)| !coefficient.is_zero())
                .collect(),
        )
    }

    pub fn is_zero(&self) -> bool {
        self.simplify().terms.is_empty()
    }

    pub fn subs_scalars(&self, map: &HashMap<Symbol, Expr>) -> VectorExpr {
        self.map_coefficients(|c| c.subs(map))
    }

    /// Replaces every base vector that appears as a key of `mapping` by its image.
    pub fn subs_vectors(&self, mapping: &VectorMapping) -> VectorExpr {
        let mut out = VectorExpr::zero();
        for (base, coefficient) in &self.terms {
            match mapping.iter().find(|(key, _)| key.matches(base)) {
                Some((_, image)) => out.terms.extend(image.scale(coefficient).terms),
                None => out.terms.push((base.clone(), coefficient.clone())),
            }
        }
        out
    }

    /// Components along the base vectors of `system`.
    ///
    /// Fails if any term is along a base vector of another system.
    pub fn components_in(&self, system: &CoordinateSystem) -> Result<[Expr; 3], CoordinateSystemError> {
        let mut components: [Vec<Expr>; 3] = Default::default();
        for (base, coefficient) in &self.terms {
            if base.system() != system {
                return Err(CoordinateSystemError::ForeignBaseVector {
                    vector: base.to_string(),
                    system: system.to_string(),
                });
            }
            components[base.index()].push(coefficient.clone());
        }
        Ok(components.map(|terms| Expr::sum(terms).simplify()))
    }

    /// Cartesian components, resolving every base vector at its point of application.
    pub fn cartesian_components(&self) -> Result<[Expr; 3], CoordinateSystemError> {
        let mut components: [Vec<Expr>; 3] = Default::default();
        for (base, coefficient) in &self.terms {
            for (component, direction) in components.iter_mut().zip(base.cartesian_components()?) {
                component.push(coefficient * direction);
            }
        }
        Ok(components.map(|terms| Expr::sum(terms).simplify()))
    }

    pub fn dot(&self, other: &VectorExpr) -> Result<Expr, CoordinateSystemError> {
        let [a1, a2, a3] = self.cartesian_components()?;
        let [b1, b2, b3] = other.cartesian_components()?;
        Ok((a1 * b1 + a2 * b2 + a3 * b3).simplify())
    }

    /// Cross product, expressed in the default Cartesian system.
    pub fn cross(&self, other: &VectorExpr) -> Result<VectorExpr, CoordinateSystemError> {
        let [a1, a2, a3] = self.cartesian_components()?;
        let [b1, b2, b3] = other.cartesian_components()?;
        let components = [
            &a2 * &b3 - &a3 * &b2,
            &a3 * &b1 - &a1 * &b3,
            &a1 * &b2 - &a2 * &b1,
        ];
        Ok(cartesian_vector(components).simplify())
    }

    pub fn norm_squared(&self) -> Result<Expr, CoordinateSystemError> {
        self.dot(self)
    }

    /// Compares Cartesian components, so vectors written in different bases can be equivalent.
    pub fn equivalent(
        &self,
        other: &VectorExpr,
        settings: &EquivalenceSettings,
    ) -> Result<bool, CoordinateSystemError> {
        let a = self.cartesian_components()?;
        let b = other.cartesian_components()?;
        Ok(a.iter().zip(&b).all(|(a, b)| a.equivalent(b, settings)))
    }
}

/// The vector with the given components along `i`, `j`, `k` of the default Cartesian system.
pub fn cartesian_vector(components: [Expr; 3]) -> VectorExpr {
    let system = CoordinateSystem::cartesian();
    VectorExpr::from_terms(
        components
            .into_iter()
            .enumerate()
            .map(|(i, c)| (system.base_vector(i, None), c))
            .collect(),
    )
}

impl From<BaseVector> for VectorExpr {
    fn from(base: BaseVector) -> Self {
        Self::from_terms(vec![(base, Expr::one())])
    }
}

impl PartialEq for VectorExpr {
    fn eq(&self, other: &Self) -> bool {
        let settings = EquivalenceSettings::default();
        self.terms
            .iter()
            .chain(&other.terms)
            .all(|(base, _)| self.coefficient(base).equivalent(&other.coefficient(base), &settings))
    }
}

impl Add for VectorExpr {
    type Output = VectorExpr;
    fn add(mut self, rhs: VectorExpr) -> VectorExpr {
        self.terms.extend(rhs.terms);
        self
    }
}

impl Sub for VectorExpr {
    type Output = VectorExpr;
    fn sub(self, rhs: VectorExpr) -> VectorExpr {
        self + -rhs
    }
}

impl Neg for VectorExpr {
    type Output = VectorExpr;
    fn neg(self) -> VectorExpr {
        self.map_coefficients(|c| -c)
    }
}

impl Mul<Expr> for VectorExpr {
    type Output = VectorExpr;
    fn mul(self, rhs: Expr) -> VectorExpr {
        self.scale(&rhs)
    }
}

impl Mul<&Expr> for &VectorExpr {
    type Output = VectorExpr;
    fn mul(self, rhs: &Expr) -> VectorExpr {
        self.scale(rhs)
    }
}

impl Mul<f64> for VectorExpr {
    type Output = VectorExpr;
    fn mul(self, rhs: f64) -> VectorExpr {
        self.scale(&Expr::number(rhs))
    }
}

impl Mul<VectorExpr> for Expr {
    type Output = VectorExpr;
    fn mul(self, rhs: VectorExpr) -> VectorExpr {
        rhs.scale(&self)
    }
}

impl Mul<VectorExpr> for f64 {
    type Output = VectorExpr;
    fn mul(self, rhs: VectorExpr) -> VectorExpr {
        rhs.scale(&Expr::number(self))
    }
}

impl fmt::Display for VectorExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        for (n, (base, coefficient)) in self.terms.iter().enumerate() {
            let coefficient = coefficient.simplify();
            let negative = match &coefficient {
                Expr::Number(v) => *v < 0.0,
                Expr::Mul(factors) => factors.iter().filter_map(Expr::as_number).any(|v| v < 0.0),
                _ => false,
            };
            let magnitude = if negative {
                (-coefficient).simplify()
            } else {
                coefficient
            };
            match (n, negative) {
                (0, true) => write!(f, "-")?,
                (0, false) => {}
                (_, true) => write!(f, " - ")?,
                (_, false) => write!(f, " + ")?,
            }
            if magnitude.is_one() {
                write!(f, "{base}")?;
            } else if matches!(magnitude, Expr::Add(_)) {
                write!(f, "({magnitude})*{base}")?;
            } else {
                write!(f, "{magnitude}*{base}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point;

    fn cylindrical_at(point: &Point) -> [VectorExpr; 3] {
        CoordinateSystem::cylindrical().base_vectors(Some(point)).unwrap()
    }

    #[test]
    fn test_simplify_collects_and_drops_terms() {
        let [i, j, k] = CoordinateSystem::cartesian().base_vectors(None).unwrap();
        let v = i.clone() * 2.0 + j.clone() - i.clone() * 2.0 + k.clone() * 0.0;
        let simplified = v.simplify();
        assert_eq!(simplified.terms().len(), 1);
        assert_eq!(simplified, j);
        assert!((i.clone() - i).is_zero());
    }

    #[test]
    fn test_display() {
        let system = CoordinateSystem::cylindrical();
        let point = Point::applied([1.0, 2.0, 3.0], &system).unwrap();
        let [_, e_phi, e_z] = cylindrical_at(&point);
        let v = -e_phi + e_z * Expr::number(2.0);
        assert_eq!(v.to_string(), "-e_phi + 2*e_z");
        assert_eq!(VectorExpr::zero().to_string(), "0");
    }

    #[test]
    fn test_components_in_rejects_foreign_base_vectors() {
        let cartesian = CoordinateSystem::cartesian();
        let point = Point::applied([1.0, 0.5, 0.0], &CoordinateSystem::cylindrical()).unwrap();
        let [e_rho, ..] = cylindrical_at(&point);
        let [i, ..] = cartesian.base_vectors(None).unwrap();

        let components = (i.clone() * 3.0).components_in(&cartesian).unwrap();
        assert_eq!(components[0], Expr::number(3.0));
        assert!(matches!(
            (i + e_rho).components_in(&cartesian),
            Err(CoordinateSystemError::ForeignBaseVector { vector, .. }) if vector == "e_rho"
        ));
    }

    #[test]
    fn test_cylindrical_basis_is_orthonormal_at_a_point() {
        let system = CoordinateSystem::cylindrical();
        let point = Point::symbolic("P", None);
        let [e_rho, e_phi, e_z] = cylindrical_at(&point);
        let settings = EquivalenceSettings::default();
        assert!(e_rho.dot(&e_rho).unwrap().is_one());
        assert!(e_rho.dot(&e_phi).unwrap().is_zero());
        assert!(e_rho.cross(&e_phi).unwrap().equivalent(&e_z, &settings).unwrap());
        assert!(system.base_vectors(Some(&point)).is_ok());
    }

    #[test]
    fn test_vectors_at_distinct_points_do_not_combine() {
        let system = CoordinateSystem::cylindrical();
        let p = Point::applied([1.0, 0.0, 0.0], &system).unwrap();
        let q = Point::applied([1.0, 1.0, 0.0], &system).unwrap();
        let [at_p, ..] = cylindrical_at(&p);
        let [at_q, ..] = cylindrical_at(&q);
        assert_eq!((at_p.clone() + at_q.clone()).simplify().terms().len(), 2);
        assert_ne!(at_p, at_q);
    }

    #[test]
    fn test_norm_squared_in_spherical() {
        let system = CoordinateSystem::spherical();
        let point = Point::symbolic("P", None);
        let [e_r, e_theta, _] = system.base_vectors(Some(&point)).unwrap();
        let v = e_r * 3.0 + e_theta * 4.0;
        let settings = EquivalenceSettings::default();
        assert!(v.norm_squared().unwrap().equivalent(&Expr::number(25.0), &settings));
    }
}
