use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Div, Mul};

/// Physical dimension of a symbol, stored as integer exponents of the base dimensions.
///
/// Angles are tracked as their own base dimension rather than folded into dimensionless,
/// so that an angular coordinate can be told apart from a ratio.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimension {
    pub length: i8,
    pub mass: i8,
    pub time: i8,
    pub angle: i8,
}

impl Dimension {
    pub const DIMENSIONLESS: Self = Self::new(0, 0, 0, 0);
    pub const LENGTH: Self = Self::new(1, 0, 0, 0);
    pub const MASS: Self = Self::new(0, 1, 0, 0);
    pub const TIME: Self = Self::new(0, 0, 1, 0);
    pub const ANGLE: Self = Self::new(0, 0, 0, 1);

    pub const fn new(length: i8, mass: i8, time: i8, angle: i8) -> Self {
        Self {
            length,
            mass,
            time,
            angle,
        }
    }

    pub fn is_dimensionless(&self) -> bool {
        *self == Self::DIMENSIONLESS
    }

    fn exponents(self) -> [i8; 4] {
        [self.length, self.mass, self.time, self.angle]
    }

    fn from_exponents([length, mass, time, angle]: [i8; 4]) -> Self {
        Self::new(length, mass, time, angle)
    }

    /// The dimension raised to the `n`-th power, or `None` if an exponent leaves the `i8`
    /// range.
    pub fn checked_powi(self, n: i8) -> Option<Self> {
        let [l, m, t, a] = self.exponents();
        Some(Self::new(
            l.checked_mul(n)?,
            m.checked_mul(n)?,
            t.checked_mul(n)?,
            a.checked_mul(n)?,
        ))
    }

    /// Product of two dimensions, or `None` if an exponent leaves the `i8` range.
    pub fn checked_mul(self, rhs: Dimension) -> Option<Self> {
        let ([l, m, t, a], [rl, rm, rt, ra]) = (self.exponents(), rhs.exponents());
        Some(Self::new(
            l.checked_add(rl)?,
            m.checked_add(rm)?,
            t.checked_add(rt)?,
            a.checked_add(ra)?,
        ))
    }

    /// Like [`Dimension::checked_powi`], saturating exponents at the `i8` bounds.
    pub fn powi(self, n: i8) -> Self {
        Self::from_exponents(self.exponents().map(|e| e.saturating_mul(n)))
    }
}

/// Exponents saturate at the `i8` bounds; use [`Dimension::checked_mul`] to detect overflow.
impl Mul<Dimension> for Dimension {
    type Output = Self;
    fn mul(self, rhs: Dimension) -> Dimension {
        let (lhs, rhs) = (self.exponents(), rhs.exponents());
        Self::from_exponents(std::array::from_fn(|i| lhs[i].saturating_add(rhs[i])))
    }
}

impl Div<Dimension> for Dimension {
    type Output = Self;
    fn div(self, rhs: Dimension) -> Dimension {
        self * rhs.powi(-1)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dimensionless() {
            return write!(f, "dimensionless");
        }
        let parts: Vec<String> = [
            ("length", self.length),
            ("mass", self.mass),
            ("time", self.time),
            ("angle", self.angle),
        ]
        .iter()
        .filter(|(_, exponent)| *exponent != 0)
        .map(|(name, exponent)| match exponent {
            1 => name.to_string(),
            n => format!("{name}^{n}"),
        })
        .collect();
        write!(f, "{}", parts.join("*"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_algebra() {
        let velocity = Dimension::LENGTH / Dimension::TIME;
        assert_eq!(velocity, Dimension::new(1, 0, -1, 0));
        assert_eq!(velocity * Dimension::TIME, Dimension::LENGTH);
        assert!((Dimension::ANGLE / Dimension::ANGLE).is_dimensionless());
    }

    #[test]
    fn test_dimension_display() {
        assert_eq!(Dimension::DIMENSIONLESS.to_string(), "dimensionless");
        assert_eq!(Dimension::LENGTH.powi(2).to_string(), "length^2");
        assert_eq!(
            (Dimension::LENGTH / Dimension::TIME).to_string(),
            "length*time^-1"
        );
    }

    #[test]
    fn test_exponent_overflow() {
        let big = Dimension::new(100, 0, 0, 0);
        assert_eq!(big.checked_powi(2), None);
        assert_eq!(big.checked_mul(big), None);
        assert_eq!(big.powi(2), Dimension::new(i8::MAX, 0, 0, 0));
        assert_eq!(big * big, Dimension::new(i8::MAX, 0, 0, 0));
        assert_eq!(
            Dimension::LENGTH.checked_mul(Dimension::TIME),
            Some(Dimension::new(1, 0, 1, 0))
        );
        assert_eq!(Dimension::new(i8::MIN, 0, 0, 0).powi(-1).length, i8::MAX);
    }
}
