use serde::{Deserialize, Serialize};

/// Absolute and relative tolerances used when comparing two floating point values that are
/// expected to be the same quantity computed two different ways.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tolerances {
    abs_tol: f64,
    rel_tol: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs_tol: 1e-9,
            rel_tol: 1e-9,
        }
    }
}

impl Tolerances {
    pub fn new(rel_tol: f64, abs_tol: f64) -> Self {
        Self { rel_tol, abs_tol }
    }

    pub fn abs_tol(&self) -> f64 {
        self.abs_tol
    }

    pub fn rel_tol(&self) -> f64 {
        self.rel_tol
    }

    /// Returns true if `xf` matches `x0` within either tolerance.
    pub fn check_error(&self, x0: f64, xf: f64) -> bool {
        check_error(x0, xf, self.rel_tol, self.abs_tol)
    }

    /// Returns true if `x` is zero within the absolute tolerance.
    /// A relative tolerance has no meaning against zero, so it is not consulted.
    pub fn check_zero(&self, x: f64) -> bool {
        x.abs() <= self.abs_tol
    }
}

/// Compares `xf` against the reference value `x0`.
///
/// The relative error is measured against the larger magnitude of the two values so that
/// a reference of exactly zero does not trivially pass.
pub fn check_error(x0: f64, xf: f64, rel_tol: f64, abs_tol: f64) -> bool {
    let abs_diff = (xf - x0).abs();
    let scale = x0.abs().max(xf.abs());
    abs_diff <= abs_tol || abs_diff <= rel_tol * scale
}
