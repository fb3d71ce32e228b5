//! Norm order `p` shared by the pointwise cost and the final aggregation.

use std::fmt;

use crate::DEFAULT_P;
use crate::error::LpiError;

/// Validated Minkowski exponent `p`, finite and `>= 1`.
///
/// `p = 1` and `p = 2` take exact fast paths (`abs`, `sqrt`), so the p = 2
/// distance is bit-for-bit the Euclidean norm of the residual.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormOrder(f64);

impl NormOrder {
    /// Manhattan norm.
    pub const L1: Self = Self(1.0);
    /// Euclidean norm.
    pub const L2: Self = Self(2.0);

    /// Create a norm order.
    ///
    /// # Errors
    ///
    /// Returns [`LpiError::InvalidParameter`] when `p` is NaN, infinite or below 1.
    pub fn new(p: f64) -> Result<Self, LpiError> {
        if !p.is_finite() || p < 1.0 {
            return Err(LpiError::InvalidParameter { name: "p", value: p });
        }
        Ok(Self(p))
    }

    /// Return the raw exponent.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Pointwise cost `|a - b|^p`.
    #[inline]
    #[must_use]
    pub fn cost(self, a: f64, b: f64) -> f64 {
        let d = (a - b).abs();
        if self.0 == 1.0 {
            d
        } else if self.0 == 2.0 {
            d * d
        } else {
            d.powf(self.0)
        }
    }

    /// Turn an accumulated `sum |.|^p` into the norm `sum^(1/p)`.
    #[inline]
    #[must_use]
    pub fn root(self, sum: f64) -> f64 {
        let sum = sum.max(0.0);
        if self.0 == 1.0 {
            sum
        } else if self.0 == 2.0 {
            sum.sqrt()
        } else {
            sum.powf(1.0 / self.0)
        }
    }

    /// Lp norm of the elementwise difference `a - b`.
    #[must_use]
    pub fn distance(self, a: &[f64], b: &[f64]) -> f64 {
        debug_assert_eq!(a.len(), b.len());
        let sum: f64 = a.iter().zip(b).map(|(&x, &y)| self.cost(x, y)).sum();
        self.root(sum)
    }

    /// Length normalizer `n^(1/p)`.
    #[must_use]
    pub fn length_scale(self, n: usize) -> f64 {
        self.root(n as f64)
    }
}

impl Default for NormOrder {
    fn default() -> Self {
        Self(DEFAULT_P)
    }
}

impl TryFrom<f64> for NormOrder {
    type Error = LpiError;

    fn try_from(p: f64) -> Result<Self, Self::Error> {
        Self::new(p)
    }
}

impl fmt::Display for NormOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p={}", self.0)
    }
}
