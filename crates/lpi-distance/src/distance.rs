//! LPI distance newtype wrapper.

use std::fmt;

/// A non-negative LPI distance value.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct LpiDistance(f64);

impl LpiDistance {
    /// Zero distance.
    pub const ZERO: Self = Self(0.0);

    pub(crate) fn new(value: f64) -> Self {
        debug_assert!(value >= 0.0, "distance must be non-negative, got {value}");
        Self(value)
    }

    /// Return the raw distance value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for LpiDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}
