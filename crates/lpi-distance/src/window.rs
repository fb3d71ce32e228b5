//! Locality window bounding how far a sample may move.

use std::fmt;
use std::ops::Range;

use crate::DEFAULT_OMEGA;

/// Maximum index displacement `omega`: index `i` of the reference may only be
/// matched with index `j` of the permuted sequence when `|i - j| <= omega`.
///
/// `omega = 0` admits only the identity matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window(usize);

impl Window {
    /// Create a window of radius `omega`.
    #[must_use]
    pub const fn new(omega: usize) -> Self {
        Self(omega)
    }

    /// Return the window radius.
    #[must_use]
    pub const fn omega(self) -> usize {
        self.0
    }

    /// Return true when the window only admits the identity matching.
    #[must_use]
    pub const fn is_identity(self) -> bool {
        self.0 == 0
    }

    /// Return the admissible column range for `row` in an `n`-wide matrix.
    ///
    /// This is the intersection of `[row - omega, row + omega]` with `[0, n)`.
    #[must_use]
    pub fn column_range(self, row: usize, n: usize) -> Range<usize> {
        let start = row.saturating_sub(self.0);
        let end = row.saturating_add(self.0).saturating_add(1).min(n);
        start..end
    }

    /// Return true when `(row, col)` lies inside the window.
    pub(crate) fn contains(self, row: usize, col: usize) -> bool {
        row.abs_diff(col) <= self.0
    }
}

impl Default for Window {
    fn default() -> Self {
        Self(DEFAULT_OMEGA)
    }
}

impl From<usize> for Window {
    fn from(omega: usize) -> Self {
        Self(omega)
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "omega={}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn middle_row() {
        assert_eq!(Window::new(2).column_range(5, 10), 3..8);
    }

    #[test]
    fn first_and_last_rows_are_clipped() {
        let w = Window::new(2);
        assert_eq!(w.column_range(0, 10), 0..3);
        assert_eq!(w.column_range(9, 10), 7..10);
    }

    #[test]
    fn zero_window_is_diagonal() {
        let w = Window::new(0);
        assert!(w.is_identity());
        for row in 0..4 {
            assert_eq!(w.column_range(row, 4), row..row + 1);
        }
    }

    #[test]
    fn radius_exceeding_length_spans_everything() {
        assert_eq!(Window::new(20).column_range(3, 5), 0..5);
        assert_eq!(Window::new(usize::MAX).column_range(3, 5), 0..5);
    }

    #[test]
    fn contains_matches_column_range() {
        let w = Window::new(1);
        for row in 0..6 {
            let range = w.column_range(row, 6);
            for col in 0..6 {
                assert_eq!(w.contains(row, col), range.contains(&col), "({row}, {col})");
            }
        }
    }

    #[test]
    fn default_window_is_one() {
        assert_eq!(Window::default().omega(), 1);
        assert_eq!(format!("{}", Window::new(3)), "omega=3");
    }
}
