//! Windowed cost matrix for the LPI assignment problem.

use std::ops::Index;

use crate::error::LpiError;
use crate::norm::NormOrder;
use crate::series::SequenceView;
use crate::window::Window;

/// Dense row-major `n x n` cost matrix.
///
/// Row `i` belongs to the fixed reference `x2`, column `j` to the sequence
/// being permuted `x1`. In-window cells hold `|x2[i] - x1[j]|^p`; every other
/// cell holds a sentinel cost larger than any in-window matching.
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    n: usize,
    data: Vec<f64>,
}

impl CostMatrix {
    /// Build the windowed cost matrix aligning `x1` onto the reference `x2`.
    ///
    /// The sentinel is `n * max_in_window_cost + 1`. The identity matching is
    /// always in-window and costs at most `n * max_in_window_cost`, so no
    /// optimal assignment can contain a sentinel cell.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`LpiError::LengthMismatch`] | `x1.len() != x2.len()` |
    /// | [`LpiError::NonFiniteCost`] | A cost or the sentinel overflows `f64` |
    pub fn build(
        x1: SequenceView<'_>,
        x2: SequenceView<'_>,
        window: Window,
        norm: NormOrder,
    ) -> Result<Self, LpiError> {
        let n = x1.common_len(x2)?;

        // First pass over the band only: find the largest true cost.
        let mut max_cost = 0.0_f64;
        for i in 0..n {
            for j in window.column_range(i, n) {
                let c = norm.cost(x2[i], x1[j]);
                if !c.is_finite() {
                    return Err(LpiError::NonFiniteCost { row: i, col: j });
                }
                max_cost = max_cost.max(c);
            }
        }

        let sentinel = (n as f64).mul_add(max_cost, 1.0);
        if !sentinel.is_finite() {
            return Err(LpiError::NonFiniteCost { row: 0, col: 0 });
        }

        let mut data = vec![sentinel; n * n];
        for i in 0..n {
            for j in window.column_range(i, n) {
                data[i * n + j] = norm.cost(x2[i], x1[j]);
            }
        }

        Ok(Self { n, data })
    }

    /// Create a matrix directly from row-major values, e.g. to exercise a solver.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`LpiError::LengthMismatch`] | `data.len() != n * n` |
    /// | [`LpiError::NonFiniteCost`] | Any entry is NaN or infinite |
    pub fn from_rows(n: usize, data: Vec<f64>) -> Result<Self, LpiError> {
        if data.len() != n * n {
            return Err(LpiError::LengthMismatch {
                left: data.len(),
                right: n * n,
            });
        }
        if let Some(flat) = data.iter().position(|c| !c.is_finite()) {
            return Err(LpiError::NonFiniteCost {
                row: flat / n,
                col: flat % n,
            });
        }
        Ok(Self { n, data })
    }

    /// Return the side length `n`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.n
    }

    /// Return true for a `0 x 0` matrix.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Return all entries in row-major order.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Return row `i` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `i >= n`.
    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    /// Sum of `cost[i, columns[i]]` over all rows.
    #[must_use]
    pub fn total(&self, columns: &[usize]) -> f64 {
        columns
            .iter()
            .enumerate()
            .map(|(i, &j)| self.data[i * self.n + j])
            .sum()
    }
}

impl Index<(usize, usize)> for CostMatrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        assert!(i < self.n && j < self.n, "({i}, {j}) out of bounds for {0}x{0} matrix", self.n);
        &self.data[i * self.n + j]
    }
}
