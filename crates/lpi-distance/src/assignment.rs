//! Assignment (perfect matching) type and the solver seam.

use crate::cost::CostMatrix;
use crate::error::LpiError;
use crate::series::{Sequence, SequenceView};

/// A bijection over `0..n`, mapping each reference index (cost matrix row)
/// to the index of the permuted sequence (column) it is matched with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment(Vec<usize>);

impl Assignment {
    /// The identity matching on `n` indices.
    #[must_use]
    pub fn identity(n: usize) -> Self {
        Self((0..n).collect())
    }

    /// Build an assignment from `columns[row]`, checking it is a permutation.
    ///
    /// # Errors
    ///
    /// Returns [`LpiError::SolverFailure`] if a column is out of range or used twice.
    pub fn from_columns(columns: Vec<usize>) -> Result<Self, LpiError> {
        let n = columns.len();
        let mut seen = vec![false; n];
        for (row, &col) in columns.iter().enumerate() {
            if col >= n {
                return Err(LpiError::SolverFailure {
                    reason: format!("row {row} assigned to column {col}, outside 0..{n}"),
                });
            }
            if std::mem::replace(&mut seen[col], true) {
                return Err(LpiError::SolverFailure {
                    reason: format!("column {col} assigned more than once"),
                });
            }
        }
        Ok(Self(columns))
    }

    /// Return the row-to-column mapping.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Return the number of matched pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if the assignment is over zero indices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return true when every row is matched with itself.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.0.iter().enumerate().all(|(row, &col)| row == col)
    }

    /// Largest `|row - column|` over all pairs.
    #[must_use]
    pub fn max_displacement(&self) -> usize {
        self.0
            .iter()
            .enumerate()
            .map(|(row, &col)| row.abs_diff(col))
            .max()
            .unwrap_or(0)
    }

    /// Reorder `x1` so that `result[i] = x1[self.as_slice()[i]]`.
    ///
    /// # Errors
    ///
    /// Returns [`LpiError::LengthMismatch`] if `x1` and the assignment differ in size.
    pub fn apply(&self, x1: SequenceView<'_>) -> Result<Sequence, LpiError> {
        if x1.len() != self.len() {
            return Err(LpiError::LengthMismatch {
                left: x1.len(),
                right: self.len(),
            });
        }
        let values = self.0.iter().map(|&col| x1[col]).collect();
        Ok(Sequence::new_unchecked(values))
    }
}

/// Minimum-cost perfect bipartite matching.
///
/// Implementations must be deterministic for a given matrix, correct for any
/// finite cost matrix, and free of shared mutable state so one solver can be
/// used from several threads at once.
pub trait AssignmentSolver: Send + Sync {
    /// Return the assignment minimizing `sum cost[i, pi(i)]`.
    ///
    /// # Errors
    ///
    /// Returns [`LpiError::SolverFailure`] when no valid bijection is produced.
    fn solve(&self, cost: &CostMatrix) -> Result<Assignment, LpiError>;
}

impl<S: AssignmentSolver + ?Sized> AssignmentSolver for &S {
    fn solve(&self, cost: &CostMatrix) -> Result<Assignment, LpiError> {
        (**self).solve(cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_columns_accepts_permutation() {
        let a = Assignment::from_columns(vec![1, 0, 2]).unwrap();
        assert_eq!(a.as_slice(), &[1, 0, 2]);
        assert_eq!(a.len(), 3);
        assert!(!a.is_identity());
        assert_eq!(a.max_displacement(), 1);
    }

    #[test]
    fn from_columns_rejects_duplicates() {
        let result = Assignment::from_columns(vec![0, 0, 2]);
        assert!(matches!(result, Err(LpiError::SolverFailure { .. })));
    }

    #[test]
    fn from_columns_rejects_out_of_range() {
        let result = Assignment::from_columns(vec![0, 3, 1]);
        assert!(matches!(result, Err(LpiError::SolverFailure { .. })));
    }

    #[test]
    fn apply_reorders_by_column() {
        let x1 = Sequence::new(vec![10.0, 20.0, 30.0]).unwrap();
        let a = Assignment::from_columns(vec![2, 0, 1]).unwrap();
        let out = a.apply(x1.as_view()).unwrap();
        assert_eq!(out.as_ref(), &[30.0, 10.0, 20.0]);
    }

    #[test]
    fn identity_apply_is_noop() {
        let x1 = Sequence::new(vec![1.0, 2.0]).unwrap();
        let a = Assignment::identity(2);
        assert!(a.is_identity());
        assert_eq!(a.apply(x1.as_view()).unwrap(), x1);
    }

    #[test]
    fn apply_rejects_wrong_length() {
        let x1 = Sequence::new(vec![1.0, 2.0]).unwrap();
        let a = Assignment::identity(3);
        assert!(matches!(
            a.apply(x1.as_view()),
            Err(LpiError::LengthMismatch { left: 2, right: 3 })
        ));
    }
}
