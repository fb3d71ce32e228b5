//! Assignment solver backed by the `lsap` crate.

use tracing::instrument;

use crate::assignment::{Assignment, AssignmentSolver};
use crate::cost::CostMatrix;
use crate::error::LpiError;

/// Rectangular linear sum assignment from the `lsap` crate (shortest
/// augmenting path, as in SciPy's `linear_sum_assignment`).
///
/// Ties may resolve differently from [`Hungarian`](crate::Hungarian), so the
/// reordered sequence can differ on degenerate inputs. The total cost and the
/// resulting distance do not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinearSumAssignment;

impl AssignmentSolver for LinearSumAssignment {
    #[instrument(level = "trace", skip_all, fields(n = cost.len()))]
    fn solve(&self, cost: &CostMatrix) -> Result<Assignment, LpiError> {
        let n = cost.len();
        if n == 0 {
            return Ok(Assignment::identity(0));
        }

        let (rows, cols) = lsap::solve(n, n, cost.as_slice(), false).map_err(|e| {
            LpiError::SolverFailure {
                reason: format!("lsap: {e:?}"),
            }
        })?;
        if rows.len() != n || cols.len() != n {
            return Err(LpiError::SolverFailure {
                reason: format!("lsap matched {} of {n} rows", rows.len()),
            });
        }

        let mut columns = vec![usize::MAX; n];
        for (row, col) in rows.into_iter().zip(cols) {
            if row >= n {
                return Err(LpiError::SolverFailure {
                    reason: format!("lsap returned row {row}, outside 0..{n}"),
                });
            }
            columns[row] = col;
        }
        Assignment::from_columns(columns)
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::hungarian::Hungarian;

    #[test]
    fn classic_three_by_three() {
        let data = vec![
            4.0, 1.0, 3.0, //
            2.0, 0.0, 5.0, //
            3.0, 2.0, 2.0,
        ];
        let m = CostMatrix::from_rows(3, data).unwrap();
        let a = LinearSumAssignment.solve(&m).unwrap();
        assert_eq!(a.as_slice(), &[1, 0, 2]);
        assert_eq!(m.total(a.as_slice()), 5.0);
    }

    #[test]
    fn empty_matrix() {
        let m = CostMatrix::from_rows(0, vec![]).unwrap();
        assert!(LinearSumAssignment.solve(&m).unwrap().is_empty());
    }

    #[test]
    fn same_total_cost_as_hungarian() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for n in 1..=8 {
            for _ in 0..20 {
                let data: Vec<f64> = (0..n * n).map(|_| rng.gen_range(0.0..10.0)).collect();
                let m = CostMatrix::from_rows(n, data).unwrap();
                let ours = m.total(Hungarian.solve(&m).unwrap().as_slice());
                let theirs = m.total(LinearSumAssignment.solve(&m).unwrap().as_slice());
                assert!((ours - theirs).abs() < 1e-9, "n = {n}: {ours} vs {theirs}");
            }
        }
    }

    #[test]
    fn plugs_into_the_calculator() {
        let x1 = crate::Sequence::new(vec![0.0, 1.0, 0.0, 0.0, 3.0]).unwrap();
        let x2 = crate::Sequence::new(vec![0.0, 0.0, 1.0, 3.0, 0.0]).unwrap();
        let lpi = crate::Lpi::new(1);
        let expected = lpi.distance(x1.as_view(), x2.as_view()).unwrap();
        let got = lpi
            .with_solver(LinearSumAssignment)
            .distance(x1.as_view(), x2.as_view())
            .unwrap();
        assert!((expected.value() - got.value()).abs() < 1e-12);
    }
}
