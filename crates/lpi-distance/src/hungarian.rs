//! Kuhn-Munkres (Hungarian) solver using shortest augmenting paths.

use tracing::{instrument, trace};

use crate::assignment::{Assignment, AssignmentSolver};
use crate::cost::CostMatrix;
use crate::error::LpiError;

/// O(n³) Hungarian method with row and column dual potentials.
///
/// Rows are inserted one at a time in index order; each insertion grows a
/// Dijkstra-like tree over the reduced costs until it reaches a free column,
/// then flips the alternating path. Ties between equal reduced costs are broken
/// in favour of the lowest column index, so the result is deterministic.
///
/// The solver holds no state; a single value can be shared across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hungarian;

impl AssignmentSolver for Hungarian {
    #[instrument(level = "trace", skip_all, fields(n = cost.len()))]
    fn solve(&self, cost: &CostMatrix) -> Result<Assignment, LpiError> {
        let n = cost.len();
        if n == 0 {
            return Ok(Assignment::identity(0));
        }

        // Index 0 is a virtual column that roots each search tree; real rows and
        // columns are shifted by one.
        let mut u = vec![0.0_f64; n + 1];
        let mut v = vec![0.0_f64; n + 1];
        let mut row_of = vec![0_usize; n + 1];
        let mut way = vec![0_usize; n + 1];
        let mut min_v = vec![f64::INFINITY; n + 1];
        let mut used = vec![false; n + 1];

        for i in 1..=n {
            row_of[0] = i;
            let mut j0 = 0;
            min_v.fill(f64::INFINITY);
            used.fill(false);

            loop {
                used[j0] = true;
                let i0 = row_of[j0];
                let row = cost.row(i0 - 1);
                let mut delta = f64::INFINITY;
                let mut j1 = 0;

                for j in 1..=n {
                    if used[j] {
                        continue;
                    }
                    let reduced = row[j - 1] - u[i0] - v[j];
                    if reduced < min_v[j] {
                        min_v[j] = reduced;
                        way[j] = j0;
                    }
                    if min_v[j] < delta {
                        delta = min_v[j];
                        j1 = j;
                    }
                }

                if j1 == 0 {
                    return Err(LpiError::SolverFailure {
                        reason: format!("no augmenting column reachable from row {}", i - 1),
                    });
                }

                for j in 0..=n {
                    if used[j] {
                        u[row_of[j]] += delta;
                        v[j] -= delta;
                    } else {
                        min_v[j] -= delta;
                    }
                }

                j0 = j1;
                if row_of[j0] == 0 {
                    break;
                }
            }

            // Flip the alternating path back to the virtual root.
            while j0 != 0 {
                let prev = way[j0];
                row_of[j0] = row_of[prev];
                j0 = prev;
            }
            trace!(row = i - 1, "row matched");
        }

        let mut columns = vec![0_usize; n];
        for j in 1..=n {
            let row = row_of[j].checked_sub(1).ok_or_else(|| LpiError::SolverFailure {
                reason: format!("column {} left unmatched", j - 1),
            })?;
            columns[row] = j - 1;
        }
        Assignment::from_columns(columns)
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn solve(n: usize, data: Vec<f64>) -> Assignment {
        let m = CostMatrix::from_rows(n, data).unwrap();
        Hungarian.solve(&m).unwrap()
    }

    fn brute_force_min(m: &CostMatrix) -> f64 {
        fn recurse(m: &CostMatrix, row: usize, used: &mut [bool], acc: f64, best: &mut f64) {
            let n = m.len();
            if row == n {
                *best = best.min(acc);
                return;
            }
            for col in 0..n {
                if !used[col] {
                    used[col] = true;
                    recurse(m, row + 1, used, acc + m[(row, col)], best);
                    used[col] = false;
                }
            }
        }
        let mut best = f64::INFINITY;
        recurse(m, 0, &mut vec![false; m.len()], 0.0, &mut best);
        best
    }

    #[test]
    fn empty_matrix() {
        let a = solve(0, vec![]);
        assert!(a.is_empty());
    }

    #[test]
    fn single_cell() {
        let a = solve(1, vec![7.0]);
        assert_eq!(a.as_slice(), &[0]);
    }

    #[test]
    fn classic_three_by_three() {
        // Optimum: row0->col1 (1), row1->col0 (2), row2->col2 (2) = 5
        let data = vec![
            4.0, 1.0, 3.0, //
            2.0, 0.0, 5.0, //
            3.0, 2.0, 2.0,
        ];
        let m = CostMatrix::from_rows(3, data).unwrap();
        let a = Hungarian.solve(&m).unwrap();
        assert_eq!(a.as_slice(), &[1, 0, 2]);
        assert_eq!(m.total(a.as_slice()), 5.0);
    }

    #[test]
    fn anti_diagonal_preferred_when_cheaper() {
        let data = vec![
            9.0, 9.0, 0.0, //
            9.0, 0.0, 9.0, //
            0.0, 9.0, 9.0,
        ];
        let a = solve(3, data);
        assert_eq!(a.as_slice(), &[2, 1, 0]);
    }

    #[test]
    fn all_equal_costs_give_identity() {
        let a = solve(4, vec![1.0; 16]);
        assert!(a.is_identity());
    }

    #[test]
    fn negative_costs_are_supported() {
        let data = vec![
            -1.0, 0.0, //
            0.0, -5.0,
        ];
        let a = solve(2, data);
        assert!(a.is_identity());
    }

    #[test]
    fn matches_brute_force_on_random_matrices() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for trial in 0..200 {
            let n = rng.gen_range(1..=6);
            let data: Vec<f64> = (0..n * n).map(|_| rng.gen_range(0.0..10.0)).collect();
            let m = CostMatrix::from_rows(n, data).unwrap();
            let a = Hungarian.solve(&m).unwrap();
            let expected = brute_force_min(&m);
            let got = m.total(a.as_slice());
            assert!(
                (got - expected).abs() < 1e-9,
                "trial {trial}: hungarian {got} != brute force {expected}"
            );
        }
    }

    #[test]
    fn matches_brute_force_with_integer_ties() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for trial in 0..200 {
            let n = rng.gen_range(2..=6);
            let data: Vec<f64> = (0..n * n).map(|_| f64::from(rng.gen_range(0_u8..3))).collect();
            let m = CostMatrix::from_rows(n, data).unwrap();
            let a = Hungarian.solve(&m).unwrap();
            assert_eq!(m.total(a.as_slice()), brute_force_min(&m), "trial {trial}");
        }
    }

    #[test]
    fn solver_is_usable_by_reference() {
        let m = CostMatrix::from_rows(2, vec![0.0, 1.0, 1.0, 0.0]).unwrap();
        let solver: &dyn AssignmentSolver = &Hungarian;
        assert!(solver.solve(&m).unwrap().is_identity());
    }
}
