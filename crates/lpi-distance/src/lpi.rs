//! LPI distance computation.

use rayon::prelude::*;
use tracing::instrument;

use crate::assignment::{Assignment, AssignmentSolver};
use crate::cost::CostMatrix;
use crate::distance::LpiDistance;
use crate::error::{CollectionError, LpiError};
use crate::hungarian::Hungarian;
use crate::matrix::DistanceMatrix;
use crate::norm::NormOrder;
use crate::series::{Sequence, SequenceView, collection_len};
use crate::window::Window;

/// Immutable LPI configuration: window, norm order and assignment solver.
///
/// Every method aligns the first argument `x1` onto the second argument `x2`,
/// which acts as the fixed reference. The distance is therefore not symmetric
/// in general, though it is close to symmetric for slowly varying inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lpi<S = Hungarian> {
    window: Window,
    norm: NormOrder,
    solver: S,
}

impl Lpi<Hungarian> {
    /// Create a calculator with window radius `omega`, `p = 2` and the
    /// [`Hungarian`] solver.
    #[must_use]
    pub fn new(omega: usize) -> Self {
        Self {
            window: Window::new(omega),
            norm: NormOrder::default(),
            solver: Hungarian,
        }
    }
}

impl Default for Lpi<Hungarian> {
    fn default() -> Self {
        Self {
            window: Window::default(),
            norm: NormOrder::default(),
            solver: Hungarian,
        }
    }
}

impl<S: AssignmentSolver> Lpi<S> {
    /// Set the norm order `p`.
    #[must_use]
    pub fn with_norm(mut self, norm: NormOrder) -> Self {
        self.norm = norm;
        self
    }

    /// Set the window.
    #[must_use]
    pub fn with_window(mut self, window: Window) -> Self {
        self.window = window;
        self
    }

    /// Replace the assignment solver.
    #[must_use]
    pub fn with_solver<T: AssignmentSolver>(self, solver: T) -> Lpi<T> {
        Lpi {
            window: self.window,
            norm: self.norm,
            solver,
        }
    }

    /// Return the window.
    #[must_use]
    pub fn window(&self) -> Window {
        self.window
    }

    /// Return the norm order.
    #[must_use]
    pub fn norm(&self) -> NormOrder {
        self.norm
    }

    /// Return the assignment solver.
    #[must_use]
    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Build the windowed cost matrix for aligning `x1` onto `x2`.
    ///
    /// # Errors
    ///
    /// See [`CostMatrix::build`].
    pub fn cost_matrix(
        &self,
        x1: SequenceView<'_>,
        x2: SequenceView<'_>,
    ) -> Result<CostMatrix, LpiError> {
        CostMatrix::build(x1, x2, self.window, self.norm)
    }

    /// Solve for the in-window matching of `x1` onto `x2` with minimal cost.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`LpiError::LengthMismatch`] | `x1.len() != x2.len()` |
    /// | [`LpiError::NonFiniteCost`] | A cost overflows `f64` |
    /// | [`LpiError::SolverFailure`] | The solver returns no valid bijection, or one that leaves the window |
    pub fn assignment(
        &self,
        x1: SequenceView<'_>,
        x2: SequenceView<'_>,
    ) -> Result<Assignment, LpiError> {
        let n = x1.common_len(x2)?;
        if self.window.is_identity() {
            return Ok(Assignment::identity(n));
        }
        let cost = self.cost_matrix(x1, x2)?;
        let assignment = self.solver.solve(&cost)?;
        if assignment.len() != n {
            return Err(LpiError::SolverFailure {
                reason: format!("expected {n} pairs, solver returned {}", assignment.len()),
            });
        }
        if let Some((row, &col)) = assignment
            .as_slice()
            .iter()
            .enumerate()
            .find(|&(row, &col)| !self.window.contains(row, col))
        {
            return Err(LpiError::SolverFailure {
                reason: format!("row {row} matched with column {col}, outside {}", self.window),
            });
        }
        Ok(assignment)
    }

    /// Reorder `x1` to best match `x2` within the window.
    ///
    /// # Errors
    ///
    /// Same as [`assignment`](Lpi::assignment).
    pub fn optimal_permutation(
        &self,
        x1: SequenceView<'_>,
        x2: SequenceView<'_>,
    ) -> Result<Sequence, LpiError> {
        self.assignment(x1, x2)?.apply(x1)
    }

    /// Compute the LPI distance: the Lp norm of `optimal_permutation(x1, x2) - x2`.
    ///
    /// Zero exactly when `x2` can be obtained from `x1` by moving each sample
    /// at most `omega` positions.
    ///
    /// # Errors
    ///
    /// Same as [`assignment`](Lpi::assignment).
    #[instrument(level = "debug", skip(self, x1, x2), fields(n = x1.len(), omega = self.window.omega()))]
    pub fn distance(
        &self,
        x1: SequenceView<'_>,
        x2: SequenceView<'_>,
    ) -> Result<LpiDistance, LpiError> {
        let permuted = self.optimal_permutation(x1, x2)?;
        Ok(LpiDistance::new(
            self.norm.distance(permuted.as_ref(), x2.as_slice()),
        ))
    }

    /// Length-normalized LPI error of a prediction against the truth:
    /// `distance(y_pred, y_true) / n^(1/p)`.
    ///
    /// With `omega = 0` this is the RMSE for `p = 2` and the MAE for `p = 1`.
    ///
    /// # Errors
    ///
    /// Same as [`assignment`](Lpi::assignment).
    pub fn adjusted_error(
        &self,
        y_true: SequenceView<'_>,
        y_pred: SequenceView<'_>,
    ) -> Result<f64, LpiError> {
        let d = self.distance(y_pred, y_true)?;
        Ok(d.value() / self.norm.length_scale(y_true.len()))
    }

    /// Score a prediction against the truth with a single assignment solve.
    ///
    /// The result agrees with [`distance`](Lpi::distance) and
    /// [`adjusted_error`](Lpi::adjusted_error) on the same pair, and also carries
    /// the unpermuted error for comparison.
    ///
    /// # Errors
    ///
    /// Same as [`assignment`](Lpi::assignment).
    #[instrument(level = "debug", skip(self, y_true, y_pred), fields(n = y_true.len(), omega = self.window.omega()))]
    pub fn compare(
        &self,
        y_true: SequenceView<'_>,
        y_pred: SequenceView<'_>,
    ) -> Result<Comparison, LpiError> {
        let assignment = self.assignment(y_pred, y_true)?;
        let permuted = assignment.apply(y_pred)?;
        let scale = self.norm.length_scale(y_true.len());
        let distance = LpiDistance::new(self.norm.distance(permuted.as_ref(), y_true.as_slice()));
        let plain = self.norm.distance(y_pred.as_slice(), y_true.as_slice());

        Ok(Comparison {
            adjusted_error: distance.value() / scale,
            plain_error: plain / scale,
            distance,
            assignment,
            permuted,
        })
    }

    /// Compute the full pairwise [`DistanceMatrix`] of a collection.
    ///
    /// Entry `(i, j)` is `distance(series[j], series[i])`. All `n * (n - 1)`
    /// off-diagonal pairs are computed in parallel with rayon and written back
    /// in index order.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`CollectionError::EmptyCollection`] | `series` is empty |
    /// | [`CollectionError::RaggedCollection`] | Members differ in length |
    /// | [`CollectionError::Lpi`] | A pairwise distance fails |
    #[instrument(skip(self, series), fields(n = series.len(), omega = self.window.omega()))]
    pub fn pairwise(&self, series: &[SequenceView<'_>]) -> Result<DistanceMatrix, CollectionError> {
        collection_len(series)?;
        let n = series.len();

        let data = (0..n * n)
            .into_par_iter()
            .map(|flat| {
                let (reference, member) = (flat / n, flat % n);
                if reference == member {
                    return Ok(LpiDistance::ZERO);
                }
                self.distance(series[member], series[reference])
            })
            .collect::<Result<Vec<_>, LpiError>>()?;

        Ok(DistanceMatrix::from_raw(n, data))
    }
}

/// Prediction-versus-truth scores from [`Lpi::compare`].
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// LPI distance of the prediction aligned onto the truth.
    pub distance: LpiDistance,
    /// `distance / n^(1/p)`.
    pub adjusted_error: f64,
    /// Length-normalized Lp error without any reordering.
    pub plain_error: f64,
    /// The optimal in-window matching.
    pub assignment: Assignment,
    /// The prediction reordered by `assignment`.
    pub permuted: Sequence,
}
