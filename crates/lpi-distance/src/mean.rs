//! Majorize-minimize approximation of the sample mean in LPI space.

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::DEFAULT_MAX_ITER;
use crate::assignment::AssignmentSolver;
use crate::error::{CollectionError, LpiError};
use crate::hungarian::Hungarian;
use crate::lpi::Lpi;
use crate::norm::NormOrder;
use crate::series::{Sequence, SequenceView, collection_len};

/// Configuration for the LPI mean approximation.
///
/// # Defaults
///
/// | Parameter  | Default            |
/// |------------|--------------------|
/// | `p`        | 2                  |
/// | `max_iter` | 10                 |
/// | `tol`      | `None` (fixed budget, no early exit) |
#[derive(Debug, Clone)]
pub struct MeanConfig<S = Hungarian> {
    lpi: Lpi<S>,
    max_iter: usize,
    tol: Option<f64>,
}

impl MeanConfig<Hungarian> {
    /// Create a configuration with window radius `omega` and default parameters.
    #[must_use]
    pub fn new(omega: usize) -> Self {
        Self::from_lpi(Lpi::new(omega))
    }
}

impl<S: AssignmentSolver> MeanConfig<S> {
    /// Create a configuration around an existing calculator.
    #[must_use]
    pub fn from_lpi(lpi: Lpi<S>) -> Self {
        Self {
            lpi,
            max_iter: DEFAULT_MAX_ITER,
            tol: None,
        }
    }

    /// Set the number of refinement iterations.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the norm order used for the medoid and for every alignment.
    #[must_use]
    pub fn with_norm(mut self, norm: NormOrder) -> Self {
        self.lpi = self.lpi.with_norm(norm);
        self
    }

    /// Stop early once the largest per-sample change of the center falls
    /// below `tol`. `None` runs exactly `max_iter` iterations.
    #[must_use]
    pub fn with_tol(mut self, tol: Option<f64>) -> Self {
        self.tol = tol;
        self
    }

    /// Return the underlying calculator.
    #[must_use]
    pub fn lpi(&self) -> &Lpi<S> {
        &self.lpi
    }

    /// Return the iteration budget.
    #[must_use]
    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    /// Return the early-exit tolerance, if any.
    #[must_use]
    pub fn tol(&self) -> Option<f64> {
        self.tol
    }

    /// Approximate the LPI mean of `series`.
    ///
    /// The center starts at the medoid. Each iteration reorders every member
    /// onto the current center (in parallel) and replaces the center with the
    /// elementwise mean of the reordered members. Sums are accumulated in input
    /// order, so the result does not depend on thread scheduling.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`CollectionError::EmptyCollection`] | `series` is empty |
    /// | [`CollectionError::RaggedCollection`] | Members differ in length |
    /// | [`CollectionError::Lpi`] | An alignment fails, `tol` is negative or NaN, or a center value is not finite |
    #[instrument(skip(self, series), fields(n = series.len(), max_iter = self.max_iter))]
    pub fn average(&self, series: &[SequenceView<'_>]) -> Result<MeanResult, CollectionError> {
        if let Some(tol) = self.tol
            && !(tol >= 0.0)
        {
            return Err(LpiError::InvalidParameter { name: "tol", value: tol }.into());
        }
        let len = collection_len(series)?;

        let medoid = self.lpi.medoid(series)?;
        let mut center: Vec<f64> = medoid.sequence.into_inner();

        let n_series = series.len() as f64;
        let mut delta = 0.0_f64;
        let mut iterations = 0;
        let mut converged = false;

        for iter in 0..self.max_iter {
            let center_view = SequenceView::new_unchecked(&center);

            let aligned = series
                .par_iter()
                .map(|s| self.lpi.optimal_permutation(*s, center_view))
                .collect::<Result<Vec<Sequence>, LpiError>>()?;

            // Scale each member before summing: the plain sum of finite
            // values near f64::MAX overflows even when the mean does not.
            let mut next = vec![0.0_f64; len];
            for s in &aligned {
                for (acc, &v) in next.iter_mut().zip(s.as_ref()) {
                    *acc += v / n_series;
                }
            }
            if let Some(index) = next.iter().position(|v| !v.is_finite()) {
                return Err(LpiError::NonFiniteValue { index }.into());
            }

            delta = 0.0;
            for (c, value) in center.iter_mut().zip(next) {
                delta = delta.max((value - *c).abs());
                *c = value;
            }

            iterations = iter + 1;
            debug!(iteration = iterations, delta, "LPI mean iteration complete");

            if let Some(tol) = self.tol
                && delta < tol
            {
                converged = true;
                break;
            }
        }

        Ok(MeanResult {
            center: Sequence::new_unchecked(center),
            medoid_index: medoid.index,
            iterations,
            final_delta: delta,
            converged,
        })
    }
}

/// Result of an LPI mean computation.
#[derive(Debug, Clone)]
pub struct MeanResult {
    /// The approximated mean sequence.
    pub center: Sequence,
    /// Index of the medoid used as the starting center.
    pub medoid_index: usize,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Largest absolute change of the center in the last iteration
    /// (zero when no iteration ran).
    pub final_delta: f64,
    /// Whether the tolerance stopped the loop before the budget ran out.
    pub converged: bool,
}
