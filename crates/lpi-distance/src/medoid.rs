//! Medoid selection under the LPI distance.

use tracing::{debug, instrument};

use crate::assignment::AssignmentSolver;
use crate::error::CollectionError;
use crate::lpi::Lpi;
use crate::matrix::DistanceMatrix;
use crate::series::{Sequence, SequenceView};

/// The collection member with the smallest total LPI distance.
#[derive(Debug, Clone)]
pub struct Medoid {
    /// Position of the medoid in the input collection.
    pub index: usize,
    /// Row sum of the medoid in the pairwise matrix.
    pub total_distance: f64,
    /// Copy of the medoid sequence.
    pub sequence: Sequence,
}

impl<S: AssignmentSolver> Lpi<S> {
    /// Select the medoid of `series`.
    ///
    /// Builds the pairwise [`DistanceMatrix`] (O(N²) assignments, each O(n³)),
    /// sums each row and returns the member with the smallest sum. Ties go to
    /// the member that appears first.
    ///
    /// # Errors
    ///
    /// Same as [`Lpi::pairwise`].
    #[instrument(skip(self, series), fields(n = series.len()))]
    pub fn medoid(&self, series: &[SequenceView<'_>]) -> Result<Medoid, CollectionError> {
        let matrix = self.pairwise(series)?;
        let medoid = Medoid::from_matrix(&matrix, series)?;
        debug!(index = medoid.index, total = medoid.total_distance, "medoid selected");
        Ok(medoid)
    }
}

impl Medoid {
    /// Pick the medoid from an already computed pairwise matrix of `series`.
    ///
    /// `matrix` must come from [`Lpi::pairwise`] over the same `series`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`CollectionError::EmptyCollection`] | `series` is empty |
    /// | [`CollectionError::MatrixSizeMismatch`] | `matrix` is not `series.len()` wide |
    pub fn from_matrix(
        matrix: &DistanceMatrix,
        series: &[SequenceView<'_>],
    ) -> Result<Self, CollectionError> {
        if series.is_empty() {
            return Err(CollectionError::EmptyCollection);
        }
        if matrix.len() != series.len() {
            return Err(CollectionError::MatrixSizeMismatch {
                matrix: matrix.len(),
                series: series.len(),
            });
        }
        let (index, total_distance) = matrix
            .row_sums()
            .into_iter()
            .enumerate()
            .fold((0, f64::INFINITY), |best, (i, s)| if s < best.1 { (i, s) } else { best });
        Ok(Self {
            index,
            total_distance,
            sequence: series[index].to_sequence(),
        })
    }
}
