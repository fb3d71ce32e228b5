//! Slice-level entry points mirroring the typed API.
//!
//! These validate plain `&[f64]` inputs and run with the [`Hungarian`]
//! solver. Use [`Lpi`] and [`MeanConfig`] directly to reuse validated
//! sequences or to swap the solver.

use crate::error::{CollectionError, LpiError};
use crate::hungarian::Hungarian;
use crate::lpi::Lpi;
use crate::mean::MeanConfig;
use crate::norm::NormOrder;
use crate::series::SequenceView;

fn calculator(omega: usize, p: f64) -> Result<Lpi<Hungarian>, LpiError> {
    Ok(Lpi::new(omega).with_norm(NormOrder::new(p)?))
}

fn views(series: &[Vec<f64>]) -> Result<Vec<SequenceView<'_>>, LpiError> {
    series.iter().map(|s| SequenceView::new(s)).collect()
}

/// LPI distance of `x1` aligned onto `x2`.
///
/// # Errors
///
/// Returns [`LpiError`] for empty or non-finite input, mismatched lengths,
/// `p < 1`, or a solver failure.
pub fn lpi_distance(x1: &[f64], x2: &[f64], omega: usize, p: f64) -> Result<f64, LpiError> {
    let lpi = calculator(omega, p)?;
    let d = lpi.distance(SequenceView::new(x1)?, SequenceView::new(x2)?)?;
    Ok(d.value())
}

/// `x1` reordered to best match `x2` within the window.
///
/// # Errors
///
/// Same as [`lpi_distance`].
pub fn lpi_optimal_permutation(
    x1: &[f64],
    x2: &[f64],
    omega: usize,
    p: f64,
) -> Result<Vec<f64>, LpiError> {
    let lpi = calculator(omega, p)?;
    let permuted = lpi.optimal_permutation(SequenceView::new(x1)?, SequenceView::new(x2)?)?;
    Ok(permuted.into_inner())
}

/// Length-normalized LPI error `lpi_distance(y_pred, y_true) / n^(1/p)`.
///
/// # Errors
///
/// Same as [`lpi_distance`].
pub fn adjusted_pnorm_error(
    y_true: &[f64],
    y_pred: &[f64],
    omega: usize,
    p: f64,
) -> Result<f64, LpiError> {
    let lpi = calculator(omega, p)?;
    lpi.adjusted_error(SequenceView::new(y_true)?, SequenceView::new(y_pred)?)
}

/// The member of `series` with the smallest total LPI distance (`p = 2`).
///
/// # Errors
///
/// Returns [`CollectionError`] for an empty or ragged collection, or when a
/// member is invalid.
pub fn lpi_medoid(series: &[Vec<f64>], omega: usize) -> Result<Vec<f64>, CollectionError> {
    let views = views(series)?;
    let medoid = Lpi::new(omega).medoid(&views)?;
    Ok(medoid.sequence.into_inner())
}

/// Majorize-minimize LPI mean of `series`, running exactly `max_iter` iterations.
///
/// # Errors
///
/// Same as [`lpi_medoid`].
pub fn lpi_mean(
    series: &[Vec<f64>],
    omega: usize,
    max_iter: usize,
) -> Result<Vec<f64>, CollectionError> {
    let views = views(series)?;
    let result = MeanConfig::new(omega)
        .with_max_iter(max_iter)
        .average(&views)?;
    Ok(result.center.into_inner())
}
