//! Local Permutation Invariant (LPI) distance, medoid and mean.
//!
//! Pure math library, no I/O. Two equal-length sequences are compared by
//! first reordering one of them, with every sample moving at most `omega`
//! positions, so as to minimize the Lp residual against the other. The
//! reordering is a minimum-cost perfect matching on a windowed cost matrix,
//! solved behind the [`AssignmentSolver`] trait ([`Hungarian`] by default;
//! the `lsap` feature adds `LinearSumAssignment`, backed by the `lsap` crate).
//!
//! On top of the distance the crate provides a length-normalized error, medoid
//! selection and a majorize-minimize approximation of the sample mean.

mod api;
mod assignment;
mod cost;
mod distance;
mod error;
mod hungarian;
#[cfg(feature = "lsap")]
mod linear_sum;
mod lpi;
mod matrix;
mod mean;
mod medoid;
mod norm;
mod series;
mod window;

pub use api::{adjusted_pnorm_error, lpi_distance, lpi_mean, lpi_medoid, lpi_optimal_permutation};
pub use assignment::{Assignment, AssignmentSolver};
pub use cost::CostMatrix;
pub use distance::LpiDistance;
pub use error::{CollectionError, LpiError};
pub use hungarian::Hungarian;
#[cfg(feature = "lsap")]
pub use linear_sum::LinearSumAssignment;
pub use lpi::{Comparison, Lpi};
pub use matrix::DistanceMatrix;
pub use mean::{MeanConfig, MeanResult};
pub use medoid::Medoid;
pub use norm::NormOrder;
pub use series::{Sequence, SequenceView};
pub use window::Window;

/// Default window radius.
pub const DEFAULT_OMEGA: usize = 1;

/// Default norm order.
pub const DEFAULT_P: f64 = 2.0;

/// Default number of mean refinement iterations.
pub const DEFAULT_MAX_ITER: usize = 10;
