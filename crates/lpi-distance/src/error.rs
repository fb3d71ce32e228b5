//! Error types for LPI distance computation and collection averaging.

/// Errors from sequence validation, cost matrix construction and assignment solving.
#[derive(Debug, thiserror::Error)]
pub enum LpiError {
    /// Returned when an empty slice is provided as a sequence.
    #[error("sequence must be non-empty")]
    EmptySeries,

    /// Returned when a sequence contains NaN, infinity, or negative infinity.
    #[error("sequence contains non-finite value at index {index}")]
    NonFiniteValue {
        /// Position of the first non-finite value found.
        index: usize,
    },

    /// Returned when two sequences that must be compared have different lengths.
    #[error("sequences must have equal length, got {left} and {right}")]
    LengthMismatch {
        /// Length of the first operand.
        left: usize,
        /// Length of the second operand.
        right: usize,
    },

    /// Returned when a numeric parameter is out of its valid domain.
    #[error("invalid value {value} for parameter `{name}`")]
    InvalidParameter {
        /// Parameter name as exposed in the API.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Returned when a pointwise cost (or the derived sentinel) overflows `f64`.
    #[error("cost at ({row}, {col}) is not finite")]
    NonFiniteCost {
        /// Cost matrix row (index into the reference sequence).
        row: usize,
        /// Cost matrix column (index into the permuted sequence).
        col: usize,
    },

    /// Returned when the assignment solver cannot produce a valid bijection.
    #[error("assignment solver failed: {reason}")]
    SolverFailure {
        /// Human-readable description of what went wrong.
        reason: String,
    },
}

/// Errors from medoid selection and mean approximation over a collection.
#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    /// Returned when the collection contains no sequences.
    #[error("cannot summarize an empty collection")]
    EmptyCollection,

    /// Returned when a member's length differs from the first member's.
    #[error("sequence {index} has length {got}, expected {expected}")]
    RaggedCollection {
        /// Position of the offending sequence.
        index: usize,
        /// Length of the first sequence.
        expected: usize,
        /// Length of the offending sequence.
        got: usize,
    },

    /// Returned when a pairwise matrix does not belong to the given collection.
    #[error("distance matrix is {matrix}x{matrix} but the collection has {series} sequences")]
    MatrixSizeMismatch {
        /// Side length of the matrix.
        matrix: usize,
        /// Number of sequences in the collection.
        series: usize,
    },

    /// Wraps an error raised while aligning two members.
    #[error("LPI error: {0}")]
    Lpi(#[from] LpiError),
}
