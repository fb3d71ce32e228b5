//! Domain types for lpi-io.

use lpi_distance::{Sequence, SequenceView};

use crate::IoError;

/// A sequence identifier.
///
/// Wraps a non-empty string parsed from the first column of the input CSV.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SequenceId(String);

impl SequenceId {
    pub(crate) fn new(id: String) -> Self {
        debug_assert!(!id.is_empty(), "sequence id must not be empty");
        Self(id)
    }

    /// Return the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SequenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated experiment name for output file naming.
///
/// Must match `[a-zA-Z0-9_-]+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentName(String);

impl ExperimentName {
    /// Parse and validate an experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidExperimentName`] if the name is empty or
    /// contains characters outside `[a-zA-Z0-9_-]`.
    pub fn new(name: String) -> Result<Self, IoError> {
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(IoError::InvalidExperimentName { name });
        }
        Ok(Self(name))
    }

    /// Return the experiment name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ExperimentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A collection of equal-length sequences with their ids.
///
/// Produced by [`SequenceReader`](crate::SequenceReader). `ids[i]`
/// corresponds to `series[i]`, in CSV row order.
#[derive(Debug)]
pub struct Dataset {
    /// Sequence ids in insertion order.
    pub ids: Vec<SequenceId>,
    /// Validated sequences in the same order as `ids`.
    pub series: Vec<Sequence>,
}

impl Dataset {
    /// Number of sequences.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Always `false` for a dataset produced by the reader.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Borrow every sequence, in row order.
    #[must_use]
    pub fn views(&self) -> Vec<SequenceView<'_>> {
        self.series.iter().map(Sequence::as_view).collect()
    }

    /// Look up a sequence by id.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::UnknownId`] if no row carries `id`.
    pub fn get(&self, id: &str) -> Result<SequenceView<'_>, IoError> {
        self.ids
            .iter()
            .position(|candidate| candidate.as_str() == id)
            .map(|i| self.series[i].as_view())
            .ok_or_else(|| IoError::UnknownId { id: id.to_string() })
    }
}
