//! Sequence types with validation guarantees.

use std::ops::Index;

use crate::error::{CollectionError, LpiError};

/// Owned, validated sequence. Guaranteed non-empty with all finite values.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence(Vec<f64>);

impl Sequence {
    /// Create a new sequence, validating that it is non-empty and all values are finite.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`LpiError::EmptySeries`] | `values` is empty |
    /// | [`LpiError::NonFiniteValue`] | Any value is NaN or infinite |
    pub fn new(values: Vec<f64>) -> Result<Self, LpiError> {
        validate(&values)?;
        Ok(Self(values))
    }

    /// Wrap values already known to be non-empty and finite.
    pub(crate) fn new_unchecked(values: Vec<f64>) -> Self {
        debug_assert!(validate(&values).is_ok());
        Self(values)
    }

    /// Borrow this sequence as a zero-copy view.
    #[must_use]
    pub fn as_view(&self) -> SequenceView<'_> {
        SequenceView(&self.0)
    }

    /// Return the number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false` for a constructed [`Sequence`]; provided for the
    /// `len_without_is_empty` convention.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume and return the inner vector.
    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl AsRef<[f64]> for Sequence {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

impl TryFrom<Vec<f64>> for Sequence {
    type Error = LpiError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<Sequence> for Vec<f64> {
    fn from(sequence: Sequence) -> Self {
        sequence.0
    }
}

/// Borrowed, validated view into a sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequenceView<'a>(&'a [f64]);

impl<'a> SequenceView<'a> {
    /// Create a new view, validating that the slice is non-empty and all values are finite.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`LpiError::EmptySeries`] | `slice` is empty |
    /// | [`LpiError::NonFiniteValue`] | Any value is NaN or infinite |
    pub fn new(slice: &'a [f64]) -> Result<Self, LpiError> {
        validate(slice)?;
        Ok(Self(slice))
    }

    /// Create a view without validation, for data produced by this crate.
    pub(crate) fn new_unchecked(slice: &'a [f64]) -> Self {
        Self(slice)
    }

    /// Return the underlying slice.
    #[must_use]
    pub fn as_slice(&self) -> &'a [f64] {
        self.0
    }

    /// Return the number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false` for a constructed [`SequenceView`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the shared length of `self` and `other`.
    ///
    /// # Errors
    ///
    /// Returns [`LpiError::LengthMismatch`] if the lengths differ.
    pub fn common_len(&self, other: SequenceView<'_>) -> Result<usize, LpiError> {
        if self.len() != other.len() {
            return Err(LpiError::LengthMismatch {
                left: self.len(),
                right: other.len(),
            });
        }
        Ok(self.len())
    }

    /// Copy the view into an owned [`Sequence`].
    #[must_use]
    pub fn to_sequence(&self) -> Sequence {
        Sequence(self.0.to_vec())
    }
}

impl Index<usize> for SequenceView<'_> {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl AsRef<[f64]> for SequenceView<'_> {
    fn as_ref(&self) -> &[f64] {
        self.0
    }
}

/// Check that a collection is non-empty and rectangular, returning the common length.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`CollectionError::EmptyCollection`] | `series` is empty |
/// | [`CollectionError::RaggedCollection`] | A member's length differs from `series[0]` |
pub(crate) fn collection_len(series: &[SequenceView<'_>]) -> Result<usize, CollectionError> {
    let first = series.first().ok_or(CollectionError::EmptyCollection)?;
    let expected = first.len();
    if let Some((index, s)) = series.iter().enumerate().find(|(_, s)| s.len() != expected) {
        return Err(CollectionError::RaggedCollection {
            index,
            expected,
            got: s.len(),
        });
    }
    Ok(expected)
}

fn validate(values: &[f64]) -> Result<(), LpiError> {
    if values.is_empty() {
        return Err(LpiError::EmptySeries);
    }
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(LpiError::NonFiniteValue { index });
    }
    Ok(())
}
