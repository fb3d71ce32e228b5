//! Full pairwise LPI distance matrix.

use std::ops::Index;

use crate::distance::LpiDistance;

/// Dense `n x n` matrix of LPI distances between members of a collection.
///
/// The LPI distance is not symmetric, so both triangles are stored. Entry
/// `(i, j)` is the distance obtained when member `j` is permuted onto member
/// `i` as the fixed reference; row `i` therefore gathers every member's
/// distance to reference `i`. The diagonal is zero.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<LpiDistance>,
}

impl DistanceMatrix {
    pub(crate) fn from_raw(n: usize, data: Vec<LpiDistance>) -> Self {
        debug_assert_eq!(data.len(), n * n);
        Self { n, data }
    }

    /// Return the number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.n
    }

    /// Return true if the matrix is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Distance of member `j` aligned onto reference member `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= n` or `j >= n`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> LpiDistance {
        self[(i, j)]
    }

    /// Return row `i`: distances of every member to reference `i`.
    #[must_use]
    pub fn row(&self, i: usize) -> &[LpiDistance] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    /// Sum of each row, in member order.
    #[must_use]
    pub fn row_sums(&self) -> Vec<f64> {
        (0..self.n)
            .map(|i| self.row(i).iter().map(|d| d.value()).sum())
            .collect()
    }

    /// Largest `|d(i, j) - d(j, i)|` over all pairs.
    #[must_use]
    pub fn max_asymmetry(&self) -> f64 {
        (1..self.n)
            .flat_map(|i| (0..i).map(move |j| (i, j)))
            .map(|(i, j)| (self.get(i, j).value() - self.get(j, i).value()).abs())
            .fold(0.0, f64::max)
    }

    /// Return all rows as plain vectors, e.g. for serialization.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.n)
            .map(|i| self.row(i).iter().map(|d| d.value()).collect())
            .collect()
    }
}

impl Index<(usize, usize)> for DistanceMatrix {
    type Output = LpiDistance;

    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        assert!(i < self.n, "row index {i} out of bounds for matrix of size {}", self.n);
        assert!(j < self.n, "column index {j} out of bounds for matrix of size {}", self.n);
        &self.data[i * self.n + j]
    }
}
