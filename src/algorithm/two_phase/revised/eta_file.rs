//! # Eta file
//!
//! Product form of the inverse: after `k` pivots, the basis inverse equals
//! `E_k ... E_1 B_0^-1`, where each `E` is an identity matrix with one column replaced.
use crate::data::linear_algebra::matrix::DenseMatrix;

/// Elementary matrix: the identity with column `pivot` replaced by `eta`.
///
/// Only the off-pivot entries are stored, sorted by row.
#[derive(Debug, Clone, PartialEq)]
struct Eta {
    pivot: usize,
    pivot_value: f64,
    values: Vec<(usize, f64)>,
}

impl Eta {
    /// Column-multiply with this matrix (from the right, i.e. `E x`).
    fn apply_right(&self, vector: &mut [f64]) {
        let pivot_entry = vector[self.pivot];
        if pivot_entry != 0f64 {
            for &(i, value) in &self.values {
                vector[i] += value * pivot_entry;
            }
            vector[self.pivot] = self.pivot_value * pivot_entry;
        }
    }

    /// Row-multiply with this matrix (from the left, i.e. `x E`).
    fn apply_left(&self, vector: &mut [f64]) {
        let total = self.values.iter()
            .map(|&(i, value)| value * vector[i])
            .sum::<f64>();
        vector[self.pivot] = self.pivot_value * vector[self.pivot] + total;
    }
}

/// Sequence of elementary matrices applied on top of an explicit initial inverse.
#[derive(Debug, Clone, PartialEq)]
pub struct EtaFile {
    /// Inverse of the basis at the last refactorization.
    initial: DenseMatrix,
    etas: Vec<Eta>,
}

impl EtaFile {
    /// Create a new instance.
    ///
    /// # Arguments
    ///
    /// * `initial`: Explicit inverse of the current basis matrix.
    pub fn new(initial: DenseMatrix) -> Self {
        debug_assert_eq!(initial.nr_rows(), initial.nr_columns());

        Self { initial, etas: Vec::new() }
    }

    /// Register a pivot.
    ///
    /// # Arguments
    ///
    /// * `pivot`: Row at which the basis changes.
    /// * `column`: Entering column with respect to the basis before the pivot, `B^-1 a_q`.
    pub fn push(&mut self, pivot: usize, column: &[f64]) {
        debug_assert_eq!(column.len(), self.len());
        debug_assert_ne!(column[pivot], 0f64);

        let pivot_value = column[pivot];
        let values = column.iter().enumerate()
            .filter(|&(i, &value)| i != pivot && value != 0f64)
            .map(|(i, &value)| (i, -value / pivot_value))
            .collect();

        self.etas.push(Eta { pivot, pivot_value: 1f64 / pivot_value, values });
    }

    /// Compute `B^-1 x`.
    pub fn forward(&self, x: &[f64]) -> Vec<f64> {
        let mut result = self.initial.multiply_column(x);
        for eta in &self.etas {
            eta.apply_right(&mut result);
        }

        result
    }

    /// Compute `y^T B^-1`.
    pub fn backward(&self, y: &[f64]) -> Vec<f64> {
        let mut result = y.to_vec();
        for eta in self.etas.iter().rev() {
            eta.apply_left(&mut result);
        }

        self.initial.multiply_row_vector(&result)
    }

    /// Number of elementary matrices since the last refactorization.
    pub fn nr_etas(&self) -> usize {
        self.etas.len()
    }

    /// Dimension of the basis.
    pub fn len(&self) -> usize {
        self.initial.nr_rows()
    }
}
