//! # Dense matrices
//!
//! Row-major dense matrix of `f64` values. The problems this crate is meant for are small enough
//! that a dense representation is simpler and faster than a sparse one; the tableau solver needs
//! the full tableau anyway.
use std::fmt;
use std::fmt::{Display, Formatter};

use index_utils::remove_indices;
use itertools::repeat_n;

use crate::data::linear_algebra::Rank;

/// Uses a `Vec<Vec<f64>>` as underlying data structure. Dimensions can change only through the
/// explicit `push_*` and `remove_*` methods.
#[derive(Clone, Debug, PartialEq)]
pub struct DenseMatrix {
    data: Vec<Vec<f64>>,
    nr_columns: usize,
}

impl DenseMatrix {
    /// Create a `DenseMatrix` from the provided data.
    ///
    /// # Arguments
    ///
    /// * `data`: Rows of the matrix, all of length `nr_columns`.
    /// * `nr_columns`: Number of columns, needed explicitly because there might be zero rows.
    pub fn new(data: Vec<Vec<f64>>, nr_columns: usize) -> Self {
        debug_assert!(data.iter().all(|row| row.len() == nr_columns));

        Self { data, nr_columns }
    }

    /// Create a `DenseMatrix` from rows that are known to be non-empty.
    pub fn from_data(data: Vec<Vec<f64>>) -> Self {
        let nr_columns = data.first().map_or(0, Vec::len);
        Self::new(data, nr_columns)
    }

    /// Create a dense matrix of zeros of dimension `nr_rows` x `nr_columns`.
    pub fn zeros(nr_rows: usize, nr_columns: usize) -> Self {
        Self {
            data: (0..nr_rows).map(|_| vec![0f64; nr_columns]).collect(),
            nr_columns,
        }
    }

    /// Create a dense square identity matrix of size `len`.
    pub fn identity(len: usize) -> Self {
        let mut matrix = Self::zeros(len, len);
        for i in 0..len {
            matrix.data[i][i] = 1f64;
        }

        matrix
    }

    /// Get the value at coordinate (`i`, `j`).
    #[inline]
    pub fn get_value(&self, i: usize, j: usize) -> f64 {
        debug_assert!(i < self.nr_rows());
        debug_assert!(j < self.nr_columns);

        self.data[i][j]
    }

    /// Set the value at coordinate (`i`, `j`) to `value`.
    #[inline]
    pub fn set_value(&mut self, i: usize, j: usize, value: f64) {
        debug_assert!(i < self.nr_rows());
        debug_assert!(j < self.nr_columns);

        self.data[i][j] = value;
    }

    /// Get all values in row `i` of this matrix.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        debug_assert!(i < self.nr_rows());

        &self.data[i]
    }

    /// Mutable access to row `i`.
    #[inline]
    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        debug_assert!(i < self.nr_rows());

        &mut self.data[i]
    }

    /// Iterate over all rows.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        self.data.iter().map(Vec::as_slice)
    }

    /// Get all values in column `j` of this matrix.
    pub fn column(&self, j: usize) -> Vec<f64> {
        debug_assert!(j < self.nr_columns);

        self.data.iter().map(|row| row[j]).collect()
    }

    /// Multiply row `i` with a factor `factor`.
    pub fn multiply_row(&mut self, i: usize, factor: f64) {
        debug_assert!(i < self.nr_rows());

        for value in &mut self.data[i] {
            *value *= factor;
        }
    }

    /// Add a multiple of row `read_row` to row `write_row`.
    pub fn mul_add_rows(&mut self, read_row: usize, write_row: usize, factor: f64) {
        debug_assert!(read_row < self.nr_rows());
        debug_assert!(write_row < self.nr_rows());
        debug_assert_ne!(read_row, write_row);

        let (read, write) = if read_row < write_row {
            let (left, right) = self.data.split_at_mut(write_row);
            (&left[read_row], &mut right[0])
        } else {
            let (left, right) = self.data.split_at_mut(read_row);
            (&right[0], &mut left[write_row])
        };
        for (target, source) in write.iter_mut().zip(read.iter()) {
            *target += factor * source;
        }
    }

    /// Append a row at the bottom.
    pub fn push_row(&mut self, row: Vec<f64>) {
        debug_assert_eq!(row.len(), self.nr_columns);

        self.data.push(row);
    }

    /// Append a column at the right.
    ///
    /// # Arguments
    ///
    /// * `column`: One value for each row.
    pub fn push_column(&mut self, column: &[f64]) {
        debug_assert_eq!(column.len(), self.nr_rows());

        for (row, &value) in self.data.iter_mut().zip(column) {
            row.push(value);
        }
        self.nr_columns += 1;
    }

    /// Append `count` zero columns at the right.
    pub fn extend_with_zero_columns(&mut self, count: usize) {
        for row in &mut self.data {
            row.extend(repeat_n(0f64, count));
        }
        self.nr_columns += count;
    }

    /// Remove rows.
    ///
    /// # Arguments
    ///
    /// * `indices`: Sorted, deduplicated row indices.
    pub fn remove_rows(&mut self, indices: &[usize]) {
        debug_assert!(indices.is_sorted());

        remove_indices(&mut self.data, indices);
    }

    /// Remove columns.
    ///
    /// # Arguments
    ///
    /// * `indices`: Sorted, deduplicated column indices.
    pub fn remove_columns(&mut self, indices: &[usize]) {
        debug_assert!(indices.is_sorted());
        debug_assert!(indices.iter().all(|&j| j < self.nr_columns));

        for row in &mut self.data {
            remove_indices(row, indices);
        }
        self.nr_columns -= indices.len();
    }

    /// Submatrix with the given rows and columns, in the given order.
    pub fn select(&self, rows: &[usize], columns: &[usize]) -> Self {
        let data = rows.iter()
            .map(|&i| columns.iter().map(|&j| self.data[i][j]).collect())
            .collect();

        Self::new(data, columns.len())
    }

    /// Transposed copy.
    pub fn transpose(&self) -> Self {
        let data = (0..self.nr_columns).map(|j| self.column(j)).collect();

        Self::new(data, self.nr_rows())
    }

    /// Matrix vector product `M x`.
    pub fn multiply_column(&self, x: &[f64]) -> Vec<f64> {
        debug_assert_eq!(x.len(), self.nr_columns);

        self.data.iter()
            .map(|row| row.iter().zip(x).map(|(a, b)| a * b).sum())
            .collect()
    }

    /// Vector matrix product `y^T M`.
    pub fn multiply_row_vector(&self, y: &[f64]) -> Vec<f64> {
        debug_assert_eq!(y.len(), self.nr_rows());

        let mut result = vec![0f64; self.nr_columns];
        for (row, &factor) in self.data.iter().zip(y) {
            if factor != 0f64 {
                for (total, value) in result.iter_mut().zip(row) {
                    *total += factor * value;
                }
            }
        }

        result
    }

    /// Matrix product `self * other`.
    pub fn multiply(&self, other: &Self) -> Self {
        debug_assert_eq!(self.nr_columns, other.nr_rows());

        let data = self.data.iter()
            .map(|row| other.multiply_row_vector(row))
            .collect();

        Self::new(data, other.nr_columns)
    }

    /// Inverse of a square matrix by Gauss-Jordan elimination with partial pivoting.
    ///
    /// # Arguments
    ///
    /// * `epsilon`: Pivot values at or below this magnitude are treated as zero.
    ///
    /// # Return value
    ///
    /// `None` if the matrix is (numerically) singular.
    pub fn invert(&self, epsilon: f64) -> Option<Self> {
        debug_assert_eq!(self.nr_rows(), self.nr_columns);

        let m = self.nr_rows();
        let mut left = self.clone();
        let mut right = Self::identity(m);

        for column in 0..m {
            let pivot_row = (column..m)
                .max_by(|&a, &b| left.data[a][column].abs().total_cmp(&left.data[b][column].abs()))?;
            let pivot_value = left.data[pivot_row][column];
            if pivot_value.abs() <= epsilon {
                return None;
            }
            left.data.swap(column, pivot_row);
            right.data.swap(column, pivot_row);

            left.multiply_row(column, 1f64 / pivot_value);
            right.multiply_row(column, 1f64 / pivot_value);
            for row in 0..m {
                if row != column {
                    let factor = left.data[row][column];
                    if factor != 0f64 {
                        left.mul_add_rows(column, row, -factor);
                        right.mul_add_rows(column, row, -factor);
                    }
                }
            }
        }

        Some(right)
    }

    /// Determine which rows of the system `[self | b]` are linearly dependent on earlier rows.
    ///
    /// Rows are reduced in order against an echelon basis of the rows before them; a row that
    /// reduces to zero is redundant if its right hand side reduces to zero as well.
    ///
    /// # Arguments
    ///
    /// * `b`: Right hand side, one value per row.
    /// * `epsilon`: Relative tolerance for a reduced value to count as zero.
    ///
    /// # Return value
    ///
    /// The rank, or the index of the first row that contradicts the rows before it.
    pub fn row_rank(&self, b: &[f64], epsilon: f64) -> Result<Rank, usize> {
        debug_assert_eq!(b.len(), self.nr_rows());

        // (normalized row, right hand side, pivot column)
        let mut echelon: Vec<(Vec<f64>, f64, usize)> = Vec::with_capacity(self.nr_rows());
        let mut redundant = Vec::new();

        for (i, row) in self.data.iter().enumerate() {
            let scale = row.iter().fold(1f64, |max, value| max.max(value.abs()));
            let mut reduced = row.clone();
            let mut reduced_b = b[i];
            for (basis_row, basis_b, pivot) in &echelon {
                let factor = reduced[*pivot];
                if factor != 0f64 {
                    for (target, source) in reduced.iter_mut().zip(basis_row) {
                        *target -= factor * source;
                    }
                    reduced_b -= factor * basis_b;
                }
            }

            let largest = (0..self.nr_columns)
                .max_by(|&a, &b| reduced[a].abs().total_cmp(&reduced[b].abs()));
            match largest {
                Some(pivot) if reduced[pivot].abs() > epsilon * scale => {
                    let pivot_value = reduced[pivot];
                    for value in &mut reduced {
                        *value /= pivot_value;
                    }
                    echelon.push((reduced, reduced_b / pivot_value, pivot));
                }
                _ => {
                    if reduced_b.abs() > epsilon * b[i].abs().max(scale) {
                        return Err(i);
                    }
                    redundant.push(i);
                }
            }
        }

        Ok(if redundant.is_empty() { Rank::Full } else { Rank::Deficient(redundant) })
    }

    /// Get the number of rows in this matrix.
    #[inline]
    pub fn nr_rows(&self) -> usize {
        self.data.len()
    }

    /// Get the number of columns in this matrix.
    #[inline]
    pub fn nr_columns(&self) -> usize {
        self.nr_columns
    }

    /// Get the data of this matrix.
    pub fn data(self) -> Vec<Vec<f64>> {
        self.data
    }
}

impl Display for DenseMatrix {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for row in &self.data {
            for value in row {
                write!(f, "{:>10.4}", value)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use approx::assert_abs_diff_eq;

    use crate::data::linear_algebra::matrix::DenseMatrix;
    use crate::data::linear_algebra::Rank;

    fn test_matrix() -> DenseMatrix {
        DenseMatrix::from_data(vec![
            vec![1f64, 2f64, 0f64],
            vec![0f64, 5f64, 6f64],
        ])
    }

    #[test]
    fn create() {
        let m = test_matrix();
        assert_eq!(m.get_value(0, 0), 1f64);
        assert_eq!(m.get_value(1, 2), 6f64);

        let (rows, columns) = (29, 48);
        let m = DenseMatrix::zeros(rows, columns);
        assert_eq!(m.get_value(rows - 1, columns - 1), 0f64);

        let m = DenseMatrix::identity(13);
        assert_eq!(m.get_value(12, 12), 1f64);
        assert_eq!(m.get_value(0, 12), 0f64);
    }

    #[test]
    #[should_panic]
    fn out_of_bounds_get() {
        test_matrix().get_value(2, 0);
    }

    #[test]
    fn row_column() {
        let m = test_matrix();

        assert_eq!(m.column(2)[0], 0f64);
        assert_eq!(m.column(1).iter().sum::<f64>(), 2f64 + 5f64);
        assert_eq!(m.row(1).iter().sum::<f64>(), 5f64 + 6f64);
    }

    #[test]
    fn mul_add_rows() {
        let mut m = test_matrix();
        m.mul_add_rows(0, 1, -2f64);
        assert_eq!(m.row(1), &[-2f64, 1f64, 6f64]);
        m.mul_add_rows(1, 0, 1f64);
        assert_eq!(m.row(0), &[-1f64, 3f64, 6f64]);
    }

    #[test]
    fn grow_and_shrink() {
        let mut m = test_matrix();
        m.push_column(&[7f64, 8f64]);
        m.push_row(vec![1f64, 1f64, 1f64, 1f64]);
        assert_eq!((m.nr_rows(), m.nr_columns()), (3, 4));

        m.remove_columns(&[0, 2]);
        assert_eq!(m.row(0), &[2f64, 7f64]);
        m.remove_rows(&[1]);
        assert_eq!(m, DenseMatrix::from_data(vec![vec![2f64, 7f64], vec![1f64, 1f64]]));

        m.extend_with_zero_columns(2);
        assert_eq!(m.row(1), &[1f64, 1f64, 0f64, 0f64]);
    }

    #[test]
    fn products() {
        let m = test_matrix();
        assert_eq!(m.multiply_column(&[1f64, 1f64, 1f64]), vec![3f64, 11f64]);
        assert_eq!(m.multiply_row_vector(&[1f64, -1f64]), vec![1f64, -3f64, -6f64]);
        assert_eq!(m.transpose().nr_rows(), 3);
        assert_eq!(m.select(&[1], &[2, 0]), DenseMatrix::from_data(vec![vec![6f64, 0f64]]));
    }

    #[test]
    fn invert() {
        let m = DenseMatrix::from_data(vec![
            vec![0f64, 2f64, 1f64],
            vec![1f64, 0f64, 0f64],
            vec![3f64, 1f64, 1f64],
        ]);
        let inverse = m.invert(1e-12).unwrap();
        let product = m.multiply(&inverse);
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1f64 } else { 0f64 };
                assert_abs_diff_eq!(product.get_value(i, j), expected, epsilon = 1e-12);
            }
        }

        let singular = DenseMatrix::from_data(vec![vec![1f64, 2f64], vec![2f64, 4f64]]);
        assert!(singular.invert(1e-12).is_none());
    }

    #[test]
    fn rank() {
        let m = DenseMatrix::from_data(vec![
            vec![1f64, 1f64, 0f64],
            vec![0f64, 1f64, 1f64],
            vec![1f64, 2f64, 1f64],
        ]);
        assert_eq!(m.row_rank(&[1f64, 2f64, 3f64], 1e-9), Ok(Rank::Deficient(vec![2])));
        assert_eq!(m.row_rank(&[1f64, 2f64, 4f64], 1e-9), Err(2));

        let m = DenseMatrix::identity(3);
        assert_eq!(m.row_rank(&[1f64, 2f64, 3f64], 1e-9), Ok(Rank::Full));
    }
}
