//! # Basis inverse
//!
//! Explicit inverse of a basis matrix of a canonical form. Used after a solve to read off rows of
//! the final tableau, dual values and ranging information without repeating any pivots.
use crate::data::linear_algebra::inner_product;
use crate::data::linear_algebra::matrix::DenseMatrix;
use crate::data::linear_program::canonical_form::CanonicalForm;
use crate::data::linear_program::solution::Basis;
use crate::error::{Error, Result};

/// Inverse of `B = A[rows, basic]` for a basis of a form.
#[derive(Debug, Clone, PartialEq)]
pub struct BasisInverse<'a> {
    form: &'a CanonicalForm,
    basis: &'a Basis,
    /// Row major, one row per basis row.
    inverse: DenseMatrix,
}

impl<'a> BasisInverse<'a> {
    /// Invert a basis matrix.
    ///
    /// # Return value
    ///
    /// `DimensionMismatch` if the basis belongs to a form of different dimensions, `SingularBasis`
    /// if the basic columns are linearly dependent.
    pub fn new(form: &'a CanonicalForm, basis: &'a Basis, epsilon: f64) -> Result<Self> {
        if basis.nr_rows() != form.nr_rows() {
            return Err(Error::dimension("basis rows", form.nr_rows(), basis.nr_rows()));
        }
        if basis.nr_columns() != form.nr_columns() {
            return Err(Error::dimension("basis columns", form.nr_columns(), basis.nr_columns()));
        }

        let basis_matrix = form.constraints().select(basis.rows(), basis.basic());
        let inverse = basis_matrix.invert(epsilon).ok_or(Error::SingularBasis)?;

        Ok(Self { form, basis, inverse })
    }

    /// Number of basis rows.
    pub fn len(&self) -> usize {
        self.basis.basic().len()
    }

    /// Whether the basis has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Values of the basic variables, `B^-1 b`.
    pub fn basic_values(&self) -> Vec<f64> {
        let b = self.basis.rows().iter().map(|&i| self.form.b()[i]).collect::<Vec<_>>();
        self.inverse.multiply_column(&b)
    }

    /// Column `j` with respect to the basis, `B^-1 a_j`.
    pub fn column(&self, j: usize) -> Vec<f64> {
        self.represent(&self.form.constraints().column(j))
    }

    /// Any column with respect to the basis.
    ///
    /// # Arguments
    ///
    /// * `column`: One value for each row of the form. Values of rows without a basis row are
    /// ignored.
    pub fn represent(&self, column: &[f64]) -> Vec<f64> {
        debug_assert_eq!(column.len(), self.form.nr_rows());

        let column = self.basis.rows().iter().map(|&i| column[i]).collect::<Vec<_>>();
        self.inverse.multiply_column(&column)
    }

    /// Column `k` of the basis inverse, `B^-1 e_k`.
    ///
    /// Describes how the basic values change with the right hand side of basis row `k`.
    pub fn inverse_column(&self, k: usize) -> Vec<f64> {
        self.inverse.column(k)
    }

    /// Row `i` of the tableau, `e_i^T B^-1 A`, over all columns of the form.
    pub fn tableau_row(&self, i: usize) -> Vec<f64> {
        (0..self.form.nr_columns())
            .map(|j| {
                self.basis.rows().iter().enumerate()
                    .map(|(k, &row)| self.inverse.get_value(i, k) * self.form.constraints().get_value(row, j))
                    .sum()
            })
            .collect()
    }

    /// Dual values `c_B^T B^-1`, one for each basis row.
    pub fn dual_values(&self) -> Vec<f64> {
        let basic_cost = self.basis.basic().iter().map(|&j| self.form.cost()[j]).collect::<Vec<_>>();
        self.inverse.multiply_row_vector(&basic_cost)
    }

    /// Reduced cost of every column, `c_j - y^T a_j`.
    pub fn reduced_costs(&self) -> Vec<f64> {
        let duals = self.dual_values();
        (0..self.form.nr_columns())
            .map(|j| {
                let column = self.basis.rows().iter()
                    .map(|&i| self.form.constraints().get_value(i, j))
                    .collect::<Vec<_>>();
                self.form.cost()[j] - inner_product(&duals, &column)
            })
            .collect()
    }

    /// The basis this inverse belongs to.
    pub fn basis(&self) -> &Basis {
        self.basis
    }
}

#[cfg(test)]
mod test {
    use crate::algorithm::two_phase::basis::BasisInverse;
    use crate::data::linear_program::solution::Basis;
    use crate::error::Error;
    use crate::tests::problem_1;

    #[test]
    fn optimal_basis() {
        let form = problem_1::form();
        // x2 basic in the first row, s2 in the second
        let basis = Basis::new(vec![1, 3], vec![0, 1], 2, 4);
        let inverse = BasisInverse::new(&form, &basis, 1e-9).unwrap();

        assert_eq!(inverse.len(), 2);
        assert_eq!(inverse.basic_values(), vec![4f64, 3f64]);
        assert_eq!(inverse.column(0), vec![1f64, 1f64]);
        assert_eq!(inverse.represent(&[2f64, -1f64]), vec![2f64, -1f64]);
        assert_eq!(inverse.tableau_row(0), vec![1f64, 1f64, 1f64, 0f64]);
        assert_eq!(inverse.inverse_column(0), vec![1f64, 0f64]);
        assert_eq!(inverse.dual_values(), vec![-3f64, 0f64]);
        assert_eq!(inverse.reduced_costs(), vec![1f64, 0f64, 3f64, 0f64]);
    }

    #[test]
    fn singular() {
        let form = problem_1::form();
        let basis = Basis::new(vec![2, 2], vec![0, 1], 2, 4);
        assert_eq!(BasisInverse::new(&form, &basis, 1e-9), Err(Error::SingularBasis));
    }

    #[test]
    fn wrong_dimensions() {
        let form = problem_1::form();
        let basis = Basis::new(vec![0], vec![0], 1, 4);
        assert!(matches!(BasisInverse::new(&form, &basis, 1e-9), Err(Error::DimensionMismatch { .. })));
    }
}
