//! # Data structures for Simplex
//!
//! Contains the simplex tableau and logic for elementary operations which can be performed upon it.
//! Every pivot updates the full tableau, which makes every row and column available at no extra
//! cost. That is convenient for small problems and for displaying the iterations.
use std::collections::HashSet;

use log::{debug, warn};

use crate::algorithm::settings::Settings;
use crate::algorithm::two_phase::{basis_mismatch, contradiction, SimplexTableau, Trace, two_phase, warm_start};
use crate::algorithm::two_phase::phase_one::Standardized;
use crate::algorithm::two_phase::strategy::pivot_rule::Pricing;
use crate::data::linear_algebra::matrix::DenseMatrix;
use crate::data::linear_program::canonical_form::CanonicalForm;
use crate::data::linear_program::solution::{Basis, Solution, TableauSnapshot};
use crate::error::Error;

/// The simplex tableau.
///
/// Stores the constraint rows followed by the objective row. The last column is the right hand
/// side; the objective row holds the reduced costs and minus the objective value.
#[derive(Debug, Clone, PartialEq)]
pub struct Tableau {
    /// Represents a matrix of size (m + 1) x (n + 1).
    ///
    /// This attribute changes with a basis change.
    matrix: DenseMatrix,
    /// Basic column for each row.
    basis: Vec<usize>,
    /// All columns currently in the basis.
    ///
    /// Could also be derived from `basis`, but is here for faster reading.
    basis_columns: HashSet<usize>,
    /// Canonical form row of each tableau row.
    rows: Vec<usize>,
    /// Number of columns that may enter the basis; artificial columns come after these.
    nr_enterable: usize,
}

impl Tableau {
    /// Create a new tableau.
    ///
    /// # Arguments
    ///
    /// * `constraints`: Constraint rows.
    /// * `b`: Right hand side, one value per row.
    /// * `rows`: Canonical form row of each row.
    /// * `basis`: Basic column of each row. These columns should equal the identity matrix.
    /// * `cost`: Cost of each column.
    /// * `nr_enterable`: Number of columns that may enter the basis.
    pub fn new(
        constraints: &DenseMatrix,
        b: &[f64],
        rows: Vec<usize>,
        basis: Vec<usize>,
        cost: &[f64],
        nr_enterable: usize,
    ) -> Self {
        debug_assert_eq!(constraints.nr_rows(), b.len());
        debug_assert_eq!(constraints.nr_columns(), cost.len());
        debug_assert_eq!(basis.len(), b.len());

        let mut matrix = constraints.clone();
        matrix.push_column(b);
        matrix.push_row(vec![0f64; constraints.nr_columns() + 1]);

        let basis_columns = basis.iter().copied().collect();
        let mut tableau = Self { matrix, basis, basis_columns, rows, nr_enterable };
        tableau.set_cost(cost);

        tableau
    }

    /// Create a tableau for the given basis of a form.
    ///
    /// Rows of the form that the basis doesn't cover are left out.
    ///
    /// # Return value
    ///
    /// `SingularBasis` if the basis columns are linearly dependent.
    pub fn for_basis(form: &CanonicalForm, basis: &Basis, epsilon: f64) -> Result<Self, Error> {
        let columns = (0..form.nr_columns()).collect::<Vec<_>>();
        let constraints = form.constraints().select(basis.rows(), &columns);
        let b = basis.rows().iter().map(|&i| form.b()[i]).collect::<Vec<_>>();
        let m = b.len();

        let mut matrix = constraints;
        matrix.push_column(&b);
        let mut objective = form.cost().to_vec();
        objective.push(0f64);
        matrix.push_row(objective);

        let mut tableau = Self {
            matrix,
            basis: vec![usize::MAX; m],
            basis_columns: HashSet::with_capacity(m),
            rows: basis.rows().to_vec(),
            nr_enterable: form.nr_columns(),
        };

        // Gauss-Jordan with partial pivoting; each basic column is assigned the remaining row in
        // which its value is largest.
        let mut assigned = vec![false; m];
        for &j in basis.basic() {
            let row = (0..m)
                .filter(|&i| !assigned[i])
                .fold(None, |best: Option<usize>, i| match best {
                    Some(k) if tableau.matrix.get_value(k, j).abs() >= tableau.matrix.get_value(i, j).abs() => Some(k),
                    _ => Some(i),
                })
                .ok_or(Error::SingularBasis)?;
            if tableau.matrix.get_value(row, j).abs() <= epsilon {
                return Err(Error::SingularBasis);
            }
            tableau.pivot(row, j);
            assigned[row] = true;
        }

        Ok(tableau)
    }

    /// Pivot on the element at (`pivot_row`, `pivot_column`).
    ///
    /// Normalizes the pivot row and eliminates the column from every other row, the objective row
    /// included.
    fn pivot(&mut self, pivot_row: usize, pivot_column: usize) {
        debug_assert!(pivot_row < self.nr_rows());
        debug_assert!(pivot_column < self.nr_columns());

        let pivot_value = self.matrix.get_value(pivot_row, pivot_column);
        debug_assert_ne!(pivot_value, 0f64);

        self.matrix.multiply_row(pivot_row, 1f64 / pivot_value);
        for i in 0..self.matrix.nr_rows() {
            if i != pivot_row {
                let factor = self.matrix.get_value(i, pivot_column);
                if factor != 0f64 {
                    self.matrix.mul_add_rows(pivot_row, i, -factor);
                    self.matrix.set_value(i, pivot_column, 0f64);
                }
            }
        }
        self.matrix.set_value(pivot_row, pivot_column, 1f64);

        let leaving_column = self.basis[pivot_row];
        self.basis_columns.remove(&leaving_column);
        self.basis_columns.insert(pivot_column);
        self.basis[pivot_row] = pivot_column;
    }

    /// Number of columns, artificial columns included.
    pub fn nr_columns(&self) -> usize {
        self.matrix.nr_columns() - 1
    }

    fn objective_row(&self) -> usize {
        self.matrix.nr_rows() - 1
    }
}

impl Pricing for Tableau {
    fn nr_columns(&self) -> usize {
        self.nr_enterable
    }

    fn is_in_basis(&self, j: usize) -> bool {
        self.basis_columns.contains(&j)
    }

    fn relative_cost(&self, j: usize) -> f64 {
        self.matrix.get_value(self.objective_row(), j)
    }
}

impl SimplexTableau for Tableau {
    fn nr_rows(&self) -> usize {
        self.matrix.nr_rows() - 1
    }

    fn basis(&self) -> &[usize] {
        &self.basis
    }

    fn rows(&self) -> &[usize] {
        &self.rows
    }

    fn rhs(&self) -> Vec<f64> {
        let n = Tableau::nr_columns(self);
        (0..SimplexTableau::nr_rows(self)).map(|i| self.matrix.get_value(i, n)).collect()
    }

    fn generate_column(&self, j: usize) -> Vec<f64> {
        (0..SimplexTableau::nr_rows(self)).map(|i| self.matrix.get_value(i, j)).collect()
    }

    fn generate_row(&self, i: usize) -> Vec<f64> {
        self.matrix.row(i)[..Tableau::nr_columns(self)].to_vec()
    }

    fn bring_into_basis(&mut self, column_index: usize, row_index: usize, _column: &[f64]) {
        self.pivot(row_index, column_index);
    }

    fn set_cost(&mut self, cost: &[f64]) {
        debug_assert_eq!(cost.len(), Tableau::nr_columns(self));

        let objective_row = self.objective_row();
        let row = self.matrix.row_mut(objective_row);
        row[..cost.len()].copy_from_slice(cost);
        row[cost.len()] = 0f64;
        for i in 0..objective_row {
            let factor = self.matrix.get_value(objective_row, self.basis[i]);
            if factor != 0f64 {
                self.matrix.mul_add_rows(i, objective_row, -factor);
                self.matrix.set_value(objective_row, self.basis[i], 0f64);
            }
        }
    }

    fn objective_value(&self) -> f64 {
        -self.matrix.get_value(self.objective_row(), Tableau::nr_columns(self))
    }

    fn remove_artificial(&mut self, nr_columns: usize, rows: &[usize]) {
        debug_assert!(rows.iter().all(|&i| self.basis[i] >= nr_columns));

        let artificial = (nr_columns..Tableau::nr_columns(self)).collect::<Vec<_>>();
        self.matrix.remove_rows(rows);
        self.matrix.remove_columns(&artificial);
        index_utils::remove_indices(&mut self.basis, rows);
        index_utils::remove_indices(&mut self.rows, rows);
        debug_assert!(self.basis.iter().all(|&j| j < nr_columns));

        self.basis_columns = self.basis.iter().copied().collect();
        self.nr_enterable = nr_columns;
    }

    fn snapshot(&self) -> TableauSnapshot {
        TableauSnapshot {
            rows: self.matrix.rows().map(<[f64]>::to_vec).collect(),
            basis: self.basis.clone(),
        }
    }
}

/// Primal simplex method on a full tableau.
#[derive(Debug, Clone, Copy)]
pub struct TableauSimplex<'a> {
    settings: &'a Settings,
}

impl<'a> TableauSimplex<'a> {
    /// Create a new solver.
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Solve a linear program from scratch.
    ///
    /// Integrality of columns is ignored, and binary columns get no upper bound.
    pub fn solve(&self, form: &CanonicalForm) -> Solution {
        let trace = Trace::new(self.settings);
        let standardized = match Standardized::new(form, self.settings.epsilon) {
            Ok(standardized) => standardized,
            Err(row) => return contradiction(form, row, trace),
        };

        let cost = if standardized.nr_artificial > 0 {
            standardized.phase_one_cost()
        } else {
            form.cost().to_vec()
        };
        let mut tableau = Tableau::new(
            &standardized.matrix,
            &standardized.b,
            standardized.rows,
            standardized.basis,
            &cost,
            form.nr_columns(),
        );

        self.run(&mut tableau, form, standardized.nr_artificial, trace)
    }

    fn run(&self, tableau: &mut Tableau, form: &CanonicalForm, nr_artificial: usize, mut trace: Trace) -> Solution {
        let label = if nr_artificial > 0 { "initial tableau (phase 1)" } else { "initial tableau" };
        trace.record(label.to_string(), || tableau.snapshot(), false);

        two_phase(tableau, form, nr_artificial, self.settings, trace)
    }

    /// Solve a linear program starting from a given basis.
    ///
    /// If the basis is primal feasible, only phase two runs; if it is optimal, no pivots are made.
    /// If it is dual feasible instead, the dual simplex method first restores primal feasibility.
    /// Otherwise, the problem is solved from scratch.
    pub fn solve_from_basis(&self, form: &CanonicalForm, basis: &Basis) -> Solution {
        if let Some(solution) = basis_mismatch(form, basis) {
            return solution;
        }

        let mut tableau = match Tableau::for_basis(form, basis, self.settings.epsilon) {
            Ok(tableau) => tableau,
            Err(error) => {
                warn!("Can't start from the given basis ({}), solving from scratch", error);
                return self.solve(form);
            }
        };

        warm_start(&mut tableau, form, self.settings, Trace::new(self.settings))
            .unwrap_or_else(|| {
                debug!("Solving from scratch instead");
                self.solve(form)
            })
    }
}
