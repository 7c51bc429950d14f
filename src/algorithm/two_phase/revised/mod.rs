//! # Revised simplex method
//!
//! Instead of updating the full tableau at every pivot, only the values of the basic variables and
//! a representation of the basis inverse are maintained. Columns and rows of the tableau are
//! computed when needed. The inverse is kept in product form and recomputed from scratch every
//! `refactorization_interval` pivots.
use std::collections::HashSet;

use index_utils::remove_indices;
use log::{debug, warn};

use crate::algorithm::settings::Settings;
use crate::algorithm::two_phase::{basis_mismatch, contradiction, SimplexTableau, Trace, two_phase, warm_start};
use crate::algorithm::two_phase::phase_one::Standardized;
use crate::algorithm::two_phase::revised::eta_file::EtaFile;
use crate::algorithm::two_phase::strategy::pivot_rule::Pricing;
use crate::data::linear_algebra::matrix::DenseMatrix;
use crate::data::linear_program::canonical_form::CanonicalForm;
use crate::data::linear_program::solution::{Basis, Solution, SolutionStatus, TableauSnapshot};
use crate::error::Error;

pub mod eta_file;

/// Basis, basic values and basis inverse of a revised simplex solve.
#[derive(Debug, Clone, PartialEq)]
pub struct RevisedTableau {
    /// Constraint rows, artificial columns included. Never modified during the pivots.
    matrix: DenseMatrix,
    b: Vec<f64>,
    cost: Vec<f64>,
    /// Basic column of each row.
    basis: Vec<usize>,
    basis_columns: HashSet<usize>,
    /// Canonical form row of each row.
    rows: Vec<usize>,
    nr_enterable: usize,

    inverse: EtaFile,
    /// Values of the basic variables, `B^-1 b`.
    values: Vec<f64>,
    /// Dual values, `c_B^T B^-1`.
    duals: Vec<f64>,

    refactorization_interval: usize,
    epsilon: f64,
}

impl RevisedTableau {
    /// Create a new instance.
    ///
    /// # Arguments
    ///
    /// * `matrix`: Constraint rows.
    /// * `b`: Right hand side, one value per row.
    /// * `rows`: Canonical form row of each row.
    /// * `basis`: Basic column of each row.
    /// * `cost`: Cost of each column.
    /// * `nr_enterable`: Number of columns that may enter the basis.
    ///
    /// # Return value
    ///
    /// `SingularBasis` if the basis columns are linearly dependent.
    pub fn new(
        matrix: DenseMatrix,
        b: Vec<f64>,
        rows: Vec<usize>,
        basis: Vec<usize>,
        cost: Vec<f64>,
        nr_enterable: usize,
        settings: &Settings,
    ) -> Result<Self, Error> {
        debug_assert_eq!(matrix.nr_rows(), b.len());
        debug_assert_eq!(matrix.nr_columns(), cost.len());
        debug_assert_eq!(basis.len(), b.len());

        let m = b.len();
        let mut tableau = Self {
            matrix,
            b,
            cost,
            basis_columns: basis.iter().copied().collect(),
            basis,
            rows,
            nr_enterable,
            inverse: EtaFile::new(DenseMatrix::identity(m)),
            values: Vec::new(),
            duals: Vec::new(),
            refactorization_interval: settings.refactorization_interval,
            epsilon: settings.epsilon,
        };
        if !tableau.factorize() {
            return Err(Error::SingularBasis);
        }
        tableau.update_duals();

        Ok(tableau)
    }

    /// Create an instance for the given basis of a form.
    ///
    /// Rows of the form that the basis doesn't cover are left out.
    pub fn for_basis(form: &CanonicalForm, basis: &Basis, settings: &Settings) -> Result<Self, Error> {
        let columns = (0..form.nr_columns()).collect::<Vec<_>>();
        let matrix = form.constraints().select(basis.rows(), &columns);
        let b = basis.rows().iter().map(|&i| form.b()[i]).collect();

        Self::new(
            matrix,
            b,
            basis.rows().to_vec(),
            basis.basic().to_vec(),
            form.cost().to_vec(),
            form.nr_columns(),
            settings,
        )
    }

    /// Invert the basis matrix from scratch and recompute the basic values.
    ///
    /// # Return value
    ///
    /// Whether the basis matrix could be inverted. If not, nothing is changed.
    fn factorize(&mut self) -> bool {
        let all_rows = (0..self.matrix.nr_rows()).collect::<Vec<_>>();
        let basis_matrix = self.matrix.select(&all_rows, &self.basis);
        match basis_matrix.invert(self.epsilon) {
            Some(inverse) => {
                self.inverse = EtaFile::new(inverse);
                self.values = self.inverse.forward(&self.b);
                true
            }
            None => false,
        }
    }

    fn update_duals(&mut self) {
        let basic_cost = self.basis.iter().map(|&j| self.cost[j]).collect::<Vec<_>>();
        self.duals = self.inverse.backward(&basic_cost);
    }

    /// Number of columns, artificial columns included.
    pub fn nr_columns(&self) -> usize {
        self.matrix.nr_columns()
    }

    /// Dual values of the rows.
    pub fn duals(&self) -> &[f64] {
        &self.duals
    }
}

impl Pricing for RevisedTableau {
    fn nr_columns(&self) -> usize {
        self.nr_enterable
    }

    fn is_in_basis(&self, j: usize) -> bool {
        self.basis_columns.contains(&j)
    }

    fn relative_cost(&self, j: usize) -> f64 {
        let price = self.matrix.rows().zip(&self.duals)
            .map(|(row, dual)| row[j] * dual)
            .sum::<f64>();

        self.cost[j] - price
    }
}

impl SimplexTableau for RevisedTableau {
    fn nr_rows(&self) -> usize {
        self.basis.len()
    }

    fn basis(&self) -> &[usize] {
        &self.basis
    }

    fn rows(&self) -> &[usize] {
        &self.rows
    }

    fn rhs(&self) -> Vec<f64> {
        self.values.clone()
    }

    fn generate_column(&self, j: usize) -> Vec<f64> {
        self.inverse.forward(&self.matrix.column(j))
    }

    fn generate_row(&self, i: usize) -> Vec<f64> {
        let mut unit = vec![0f64; self.basis.len()];
        unit[i] = 1f64;

        self.matrix.multiply_row_vector(&self.inverse.backward(&unit))
    }

    fn bring_into_basis(&mut self, column_index: usize, row_index: usize, column: &[f64]) {
        debug_assert!(column[row_index].abs() > 0f64);

        let theta = self.values[row_index] / column[row_index];
        for (value, &direction) in self.values.iter_mut().zip(column) {
            *value -= theta * direction;
        }
        self.values[row_index] = theta;

        self.inverse.push(row_index, column);
        let leaving_column = self.basis[row_index];
        self.basis_columns.remove(&leaving_column);
        self.basis_columns.insert(column_index);
        self.basis[row_index] = column_index;

        if self.inverse.nr_etas() >= self.refactorization_interval {
            if self.factorize() {
                debug!("Refactorized the basis inverse");
            } else {
                warn!("Basis matrix looks singular, continuing with the product form");
            }
        }
        self.update_duals();
    }

    fn set_cost(&mut self, cost: &[f64]) {
        debug_assert_eq!(cost.len(), RevisedTableau::nr_columns(self));

        self.cost = cost.to_vec();
        self.update_duals();
    }

    fn objective_value(&self) -> f64 {
        self.basis.iter().zip(&self.values)
            .map(|(&j, value)| self.cost[j] * value)
            .sum()
    }

    fn remove_artificial(&mut self, nr_columns: usize, rows: &[usize]) {
        debug_assert!(rows.iter().all(|&i| self.basis[i] >= nr_columns));

        let artificial = (nr_columns..RevisedTableau::nr_columns(self)).collect::<Vec<_>>();
        self.matrix.remove_rows(rows);
        self.matrix.remove_columns(&artificial);
        self.cost.truncate(nr_columns);
        remove_indices(&mut self.b, rows);
        remove_indices(&mut self.basis, rows);
        remove_indices(&mut self.rows, rows);
        debug_assert!(self.basis.iter().all(|&j| j < nr_columns));

        self.basis_columns = self.basis.iter().copied().collect();
        self.nr_enterable = nr_columns;

        if rows.is_empty() {
            return;
        }
        if !self.factorize() {
            warn!("Basis matrix is singular after removing {} redundant rows", rows.len());
        }
        self.update_duals();
    }

    fn snapshot(&self) -> TableauSnapshot {
        let mut rows = (0..self.basis.len())
            .map(|i| {
                let mut row = self.generate_row(i);
                row.push(self.values[i]);
                row
            })
            .collect::<Vec<_>>();
        let mut objective = (0..RevisedTableau::nr_columns(self))
            .map(|j| self.relative_cost(j))
            .collect::<Vec<_>>();
        objective.push(-self.objective_value());
        rows.push(objective);

        TableauSnapshot { rows, basis: self.basis.clone() }
    }
}

/// Primal simplex method with the product form of the inverse.
#[derive(Debug, Clone, Copy)]
pub struct RevisedSimplex<'a> {
    settings: &'a Settings,
}

impl<'a> RevisedSimplex<'a> {
    /// Create a new solver.
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Solve a linear program from scratch.
    ///
    /// Integrality of columns is ignored, and binary columns get no upper bound.
    pub fn solve(&self, form: &CanonicalForm) -> Solution {
        let mut trace = Trace::new(self.settings);
        let standardized = match Standardized::new(form, self.settings.epsilon) {
            Ok(standardized) => standardized,
            Err(row) => return contradiction(form, row, trace),
        };

        let nr_artificial = standardized.nr_artificial;
        let cost = if nr_artificial > 0 {
            standardized.phase_one_cost()
        } else {
            form.cost().to_vec()
        };
        let tableau = RevisedTableau::new(
            standardized.matrix,
            standardized.b,
            standardized.rows,
            standardized.basis,
            cost,
            form.nr_columns(),
            self.settings,
        );
        let mut tableau = match tableau {
            Ok(tableau) => tableau,
            Err(error) => return Solution::without_values(SolutionStatus::Error, error.to_string(), form.nr_columns()),
        };

        let label = if nr_artificial > 0 { "initial tableau (phase 1)" } else { "initial tableau" };
        trace.record(label.to_string(), || tableau.snapshot(), false);

        two_phase(&mut tableau, form, nr_artificial, self.settings, trace)
    }

    /// Solve a linear program starting from a given basis.
    ///
    /// Behaves like `TableauSimplex::solve_from_basis`.
    pub fn solve_from_basis(&self, form: &CanonicalForm, basis: &Basis) -> Solution {
        if let Some(solution) = basis_mismatch(form, basis) {
            return solution;
        }

        let mut tableau = match RevisedTableau::for_basis(form, basis, self.settings) {
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
