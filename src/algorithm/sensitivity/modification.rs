//! # Modifying a solved problem
//!
//! Evaluates a new column or a new row against an optimal solution. A new column only needs its
//! reduced cost; a new row that cuts off the current solution makes the basis primal infeasible
//! but keeps it dual feasible, so the dual simplex method restores optimality from there.
use log::{debug, info};

use crate::algorithm::sensitivity::SensitivityAnalysis;
use crate::algorithm::two_phase::tableau::TableauSimplex;
use crate::data::linear_algebra::inner_product;
use crate::data::linear_program::canonical_form::CanonicalForm;
use crate::data::linear_program::elements::ConstraintType;
use crate::data::linear_program::solution::Solution;
use crate::error::{Error, Result};

/// Effect of adding a column to a solved problem.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEvaluation {
    /// Canonical reduced cost `c_new - y^T a_new`.
    pub reduced_cost: f64,
    /// Whether the column would enter the basis, that is, whether the solution stops being optimal.
    pub enters: bool,
    /// The column with respect to the current basis, `B^-1 a_new`.
    pub representation: Vec<f64>,
}

/// Result of adding a row to a solved problem.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintAddition {
    /// Whether the current solution violates the new row.
    pub violated: bool,
    /// By how much; zero if the row is satisfied.
    pub violation: f64,
    /// The form extended with the new row.
    pub form: CanonicalForm,
    /// Solution of the extended form. The current solution, extended with the new slack, if the
    /// row was satisfied; the re-optimized solution otherwise.
    pub solution: Solution,
}

impl ConstraintAddition {
    /// Fail with `ConstraintViolation` if the row cut off the previous solution.
    pub fn ensure_satisfied(&self) -> Result<()> {
        if self.violated {
            Err(Error::ConstraintViolation(self.violation))
        } else {
            Ok(())
        }
    }
}

impl<'a> SensitivityAnalysis<'a> {
    /// Evaluate a new column.
    ///
    /// # Arguments
    ///
    /// * `cost`: Objective coefficient, in the sense of the original objective.
    /// * `coefficients`: One value for each row of the form.
    ///
    /// # Return value
    ///
    /// `DimensionMismatch` if the number of coefficients doesn't match the number of rows.
    pub fn add_activity(&self, cost: f64, coefficients: &[f64]) -> Result<ActivityEvaluation> {
        if coefficients.len() != self.form.nr_rows() {
            return Err(Error::dimension("new activity", self.form.nr_rows(), coefficients.len()));
        }

        let canonical_cost = self.form.objective().sign() * cost;
        let reduced_cost = canonical_cost - inner_product(&self.duals, coefficients);
        let representation = self.inverse.represent(coefficients);
        let enters = reduced_cost < -self.settings.epsilon;
        debug!("New activity has reduced cost {}, enters: {}", reduced_cost, enters);

        Ok(ActivityEvaluation { reduced_cost, enters, representation })
    }

    /// Add a row and re-optimize if needed.
    ///
    /// # Arguments
    ///
    /// * `coefficients`: One value for each column of the form.
    /// * `relation`: Type of the row.
    /// * `rhs`: Right hand side.
    ///
    /// # Return value
    ///
    /// An error if the row doesn't fit the form. A violated row is not an error; the result
    /// contains the re-optimized solution and reports the violation.
    pub fn add_constraint(&self, coefficients: Vec<f64>, relation: ConstraintType, rhs: f64) -> Result<ConstraintAddition> {
        let form = self.form.with_constraint(coefficients, relation, rhs)?;
        let row = form.constraints().row(form.nr_rows() - 1);
        let lhs = inner_product(&row[..self.form.nr_columns()], &self.solution.values);
        let violation = relation.violation(lhs, rhs);
        let violated = !relation.is_satisfied(lhs, rhs, self.settings.epsilon);

        let basis = self.inverse.basis().extended(&form);
        let solution = if violated {
            info!("Added constraint is violated by {}, re-optimizing", violation);
            let solver = TableauSimplex::new(self.settings);
            match &basis {
                Some(basis) => solver.solve_from_basis(&form, basis),
                None => solver.solve(&form),
            }
        } else {
            let mut solution = self.solution.clone();
            if let Some(coefficient) = relation.slack_coefficient::<f64>() {
                solution.values.push(coefficient * (rhs - lhs));
            }
            solution.basis = basis;
            solution
        };

        Ok(ConstraintAddition {
            violated,
            violation: if violated { violation } else { 0f64 },
            form,
            solution,
        })
    }
}
