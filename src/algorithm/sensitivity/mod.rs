//! # Sensitivity analysis
//!
//! Post-optimal analysis of a linear program. Everything is derived from the inverse of the
//! final basis of an optimal solution: dual values, reduced costs, ranging and the effect of
//! adding a column or a row.
//!
//! Dual values and reduced costs are those of the canonical (minimization) form. Shadow prices,
//! cost ranges and the aggregate report are expressed in the sense of the original objective.
use crate::algorithm::settings::Settings;
use crate::algorithm::two_phase::basis::BasisInverse;
use crate::data::linear_program::canonical_form::CanonicalForm;
use crate::data::linear_program::elements::ConstraintType;
use crate::data::linear_program::solution::{Solution, SolutionStatus};
use crate::error::{Error, Result};

pub use crate::algorithm::sensitivity::duality::DualProblem;
pub use crate::algorithm::sensitivity::modification::{ActivityEvaluation, ConstraintAddition};
pub use crate::algorithm::sensitivity::ranging::{CostRange, RhsRange};

pub mod duality;
pub mod modification;
pub mod ranging;

/// Analysis of an optimal solution of a canonical form.
///
/// Borrows the form and the solution; no query modifies either of them.
#[derive(Debug, Clone)]
pub struct SensitivityAnalysis<'a> {
    form: &'a CanonicalForm,
    solution: &'a Solution,
    settings: &'a Settings,
    inverse: BasisInverse<'a>,
    /// Canonical dual value for each row of the form, zero for rows without a basis row.
    duals: Vec<f64>,
    /// Canonical reduced cost of each column.
    reduced_costs: Vec<f64>,
}

/// Marginal change of the objective per unit increase of a right hand side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowPrice {
    /// Row of the form.
    pub constraint: usize,
    /// In the sense of the original objective.
    pub price: f64,
    /// Whether the constraint holds with equality at the solution.
    pub binding: bool,
}

/// Everything the analysis can tell about a solution, computed at once.
#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityResult {
    /// Objective value in the sense of the original problem.
    pub objective_value: f64,
    /// Reduced cost of each column, in the sense of the original objective.
    pub reduced_costs: Vec<f64>,
    /// Range of each objective coefficient.
    pub cost_ranges: Vec<CostRange>,
    /// Range of each right hand side.
    pub rhs_ranges: Vec<RhsRange>,
    /// Shadow price of each constraint.
    pub shadow_prices: Vec<ShadowPrice>,
}

impl<'a> SensitivityAnalysis<'a> {
    /// Prepare the analysis of a solution.
    ///
    /// # Arguments
    ///
    /// * `form`: The form that was solved.
    /// * `solution`: Result of a simplex solve of `form`.
    /// * `settings`: Provides the zero tolerance, and the solver settings for re-optimization.
    ///
    /// # Return value
    ///
    /// `NotOptimal` if the solution has any other status, `DimensionMismatch` if the solution or
    /// its basis belongs to a different form (or if it has no basis at all, as is the case for
    /// integer programs), `SingularBasis` if the basis can't be inverted.
    pub fn new(form: &'a CanonicalForm, solution: &'a Solution, settings: &'a Settings) -> Result<Self> {
        if solution.status != SolutionStatus::Optimal {
            return Err(Error::NotOptimal(solution.status));
        }
        if solution.values.len() != form.nr_columns() {
            return Err(Error::dimension("solution values", form.nr_columns(), solution.values.len()));
        }
        let basis = solution.basis.as_ref()
            .ok_or_else(|| Error::dimension("basis", form.nr_rows(), 0))?;

        let inverse = BasisInverse::new(form, basis, settings.epsilon)?;

        let mut duals = vec![0f64; form.nr_rows()];
        for (&row, dual) in basis.rows().iter().zip(inverse.dual_values()) {
            duals[row] = if dual.abs() <= settings.epsilon { 0f64 } else { dual };
        }
        let reduced_costs = inverse.reduced_costs().into_iter()
            .map(|cost| if cost.abs() <= settings.epsilon { 0f64 } else { cost })
            .collect();

        Ok(Self { form, solution, settings, inverse, duals, reduced_costs })
    }

    /// Canonical dual values `c_B^T B^-1`, one for each row of the form.
    ///
    /// Rows that were dropped as redundant have a dual value of zero.
    pub fn dual_values(&self) -> &[f64] {
        &self.duals
    }

    /// Canonical reduced costs `c_j - y^T A_j`, one for each column of the form.
    ///
    /// Zero for basic columns, non negative for all columns at optimality.
    pub fn reduced_costs(&self) -> &[f64] {
        &self.reduced_costs
    }

    /// Shadow price of a single constraint.
    pub fn shadow_price(&self, i: usize) -> ShadowPrice {
        debug_assert!(i < self.form.nr_rows());

        ShadowPrice {
            constraint: i,
            price: self.reported(self.duals[i]),
            binding: self.is_binding(i),
        }
    }

    /// Shadow prices of all constraints, in row order.
    pub fn shadow_prices(&self) -> Vec<ShadowPrice> {
        (0..self.form.nr_rows()).map(|i| self.shadow_price(i)).collect()
    }

    /// Whether constraint `i` holds with equality at the solution.
    fn is_binding(&self, i: usize) -> bool {
        match (self.form.relation(i), self.form.slack_column(i)) {
            (ConstraintType::Equal, _) | (_, None) => true,
            (_, Some(slack)) => self.solution.values[slack].abs() <= self.settings.epsilon,
        }
    }

    /// Compute all ranges, prices and reduced costs at once.
    pub fn report(&self) -> SensitivityResult {
        SensitivityResult {
            objective_value: self.solution.objective_value,
            reduced_costs: self.reduced_costs.iter().map(|&cost| self.reported(cost)).collect(),
            cost_ranges: self.cost_ranges(),
            rhs_ranges: self.rhs_ranges(),
            shadow_prices: self.shadow_prices(),
        }
    }

    /// The form this analysis belongs to.
    pub fn form(&self) -> &CanonicalForm {
        self.form
    }

    /// The solution this analysis belongs to.
    pub fn solution(&self) -> &Solution {
        self.solution
    }

    /// Convert a canonical (minimization) quantity to the sense of the original objective.
    fn reported(&self, canonical: f64) -> f64 {
        let value = self.form.objective().sign() * canonical;
        // Avoid reporting -0
        if value == 0f64 { 0f64 } else { value }
    }
}
