//! # Algorithms
//!
//! Four solvers share one capability: turning a `CanonicalForm` into a `Solution`. The simplex
//! solvers ignore integrality and solve the linear relaxation; branch and bound and cutting planes
//! enforce it. The caller picks one with an `Algorithm` value.
use log::debug;

use crate::algorithm::branch_and_bound::BranchAndBound;
use crate::algorithm::cutting_plane::CuttingPlane;
use crate::algorithm::settings::Settings;
use crate::algorithm::two_phase::revised::RevisedSimplex;
use crate::algorithm::two_phase::tableau::TableauSimplex;
use crate::data::linear_program::canonical_form::CanonicalForm;
use crate::data::linear_program::problem::Problem;
use crate::data::linear_program::solution::Solution;
use crate::error::Result;

pub mod settings;
pub mod two_phase;
pub mod branch_and_bound;
pub mod cutting_plane;
pub mod sensitivity;

/// Choice of solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    /// Primal simplex on a full tableau; integrality is ignored.
    ///
    /// Binary columns are plain non negative columns, without an upper bound of one. Apply
    /// `CanonicalForm::with_binary_upper_bounds` first to solve the usual relaxation.
    #[default]
    TableauSimplex,
    /// Simplex with the basis inverse in product form; integrality is ignored.
    ///
    /// Binary columns are treated like they are by `TableauSimplex`.
    RevisedSimplex,
    /// Branch and bound over the integer and binary variables.
    BranchAndBound,
    /// Gomory cutting planes over the integer and binary variables.
    CuttingPlane,
}

impl Algorithm {
    /// Whether this algorithm enforces integrality.
    pub fn is_integer(self) -> bool {
        matches!(self, Algorithm::BranchAndBound | Algorithm::CuttingPlane)
    }

    /// Solve a canonical form with this algorithm.
    pub fn solve(self, form: &CanonicalForm, settings: &Settings) -> Solution {
        debug!(
            "Solving a form with {} rows and {} columns using {:?}",
            form.nr_rows(), form.nr_columns(), self,
        );

        match self {
            Algorithm::TableauSimplex => TableauSimplex::new(settings).solve(form),
            Algorithm::RevisedSimplex => RevisedSimplex::new(settings).solve(form),
            Algorithm::BranchAndBound => BranchAndBound::new(form, settings).run(),
            Algorithm::CuttingPlane => CuttingPlane::new(form, settings).run(),
        }
    }
}

/// Solve a problem with default settings.
///
/// # Return value
///
/// An error only if the problem is malformed. Infeasibility, unboundedness and exhausted budgets
/// are reported through the status of the `Solution`.
pub fn solve(problem: &Problem, algorithm: Algorithm) -> Result<Solution> {
    solve_with_settings(problem, algorithm, &Settings::default())
}

/// Solve a problem.
///
/// The values of the solution are indexed by canonical column; use `Solution::original_values`
/// with the canonical form of the problem to map them back.
pub fn solve_with_settings(problem: &Problem, algorithm: Algorithm, settings: &Settings) -> Result<Solution> {
    let form = CanonicalForm::new(problem)?;

    Ok(solve_canonical(&form, algorithm, settings))
}

/// Solve a problem that is already in canonical form.
pub fn solve_canonical(form: &CanonicalForm, algorithm: Algorithm, settings: &Settings) -> Solution {
    algorithm.solve(form, settings)
}

#[cfg(test)]
mod test {
    use approx::assert_abs_diff_eq;

    use crate::algorithm::{Algorithm, solve, solve_canonical};
    use crate::algorithm::settings::Settings;
    use crate::data::linear_program::canonical_form::CanonicalForm;
    use crate::data::linear_program::elements::{ConstraintType, Objective, VariableKind};
    use crate::data::linear_program::problem::Problem;
    use crate::data::linear_program::solution::SolutionStatus;
    use crate::error::Error;
    use crate::tests::{problem_1, problem_2};

    #[test]
    fn dispatch() {
        let form = problem_2::form();
        let settings = Settings::default();

        for algorithm in [Algorithm::TableauSimplex, Algorithm::RevisedSimplex] {
            let solution = solve_canonical(&form, algorithm, &settings);
            assert_eq!(solution.status, SolutionStatus::Optimal);
            assert_abs_diff_eq!(solution.objective_value, 10.5f64, epsilon = 1e-9);
        }
        for algorithm in [Algorithm::BranchAndBound, Algorithm::CuttingPlane] {
            assert!(algorithm.is_integer());
            let solution = solve_canonical(&form, algorithm, &settings);
            assert_eq!(solution.status, SolutionStatus::Optimal);
            assert_abs_diff_eq!(solution.objective_value, 9f64, epsilon = 1e-9);
        }
    }

    #[test]
    fn from_problem() {
        let solution = solve(&problem_1::problem(), Algorithm::default()).unwrap();
        assert_abs_diff_eq!(solution.objective_value, 12f64, epsilon = 1e-9);
    }

    #[test]
    fn malformed() {
        let problem = Problem::new(Objective::Maximize, vec![1f64, 1f64])
            .with_constraint(vec![1f64, 1f64, 1f64], ConstraintType::Less, 1f64);
        assert!(matches!(solve(&problem, Algorithm::RevisedSimplex), Err(Error::DimensionMismatch { .. })));
    }

    #[test]
    fn binary_columns_in_relaxations() {
        let problem = Problem::new(Objective::Maximize, vec![5f64, 4f64, 3f64])
            .with_constraint(vec![2f64, 3f64, 1f64], ConstraintType::Less, 5f64)
            .with_constraint(vec![4f64, 1f64, 2f64], ConstraintType::Less, 11f64)
            .with_constraint(vec![3f64, 4f64, 2f64], ConstraintType::Less, 8f64)
            .with_variable_kinds(&[VariableKind::Binary; 3]);
        let form = CanonicalForm::new(&problem).unwrap();
        let bounded = form.with_binary_upper_bounds().unwrap();
        let settings = Settings::default();

        for algorithm in [Algorithm::TableauSimplex, Algorithm::RevisedSimplex] {
            // Without bounds, x1 = 2 at the vertex (2, 0, 1)
            let solution = solve_canonical(&form, algorithm, &settings);
            assert_eq!(solution.status, SolutionStatus::Optimal);
            assert_abs_diff_eq!(solution.objective_value, 13f64, epsilon = 1e-9);
            assert!(!problem.is_feasible(&solution.original_values(&form), 1e-9));

            let solution = solve_canonical(&bounded, algorithm, &settings);
            assert_eq!(solution.status, SolutionStatus::Optimal);
            assert!(solution.original_values(&bounded).iter().all(|&value| value <= 1f64 + 1e-9));
        }
    }
}
