//! Small linear program with a unique, non degenerate optimum.
//!
//! ```text
//! max 2x1 + 3x2
//! s.t. x1 + x2 <= 4
//!      x1      <= 3
//!      x1, x2  >= 0
//! ```
//!
//! The optimum is `x = (0, 4)` with value 12.
use approx::assert_abs_diff_eq;

use crate::algorithm::{Algorithm, solve_canonical};
use crate::algorithm::sensitivity::SensitivityAnalysis;
use crate::algorithm::settings::Settings;
use crate::algorithm::two_phase::revised::RevisedSimplex;
use crate::algorithm::two_phase::tableau::TableauSimplex;
use crate::data::linear_algebra::matrix::DenseMatrix;
use crate::data::linear_program::canonical_form::CanonicalForm;
use crate::data::linear_program::elements::{ConstraintType, Objective, VariableKind};
use crate::data::linear_program::problem::Problem;
use crate::data::linear_program::solution::SolutionStatus;

pub fn problem() -> Problem {
    Problem::new(Objective::Maximize, vec![2f64, 3f64])
        .with_constraint(vec![1f64, 1f64], ConstraintType::Less, 4f64)
        .with_constraint(vec![1f64, 0f64], ConstraintType::Less, 3f64)
}

pub fn form() -> CanonicalForm {
    CanonicalForm::new(&problem()).unwrap()
}

/// `max x1 + x2, x1 + x2 >= 10`
pub fn unbounded_problem() -> Problem {
    Problem::new(Objective::Maximize, vec![1f64, 1f64])
        .with_constraint(vec![1f64, 1f64], ConstraintType::Greater, 10f64)
}

pub fn unbounded_form() -> CanonicalForm {
    CanonicalForm::new(&unbounded_problem()).unwrap()
}

#[test]
fn conversion() {
    let form = form();

    assert_eq!(form.cost(), &[-2f64, -3f64, 0f64, 0f64]);
    assert_eq!(form.constraints(), &DenseMatrix::from_data(vec![
        vec![1f64, 1f64, 1f64, 0f64],
        vec![1f64, 0f64, 0f64, 1f64],
    ]));
    assert_eq!(form.b(), &[4f64, 3f64]);
    assert_eq!(form.nr_structural(), 2);
    assert_eq!(form.nr_slacks(), 2);
    assert_eq!(form.variable_names(), vec!["x1", "x2", "s1", "s2"]);
}

#[test]
fn names_are_injective() {
    let problem = Problem::new(Objective::Minimize, vec![1f64, 1f64, 1f64])
        .with_constraint(vec![1f64, 1f64, 1f64], ConstraintType::Greater, 1f64)
        .with_constraint(vec![1f64, -1f64, 0f64], ConstraintType::Equal, 0f64)
        .with_constraint(vec![0f64, 1f64, 1f64], ConstraintType::Less, 5f64)
        .with_variable_kind(0, VariableKind::Unrestricted)
        .with_variable_kind(1, VariableKind::NonPositive);
    let form = CanonicalForm::new(&problem).unwrap();

    let expected_columns = problem.variables.iter().map(|variable| variable.kind.nr_columns()).sum::<usize>();
    assert_eq!(form.nr_structural(), expected_columns);
    assert_eq!(form.nr_columns(), expected_columns + form.nr_slacks());
    assert_eq!(form.variable_names(), vec!["x1+", "x1-", "x2", "x3", "s1", "s2"]);

    let renamed = problem.with_name(2, "x1+");
    assert!(CanonicalForm::new(&renamed).is_err());
}

#[test]
fn optimal() {
    let form = form();
    let settings = Settings::default();

    for algorithm in [Algorithm::TableauSimplex, Algorithm::RevisedSimplex] {
        let solution = solve_canonical(&form, algorithm, &settings);
        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert_abs_diff_eq!(solution.objective_value, 12f64, epsilon = 1e-9);
        assert!(form.is_feasible(&solution.values, 1e-9));
        assert_eq!(solution.original_values(&form), vec![0f64, 4f64]);
        assert!(solution.iterations.last().is_some_and(|iteration| iteration.is_final && iteration.is_optimal));
    }
}

#[test]
fn unbounded() {
    let form = unbounded_form();
    let settings = Settings::default();

    for algorithm in [Algorithm::TableauSimplex, Algorithm::RevisedSimplex, Algorithm::BranchAndBound] {
        let solution = solve_canonical(&form, algorithm, &settings);
        assert_eq!(solution.status, SolutionStatus::Unbounded);
    }
}

#[test]
fn warm_start_is_idempotent() {
    let form = form();
    let settings = Settings::default();

    let solution = TableauSimplex::new(&settings).solve(&form);
    let basis = solution.basis.as_ref().unwrap();
    let resolved = TableauSimplex::new(&settings).solve_from_basis(&form, basis);
    assert_eq!(resolved.pivots, 0);
    assert_eq!(resolved.objective_value, solution.objective_value);

    let resolved = RevisedSimplex::new(&settings).solve_from_basis(&form, basis);
    assert_eq!(resolved.pivots, 0);
    assert_abs_diff_eq!(resolved.objective_value, solution.objective_value, epsilon = 1e-9);
}

#[test]
fn shadow_price_predicts_objective() {
    let settings = Settings::default();
    let form = form();
    let solution = TableauSimplex::new(&settings).solve(&form);
    let analysis = SensitivityAnalysis::new(&form, &solution, &settings).unwrap();

    let delta = 0.5;
    let price = analysis.shadow_price(0);
    let range = analysis.rhs_range(0);
    assert!(price.binding);
    assert!(range.contains(4f64 + delta));

    let mut perturbed = problem();
    perturbed.constraints[0].rhs += delta;
    let perturbed_form = CanonicalForm::new(&perturbed).unwrap();
    let resolved = TableauSimplex::new(&settings).solve(&perturbed_form);

    assert_abs_diff_eq!(
        solution.objective_value + price.price * delta,
        resolved.objective_value,
        epsilon = 1e-9,
    );
}
