use approx::{assert_abs_diff_eq, assert_relative_eq};

use relp_mip::{Algorithm, CanonicalForm, ConstraintType, Error, SensitivityAnalysis, Settings, SolutionStatus, solve_canonical};
use relp_mip::algorithm::sensitivity::DualProblem;

use crate::init_logging;
use crate::sensitivity::wyndor;

#[test]
fn shadow_prices() {
    init_logging();
    let form = CanonicalForm::new(&wyndor()).unwrap();
    let settings = Settings::default();
    let solution = solve_canonical(&form, Algorithm::RevisedSimplex, &settings);
    assert_abs_diff_eq!(solution.objective_value, 36f64, epsilon = 1e-9);

    let analysis = SensitivityAnalysis::new(&form, &solution, &settings).unwrap();
    let prices = analysis.shadow_prices().into_iter().map(|price| price.price).collect::<Vec<_>>();
    assert_abs_diff_eq!(prices[0], 0f64, epsilon = 1e-9);
    assert_relative_eq!(prices[1], 1.5f64, epsilon = 1e-9);
    assert_relative_eq!(prices[2], 1f64, epsilon = 1e-9);

    // Strong duality: the shadow prices solve the dual, with the same objective value
    let dual_value = form.b().iter().zip(&prices).map(|(b, y)| b * y).sum::<f64>();
    assert_abs_diff_eq!(dual_value, solution.objective_value, epsilon = 1e-9);
}

#[test]
fn ranges() {
    init_logging();
    let form = CanonicalForm::new(&wyndor()).unwrap();
    let settings = Settings::default();
    let solution = solve_canonical(&form, Algorithm::TableauSimplex, &settings);
    let report = SensitivityAnalysis::new(&form, &solution, &settings).unwrap().report();

    // The optimal vertex stays optimal for 0 <= c1 <= 7.5 and 2 <= c2
    assert_abs_diff_eq!(report.cost_ranges[0].lower, 0f64, epsilon = 1e-9);
    assert_abs_diff_eq!(report.cost_ranges[0].upper, 7.5f64, epsilon = 1e-9);
    assert_abs_diff_eq!(report.cost_ranges[1].lower, 2f64, epsilon = 1e-9);
    assert_eq!(report.cost_ranges[1].upper, f64::INFINITY);

    // The basis stays feasible for 6 <= b2 <= 18 and 12 <= b3 <= 24
    assert_abs_diff_eq!(report.rhs_ranges[1].lower, 6f64, epsilon = 1e-9);
    assert_abs_diff_eq!(report.rhs_ranges[1].upper, 18f64, epsilon = 1e-9);
    assert_abs_diff_eq!(report.rhs_ranges[2].lower, 12f64, epsilon = 1e-9);
    assert_abs_diff_eq!(report.rhs_ranges[2].upper, 24f64, epsilon = 1e-9);
    assert_abs_diff_eq!(report.rhs_ranges[0].lower, 2f64, epsilon = 1e-9);
    assert_eq!(report.rhs_ranges[0].upper, f64::INFINITY);
}

#[test]
fn dual_problem() {
    init_logging();
    let primal = wyndor();
    let dual = DualProblem::new(&primal).unwrap();
    let form = CanonicalForm::new(dual.problem()).unwrap();

    let solution = solve_canonical(&form, Algorithm::TableauSimplex, &Settings::default());
    assert_eq!(solution.status, SolutionStatus::Optimal);
    assert_abs_diff_eq!(solution.objective_value, 36f64, epsilon = 1e-9);
}

#[test]
fn re_optimization() {
    init_logging();
    let form = CanonicalForm::new(&wyndor()).unwrap();
    let settings = Settings::default();
    let solution = solve_canonical(&form, Algorithm::TableauSimplex, &settings);
    let analysis = SensitivityAnalysis::new(&form, &solution, &settings).unwrap();

    // x1 + x2 <= 7 cuts off (2, 6)
    let mut coefficients = vec![0f64; form.nr_columns()];
    coefficients[0] = 1f64;
    coefficients[1] = 1f64;
    let addition = analysis.add_constraint(coefficients, ConstraintType::Less, 7f64).unwrap();

    assert!(addition.violated);
    assert!(matches!(addition.ensure_satisfied(), Err(Error::ConstraintViolation(_))));
    assert_eq!(addition.solution.status, SolutionStatus::Optimal);
    assert!(addition.solution.objective_value < solution.objective_value);
    assert!(addition.form.is_feasible(&addition.solution.values, 1e-9));
    assert_abs_diff_eq!(addition.solution.objective_value, 33f64, epsilon = 1e-9);
}

#[test]
fn integer_solution_is_refused() {
    init_logging();
    let problem = wyndor().with_variable_kinds(&[relp_mip::VariableKind::Integer; 2]);
    let form = CanonicalForm::new(&problem).unwrap();
    let settings = Settings::default().with_max_nodes(0);
    let solution = solve_canonical(&form, Algorithm::BranchAndBound, &settings);

    let analysis = SensitivityAnalysis::new(&form, &solution, &settings);
    assert!(matches!(analysis, Err(Error::NotOptimal(SolutionStatus::MaxIterationsReached))));
}
