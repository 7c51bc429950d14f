use approx::assert_abs_diff_eq;

use relp_mip::{Algorithm, CanonicalForm, NodeSelection, RelaxationSolver, Settings, SolutionStatus, solve, solve_with_settings};
use relp_mip::algorithm::branch_and_bound::BranchAndBound;
use relp_mip::algorithm::branch_and_bound::node::{FathomReason, NodeStatus};

use crate::init_logging;
use crate::scenarios::{integer, knapsack, mixed, production, unbounded};

const LINEAR: [Algorithm; 4] = [
    Algorithm::TableauSimplex,
    Algorithm::RevisedSimplex,
    Algorithm::BranchAndBound,
    Algorithm::CuttingPlane,
];

#[test]
fn production_optimum() {
    init_logging();
    let problem = production();
    let form = CanonicalForm::new(&problem).unwrap();

    for algorithm in LINEAR {
        let solution = solve(&problem, algorithm).unwrap();
        assert_eq!(solution.status, SolutionStatus::Optimal, "{:?}", algorithm);
        assert_abs_diff_eq!(solution.objective_value, 12f64, epsilon = 1e-9);

        let values = solution.original_values(&form);
        assert!(problem.is_feasible(&values, 1e-9));
        assert_abs_diff_eq!(problem.objective_value(&values), solution.objective_value, epsilon = 1e-9);
    }
}

#[test]
fn unbounded_direction() {
    init_logging();
    for algorithm in [Algorithm::TableauSimplex, Algorithm::RevisedSimplex] {
        let solution = solve(&unbounded(), algorithm).unwrap();
        assert_eq!(solution.status, SolutionStatus::Unbounded);
        assert_eq!(solution.objective_value, f64::INFINITY);
        assert!(solution.clone().into_result().is_err());
    }
}

#[test]
fn mixed_relations() {
    init_logging();
    let problem = mixed();
    let form = CanonicalForm::new(&problem).unwrap();
    assert_eq!(form.nr_structural(), 4);
    assert_eq!(form.nr_slacks(), 2);

    for algorithm in [Algorithm::TableauSimplex, Algorithm::RevisedSimplex] {
        let solution = solve(&problem, algorithm).unwrap();
        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert_abs_diff_eq!(solution.objective_value, 4f64, epsilon = 1e-9);
        assert!(problem.is_feasible(&solution.original_values(&form), 1e-9));
    }
}

#[test]
fn integer_program() {
    init_logging();
    let problem = integer();
    let form = CanonicalForm::new(&problem).unwrap();

    let relaxation = solve(&problem, Algorithm::RevisedSimplex).unwrap();
    assert_abs_diff_eq!(relaxation.objective_value, 10.5f64, epsilon = 1e-9);

    let branching = solve(&problem, Algorithm::BranchAndBound).unwrap();
    assert_eq!(branching.status, SolutionStatus::Optimal);
    assert!(branching.objective_value <= relaxation.objective_value);
    let values = branching.original_values(&form);
    assert!(values.iter().all(|value| value.fract() == 0f64));
    assert!(problem.is_feasible(&values, 1e-9));

    let cutting = solve(&problem, Algorithm::CuttingPlane).unwrap();
    assert_eq!(cutting.status, SolutionStatus::Optimal);
    assert_abs_diff_eq!(cutting.objective_value, branching.objective_value, epsilon = 1e-9);
}

#[test]
fn binary_knapsack() {
    init_logging();
    let problem = knapsack();
    let form = CanonicalForm::new(&problem).unwrap();

    for node_selection in [NodeSelection::BestFirst, NodeSelection::DepthFirst] {
        for relaxation in [RelaxationSolver::Tableau, RelaxationSolver::Revised] {
            let settings = Settings::default()
                .with_node_selection(node_selection)
                .with_relaxation(relaxation);
            let solution = solve_with_settings(&problem, Algorithm::BranchAndBound, &settings).unwrap();

            assert_eq!(solution.status, SolutionStatus::Optimal);
            assert_eq!(solution.objective_value, 9f64);
            assert_eq!(solution.original_values(&form), vec![1f64, 1f64, 0f64]);
        }
    }
}

#[test]
fn search_tree() {
    init_logging();
    let form = CanonicalForm::new(&integer()).unwrap();
    let settings = Settings::default();
    let mut solver = BranchAndBound::new(&form, &settings);
    let solution = solver.run();

    assert_eq!(solution.status, SolutionStatus::Optimal);
    let nodes = solver.nodes();
    assert!(nodes.len() > 1);
    assert!(nodes.iter().all(|node| node.status != NodeStatus::Active));
    assert!(nodes.iter().skip(1).all(|node| node.parent.is_some_and(|parent| parent < node.index)));
    assert!(nodes.iter().any(|node| node.status == NodeStatus::IntegerSolution));
    let fathomed = solver.statistics().values().sum::<usize>();
    let counted = nodes.iter().filter(|node| matches!(node.status, NodeStatus::Fathomed(_))).count();
    assert_eq!(fathomed, counted);
    assert_eq!(solver.statistics()[FathomReason::Unbounded], 0);
}

#[test]
fn node_limit() {
    init_logging();
    let settings = Settings::default().with_max_nodes(1);
    let solution = solve_with_settings(&integer(), Algorithm::BranchAndBound, &settings).unwrap();
    assert_eq!(solution.status, SolutionStatus::MaxIterationsReached);
    assert!(solution.message.is_some());
}
