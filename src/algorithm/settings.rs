//! # Solver settings
//!
//! Tolerances, budgets and strategy choices shared by all algorithms.
use std::time::{Duration, Instant};

use crate::data::linear_algebra::EPSILON;

/// Settings for all solvers.
///
/// Construct with `Default::default()` and adjust with the `with_*` methods.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Values at or below this magnitude are treated as zero.
    pub epsilon: f64,
    /// Maximum number of pivots in a single simplex solve, over both phases.
    pub max_iterations: usize,
    /// Maximum number of branch and bound nodes to process.
    pub max_nodes: usize,
    /// Maximum number of cuts the cutting plane solver adds.
    pub max_cuts: usize,
    /// Distance to the nearest integer below which a value counts as integral.
    pub integrality_tolerance: f64,
    /// Order in which open branch and bound nodes are processed.
    pub node_selection: NodeSelection,
    /// Solver used for the relaxations inside branch and bound.
    pub relaxation: RelaxationSolver,
    /// Number of eta matrices after which the revised simplex re-inverts its basis.
    pub refactorization_interval: usize,
    /// Whether trace entries carry a tableau snapshot.
    pub record_tableaux: bool,
    /// Point in time after which solvers stop at the next iteration, node or cut boundary.
    pub deadline: Option<Instant>,
}

/// Order in which open branch and bound nodes are explored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeSelection {
    /// Smallest parent relaxation bound first; ties by creation order.
    #[default]
    BestFirst,
    /// Most recently created node first, down branch before up branch.
    DepthFirst,
}

/// Simplex implementation used to solve relaxations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelaxationSolver {
    /// Full tableau.
    #[default]
    Tableau,
    /// Product form of the inverse.
    Revised,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            epsilon: EPSILON,
            max_iterations: 1_000,
            max_nodes: 1_000,
            max_cuts: 100,
            integrality_tolerance: 1e-6,
            node_selection: NodeSelection::default(),
            relaxation: RelaxationSolver::default(),
            refactorization_interval: 64,
            record_tableaux: true,
            deadline: None,
        }
    }
}

impl Settings {
    /// Change the zero tolerance.
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Change the pivot budget.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Change the node budget.
    #[must_use]
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// Change the cut budget.
    #[must_use]
    pub fn with_max_cuts(mut self, max_cuts: usize) -> Self {
        self.max_cuts = max_cuts;
        self
    }

    /// Change the integrality tolerance.
    #[must_use]
    pub fn with_integrality_tolerance(mut self, tolerance: f64) -> Self {
        self.integrality_tolerance = tolerance;
        self
    }

    /// Change the node selection strategy.
    #[must_use]
    pub fn with_node_selection(mut self, node_selection: NodeSelection) -> Self {
        self.node_selection = node_selection;
        self
    }

    /// Change the relaxation solver.
    #[must_use]
    pub fn with_relaxation(mut self, relaxation: RelaxationSolver) -> Self {
        self.relaxation = relaxation;
        self
    }

    /// Change the refactorization interval; zero is treated as one.
    #[must_use]
    pub fn with_refactorization_interval(mut self, interval: usize) -> Self {
        self.refactorization_interval = interval.max(1);
        self
    }

    /// Enable or disable tableau snapshots in the trace.
    #[must_use]
    pub fn with_record_tableaux(mut self, record: bool) -> Self {
        self.record_tableaux = record;
        self
    }

    /// Stop at the given point in time.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Stop after the given duration, measured from now.
    #[must_use]
    pub fn with_time_limit(self, limit: Duration) -> Self {
        self.with_deadline(Instant::now() + limit)
    }

    /// Whether the deadline has passed.
    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

#[cfg(test)]
mod test {
    use std::time::{Duration, Instant};

    use crate::algorithm::settings::{NodeSelection, RelaxationSolver, Settings};

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.epsilon, 1e-9);
        assert_eq!(settings.max_iterations, 1_000);
        assert_eq!(settings.max_nodes, 1_000);
        assert_eq!(settings.max_cuts, 100);
        assert_eq!(settings.node_selection, NodeSelection::BestFirst);
        assert_eq!(settings.relaxation, RelaxationSolver::Tableau);
        assert!(!settings.is_expired());
    }

    #[test]
    fn builders() {
        let settings = Settings::default()
            .with_max_iterations(5)
            .with_node_selection(NodeSelection::DepthFirst)
            .with_refactorization_interval(0)
            .with_deadline(Instant::now() - Duration::from_millis(1));
        assert_eq!(settings.max_iterations, 5);
        assert_eq!(settings.node_selection, NodeSelection::DepthFirst);
        assert_eq!(settings.refactorization_interval, 1);
        assert!(settings.is_expired());
    }
}
