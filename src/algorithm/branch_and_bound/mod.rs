//! # Branch and bound
//!
//! Solves mixed integer programs by solving linear relaxations and splitting the domain of a
//! fractional integer column in two. Each child receives its own copy of the form, extended with
//! one bound row, such that sibling subtrees never share state.
//!
//! Children are warm started from the optimal basis of their parent, extended with the slack of
//! the new row. That basis is dual feasible, so the dual simplex method restores feasibility.
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use enum_map::EnumMap;
use log::{debug, info, warn};

use crate::algorithm::settings::{NodeSelection, RelaxationSolver, Settings};
use crate::algorithm::branch_and_bound::node::{Branch, FathomReason, Node, NodeStatus};
use crate::algorithm::two_phase::revised::RevisedSimplex;
use crate::algorithm::two_phase::tableau::TableauSimplex;
use crate::data::linear_program::canonical_form::CanonicalForm;
use crate::data::linear_program::solution::{Basis, Iteration, Solution, SolutionStatus};

pub mod node;

/// Branch and bound solver for a canonical form with integral columns.
#[derive(Debug)]
pub struct BranchAndBound<'a> {
    form: &'a CanonicalForm,
    settings: &'a Settings,
    nodes: Vec<Node>,
    statistics: EnumMap<FathomReason, usize>,
}

/// Best integral solution found so far.
#[derive(Debug, Clone, PartialEq)]
struct Incumbent {
    /// Values over all columns of the node's form, integral columns rounded.
    values: Vec<f64>,
    /// Canonical objective value.
    objective: f64,
    node: usize,
}

/// Open node in the best first queue.
#[derive(Debug, Copy, Clone)]
struct OpenNode {
    bound: f64,
    index: usize,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.bound.total_cmp(&other.bound).then(self.index.cmp(&other.index))
    }
}

/// Nodes that still need to be processed.
#[derive(Debug)]
enum Worklist {
    BestFirst(BinaryHeap<Reverse<OpenNode>>),
    DepthFirst(Vec<usize>),
}

impl Worklist {
    fn new(selection: NodeSelection) -> Self {
        match selection {
            NodeSelection::BestFirst => Worklist::BestFirst(BinaryHeap::new()),
            NodeSelection::DepthFirst => Worklist::DepthFirst(Vec::new()),
        }
    }

    /// Add nodes in creation order; the first one is explored first among them.
    fn extend(&mut self, nodes: &[&Node]) {
        match self {
            Worklist::BestFirst(heap) => {
                heap.extend(nodes.iter().map(|node| Reverse(OpenNode { bound: node.bound, index: node.index })));
            }
            Worklist::DepthFirst(stack) => stack.extend(nodes.iter().rev().map(|node| node.index)),
        }
    }

    fn pop(&mut self) -> Option<usize> {
        match self {
            Worklist::BestFirst(heap) => heap.pop().map(|Reverse(open)| open.index),
            Worklist::DepthFirst(stack) => stack.pop(),
        }
    }
}

impl<'a> BranchAndBound<'a> {
    /// Create a new solver.
    pub fn new(form: &'a CanonicalForm, settings: &'a Settings) -> Self {
        Self {
            form,
            settings,
            nodes: Vec::new(),
            statistics: EnumMap::default(),
        }
    }

    /// Solve the linear relaxation of a form with the configured simplex implementation.
    fn relax(&self, form: &CanonicalForm, warm: Option<&Basis>) -> Solution {
        match (self.settings.relaxation, warm) {
            (RelaxationSolver::Tableau, None) => TableauSimplex::new(self.settings).solve(form),
            (RelaxationSolver::Tableau, Some(basis)) => TableauSimplex::new(self.settings).solve_from_basis(form, basis),
            (RelaxationSolver::Revised, None) => RevisedSimplex::new(self.settings).solve(form),
            (RelaxationSolver::Revised, Some(basis)) => RevisedSimplex::new(self.settings).solve_from_basis(form, basis),
        }
    }

    /// Run the search.
    ///
    /// # Return value
    ///
    /// The best integral solution, with values for the columns of the form this solver was
    /// created with. No basis is reported, as the final relaxation has more rows than that form.
    pub fn run(&mut self) -> Solution {
        if !self.form.has_integer_columns() {
            debug!("No integral columns, solving the relaxation only");
            return self.relax(self.form, None);
        }

        let root = match self.form.with_binary_upper_bounds() {
            Ok(root) => root,
            Err(error) => return Solution::without_values(SolutionStatus::Error, error.to_string(), self.form.nr_columns()),
        };
        self.nodes = vec![Node::root(root)];
        self.statistics = EnumMap::default();
        let mut warm_starts: Vec<Option<Basis>> = vec![None];

        let mut worklist = Worklist::new(self.settings.node_selection);
        worklist.extend(&[&self.nodes[0]]);

        let mut incumbent: Option<Incumbent> = None;
        let mut iterations = Vec::new();
        let mut pivots = 0;
        let mut processed = 0;
        let mut stopped = None;

        while let Some(index) = worklist.pop() {
            if processed >= self.settings.max_nodes {
                stopped = Some(format!("node limit of {} reached", self.settings.max_nodes));
                break;
            }
            if self.settings.is_expired() {
                stopped = Some("deadline reached".to_string());
                break;
            }
            processed += 1;

            let Some(form) = self.nodes[index].take_form() else {
                continue;
            };
            if let Some(best) = &incumbent {
                if self.nodes[index].can_prune(best.objective, self.settings.epsilon) {
                    self.fathom(index, FathomReason::Bound, &mut iterations, "parent bound");
                    continue;
                }
            }

            let relaxation = self.relax(&form, warm_starts[index].take().as_ref());
            pivots += relaxation.pivots;
            debug!("Node {} (depth {}): relaxation {}", index, self.nodes[index].depth, relaxation.status);

            match relaxation.status {
                SolutionStatus::Optimal => {}
                SolutionStatus::Infeasible => {
                    self.fathom(index, FathomReason::Infeasible, &mut iterations, "relaxation infeasible");
                    continue;
                }
                SolutionStatus::Unbounded => {
                    self.fathom(index, FathomReason::Unbounded, &mut iterations, "relaxation unbounded");
                    if index == 0 {
                        return self.finish(SolutionStatus::Unbounded, relaxation.message, None, iterations, pivots);
                    }
                    continue;
                }
                status @ (SolutionStatus::MaxIterationsReached | SolutionStatus::Error) => {
                    warn!("Relaxation of node {} ended with status {}", index, status);
                    let message = format!(
                        "relaxation of node {} stopped: {}",
                        index, relaxation.message.unwrap_or_else(|| status.to_string()),
                    );
                    return self.finish(status, Some(message), incumbent, iterations, pivots);
                }
            }

            let objective = form.objective_value(&relaxation.values);
            self.nodes[index].objective = Some(objective);
            if let Some(best) = &incumbent {
                if objective >= best.objective - self.settings.epsilon {
                    self.fathom(index, FathomReason::Bound, &mut iterations, "relaxation bound");
                    continue;
                }
            }

            match self.branching_column(&form, &relaxation.values) {
                None => {
                    let values = self.round(&form, relaxation.values);
                    let objective = form.objective_value(&values);
                    self.nodes[index].status = NodeStatus::IntegerSolution;
                    iterations.push(self.entry(index, format!("integer solution with objective {}", form.reported_objective(objective))));
                    if incumbent.as_ref().is_none_or(|best| objective < best.objective - self.settings.epsilon) {
                        debug!("New incumbent at node {} with objective {}", index, objective);
                        incumbent = Some(Incumbent { values, objective, node: index });
                    }
                }
                Some(column) => {
                    let value = relaxation.values[column];
                    let parent_basis = relaxation.basis.as_ref();
                    let mut children = Vec::with_capacity(2);
                    for branch in Branch::around(column, value) {
                        let (coefficients, relation, rhs) = branch.row(form.nr_columns());
                        let child_form = match form.with_constraint(coefficients, relation, rhs) {
                            Ok(child_form) => child_form,
                            Err(error) => {
                                let message = format!("can't branch at node {}: {}", index, error);
                                return self.finish(SolutionStatus::Error, Some(message), incumbent, iterations, pivots);
                            }
                        };
                        warm_starts.push(parent_basis.and_then(|basis| basis.extended(&child_form)));
                        let child = self.nodes[index].child(self.nodes.len(), branch, child_form);
                        self.nodes.push(child);
                        children.push(self.nodes.len() - 1);
                    }

                    self.nodes[index].status = NodeStatus::Branched;
                    let name = form.variable_name(column);
                    iterations.push(self.entry(index, format!(
                        "branched on {} = {}: {} <= {}, {} >= {}",
                        name, value, name, value.floor(), name, value.ceil(),
                    )));
                    let children = children.iter().map(|&child| &self.nodes[child]).collect::<Vec<_>>();
                    worklist.extend(&children);
                }
            }
        }

        match (stopped, incumbent) {
            (Some(message), incumbent) => self.finish(SolutionStatus::MaxIterationsReached, Some(message), incumbent, iterations, pivots),
            (None, Some(incumbent)) => self.finish(SolutionStatus::Optimal, None, Some(incumbent), iterations, pivots),
            (None, None) => {
                let message = "no integral solution exists".to_string();
                self.finish(SolutionStatus::Infeasible, Some(message), None, iterations, pivots)
            }
        }
    }

    /// Integral column of which the value is furthest from an integer.
    ///
    /// That is, the fractional part closest to one half; ties go to the lowest column.
    fn branching_column(&self, form: &CanonicalForm, values: &[f64]) -> Option<usize> {
        let tolerance = self.settings.integrality_tolerance;

        let mut best: Option<(usize, f64)> = None;
        for j in form.integer_columns() {
            let fraction = values[j] - values[j].floor();
            if fraction > tolerance && fraction < 1f64 - tolerance {
                let distance = (fraction - 0.5).abs();
                if best.is_none_or(|(_, existing)| distance < existing - self.settings.epsilon) {
                    best = Some((j, distance));
                }
            }
        }

        best.map(|(j, _)| j)
    }

    /// Round the integral columns to exact integers.
    fn round(&self, form: &CanonicalForm, mut values: Vec<f64>) -> Vec<f64> {
        for (j, value) in values.iter_mut().enumerate() {
            if form.is_integral(j) {
                *value = value.round();
            }
        }

        values
    }

    fn fathom(&mut self, index: usize, reason: FathomReason, iterations: &mut Vec<Iteration>, why: &str) {
        debug!("Node {} fathomed: {:?}", index, reason);

        self.nodes[index].status = NodeStatus::Fathomed(reason);
        self.statistics[reason] += 1;
        iterations.push(self.entry(index, format!("fathomed ({})", why)));
    }

    fn entry(&self, index: usize, what: String) -> Iteration {
        let node = &self.nodes[index];
        let description = match &node.branch {
            Some(branch) => format!(
                "node {} (depth {}, {} {} {}): {}",
                index, node.depth, self.form.variable_name(branch.column), branch.direction.constraint_type(), branch.bound, what,
            ),
            None => format!("node {} (root): {}", index, what),
        };

        Iteration { number: 0, description, snapshot: None, is_optimal: false, is_final: false }
    }

    fn finish(
        &self,
        status: SolutionStatus,
        message: Option<String>,
        incumbent: Option<Incumbent>,
        mut iterations: Vec<Iteration>,
        pivots: usize,
    ) -> Solution {
        let n = self.form.nr_columns();
        let (values, objective_value) = match (status, incumbent) {
            (SolutionStatus::Unbounded, _) => (vec![0f64; n], self.form.reported_objective(f64::NEG_INFINITY)),
            (_, Some(incumbent)) => {
                debug!("Reporting the incumbent of node {}", incumbent.node);
                let mut values = incumbent.values;
                values.truncate(n);
                let objective = self.form.reported_objective(self.form.objective_value(&values));
                (values, objective)
            }
            (_, None) => (vec![0f64; n], f64::NAN),
        };

        iterations.push(Iteration {
            number: 0,
            description: match &message {
                Some(message) => format!("{}: {}", status, message),
                None => status.to_string(),
            },
            snapshot: None,
            is_optimal: status == SolutionStatus::Optimal,
            is_final: false,
        });
        for (number, iteration) in iterations.iter_mut().enumerate() {
            iteration.number = number;
        }
        info!(
            "Branch and bound finished after {} nodes and {} pivots: {}",
            self.nodes.len(), pivots, status,
        );

        let mut solution = Solution {
            status,
            message,
            values,
            objective_value,
            basis: None,
            pivots,
            iterations,
        };
        solution.finalize_trace();

        solution
    }

    /// All nodes created during the last run, in creation order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Number of fathomed nodes per reason during the last run.
    pub fn statistics(&self) -> &EnumMap<FathomReason, usize> {
        &self.statistics
    }
}
