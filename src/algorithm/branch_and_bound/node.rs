//! # Search nodes
//!
//! Nodes live in an arena and refer to their parent by index.
use enum_map::Enum;

use crate::data::linear_program::canonical_form::CanonicalForm;
use crate::data::linear_program::elements::{BoundDirection, ConstraintType};

/// Why a node was closed without branching.
#[derive(Enum, Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum FathomReason {
    /// The relaxation has no feasible point.
    Infeasible,
    /// The relaxation can't improve on the incumbent.
    Bound,
    /// The relaxation is unbounded.
    Unbounded,
}

/// Status of a search node.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum NodeStatus {
    /// Waiting to be processed.
    Active,
    /// Children were created.
    Branched,
    /// Closed without children.
    Fathomed(FathomReason),
    /// The relaxation solution is integral.
    IntegerSolution,
}

/// A bound on a single column, added when branching.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Branch {
    /// Canonical column that is bounded.
    pub column: usize,
    /// `Upper` for the down branch `x <= floor(v)`, `Lower` for the up branch `x >= ceil(v)`.
    pub direction: BoundDirection,
    /// Integral bound value.
    pub bound: f64,
}

impl Branch {
    /// Create the pair of branches around a fractional value, down branch first.
    pub fn around(column: usize, value: f64) -> [Self; 2] {
        [
            Self { column, direction: BoundDirection::Upper, bound: value.floor() },
            Self { column, direction: BoundDirection::Lower, bound: value.ceil() },
        ]
    }

    /// The row that materializes this branch on a form with `nr_columns` columns.
    pub fn row(&self, nr_columns: usize) -> (Vec<f64>, ConstraintType, f64) {
        debug_assert!(self.column < nr_columns);

        let mut coefficients = vec![0f64; nr_columns];
        coefficients[self.column] = 1f64;

        (coefficients, self.direction.constraint_type(), self.bound)
    }
}

/// A node in the search tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Position in the arena, also the creation order.
    pub index: usize,
    /// Arena index of the parent, `None` for the root.
    pub parent: Option<usize>,
    /// Distance to the root.
    pub depth: usize,
    /// Bound added with respect to the parent.
    pub branch: Option<Branch>,
    /// Canonical objective of the parent relaxation, a lower bound on this subtree.
    pub bound: f64,
    /// Canonical objective of this node's relaxation, once solved.
    pub objective: Option<f64>,
    #[allow(missing_docs)]
    pub status: NodeStatus,
    /// Dropped once the node is processed.
    form: Option<CanonicalForm>,
}

impl Node {
    /// Create the root node.
    pub fn root(form: CanonicalForm) -> Self {
        Self {
            index: 0,
            parent: None,
            depth: 0,
            branch: None,
            bound: f64::NEG_INFINITY,
            objective: None,
            status: NodeStatus::Active,
            form: Some(form),
        }
    }

    /// Create a child node.
    ///
    /// # Arguments
    ///
    /// * `index`: Arena index of the child.
    /// * `branch`: Bound that separates the child from this node.
    /// * `form`: This node's form, extended with the branch row.
    pub fn child(&self, index: usize, branch: Branch, form: CanonicalForm) -> Self {
        Self {
            index,
            parent: Some(self.index),
            depth: self.depth + 1,
            branch: Some(branch),
            bound: self.objective.unwrap_or(self.bound),
            objective: None,
            status: NodeStatus::Active,
            form: Some(form),
        }
    }

    /// Form of this node, if it wasn't processed yet.
    pub fn form(&self) -> Option<&CanonicalForm> {
        self.form.as_ref()
    }

    /// Take the form out of the node, which is done when it is processed.
    pub(crate) fn take_form(&mut self) -> Option<CanonicalForm> {
        self.form.take()
    }

    /// Whether this subtree can't contain a solution better than `incumbent`.
    ///
    /// Both values are canonical (minimization) objective values.
    pub fn can_prune(&self, incumbent: f64, epsilon: f64) -> bool {
        let bound = self.objective.unwrap_or(self.bound);
        bound >= incumbent - epsilon
    }
}

#[cfg(test)]
mod test {
    use crate::algorithm::branch_and_bound::node::{Branch, Node, NodeStatus};
    use crate::data::linear_program::elements::{BoundDirection, ConstraintType};
    use crate::tests::problem_1;

    #[test]
    fn root_node() {
        let root = Node::root(problem_1::form());
        assert_eq!(root.index, 0);
        assert!(root.parent.is_none());
        assert_eq!(root.depth, 0);
        assert!(root.branch.is_none());
        assert_eq!(root.status, NodeStatus::Active);
        assert!(root.form().is_some());
    }

    #[test]
    fn child_node() {
        let mut root = Node::root(problem_1::form());
        root.objective = Some(-10.5);
        let [down, _] = Branch::around(1, 2.5);
        let form = root.take_form().unwrap();
        let child = root.child(1, down, form);

        assert!(root.form().is_none());
        assert_eq!(child.parent, Some(0));
        assert_eq!(child.depth, 1);
        assert_eq!(child.bound, -10.5);
        assert_eq!(child.branch, Some(down));
    }

    #[test]
    fn branches() {
        let [down, up] = Branch::around(0, 2.7);
        assert_eq!(down.direction, BoundDirection::Upper);
        assert_eq!(down.bound, 2f64);
        assert_eq!(up.direction, BoundDirection::Lower);
        assert_eq!(up.bound, 3f64);
        assert_eq!(up.row(3), (vec![1f64, 0f64, 0f64], ConstraintType::Greater, 3f64));
    }

    #[test]
    fn pruning() {
        let mut node = Node::root(problem_1::form());
        node.objective = Some(-10f64);
        assert!(!node.can_prune(-8f64, 1e-9));
        assert!(node.can_prune(-10f64, 1e-9));
        assert!(node.can_prune(-12f64, 1e-9));
    }
}
