//! # Dual problem
//!
//! Every linear program has a dual: one variable per constraint, one constraint per variable,
//! with the roles of the objective and the right hand side swapped. If either has a finite
//! optimum, so does the other, and both optima are equal.
use crate::data::linear_algebra::matrix::DenseMatrix;
use crate::data::linear_program::elements::{ConstraintType, Objective, VariableKind};
use crate::data::linear_program::problem::Problem;
use crate::error::{Error, Result};

/// The dual of a `Problem`.
///
/// Integrality is ignored: integer and binary variables are dualized as if they were continuous
/// and non negative.
#[derive(Debug, Clone, PartialEq)]
pub struct DualProblem {
    problem: Problem,
}

impl DualProblem {
    /// Dualize a problem.
    ///
    /// The dual variable of constraint `i` is named `y<i + 1>`.
    ///
    /// # Return value
    ///
    /// An error if the primal problem doesn't validate.
    pub fn new(primal: &Problem) -> Result<Self> {
        primal.validate()?;

        let rows = primal.constraints.iter().map(|constraint| constraint.coefficients.clone()).collect();
        let transposed = DenseMatrix::new(rows, primal.nr_variables()).transpose();

        let cost = primal.constraints.iter().map(|constraint| constraint.rhs).collect();
        let mut problem = Problem::new(!primal.objective, cost);
        for (i, (variable, constraint)) in problem.variables.iter_mut().zip(&primal.constraints).enumerate() {
            variable.name = format!("y{}", i + 1);
            variable.kind = dual_variable_kind(primal.objective, constraint.relation);
        }

        let problem = transposed.data().into_iter()
            .zip(&primal.variables)
            .zip(&primal.cost)
            .fold(problem, |problem, ((coefficients, variable), &cost)| {
                problem.with_constraint(coefficients, dual_relation(primal.objective, variable.kind), cost)
            });

        Ok(Self { problem })
    }

    /// The dual as a problem that can be solved.
    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    #[allow(missing_docs)]
    pub fn into_problem(self) -> Problem {
        self.problem
    }
}

/// Sign of the dual variable of a constraint.
///
/// Constraints that "push in the direction of the objective" (`<=` when maximizing, `>=` when
/// minimizing) get a non negative dual variable.
fn dual_variable_kind(objective: Objective, relation: ConstraintType) -> VariableKind {
    match (objective, relation) {
        (_, ConstraintType::Equal) => VariableKind::Unrestricted,
        (Objective::Maximize, ConstraintType::Less) | (Objective::Minimize, ConstraintType::Greater) => {
            VariableKind::NonNegative
        }
        (Objective::Maximize, ConstraintType::Greater) | (Objective::Minimize, ConstraintType::Less) => {
            VariableKind::NonPositive
        }
    }
}

/// Relation of the dual constraint of a variable.
fn dual_relation(objective: Objective, kind: VariableKind) -> ConstraintType {
    match (objective, kind) {
        (_, VariableKind::Unrestricted) => ConstraintType::Equal,
        (Objective::Maximize, VariableKind::NonPositive) => ConstraintType::Less,
        (Objective::Minimize, VariableKind::NonPositive) => ConstraintType::Greater,
        (Objective::Maximize, _) => ConstraintType::Greater,
        (Objective::Minimize, _) => ConstraintType::Less,
    }
}

impl TryFrom<&Problem> for DualProblem {
    type Error = Error;

    fn try_from(primal: &Problem) -> Result<Self> {
        Self::new(primal)
    }
}
