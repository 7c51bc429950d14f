//! # Small problems with known solutions
//!
//! Each problem is solved with every applicable algorithm, and the algorithms have to agree.
use relp_mip::{ConstraintType, Objective, Problem, VariableKind};

/// # Generation and execution
#[allow(missing_docs)]
mod test;

/// `max 2x1 + 3x2, x1 + x2 <= 4, x1 <= 3`, optimum 12.
fn production() -> Problem {
    Problem::new(Objective::Maximize, vec![2f64, 3f64])
        .with_constraint(vec![1f64, 1f64], ConstraintType::Less, 4f64)
        .with_constraint(vec![1f64, 0f64], ConstraintType::Less, 3f64)
}

/// `max x1 + x2, x1 + x2 >= 10`, unbounded.
fn unbounded() -> Problem {
    Problem::new(Objective::Maximize, vec![1f64, 1f64])
        .with_constraint(vec![1f64, 1f64], ConstraintType::Greater, 10f64)
}

/// `max 2x1 + 3x2, x1 + x2 <= 3.5`, integer, optimum 9 with relaxation bound 10.5.
fn integer() -> Problem {
    Problem::new(Objective::Maximize, vec![2f64, 3f64])
        .with_constraint(vec![1f64, 1f64], ConstraintType::Less, 3.5f64)
        .with_variable_kinds(&[VariableKind::Integer; 2])
}

/// Diet style problem with mixed relations and a free variable, optimum 4.
///
/// `min x1 + 2x2 + x3, x1 + x2 >= 2, x2 + x3 = 2, x1 - x3 <= 1`, `x3` free.
fn mixed() -> Problem {
    Problem::new(Objective::Minimize, vec![1f64, 2f64, 1f64])
        .with_constraint(vec![1f64, 1f64, 0f64], ConstraintType::Greater, 2f64)
        .with_constraint(vec![0f64, 1f64, 1f64], ConstraintType::Equal, 2f64)
        .with_constraint(vec![1f64, 0f64, -1f64], ConstraintType::Less, 1f64)
        .with_variable_kind(2, VariableKind::Unrestricted)
}

/// Knapsack with binary variables, optimum 9.
///
/// `max 5x1 + 4x2 + 3x3, 2x1 + 3x2 + x3 <= 5, 4x1 + x2 + 2x3 <= 5`.
fn knapsack() -> Problem {
    Problem::new(Objective::Maximize, vec![5f64, 4f64, 3f64])
        .with_constraint(vec![2f64, 3f64, 1f64], ConstraintType::Less, 5f64)
        .with_constraint(vec![4f64, 1f64, 2f64], ConstraintType::Less, 5f64)
        .with_variable_kinds(&[VariableKind::Binary; 3])
}
