//! # Post-optimal analysis through the public interface
use relp_mip::{ConstraintType, Objective, Problem};

/// # Generation and execution
#[allow(missing_docs)]
mod test;

/// `max 3x1 + 5x2, x1 <= 4, 2x2 <= 12, 3x1 + 2x2 <= 18`, optimum 36 at `(2, 6)`.
fn wyndor() -> Problem {
    Problem::new(Objective::Maximize, vec![3f64, 5f64])
        .with_constraint(vec![1f64, 0f64], ConstraintType::Less, 4f64)
        .with_constraint(vec![0f64, 2f64], ConstraintType::Less, 12f64)
        .with_constraint(vec![3f64, 2f64], ConstraintType::Less, 18f64)
}
