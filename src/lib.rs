//! # A linear and mixed integer program solver
//!
//! Linear programs are solved using the Simplex Method as described in the book Combinatorial
//! Optimization by Christos H. Papadimitriou and Kenneth Steiglitz. Integer programs are solved by
//! branch and bound or with Gomory cutting planes on top of that, and optimal solutions of linear
//! programs can be analyzed for their sensitivity to changes in the data.
//!
//! ```
//! use relp_mip::{Algorithm, ConstraintType, Objective, Problem, solve};
//!
//! let problem = Problem::new(Objective::Maximize, vec![2f64, 3f64])
//!     .with_constraint(vec![1f64, 1f64], ConstraintType::Less, 4f64)
//!     .with_constraint(vec![1f64, 0f64], ConstraintType::Less, 3f64);
//! let solution = solve(&problem, Algorithm::TableauSimplex).unwrap();
//! assert!((solution.objective_value - 12f64).abs() < 1e-9);
//! ```
#![warn(missing_docs)]

pub mod algorithm;
pub mod data;
pub mod error;

pub use crate::algorithm::{Algorithm, solve, solve_canonical, solve_with_settings};
pub use crate::algorithm::settings::{NodeSelection, RelaxationSolver, Settings};
pub use crate::algorithm::sensitivity::{SensitivityAnalysis, SensitivityResult};
pub use crate::data::linear_program::canonical_form::CanonicalForm;
pub use crate::data::linear_program::elements::{ConstraintType, Objective, VariableKind};
pub use crate::data::linear_program::problem::Problem;
pub use crate::data::linear_program::solution::{Solution, SolutionStatus};
pub use crate::error::Error;

#[cfg(test)]
mod tests;
