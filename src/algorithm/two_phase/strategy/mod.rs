//! # Strategies
//!
//! Decisions that the simplex loops delegate, such as which column enters the basis.
pub mod pivot_rule;
