//! # Representing linear programs
//!
//! A `Problem` may contain any type of constraint and variable, while linear programs in canonical
//! form contain equality constraints over non negative variables only. Solvers work on the latter
//! and produce a `Solution`.
pub mod elements;
pub mod problem;
pub mod canonical_form;
pub mod solution;
