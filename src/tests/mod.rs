//! # Integration tests that require a look inside the crate.
//!
//! Convention for function names:
//!
//! * `fn problem()`
//! * `fn form()`
//!
//! Variants of a problem get a prefix, like `fn unbounded_form()`.
pub mod problem_1;
