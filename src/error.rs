//! # Errors
//!
//! Everything that can go wrong between receiving a problem description and answering a
//! sensitivity query.
//!
//! Malformed problems are rejected before any solving starts. Failures inside a solver loop don't
//! surface as an `Err`; they are converted into a `Solution` with an error status and message, so
//! that the caller always receives a well-formed (possibly partial) result.
use thiserror::Error;

use crate::data::linear_program::solution::SolutionStatus;

/// Crate wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// All failures known to the crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A coefficient vector or basis doesn't have the length its context demands.
    ///
    /// The `what` field names the offending object, for example "constraint 3".
    #[error("dimension mismatch in {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        #[allow(missing_docs)]
        what: String,
        #[allow(missing_docs)]
        expected: usize,
        #[allow(missing_docs)]
        found: usize,
    },
    /// A coefficient or right hand side is NaN or infinite.
    #[error("non finite value in {0}")]
    NonFiniteValue(String),
    /// Two canonical columns would carry the same name.
    #[error("variable name \"{0}\" is not unique after canonicalization")]
    AmbiguousVariableName(String),
    /// No point satisfies all constraints.
    #[error("the problem is infeasible")]
    Infeasible,
    /// The objective can be improved without limit.
    #[error("the problem is unbounded")]
    Unbounded,
    /// An iteration, node or cut budget (or the deadline) ran out after the given number of pivots.
    #[error("stopped after {0} pivots without proving optimality")]
    MaxIterationsReached(usize),
    /// No valid cutting plane could be derived from the current relaxation.
    #[error("could not derive a valid cut: {0}")]
    InvalidCut(String),
    /// A basis was visited twice; the pivot rule was cycling.
    #[error("cycling detected after {0} iterations")]
    NumericalDegeneracy(usize),
    /// The columns that should form a basis are linearly dependent.
    #[error("basis matrix is singular")]
    SingularBasis,
    /// Post-optimal analysis was requested for a solution that isn't optimal.
    #[error("sensitivity analysis requires an optimal solution, status is {0:?}")]
    NotOptimal(SolutionStatus),
    /// A constraint added after solving cuts off the current solution.
    #[error("added constraint is violated by {0}")]
    ConstraintViolation(f64),
}

impl Error {
    /// Convenience constructor for the most common validation failure.
    pub(crate) fn dimension(what: impl Into<String>, expected: usize, found: usize) -> Self {
        Error::DimensionMismatch { what: what.into(), expected, found }
    }
}
