//! # Representation of solver results
//!
//! Every solver produces a `Solution`, also when it fails. It contains the status, the values of
//! all canonical columns, the objective value in the sense of the original problem, the final
//! basis (if there is one) and a trace of the iterations that led to it.
use std::fmt;
use std::fmt::{Display, Formatter};

use crate::data::linear_program::canonical_form::CanonicalForm;
use crate::error::{Error, Result};

/// How a solve ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolutionStatus {
    /// A provably optimal solution was found.
    Optimal,
    /// No feasible solution exists.
    Infeasible,
    /// The objective can be improved without limit.
    Unbounded,
    /// An iteration, node or cut budget (or the deadline) ran out; the values are the best found.
    MaxIterationsReached,
    /// The solver failed; see the message.
    Error,
}

impl Display for SolutionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SolutionStatus::Optimal => "optimal",
            SolutionStatus::Infeasible => "infeasible",
            SolutionStatus::Unbounded => "unbounded",
            SolutionStatus::MaxIterationsReached => "maximum number of iterations reached",
            SolutionStatus::Error => "error",
        })
    }
}

/// A basis of a `CanonicalForm`.
///
/// Linearly dependent rows of the form are not covered by the basis, so the number of basic columns
/// can be smaller than the number of rows of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Basis {
    /// Basic column for each basis row.
    basic: Vec<usize>,
    /// Constraint row of the form for each basis row, sorted.
    rows: Vec<usize>,
    /// Dimensions of the form this basis belongs to.
    nr_rows: usize,
    nr_columns: usize,
}

impl Basis {
    /// Create a new `Basis`.
    ///
    /// # Arguments
    ///
    /// * `basic`: Basic column for each basis row, all different.
    /// * `rows`: Form row index for each basis row, sorted and of the same length as `basic`.
    /// * `nr_rows`: Number of rows of the form.
    /// * `nr_columns`: Number of columns of the form.
    pub fn new(basic: Vec<usize>, rows: Vec<usize>, nr_rows: usize, nr_columns: usize) -> Self {
        debug_assert_eq!(basic.len(), rows.len());
        debug_assert!(rows.is_sorted());
        debug_assert!(rows.iter().all(|&i| i < nr_rows));
        debug_assert!(basic.iter().all(|&j| j < nr_columns));

        Self { basic, rows, nr_rows, nr_columns }
    }

    /// Basic column for each basis row.
    pub fn basic(&self) -> &[usize] {
        &self.basic
    }

    /// Form row for each basis row.
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// All columns that are not basic, ascending.
    pub fn non_basic(&self) -> Vec<usize> {
        let mut is_basic = vec![false; self.nr_columns];
        for &j in &self.basic {
            is_basic[j] = true;
        }

        (0..self.nr_columns).filter(|&j| !is_basic[j]).collect()
    }

    /// Basis row in which column `j` is basic.
    pub fn position(&self, j: usize) -> Option<usize> {
        self.basic.iter().position(|&column| column == j)
    }

    /// Number of rows of the form this basis belongs to.
    pub fn nr_rows(&self) -> usize {
        self.nr_rows
    }

    /// Number of columns of the form this basis belongs to.
    pub fn nr_columns(&self) -> usize {
        self.nr_columns
    }

    /// Whether this basis was computed for a form with the given dimensions.
    pub fn fits(&self, form: &CanonicalForm) -> bool {
        self.nr_rows == form.nr_rows() && self.nr_columns == form.nr_columns()
    }

    /// Basis for a form that extends the form of this basis with a single row.
    ///
    /// The slack of the new row becomes basic in that row.
    ///
    /// # Return value
    ///
    /// `None` if the new row is an equality, which has no slack.
    pub fn extended(&self, form: &CanonicalForm) -> Option<Self> {
        debug_assert_eq!(form.nr_rows(), self.nr_rows + 1);

        let row = form.nr_rows() - 1;
        form.slack_column(row).map(|slack| {
            let mut basic = self.basic.clone();
            basic.push(slack);
            let mut rows = self.rows.clone();
            rows.push(row);

            Self::new(basic, rows, form.nr_rows(), form.nr_columns())
        })
    }
}

/// Tableau rows at some point during the solve, meant for display.
#[derive(Debug, Clone, PartialEq)]
pub struct TableauSnapshot {
    /// Constraint rows followed by the objective row; the last value of each row is the right hand
    /// side.
    pub rows: Vec<Vec<f64>>,
    /// Basic column of each constraint row.
    pub basis: Vec<usize>,
}

/// One entry in the trace of a solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Iteration {
    /// Position in the trace, starting at zero.
    pub number: usize,
    /// What happened, for example which pivot was made.
    pub description: String,
    /// The tableau after this step, if recorded.
    pub snapshot: Option<TableauSnapshot>,
    /// Whether the tableau was optimal after this step.
    pub is_optimal: bool,
    /// Whether this is the last entry.
    pub is_final: bool,
}

/// Result of a solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// How the solve ended.
    pub status: SolutionStatus,
    /// Explanation for statuses other than `Optimal`.
    pub message: Option<String>,
    /// Value of each canonical column.
    pub values: Vec<f64>,
    /// Objective value in the sense (maximization or minimization) of the original problem.
    pub objective_value: f64,
    /// Final basis, if one was reached.
    pub basis: Option<Basis>,
    /// Number of pivots, over all phases and relaxations.
    pub pivots: usize,
    /// Ordered trace.
    pub iterations: Vec<Iteration>,
}

impl Solution {
    /// A solution without values, for a solve that ended before reaching any basis.
    pub fn without_values(status: SolutionStatus, message: impl Into<String>, nr_columns: usize) -> Self {
        Self {
            status,
            message: Some(message.into()),
            values: vec![0f64; nr_columns],
            objective_value: f64::NAN,
            basis: None,
            pivots: 0,
            iterations: Vec::new(),
        }
    }

    /// Whether the status is `Optimal`.
    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }

    /// Turn any status other than `Optimal` into the corresponding error.
    ///
    /// Useful for callers that only care about optimal solutions and want to use `?`.
    pub fn into_result(self) -> Result<Self> {
        match self.status {
            SolutionStatus::Optimal => Ok(self),
            SolutionStatus::Infeasible => Err(Error::Infeasible),
            SolutionStatus::Unbounded => Err(Error::Unbounded),
            SolutionStatus::MaxIterationsReached => Err(Error::MaxIterationsReached(self.pivots)),
            SolutionStatus::Error => Err(Error::NotOptimal(self.status)),
        }
    }

    /// Values of the original variables.
    pub fn original_values(&self, form: &CanonicalForm) -> Vec<f64> {
        form.original_values(&self.values)
    }

    /// Mark the last trace entry as final.
    pub(crate) fn finalize_trace(&mut self) {
        if let Some(last) = self.iterations.last_mut() {
            last.is_final = true;
        }
    }
}
