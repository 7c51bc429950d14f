//! # The Simplex algorithm
//!
//! This module contains all data structures and logic specific to the simplex algorithm. The
//! algorithm is implemented as described in chapters 2 and 4 of Combinatorial Optimization, a book
//! by Christos H. Papadimitriou and Kenneth Steiglitz.
//!
//! Two representations of the basis are provided: a full `tableau` and the `revised` method that
//! maintains the basis inverse in product form. Both drive the same phase one and phase two loops
//! through the `SimplexTableau` trait.
use log::{debug, info};

use crate::algorithm::settings::Settings;
use crate::algorithm::two_phase::phase_one::{phase_one, PhaseOneResult};
use crate::algorithm::two_phase::phase_two::{dual, primal};
use crate::algorithm::two_phase::strategy::pivot_rule::{CycleGuard, Pricing};
use crate::data::linear_program::canonical_form::CanonicalForm;
use crate::data::linear_program::solution::{Basis, Iteration, Solution, SolutionStatus, TableauSnapshot};
use crate::error::Error;

pub mod tableau;
pub mod revised;
pub mod basis;
pub mod strategy;
pub(crate) mod phase_one;
pub(crate) mod phase_two;

/// Operations the simplex loops need, independent of how the basis is represented.
///
/// Columns with an index at or beyond the number of columns of the canonical form are artificial.
pub trait SimplexTableau: Pricing {
    /// Number of constraint rows currently in the tableau.
    fn nr_rows(&self) -> usize;
    /// Basic column of each row.
    fn basis(&self) -> &[usize];
    /// Canonical form row that each tableau row originates from.
    fn rows(&self) -> &[usize];
    /// Current values of the basic variables.
    fn rhs(&self) -> Vec<f64>;
    /// Column `j` with respect to the current basis, `B^-1 a_j`.
    fn generate_column(&self, j: usize) -> Vec<f64>;
    /// Row `i` of `B^-1 A`, over all columns.
    fn generate_row(&self, i: usize) -> Vec<f64>;
    /// Pivot: column `column_index` replaces the basic column of row `row_index`.
    ///
    /// # Arguments
    ///
    /// * `column`: The entering column with respect to the current basis, as computed by
    /// `generate_column`.
    fn bring_into_basis(&mut self, column_index: usize, row_index: usize, column: &[f64]);
    /// Replace the cost vector, for example when moving from phase one to phase two.
    fn set_cost(&mut self, cost: &[f64]);
    /// Current value of the (canonical) objective function.
    fn objective_value(&self) -> f64;
    /// Drop the artificial columns (all columns from `nr_columns` on) and the given rows.
    ///
    /// # Arguments
    ///
    /// * `nr_columns`: Number of columns that are not artificial.
    /// * `rows`: Sorted tableau row indices to remove; none of them is basic in a non artificial
    /// column.
    fn remove_artificial(&mut self, nr_columns: usize, rows: &[usize]);
    /// Full tableau, for display.
    fn snapshot(&self) -> TableauSnapshot;
}

/// Why a simplex loop stopped.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum Termination {
    /// No improving column (primal) or no infeasible row (dual) is left.
    Optimal,
    /// The column can be increased without limit.
    Unbounded(usize),
    /// The dual loop found a row that can't be made feasible.
    Infeasible(usize),
    /// The pivot budget ran out.
    IterationLimit,
    /// The deadline passed.
    Deadline,
}

/// Bookkeeping of a solve: number of pivots, trace entries and cycling detection.
#[derive(Debug)]
pub(crate) struct Trace {
    pub pivots: usize,
    pub iterations: Vec<Iteration>,
    pub guard: CycleGuard,
    record_tableaux: bool,
}

impl Trace {
    pub fn new(settings: &Settings) -> Self {
        Self {
            pivots: 0,
            iterations: Vec::new(),
            guard: CycleGuard::default(),
            record_tableaux: settings.record_tableaux,
        }
    }

    /// Add a trace entry.
    ///
    /// The snapshot is only computed when tableaux are recorded, it can be expensive.
    pub fn record<S: FnOnce() -> TableauSnapshot>(&mut self, description: String, snapshot: S, is_optimal: bool) {
        let snapshot = if self.record_tableaux { Some(snapshot()) } else { None };
        self.push(description, snapshot, is_optimal);
    }

    /// Add a trace entry without a tableau.
    pub fn note(&mut self, description: String) {
        self.push(description, None, false);
    }

    fn push(&mut self, description: String, snapshot: Option<TableauSnapshot>, is_optimal: bool) {
        self.iterations.push(Iteration {
            number: self.iterations.len(),
            description,
            snapshot,
            is_optimal,
            is_final: false,
        });
    }

    /// Whether the budget allows another pivot.
    pub fn exhausted(&self, settings: &Settings) -> Option<Termination> {
        if self.pivots >= settings.max_iterations {
            Some(Termination::IterationLimit)
        } else if settings.is_expired() {
            Some(Termination::Deadline)
        } else {
            None
        }
    }
}

/// Name of a tableau column, artificial columns included.
pub(crate) fn column_name(form: &CanonicalForm, j: usize) -> String {
    if j < form.nr_columns() {
        form.variable_name(j)
    } else {
        format!("a{}", j - form.nr_columns() + 1)
    }
}

/// Message that goes with a termination of the phase two loop.
pub(crate) fn describe(form: &CanonicalForm, termination: Termination, settings: &Settings) -> (SolutionStatus, Option<String>) {
    match termination {
        Termination::Optimal => (SolutionStatus::Optimal, None),
        Termination::Unbounded(j) => (
            SolutionStatus::Unbounded,
            Some(format!("column {} can be increased without limit", column_name(form, j))),
        ),
        Termination::Infeasible(i) => (
            SolutionStatus::Infeasible,
            Some(format!("row {} can't be satisfied", i + 1)),
        ),
        Termination::IterationLimit => (
            SolutionStatus::MaxIterationsReached,
            Some(format!("iteration limit of {} reached", settings.max_iterations)),
        ),
        Termination::Deadline => (SolutionStatus::MaxIterationsReached, Some("deadline reached".to_string())),
    }
}

/// Create a `Solution` from the current state of a tableau.
///
/// # Arguments
///
/// * `form`: Form that was solved, used to name and size the values.
/// * `tableau`: Final tableau; artificial basic columns don't receive a value.
/// * `with_basis`: Whether the basis of the tableau is a basis of `form` (no artificial columns).
pub(crate) fn assemble<T: SimplexTableau + ?Sized>(
    form: &CanonicalForm,
    tableau: &T,
    status: SolutionStatus,
    message: Option<String>,
    mut trace: Trace,
    with_basis: bool,
    epsilon: f64,
) -> Solution {
    let mut values = vec![0f64; form.nr_columns()];
    for (&j, value) in tableau.basis().iter().zip(tableau.rhs()) {
        if j < values.len() {
            values[j] = if value.abs() <= epsilon { 0f64 } else { value };
        }
    }

    let canonical = match status {
        SolutionStatus::Unbounded => f64::NEG_INFINITY,
        SolutionStatus::Infeasible => f64::NAN,
        _ => form.objective_value(&values),
    };
    let basis = with_basis.then(|| Basis::new(
        tableau.basis().to_vec(),
        tableau.rows().to_vec(),
        form.nr_rows(),
        form.nr_columns(),
    ));

    let description = match &message {
        Some(message) => format!("{}: {}", status, message),
        None => status.to_string(),
    };
    trace.record(description, || tableau.snapshot(), status == SolutionStatus::Optimal);
    info!("Simplex finished after {} pivots: {}", trace.pivots, status);

    let mut solution = Solution {
        status,
        message,
        values,
        objective_value: form.reported_objective(canonical),
        basis,
        pivots: trace.pivots,
        iterations: trace.iterations,
    };
    solution.finalize_trace();

    solution
}

/// Run both phases on a tableau that starts in a basis of identity and artificial columns.
///
/// # Arguments
///
/// * `tableau`: Tableau with the phase one cost if `nr_artificial > 0`, the form's cost otherwise.
/// * `nr_artificial`: Number of artificial columns, these come after the columns of `form`.
pub(crate) fn two_phase<T: SimplexTableau>(
    tableau: &mut T,
    form: &CanonicalForm,
    nr_artificial: usize,
    settings: &Settings,
    mut trace: Trace,
) -> Solution {
    match phase_one(tableau, form, nr_artificial, settings, &mut trace) {
        PhaseOneResult::Feasible => {
            if nr_artificial > 0 {
                tableau.set_cost(form.cost());
                trace.record("phase 2: initial tableau".to_string(), || tableau.snapshot(), false);
            }
            let termination = primal(tableau, form, settings, &mut trace, "phase 2");
            let (status, message) = describe(form, termination, settings);
            assemble(form, &*tableau, status, message, trace, true, settings.epsilon)
        }
        PhaseOneResult::Infeasible(sum) => {
            let message = format!("the artificial variables can't be reduced below {}", sum);
            assemble(form, &*tableau, SolutionStatus::Infeasible, Some(message), trace, false, settings.epsilon)
        }
        PhaseOneResult::Stopped(Termination::Unbounded(j)) => {
            let message = format!("phase one diverged along column {}", column_name(form, j));
            assemble(form, &*tableau, SolutionStatus::Error, Some(message), trace, false, settings.epsilon)
        }
        PhaseOneResult::Stopped(termination) => {
            let (status, message) = describe(form, termination, settings);
            assemble(form, &*tableau, status, message, trace, false, settings.epsilon)
        }
    }
}

/// Error result if a basis doesn't belong to a form.
pub(crate) fn basis_mismatch(form: &CanonicalForm, basis: &Basis) -> Option<Solution> {
    if basis.fits(form) {
        return None;
    }

    let error = if basis.nr_rows() != form.nr_rows() {
        Error::dimension("basis rows", form.nr_rows(), basis.nr_rows())
    } else {
        Error::dimension("basis columns", form.nr_columns(), basis.nr_columns())
    };
    Some(Solution::without_values(SolutionStatus::Error, error.to_string(), form.nr_columns()))
}

/// Continue from a tableau that was set up for a given basis of the form.
///
/// If the basis is primal feasible, only phase two runs. If it is dual feasible instead, the dual
/// simplex method first restores primal feasibility.
///
/// # Return value
///
/// `None` if the basis is neither primal nor dual feasible.
pub(crate) fn warm_start<T: SimplexTableau>(
    tableau: &mut T,
    form: &CanonicalForm,
    settings: &Settings,
    mut trace: Trace,
) -> Option<Solution> {
    let epsilon = settings.epsilon;
    trace.record("initial tableau (warm start)".to_string(), || tableau.snapshot(), false);

    let primal_feasible = tableau.rhs().iter().all(|&value| value >= -epsilon);
    if !primal_feasible {
        let dual_feasible = (0..tableau.nr_columns())
            .filter(|&j| !tableau.is_in_basis(j))
            .all(|j| tableau.relative_cost(j) >= -epsilon);
        if !dual_feasible {
            debug!("Basis is neither primal nor dual feasible");
            return None;
        }

        let termination = dual(tableau, form, settings, &mut trace);
        if termination != Termination::Optimal {
            let (status, message) = describe(form, termination, settings);
            let with_basis = !matches!(termination, Termination::Infeasible(_));
            return Some(assemble(form, &*tableau, status, message, trace, with_basis, epsilon));
        }
    }

    let termination = primal(tableau, form, settings, &mut trace, "phase 2");
    let (status, message) = describe(form, termination, settings);
    Some(assemble(form, &*tableau, status, message, trace, true, epsilon))
}

/// Result for a form of which a row contradicts the rows before it.
pub(crate) fn contradiction(form: &CanonicalForm, row: usize, mut trace: Trace) -> Solution {
    debug!("Row {} is a linear combination of earlier rows with a different right hand side", row);

    let message = format!("row {} contradicts the rows before it", row + 1);
    trace.note(format!("{}: {}", SolutionStatus::Infeasible, message));
    let mut solution = Solution::without_values(SolutionStatus::Infeasible, message, form.nr_columns());
    solution.iterations = trace.iterations;
    solution.finalize_trace();

    solution
}
