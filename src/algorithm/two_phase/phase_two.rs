//! # Phase two
//!
//! Reduces the cost of a basic feasible solution to the minimum, using the primal simplex method.
//! The dual simplex method is used to restore primal feasibility after the basis was modified, for
//! example because a row was added.
use log::debug;

use crate::algorithm::settings::Settings;
use crate::algorithm::two_phase::{column_name, SimplexTableau, Termination, Trace};
use crate::algorithm::two_phase::strategy::pivot_rule::{select_dual_pivot_column, select_dual_pivot_row, select_primal_pivot_row};
use crate::data::linear_program::canonical_form::CanonicalForm;

/// Primal simplex loop.
///
/// While calling this method, a number of requirements should be satisfied:
/// - There should be a valid basis (not necessarily optimal <=> dual feasible <=> c >= 0)
/// - All constraint values need to be non negative (primal feasibility)
///
/// # Arguments
///
/// * `phase`: Label for the trace entries.
///
/// # Return value
///
/// Why the loop stopped. It can't be infeasible, as a feasible solution is needed to start.
pub(crate) fn primal<T: SimplexTableau>(
    tableau: &mut T,
    form: &CanonicalForm,
    settings: &Settings,
    trace: &mut Trace,
    phase: &str,
) -> Termination {
    loop {
        let rule = trace.guard.rule();
        let Some((column_index, cost)) = rule.select_primal_pivot_column(&*tableau, settings.epsilon) else {
            break Termination::Optimal;
        };
        if let Some(termination) = trace.exhausted(settings) {
            break termination;
        }
        let column = tableau.generate_column(column_index);
        let Some(row_index) = select_primal_pivot_row(&column, &tableau.rhs(), tableau.basis(), settings.epsilon) else {
            break Termination::Unbounded(column_index);
        };

        let leaving = tableau.basis()[row_index];
        tableau.bring_into_basis(column_index, row_index, &column);
        trace.pivots += 1;
        debug!(
            "{} pivot {}: column {} (reduced cost {}) enters, column {} leaves at row {}",
            phase, trace.pivots, column_index, cost, leaving, row_index,
        );

        trace.guard.visit(tableau.basis(), trace.pivots);
        trace.record(
            format!(
                "{}: {} enters, {} leaves (row {})",
                phase, column_name(form, column_index), column_name(form, leaving), row_index + 1,
            ),
            || tableau.snapshot(),
            false,
        );
    }
}

/// Dual simplex loop.
///
/// Requires all reduced costs to be non negative (dual feasibility). Pivots until all basic
/// values are non negative.
///
/// # Return value
///
/// `Optimal` once primal feasibility is restored, `Infeasible` with the row that can't be repaired.
pub(crate) fn dual<T: SimplexTableau>(
    tableau: &mut T,
    form: &CanonicalForm,
    settings: &Settings,
    trace: &mut Trace,
) -> Termination {
    loop {
        let Some(row_index) = select_dual_pivot_row(&tableau.rhs(), settings.epsilon) else {
            break Termination::Optimal;
        };
        if let Some(termination) = trace.exhausted(settings) {
            break termination;
        }
        let row = tableau.generate_row(row_index);
        let Some(column_index) = select_dual_pivot_column(&*tableau, &row, settings.epsilon) else {
            break Termination::Infeasible(tableau.rows()[row_index]);
        };

        let leaving = tableau.basis()[row_index];
        let column = tableau.generate_column(column_index);
        tableau.bring_into_basis(column_index, row_index, &column);
        trace.pivots += 1;
        debug!("dual pivot {}: column {} enters, column {} leaves at row {}", trace.pivots, column_index, leaving, row_index);

        trace.record(
            format!(
                "dual: {} enters, {} leaves (row {})",
                column_name(form, column_index), column_name(form, leaving), row_index + 1,
            ),
            || tableau.snapshot(),
            false,
        );
    }
}
