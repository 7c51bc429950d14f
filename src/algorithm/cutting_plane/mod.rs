//! # Cutting planes
//!
//! Solves integer programs by repeatedly solving the linear relaxation and adding a Gomory cut
//! derived from a row of its optimal tableau, until the relaxation solution is integral.
//!
//! Every cut produces a new working form; the form the solver was created with is never modified.
use log::{debug, info};

use crate::algorithm::cutting_plane::gomory::{fraction, GomoryCut};
use crate::algorithm::settings::Settings;
use crate::algorithm::two_phase::basis::BasisInverse;
use crate::algorithm::two_phase::revised::RevisedSimplex;
use crate::data::linear_program::canonical_form::CanonicalForm;
use crate::data::linear_program::elements::ConstraintType;
use crate::data::linear_program::solution::{Basis, Iteration, Solution, SolutionStatus};
use crate::error::Error;

pub mod gomory;

/// Gomory cutting plane solver for a canonical form with integral columns.
#[derive(Debug)]
pub struct CuttingPlane<'a> {
    form: &'a CanonicalForm,
    settings: &'a Settings,
    cuts: Vec<GomoryCut>,
}

impl<'a> CuttingPlane<'a> {
    /// Create a new solver.
    pub fn new(form: &'a CanonicalForm, settings: &'a Settings) -> Self {
        Self { form, settings, cuts: Vec::new() }
    }

    /// Run the cutting plane loop.
    ///
    /// # Return value
    ///
    /// Values for the columns of the form this solver was created with. The basis is only
    /// reported when no cut was needed.
    pub fn run(&mut self) -> Solution {
        let solver = RevisedSimplex::new(self.settings);
        if !self.form.has_integer_columns() {
            debug!("No integral columns, solving the relaxation only");
            return solver.solve(self.form);
        }

        self.cuts.clear();
        let mut working = match self.form.with_binary_upper_bounds() {
            Ok(working) => working,
            Err(error) => return self.error(error, Vec::new(), 0),
        };
        let mut warm: Option<Basis> = None;
        let mut iterations = Vec::new();
        let mut pivots = 0;

        loop {
            let relaxation = match &warm {
                Some(basis) => solver.solve_from_basis(&working, basis),
                None => solver.solve(&working),
            };
            pivots += relaxation.pivots;
            if relaxation.status != SolutionStatus::Optimal {
                debug!("Relaxation after {} cuts ended with status {}", self.cuts.len(), relaxation.status);
                return self.finish(relaxation.status, relaxation.message, relaxation.values, iterations, pivots, None);
            }
            let Some(basis) = relaxation.basis else {
                return self.error(Error::SingularBasis, iterations, pivots);
            };

            let Some(source_row) = self.source_row(&working, &basis, &relaxation.values) else {
                let mut values = relaxation.values;
                for (j, value) in values.iter_mut().enumerate() {
                    if working.is_integral(j) {
                        *value = value.round();
                    }
                }
                let basis = self.cuts.is_empty().then_some(basis);
                return self.finish(SolutionStatus::Optimal, None, values, iterations, pivots, basis);
            };

            if self.cuts.len() >= self.settings.max_cuts {
                let message = format!("cut limit of {} reached", self.settings.max_cuts);
                return self.finish(SolutionStatus::MaxIterationsReached, Some(message), relaxation.values, iterations, pivots, None);
            }
            if self.settings.is_expired() {
                let message = "deadline reached".to_string();
                return self.finish(SolutionStatus::MaxIterationsReached, Some(message), relaxation.values, iterations, pivots, None);
            }

            let cut = match self.derive_cut(&working, &basis, source_row, &relaxation.values) {
                Ok(cut) => cut,
                Err(Error::Infeasible) => {
                    let message = format!("row {} proves integer infeasibility", source_row + 1);
                    debug!("{}", message);
                    let values = vec![0f64; self.form.nr_columns()];
                    return self.finish(SolutionStatus::Infeasible, Some(message), values, iterations, pivots, None);
                }
                Err(error) => return self.error(error, iterations, pivots),
            };
            let column = basis.basic()[source_row];
            debug!("Cut {} from row {} ({:?})", self.cuts.len() + 1, source_row, cut.kind);
            iterations.push(Iteration {
                number: 0,
                description: format!(
                    "cut {} ({:?}) from the row of {} = {}",
                    self.cuts.len() + 1, cut.kind, working.variable_name(column), relaxation.values[column],
                ),
                snapshot: relaxation.iterations.last().and_then(|iteration| iteration.snapshot.clone()),
                is_optimal: false,
                is_final: false,
            });

            working = match working.with_constraint(cut.coefficients.clone(), ConstraintType::Greater, cut.rhs) {
                Ok(extended) => extended,
                Err(error) => return self.error(error, iterations, pivots),
            };
            warm = basis.extended(&working);
            self.cuts.push(cut);
        }
    }

    /// Basis row of the integral column whose value is furthest from an integer.
    ///
    /// Ties go to the lowest row.
    fn source_row(&self, form: &CanonicalForm, basis: &Basis, values: &[f64]) -> Option<usize> {
        let tolerance = self.settings.integrality_tolerance;

        let mut best: Option<(usize, f64)> = None;
        for (i, &j) in basis.basic().iter().enumerate() {
            if j >= form.nr_structural() || !form.is_integral(j) {
                continue;
            }
            let fraction = values[j] - values[j].floor();
            let deviation = fraction.min(1f64 - fraction);
            if deviation > tolerance && best.is_none_or(|(_, existing)| deviation > existing + self.settings.epsilon) {
                best = Some((i, deviation));
            }
        }

        best.map(|(i, _)| i)
    }

    fn derive_cut(&self, form: &CanonicalForm, basis: &Basis, source_row: usize, values: &[f64]) -> Result<GomoryCut, Error> {
        let inverse = BasisInverse::new(form, basis, self.settings.epsilon)?;
        let row = inverse.tableau_row(source_row);
        let value = values[basis.basic()[source_row]];
        debug_assert!(fraction(value, self.settings.integrality_tolerance) > 0f64);

        GomoryCut::from_row(form, basis, source_row, &row, value, self.settings.epsilon)
    }

    fn error(&self, error: Error, iterations: Vec<Iteration>, pivots: usize) -> Solution {
        let values = vec![0f64; self.form.nr_columns()];
        self.finish(SolutionStatus::Error, Some(error.to_string()), values, iterations, pivots, None)
    }

    fn finish(
        &self,
        status: SolutionStatus,
        message: Option<String>,
        mut values: Vec<f64>,
        mut iterations: Vec<Iteration>,
        pivots: usize,
        basis: Option<Basis>,
    ) -> Solution {
        values.resize(self.form.nr_columns(), 0f64);
        let objective_value = match status {
            SolutionStatus::Optimal | SolutionStatus::MaxIterationsReached => {
                self.form.reported_objective(self.form.objective_value(&values))
            }
            SolutionStatus::Unbounded => self.form.reported_objective(f64::NEG_INFINITY),
            SolutionStatus::Infeasible | SolutionStatus::Error => f64::NAN,
        };
        // The basis of the relaxation only fits when no rows were added
        let basis = basis.filter(|basis| basis.fits(self.form));

        iterations.push(Iteration {
            number: 0,
            description: match &message {
                Some(message) => format!("{}: {}", status, message),
                None => status.to_string(),
            },
            snapshot: None,
            is_optimal: status == SolutionStatus::Optimal,
            is_final: false,
        });
        for (number, iteration) in iterations.iter_mut().enumerate() {
            iteration.number = number;
        }
        info!("Cutting planes finished after {} cuts and {} pivots: {}", self.cuts.len(), pivots, status);

        let mut solution = Solution { status, message, values, objective_value, basis, pivots, iterations };
        solution.finalize_trace();

        solution
    }

    /// Cuts added during the last run, in order.
    pub fn cuts(&self) -> &[GomoryCut] {
        &self.cuts
    }
}
