//! # Phase one
//!
//! Computing a basic feasible solution: the first phase of the two phase method.
//!
//! Rows that are linearly dependent on other rows are removed up front. Rows with a negative right
//! hand side are negated. Each remaining row either already has an identity column (typically a
//! slack) that can be part of the initial basis, or receives an artificial variable. The sum of
//! the artificial variables is then minimized.
use index_utils::remove_indices;
use log::{debug, warn};

use crate::algorithm::settings::Settings;
use crate::algorithm::two_phase::{column_name, SimplexTableau, Termination, Trace};
use crate::algorithm::two_phase::phase_two::primal;
use crate::data::linear_algebra::matrix::DenseMatrix;
use crate::data::linear_algebra::Rank;
use crate::data::linear_program::canonical_form::CanonicalForm;

/// The rows of a canonical form that take part in the solve, prepared for phase one.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Standardized {
    /// Form row index of each row.
    pub rows: Vec<usize>,
    /// Constraint rows, negated where needed such that `b >= 0`, extended with one artificial
    /// column for each row without an initial basis column.
    pub matrix: DenseMatrix,
    pub b: Vec<f64>,
    /// Initial basic column of each row.
    pub basis: Vec<usize>,
    /// Number of artificial columns, these are the last columns of `matrix`.
    pub nr_artificial: usize,
}

impl Standardized {
    /// Prepare a canonical form for phase one.
    ///
    /// # Return value
    ///
    /// The index of a row that contradicts the rows before it, if there is one.
    pub fn new(form: &CanonicalForm, epsilon: f64) -> Result<Self, usize> {
        let rank = form.constraints().row_rank(form.b(), epsilon)?;
        let redundant = rank.redundant_rows();
        if let Rank::Deficient(rows) = &rank {
            debug!("Removing {} linearly dependent rows: {:?}", rows.len(), rows);
        }

        let mut matrix = form.constraints().clone();
        let mut b = form.b().to_vec();
        matrix.remove_rows(redundant);
        remove_indices(&mut b, redundant);
        let rows = (0..form.nr_rows())
            .filter(|i| redundant.binary_search(i).is_err())
            .collect::<Vec<_>>();

        for (i, value) in b.iter_mut().enumerate() {
            if *value < 0f64 {
                *value = -*value;
                matrix.multiply_row(i, -1f64);
            }
        }

        let initial = pivot_element_indices(&matrix);
        let n = matrix.nr_columns();
        let mut basis = Vec::with_capacity(rows.len());
        let mut nr_artificial = 0;
        for (i, column) in initial.into_iter().enumerate() {
            match column {
                Some(j) => basis.push(j),
                None => {
                    let mut artificial = vec![0f64; matrix.nr_rows()];
                    artificial[i] = 1f64;
                    matrix.push_column(&artificial);
                    basis.push(n + nr_artificial);
                    nr_artificial += 1;
                }
            }
        }

        Ok(Self { rows, matrix, b, basis, nr_artificial })
    }

    /// Phase one cost: the sum of the artificial variables.
    pub fn phase_one_cost(&self) -> Vec<f64> {
        let n = self.matrix.nr_columns() - self.nr_artificial;
        let mut cost = vec![0f64; n];
        cost.resize(self.matrix.nr_columns(), 1f64);

        cost
    }
}

/// For each row, a column that equals the unit vector of that row, if there is one.
///
/// Each column is used at most once. These columns can form (part of) an initial basis.
pub(crate) fn pivot_element_indices(matrix: &DenseMatrix) -> Vec<Option<usize>> {
    let mut indices = vec![None; matrix.nr_rows()];
    for j in 0..matrix.nr_columns() {
        let column = matrix.column(j);
        let mut nonzero = column.iter().enumerate().filter(|&(_, &value)| value != 0f64);
        if let (Some((i, &value)), None) = (nonzero.next(), nonzero.next()) {
            if value == 1f64 && indices[i].is_none() {
                indices[i] = Some(j);
            }
        }
    }

    indices
}

/// How phase one ended.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PhaseOneResult {
    /// A basic feasible solution without artificial columns is available.
    Feasible,
    /// The artificial variables can't be reduced to zero; the value is their minimal sum.
    Infeasible(f64),
    /// The loop stopped before completion.
    Stopped(Termination),
}

/// Minimize the sum of the artificial variables and remove them.
///
/// # Arguments
///
/// * `tableau`: Tableau over all columns of the form, followed by `nr_artificial` artificial
/// columns. The cost should be the phase one cost.
/// * `form`: Form being solved.
pub(crate) fn phase_one<T: SimplexTableau>(
    tableau: &mut T,
    form: &CanonicalForm,
    nr_artificial: usize,
    settings: &Settings,
    trace: &mut Trace,
) -> PhaseOneResult {
    if nr_artificial == 0 {
        return PhaseOneResult::Feasible;
    }

    match primal(tableau, form, settings, trace, "phase 1") {
        Termination::Optimal => {
            let scale = tableau.rhs().iter().fold(1f64, |max, value| max.max(value.abs()));
            let infeasibility = tableau.objective_value();
            if infeasibility > settings.epsilon * scale {
                debug!("Phase one ended with artificial sum {}", infeasibility);
                return PhaseOneResult::Infeasible(infeasibility);
            }

            let redundant = remove_artificial_basis_variables(tableau, form, settings, trace);
            tableau.remove_artificial(form.nr_columns(), &redundant);

            PhaseOneResult::Feasible
        }
        Termination::Unbounded(j) => {
            warn!("Phase one objective decreases without limit along column {}", j);
            PhaseOneResult::Stopped(Termination::Unbounded(j))
        }
        other => PhaseOneResult::Stopped(other),
    }
}

/// Pivot the artificial variables that are still basic (at level zero) out of the basis.
///
/// # Return value
///
/// Rows in which that was not possible; these are linearly dependent on the other rows.
fn remove_artificial_basis_variables<T: SimplexTableau>(
    tableau: &mut T,
    form: &CanonicalForm,
    settings: &Settings,
    trace: &mut Trace,
) -> Vec<usize> {
    let n = form.nr_columns();
    let mut redundant = Vec::new();

    for i in 0..tableau.nr_rows() {
        let leaving = tableau.basis()[i];
        if leaving < n {
            continue;
        }

        let row = tableau.generate_row(i);
        let candidate = (0..n)
            .filter(|&j| !tableau.is_in_basis(j))
            .filter(|&j| row[j].abs() > settings.epsilon)
            .max_by(|&a, &b| row[a].abs().total_cmp(&row[b].abs()));
        match candidate {
            Some(j) => {
                let column = tableau.generate_column(j);
                tableau.bring_into_basis(j, i, &column);
                trace.pivots += 1;
                trace.record(
                    format!("phase 1: {} enters, {} leaves", column_name(form, j), column_name(form, leaving)),
                    || tableau.snapshot(),
                    false,
                );
            }
            None => redundant.push(i),
        }
    }

    redundant
}

#[cfg(test)]
mod test {
    use crate::algorithm::two_phase::phase_one::{pivot_element_indices, Standardized};
    use crate::data::linear_algebra::matrix::DenseMatrix;
    use crate::data::linear_program::canonical_form::CanonicalForm;
    use crate::data::linear_program::elements::{ConstraintType, Objective};
    use crate::data::linear_program::problem::Problem;

    #[test]
    fn identity_columns() {
        let matrix = DenseMatrix::from_data(vec![
            vec![1f64, 1f64, 0f64, 1f64],
            vec![2f64, 0f64, 1f64, 0f64],
        ]);
        assert_eq!(pivot_element_indices(&matrix), vec![None, Some(2)]);
    }

    #[test]
    fn standardize() {
        let problem = Problem::new(Objective::Minimize, vec![1f64, 1f64])
            .with_constraint(vec![1f64, 1f64], ConstraintType::Less, 4f64)
            .with_constraint(vec![1f64, -1f64], ConstraintType::Equal, -1f64)
            .with_constraint(vec![2f64, 2f64], ConstraintType::Greater, 2f64)
            .with_constraint(vec![2f64, -2f64], ConstraintType::Equal, -2f64);
        let form = CanonicalForm::new(&problem).unwrap();
        let standardized = Standardized::new(&form, 1e-9).unwrap();

        assert_eq!(standardized.rows, vec![0, 1, 2]);
        assert_eq!(standardized.b, vec![4f64, 1f64, 2f64]);
        // The equality row is negated and the surplus row needs an artificial, as does the equality
        assert_eq!(standardized.nr_artificial, 2);
        assert_eq!(standardized.basis, vec![2, 4, 5]);
        assert_eq!(standardized.matrix.row(1), &[-1f64, 1f64, 0f64, 0f64, 1f64, 0f64]);
        assert_eq!(standardized.phase_one_cost(), vec![0f64, 0f64, 0f64, 0f64, 1f64, 1f64]);
    }

    #[test]
    fn contradiction() {
        let problem = Problem::new(Objective::Minimize, vec![1f64, 1f64])
            .with_constraint(vec![1f64, 1f64], ConstraintType::Equal, 1f64)
            .with_constraint(vec![2f64, 2f64], ConstraintType::Equal, 3f64);
        let form = CanonicalForm::new(&problem).unwrap();
        assert_eq!(Standardized::new(&form, 1e-9), Err(1));
    }
}
