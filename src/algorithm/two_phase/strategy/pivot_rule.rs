//! # Pivot rules
//!
//! Strategies for moving from basis to basis, whether primal or dual.
use std::collections::HashSet;

use log::warn;

use crate::error::Error;

/// Read access to the reduced costs of a tableau, however it is represented.
pub trait Pricing {
    /// Number of columns that may enter the basis.
    fn nr_columns(&self) -> usize;
    /// Whether column `j` is currently basic.
    fn is_in_basis(&self, j: usize) -> bool;
    /// Reduced cost of column `j`.
    fn relative_cost(&self, j: usize) -> f64;
}

/// Deciding how to pivot.
///
/// During the Simplex method, one needs to decide how to move from basic solution to basic
/// solution. The pivot rule describes that behavior.
///
/// Once the column has been selected for a primal pivot, a row needs to be found. This decision
/// is made independent of the rule, see `select_primal_pivot_row`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum PivotRule {
    /// Pivot on the column which has the most negative relative cost, ties to the lowest index.
    #[default]
    SteepestDescentAlongVariable,
    /// Pivot on the first column which has a negative relative cost (Bland's rule).
    FirstProfitable,
}

impl PivotRule {
    /// Column selection rule for the primal Simplex method.
    ///
    /// # Arguments
    ///
    /// * `tableau`: Source of reduced costs.
    /// * `epsilon`: Reduced costs should be below `-epsilon` to be considered profitable.
    ///
    /// # Return value
    ///
    /// Column index and its reduced cost, or `None` when the tableau is optimal.
    pub fn select_primal_pivot_column<T: Pricing + ?Sized>(
        self,
        tableau: &T,
        epsilon: f64,
    ) -> Option<(usize, f64)> {
        let mut candidates = (0..tableau.nr_columns())
            .filter(|&j| !tableau.is_in_basis(j))
            .map(|j| (j, tableau.relative_cost(j)))
            .filter(|&(_, cost)| cost < -epsilon);

        match self {
            PivotRule::FirstProfitable => candidates.next(),
            PivotRule::SteepestDescentAlongVariable => {
                let mut smallest: Option<(usize, f64)> = None;
                for (j, cost) in candidates {
                    match smallest {
                        Some((_, existing_cost)) if cost >= existing_cost => {}
                        _ => smallest = Some((j, cost)),
                    }
                }

                smallest
            }
        }
    }
}

/// Determine the row to pivot on.
///
/// This is the row with the positive but minimal ratio between the current constraint value and
/// the column. When there are multiple choices for the pivot row, the one with the lowest basic
/// column index leaves (Bland).
///
/// # Arguments
///
/// * `column`: Entering column with respect to the current basis, one value per row.
/// * `rhs`: Current values of the basic variables.
/// * `basis`: Basic column index of each row.
/// * `epsilon`: Only entries larger than this are considered.
///
/// # Return value
///
/// Index of the row to pivot on. If not found, the problem is unbounded.
pub fn select_primal_pivot_row(column: &[f64], rhs: &[f64], basis: &[usize], epsilon: f64) -> Option<usize> {
    debug_assert_eq!(column.len(), rhs.len());
    debug_assert_eq!(column.len(), basis.len());

    // (chosen index, minimum ratio, corresponding leaving column)
    let mut min_values: Option<(usize, f64, usize)> = None;
    for (row, &xij) in column.iter().enumerate() {
        if xij > epsilon {
            let ratio = rhs[row].max(0f64) / xij;
            let leaving_column = basis[row];
            if let Some((min_index, min_ratio, min_leaving_column)) = &mut min_values {
                if (ratio - *min_ratio).abs() <= epsilon {
                    if leaving_column < *min_leaving_column {
                        *min_index = row;
                        *min_leaving_column = leaving_column;
                    }
                } else if ratio < *min_ratio {
                    *min_index = row;
                    *min_ratio = ratio;
                    *min_leaving_column = leaving_column;
                }
            } else {
                min_values = Some((row, ratio, leaving_column));
            }
        }
    }

    min_values.map(|(min_index, _, _)| min_index)
}

/// Row selection rule for the dual Simplex method: the most negative basic value leaves.
///
/// # Return value
///
/// Row index, or `None` if the basis is primal feasible. Ties go to the lowest row.
pub fn select_dual_pivot_row(rhs: &[f64], epsilon: f64) -> Option<usize> {
    let mut smallest: Option<(usize, f64)> = None;
    for (i, &value) in rhs.iter().enumerate() {
        if value < -epsilon && smallest.is_none_or(|(_, existing)| value < existing) {
            smallest = Some((i, value));
        }
    }

    smallest.map(|(i, _)| i)
}

/// Column selection rule for the dual Simplex method.
///
/// Among the non basic columns with a negative entry in the pivot row, the one with the smallest
/// ratio `|r_j / a_rj|` enters, ties to the lowest index. This keeps all reduced costs non
/// negative.
///
/// # Arguments
///
/// * `tableau`: Source of reduced costs.
/// * `row`: Tableau row of the leaving variable, one value per column.
/// * `epsilon`: Only entries smaller than `-epsilon` are considered.
///
/// # Return value
///
/// Column to enter, or `None` when the problem is infeasible.
pub fn select_dual_pivot_column<T: Pricing + ?Sized>(tableau: &T, row: &[f64], epsilon: f64) -> Option<usize> {
    debug_assert!(row.len() >= tableau.nr_columns());

    let mut smallest: Option<(usize, f64)> = None;
    for j in (0..tableau.nr_columns()).filter(|&j| !tableau.is_in_basis(j)) {
        if row[j] < -epsilon {
            let ratio = (tableau.relative_cost(j).max(0f64) / row[j]).abs();
            match smallest {
                Some((_, existing)) if ratio >= existing - epsilon => {}
                _ => smallest = Some((j, ratio)),
            }
        }
    }

    smallest.map(|(j, _)| j)
}

/// Watches the sequence of bases for repetitions.
///
/// Starts out with the most negative reduced cost rule. Once a basis is seen for a second time,
/// the method is cycling; from then on, Bland's rule is used.
#[derive(Debug, Default)]
pub struct CycleGuard {
    seen: HashSet<Vec<usize>>,
    rule: PivotRule,
}

impl CycleGuard {
    /// Rule to use for the next pivot.
    pub fn rule(&self) -> PivotRule {
        self.rule
    }

    /// Register a basis that was visited.
    ///
    /// # Arguments
    ///
    /// * `basis`: Basic column of each row.
    /// * `iteration`: Number of pivots made so far, for logging.
    ///
    /// # Return value
    ///
    /// Whether this basis was visited before, while still using the default rule.
    pub fn visit(&mut self, basis: &[usize], iteration: usize) -> bool {
        if self.rule == PivotRule::FirstProfitable {
            return false;
        }

        let mut signature = basis.to_vec();
        signature.sort_unstable();
        if self.seen.insert(signature) {
            false
        } else {
            warn!("{}, switching to Bland's rule", Error::NumericalDegeneracy(iteration));
            self.rule = PivotRule::FirstProfitable;
            self.seen.clear();
            true
        }
    }
}

#[cfg(test)]
mod test {
    use crate::algorithm::two_phase::strategy::pivot_rule::{CycleGuard, Pricing, PivotRule, select_dual_pivot_column, select_dual_pivot_row, select_primal_pivot_row};

    struct Costs {
        costs: Vec<f64>,
        basic: Vec<usize>,
    }

    impl Pricing for Costs {
        fn nr_columns(&self) -> usize {
            self.costs.len()
        }
        fn is_in_basis(&self, j: usize) -> bool {
            self.basic.contains(&j)
        }
        fn relative_cost(&self, j: usize) -> f64 {
            self.costs[j]
        }
    }

    #[test]
    fn find_profitable_column() {
        let tableau = Costs { costs: vec![0f64, -1f64, -3f64, -3f64, 2f64], basic: vec![0] };
        assert_eq!(PivotRule::SteepestDescentAlongVariable.select_primal_pivot_column(&tableau, 1e-9), Some((2, -3f64)));
        assert_eq!(PivotRule::FirstProfitable.select_primal_pivot_column(&tableau, 1e-9), Some((1, -1f64)));

        let optimal = Costs { costs: vec![0f64, 1f64, -1e-12], basic: vec![0] };
        assert_eq!(PivotRule::SteepestDescentAlongVariable.select_primal_pivot_column(&optimal, 1e-9), None);
    }

    #[test]
    fn find_pivot_row() {
        assert_eq!(select_primal_pivot_row(&[3f64, 5f64, 2f64], &[6f64, 5f64, 8f64], &[0, 1, 2], 1e-9), Some(1));
        // Tie between rows 0 and 2, the lowest basic column leaves
        assert_eq!(select_primal_pivot_row(&[1f64, 1f64, 2f64], &[2f64, 4f64, 4f64], &[5, 3, 4], 1e-9), Some(2));
        assert_eq!(select_primal_pivot_row(&[-1f64, 0f64], &[1f64, 1f64], &[0, 1], 1e-9), None);
    }

    #[test]
    fn dual_pivot() {
        assert_eq!(select_dual_pivot_row(&[1f64, -2f64, -3f64, -3f64], 1e-9), Some(2));
        assert_eq!(select_dual_pivot_row(&[1f64, 0f64], 1e-9), None);

        let tableau = Costs { costs: vec![0f64, 2f64, 1f64, 3f64], basic: vec![0] };
        assert_eq!(select_dual_pivot_column(&tableau, &[1f64, -1f64, -1f64, -6f64], 1e-9), Some(3));
        assert_eq!(select_dual_pivot_column(&tableau, &[1f64, 1f64, 0f64, 2f64], 1e-9), None);
    }

    #[test]
    fn cycle_detection() {
        let mut guard = CycleGuard::default();
        assert_eq!(guard.rule(), PivotRule::SteepestDescentAlongVariable);
        assert!(!guard.visit(&[1, 2], 0));
        assert!(!guard.visit(&[1, 3], 1));
        assert!(guard.visit(&[2, 1], 2));
        assert_eq!(guard.rule(), PivotRule::FirstProfitable);
    }
}
