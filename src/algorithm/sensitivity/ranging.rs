//! # Ranging
//!
//! Intervals within which a single objective coefficient or right hand side can vary while the
//! current basis stays optimal (for costs) or feasible (for right hand sides).
use crate::algorithm::sensitivity::SensitivityAnalysis;

/// Interval of an objective coefficient over which the basis stays optimal.
///
/// In the sense of the original objective. For the column of a non positive variable, this is
/// the coefficient of the negated variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostRange {
    /// Column of the form.
    pub column: usize,
    #[allow(missing_docs)]
    pub current: f64,
    /// Possibly negative infinity.
    pub lower: f64,
    /// Possibly infinity.
    pub upper: f64,
}

/// Interval of a right hand side over which the basis stays feasible.
///
/// Within this interval, the objective changes linearly with the shadow price as rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RhsRange {
    /// Row of the form.
    pub constraint: usize,
    #[allow(missing_docs)]
    pub current: f64,
    /// Possibly negative infinity.
    pub lower: f64,
    /// Possibly infinity.
    pub upper: f64,
}

impl CostRange {
    /// Whether a value lies within the range, bounds included.
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

impl RhsRange {
    /// Whether a value lies within the range, bounds included.
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

impl<'a> SensitivityAnalysis<'a> {
    /// Range of the objective coefficient of column `j`.
    ///
    /// For a non basic column, the canonical cost can decrease by its reduced cost before the
    /// column becomes attractive, and increase without limit. For a basic column, a change of the
    /// cost changes the reduced costs of all non basic columns along the tableau row of the column;
    /// a ratio test finds the first one to become negative in either direction.
    pub fn cost_range(&self, j: usize) -> CostRange {
        debug_assert!(j < self.form.nr_columns());

        let cost = self.form.cost()[j];
        let (decrease, increase) = match self.inverse.basis().position(j) {
            None => (self.reduced_costs[j], f64::INFINITY),
            Some(row) => {
                let tableau_row = self.inverse.tableau_row(row);
                let non_basic = self.inverse.basis().non_basic();
                let pairs = non_basic.iter().map(|&k| (tableau_row[k], self.reduced_costs[k]));
                // c_j + delta keeps r_k - delta * t_k >= 0 for all non basic k
                ratio_interval(pairs, self.settings.epsilon)
            }
        };

        let (lower, upper) = if self.form.objective().sign() > 0f64 {
            (cost - decrease, cost + increase)
        } else {
            (-(cost + increase), -(cost - decrease))
        };

        CostRange { column: j, current: self.reported(cost), lower, upper }
    }

    /// Ranges for all columns, in column order.
    pub fn cost_ranges(&self) -> Vec<CostRange> {
        (0..self.form.nr_columns()).map(|j| self.cost_range(j)).collect()
    }

    /// Range of the right hand side of row `i`.
    ///
    /// Changing `b_i` by `delta` changes the basic values by `delta B^-1 e_k`, with `k` the basis
    /// row of `i`. Rows that were dropped as redundant can't change at all, and neither can the
    /// rows they depend on.
    pub fn rhs_range(&self, i: usize) -> RhsRange {
        debug_assert!(i < self.form.nr_rows());

        let current = self.form.b()[i];
        let fixed = RhsRange { constraint: i, current, lower: current, upper: current };
        let Some(k) = self.inverse.basis().rows().iter().position(|&row| row == i) else {
            return fixed;
        };
        if self.supports_redundant_row(i) {
            return fixed;
        }

        let direction = self.inverse.inverse_column(k);
        let values = self.inverse.basic_values();
        // x_B + delta d >= 0; expressed as -delta * (-d) <= x_B to share the ratio test
        let pairs = direction.iter().zip(&values).map(|(&d, &x)| (-d, x.max(0f64)));
        let (decrease, increase) = ratio_interval(pairs, self.settings.epsilon);

        RhsRange { constraint: i, current, lower: current - decrease, upper: current + increase }
    }

    /// Ranges for all rows, in row order.
    pub fn rhs_ranges(&self) -> Vec<RhsRange> {
        (0..self.form.nr_rows()).map(|i| self.rhs_range(i)).collect()
    }

    /// Whether a row that was dropped as redundant is a combination involving row `i`.
    ///
    /// Changing `b_i` alone would then make the system `[A | b]` inconsistent.
    fn supports_redundant_row(&self, i: usize) -> bool {
        if self.inverse.basis().rows().len() == self.form.nr_rows() {
            return false;
        }

        let mut b = self.form.b().to_vec();
        b[i] += b[i].abs().max(1f64);
        self.form.constraints().row_rank(&b, self.settings.epsilon).is_err()
    }
}

/// Largest decrease and increase of `delta` such that `value - delta * rate >= 0` for every
/// `(rate, value)` pair, given that all values are non negative.
///
/// Rates within `epsilon` of zero don't limit `delta`.
fn ratio_interval(pairs: impl Iterator<Item = (f64, f64)>, epsilon: f64) -> (f64, f64) {
    pairs.fold((f64::INFINITY, f64::INFINITY), |(decrease, increase), (rate, value)| {
        if rate > epsilon {
            (decrease, increase.min(value / rate))
        } else if rate < -epsilon {
            (decrease.min(value / -rate), increase)
        } else {
            (decrease, increase)
        }
    })
}
