//! # Gomory cuts
//!
//! Derived from a row of the optimal tableau in which an integral column has a fractional value.
//! Writing that row as `x_i + sum_j a_j x_j = v` over the non basic columns `j`, every integral
//! solution satisfies the cut, while the current vertex (where all `x_j` are zero) does not.
use crate::data::linear_program::canonical_form::CanonicalForm;
use crate::data::linear_program::solution::Basis;
use crate::error::Error;

/// Which family a cut belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CutKind {
    /// `sum_j f_j x_j >= f_0`, valid when all non basic columns in the row are integral.
    Fractional,
    /// Mixed integer rounding of the row, valid with continuous columns in the row.
    MixedInteger,
}

/// A valid inequality `sum_j coefficients_j x_j >= rhs` that cuts off the current vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct GomoryCut {
    /// One value per column of the form the cut was derived from.
    pub coefficients: Vec<f64>,
    #[allow(missing_docs)]
    pub rhs: f64,
    /// Basis row of the tableau row the cut was derived from.
    pub source_row: usize,
    #[allow(missing_docs)]
    pub kind: CutKind,
}

impl GomoryCut {
    /// Derive a cut from a tableau row.
    ///
    /// # Arguments
    ///
    /// * `form`: Form the tableau belongs to, used for the integrality of the columns.
    /// * `basis`: Basis of the tableau.
    /// * `source_row`: Basis row index.
    /// * `row`: The tableau row, `(B^-1 A)_i`, one value per column.
    /// * `value`: Value of the basic variable in this row.
    /// * `epsilon`: Fractional parts within this distance of an integer are treated as integral.
    ///
    /// # Return value
    ///
    /// `InvalidCut` if the value is integral. `Infeasible` if no coefficient is non zero: the row
    /// then reads `0 >= f_0` with `f_0 > 0`, so no integral solution exists.
    pub fn from_row(
        form: &CanonicalForm,
        basis: &Basis,
        source_row: usize,
        row: &[f64],
        value: f64,
        epsilon: f64,
    ) -> Result<Self, Error> {
        debug_assert_eq!(row.len(), form.nr_columns());

        let f0 = fraction(value, epsilon);
        if f0 == 0f64 {
            return Err(Error::InvalidCut(format!("value {} in row {} is integral", value, source_row + 1)));
        }

        let non_basic = basis.non_basic();
        let pure = non_basic.iter()
            .filter(|&&j| row[j].abs() > epsilon)
            .all(|&j| form.is_integral(j));

        let mut coefficients = vec![0f64; form.nr_columns()];
        for &j in &non_basic {
            let a = row[j];
            if a.abs() <= epsilon {
                continue;
            }
            coefficients[j] = if pure {
                fraction(a, epsilon)
            } else if form.is_integral(j) {
                let f = fraction(a, epsilon);
                if f <= f0 { f / f0 } else { (1f64 - f) / (1f64 - f0) }
            } else if a >= 0f64 {
                a / f0
            } else {
                -a / (1f64 - f0)
            };
        }

        if coefficients.iter().all(|&coefficient| coefficient.abs() <= epsilon) {
            return Err(Error::Infeasible);
        }

        let (rhs, kind) = if pure { (f0, CutKind::Fractional) } else { (1f64, CutKind::MixedInteger) };
        Ok(Self { coefficients, rhs, source_row, kind })
    }
}

/// Fractional part of a value, zero if it is within `epsilon` of an integer.
pub(crate) fn fraction(value: f64, epsilon: f64) -> f64 {
    let fraction = value - value.floor();
    if fraction <= epsilon || fraction >= 1f64 - epsilon {
        0f64
    } else {
        fraction
    }
}
