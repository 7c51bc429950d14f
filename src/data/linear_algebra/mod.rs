//! # Linear algebra primitives
//!
//! Dense linear algebra primitives shared by all solvers: a row-major matrix, tolerance helpers and
//! a rank computation used to drop redundant constraints before the first phase.

pub mod matrix;

/// Default tolerance below which a value is considered zero.
pub const EPSILON: f64 = 1e-9;

/// Whether a value is zero, up to a tolerance.
#[inline]
pub fn is_zero(value: f64, epsilon: f64) -> bool {
    value.abs() <= epsilon
}

/// Inner product of two dense vectors of equal length.
#[inline]
pub fn inner_product(left: &[f64], right: &[f64]) -> f64 {
    debug_assert_eq!(left.len(), right.len());

    left.iter().zip(right).map(|(l, r)| l * r).sum()
}

/// A matrix or linear program either has full rank, or is rank deficient.
///
/// In case it is rank deficient, a sorted, deduplicated list of (row) indices is provided, that
/// when removed, makes the matrix full rank.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Rank {
    #[allow(missing_docs)]
    Full,
    /// The `Vec<usize>` is sorted and contains no duplicate values.
    Deficient(Vec<usize>),
}

impl Rank {
    /// Rows that should be removed to attain full rank.
    pub fn redundant_rows(&self) -> &[usize] {
        match self {
            Rank::Full => &[],
            Rank::Deficient(rows) => rows,
        }
    }
}

#[cfg(test)]
mod test {
    use crate::data::linear_algebra::{inner_product, is_zero};

    #[test]
    fn zero_with_tolerance() {
        assert!(is_zero(1e-12, 1e-9));
        assert!(is_zero(-1e-12, 1e-9));
        assert!(!is_zero(1e-6, 1e-9));
    }

    #[test]
    fn inner() {
        assert_eq!(inner_product(&[1f64, 2f64, 3f64], &[4f64, -1f64, 0.5f64]), 3.5f64);
        assert_eq!(inner_product(&[], &[]), 0f64);
    }
}
