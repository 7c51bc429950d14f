//! # Building blocks to describe linear programs.
use std::fmt;
use std::ops::{Neg, Not};

use num_traits::One;

/// A `Constraint` is a type of (in)equality.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ConstraintType {
    Equal,
    Greater,
    Less,
}

impl ConstraintType {
    /// Coefficient of the slack column this constraint type introduces in canonical form.
    ///
    /// # Return value
    ///
    /// `+1` for `<=`, `-1` for `>=` and nothing for an equality.
    #[must_use]
    pub fn slack_coefficient<F: One + Neg<Output = F>>(self) -> Option<F> {
        match self {
            ConstraintType::Less => Some(F::one()),
            ConstraintType::Greater => Some(-F::one()),
            ConstraintType::Equal => None,
        }
    }

    /// Whether `lhs (relation) rhs` holds, up to a tolerance.
    #[must_use]
    pub fn is_satisfied(self, lhs: f64, rhs: f64, epsilon: f64) -> bool {
        match self {
            ConstraintType::Less => lhs <= rhs + epsilon,
            ConstraintType::Greater => lhs >= rhs - epsilon,
            ConstraintType::Equal => (lhs - rhs).abs() <= epsilon,
        }
    }

    /// By how much `lhs (relation) rhs` is violated, zero if it is satisfied.
    #[must_use]
    pub fn violation(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            ConstraintType::Less => (lhs - rhs).max(0f64),
            ConstraintType::Greater => (rhs - lhs).max(0f64),
            ConstraintType::Equal => (lhs - rhs).abs(),
        }
    }
}

impl fmt::Display for ConstraintType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConstraintType::Equal => "=",
            ConstraintType::Greater => ">=",
            ConstraintType::Less => "<=",
        })
    }
}

/// Direction of a bound.
///
/// Is used more generally in the case where the three variants of the `ConstraintType` don't suit
/// the needs, for example when branching.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BoundDirection {
    /// In the case of a variable, `x >= b >= 0` (variables are rewritten to be nonnegative and
    /// branching can only bring that bound higher).
    Lower,
    /// In the case of a variable, `0 <= x <= b`.
    Upper,
}

impl BoundDirection {
    /// The constraint that materializes a bound of this direction as a row.
    #[must_use]
    pub fn constraint_type(self) -> ConstraintType {
        match self {
            BoundDirection::Lower => ConstraintType::Greater,
            BoundDirection::Upper => ConstraintType::Less,
        }
    }
}

impl Not for BoundDirection {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::Lower => Self::Upper,
            Self::Upper => Self::Lower,
        }
    }
}

/// Domain of a variable in a `Problem`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum VariableKind {
    /// Continuous, `x >= 0`.
    #[default]
    NonNegative,
    /// Continuous, `x <= 0`.
    NonPositive,
    /// Continuous, free.
    Unrestricted,
    /// Integral, `x >= 0`.
    Integer,
    /// Integral, `0 <= x <= 1`.
    Binary,
}

impl VariableKind {
    /// Whether values of this kind must be integral.
    #[must_use]
    pub fn is_integer(self) -> bool {
        matches!(self, VariableKind::Integer | VariableKind::Binary)
    }

    /// Number of canonical columns a variable of this kind expands to.
    #[must_use]
    pub fn nr_columns(self) -> usize {
        match self {
            VariableKind::Unrestricted => 2,
            _ => 1,
        }
    }
}

/// Direction of optimization.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Objective {
    Maximize,
    #[default]
    Minimize,
}

impl Objective {
    /// Factor relating the canonical (minimization) objective to this objective.
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            Objective::Maximize => -1f64,
            Objective::Minimize => 1f64,
        }
    }
}

impl Not for Objective {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Objective::Maximize => Objective::Minimize,
            Objective::Minimize => Objective::Maximize,
        }
    }
}

#[cfg(test)]
mod test {
    use crate::data::linear_program::elements::{BoundDirection, ConstraintType, Objective, VariableKind};

    #[test]
    fn slack_coefficients() {
        assert_eq!(ConstraintType::Less.slack_coefficient::<f64>(), Some(1f64));
        assert_eq!(ConstraintType::Greater.slack_coefficient::<f64>(), Some(-1f64));
        assert_eq!(ConstraintType::Equal.slack_coefficient::<f64>(), None);
    }

    #[test]
    fn satisfaction() {
        assert!(ConstraintType::Less.is_satisfied(3f64, 3f64, 1e-9));
        assert!(!ConstraintType::Less.is_satisfied(3.1f64, 3f64, 1e-9));
        assert!(ConstraintType::Greater.is_satisfied(3.1f64, 3f64, 1e-9));
        assert!(!ConstraintType::Equal.is_satisfied(3.1f64, 3f64, 1e-9));
        assert_eq!(ConstraintType::Greater.violation(1f64, 3f64), 2f64);
        assert_eq!(ConstraintType::Less.violation(1f64, 3f64), 0f64);
        assert_eq!(ConstraintType::Greater.to_string(), ">=");
    }

    #[test]
    fn directions() {
        assert_eq!(!BoundDirection::Lower, BoundDirection::Upper);
        assert_eq!(BoundDirection::Upper.constraint_type(), ConstraintType::Less);
        assert_eq!(!Objective::Maximize, Objective::Minimize);
        assert_eq!(Objective::default(), Objective::Minimize);
        assert_eq!(VariableKind::Unrestricted.nr_columns(), 2);
        assert!(VariableKind::Binary.is_integer());
        assert!(!VariableKind::NonPositive.is_integer());
    }
}
