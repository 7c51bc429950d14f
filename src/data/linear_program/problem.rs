//! # Problem description
//!
//! The structured input of the solvers: an objective, a list of constraints and a list of
//! variables. Parsing some textual format into a `Problem` is the responsibility of the caller.
use crate::data::linear_program::elements::{ConstraintType, Objective, VariableKind};
use crate::error::{Error, Result};

/// A linear program, possibly with integrality requirements on some of its variables.
///
/// All vectors are dense and indexed by variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    /// Direction of optimization.
    pub objective: Objective,
    /// Objective coefficients, one per variable.
    pub cost: Vec<f64>,
    /// Constraints in the order they were specified.
    pub constraints: Vec<Constraint>,
    /// Variables in the order they were specified.
    pub variables: Vec<Variable>,
}

/// A single row `<coefficients, x> (relation) rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// One coefficient per variable.
    pub coefficients: Vec<f64>,
    /// Type of (in)equality.
    pub relation: ConstraintType,
    /// Right hand side.
    pub rhs: f64,
}

/// A named variable with its domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    /// Name, used to name the canonical columns.
    pub name: String,
    /// Domain.
    pub kind: VariableKind,
}

impl Problem {
    /// Create a problem without constraints.
    ///
    /// Variables are non negative and named `x1`, `x2`, ... .
    ///
    /// # Arguments
    ///
    /// * `objective`: Direction of optimization.
    /// * `cost`: Objective coefficient for each variable; its length determines the number of
    /// variables.
    #[must_use]
    pub fn new(objective: Objective, cost: Vec<f64>) -> Self {
        let variables = (1..=cost.len())
            .map(|j| Variable { name: format!("x{}", j), kind: VariableKind::default() })
            .collect();

        Self { objective, cost, constraints: Vec::new(), variables }
    }

    /// Append a constraint.
    #[must_use]
    pub fn with_constraint(mut self, coefficients: Vec<f64>, relation: ConstraintType, rhs: f64) -> Self {
        self.constraints.push(Constraint { coefficients, relation, rhs });
        self
    }

    /// Change the domain of all variables at once.
    #[must_use]
    pub fn with_variable_kinds(mut self, kinds: &[VariableKind]) -> Self {
        debug_assert_eq!(kinds.len(), self.variables.len());

        for (variable, &kind) in self.variables.iter_mut().zip(kinds) {
            variable.kind = kind;
        }
        self
    }

    /// Change the domain of a single variable.
    #[must_use]
    pub fn with_variable_kind(mut self, j: usize, kind: VariableKind) -> Self {
        self.variables[j].kind = kind;
        self
    }

    /// Rename variable `j`.
    #[must_use]
    pub fn with_name(mut self, j: usize, name: impl Into<String>) -> Self {
        self.variables[j].name = name.into();
        self
    }

    /// Number of variables.
    pub fn nr_variables(&self) -> usize {
        self.variables.len()
    }

    /// Number of constraints.
    pub fn nr_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Whether any variable is integer or binary.
    pub fn has_integer_variables(&self) -> bool {
        self.variables.iter().any(|variable| variable.kind.is_integer())
    }

    /// Check the dimensions and values of this problem.
    ///
    /// # Return value
    ///
    /// `DimensionMismatch` when the objective, a constraint or the variable list disagree on the
    /// number of variables, `NonFiniteValue` when a NaN or infinity appears anywhere.
    pub fn validate(&self) -> Result<()> {
        let n = self.cost.len();
        if self.variables.len() != n {
            return Err(Error::dimension("variable list", n, self.variables.len()));
        }
        if self.cost.iter().any(|value| !value.is_finite()) {
            return Err(Error::NonFiniteValue("objective".to_string()));
        }

        for (i, constraint) in self.constraints.iter().enumerate() {
            if constraint.coefficients.len() != n {
                return Err(Error::dimension(format!("constraint {}", i + 1), n, constraint.coefficients.len()));
            }
            if constraint.coefficients.iter().any(|value| !value.is_finite()) || !constraint.rhs.is_finite() {
                return Err(Error::NonFiniteValue(format!("constraint {}", i + 1)));
            }
        }

        Ok(())
    }

    /// Value of the objective function at a point in the original variable space.
    pub fn objective_value(&self, x: &[f64]) -> f64 {
        self.cost.iter().zip(x).map(|(c, v)| c * v).sum()
    }

    /// Whether a point in the original variable space satisfies all constraints and domains.
    pub fn is_feasible(&self, x: &[f64], epsilon: f64) -> bool {
        let domains = self.variables.iter().zip(x).all(|(variable, &value)| match variable.kind {
            VariableKind::NonNegative => value >= -epsilon,
            VariableKind::NonPositive => value <= epsilon,
            VariableKind::Unrestricted => true,
            VariableKind::Integer => value >= -epsilon && (value - value.round()).abs() <= epsilon,
            VariableKind::Binary => value.abs() <= epsilon || (value - 1f64).abs() <= epsilon,
        });

        domains && self.constraints.iter().all(|constraint| {
            let lhs = constraint.coefficients.iter().zip(x).map(|(a, v)| a * v).sum();
            constraint.relation.is_satisfied(lhs, constraint.rhs, epsilon)
        })
    }
}

#[cfg(test)]
mod test {
    use crate::data::linear_program::elements::{ConstraintType, Objective, VariableKind};
    use crate::data::linear_program::problem::Problem;
    use crate::error::Error;

    #[test]
    fn default_names() {
        let problem = Problem::new(Objective::Minimize, vec![1f64, 2f64, 3f64]);
        let names = problem.variables.iter().map(|v| v.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["x1", "x2", "x3"]);
        assert!(problem.variables.iter().all(|v| v.kind == VariableKind::NonNegative));
    }

    #[test]
    fn validate() {
        let problem = Problem::new(Objective::Maximize, vec![1f64, 1f64])
            .with_constraint(vec![1f64, 1f64], ConstraintType::Less, 4f64);
        assert_eq!(problem.validate(), Ok(()));

        let problem = problem.with_constraint(vec![1f64], ConstraintType::Less, 4f64);
        assert!(matches!(problem.validate(), Err(Error::DimensionMismatch { expected: 2, found: 1, .. })));

        let problem = Problem::new(Objective::Maximize, vec![1f64, f64::NAN]);
        assert!(matches!(problem.validate(), Err(Error::NonFiniteValue(_))));

        let mut problem = Problem::new(Objective::Maximize, vec![1f64, 1f64]);
        problem.variables.pop();
        assert!(matches!(problem.validate(), Err(Error::DimensionMismatch { .. })));
    }

    #[test]
    fn feasibility() {
        let problem = Problem::new(Objective::Maximize, vec![2f64, 3f64])
            .with_constraint(vec![1f64, 1f64], ConstraintType::Less, 3.5f64)
            .with_variable_kinds(&[VariableKind::Integer, VariableKind::Integer]);
        assert!(problem.is_feasible(&[0f64, 3f64], 1e-9));
        assert!(!problem.is_feasible(&[0f64, 3.5f64], 1e-9));
        assert!(!problem.is_feasible(&[1f64, 3f64], 1e-9));
        assert_eq!(problem.objective_value(&[0f64, 3f64]), 9f64);
    }
}
