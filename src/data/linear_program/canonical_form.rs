//! # Canonical form
//!
//! A linear program in `CanonicalForm` has only equality constraints and only non negative
//! variables, and it is always a minimization problem:
//!
//! ```text
//! min c^T x
//! s.t. A x = b
//!        x >= 0
//! ```
//!
//! The columns are grouped: first the structural columns that the original variables expand to,
//! then one slack (or surplus) column for each inequality, in constraint order.
use std::collections::HashSet;

use cumsum::cumsum_array_owned;
use enum_map::{Enum, enum_map, EnumMap};

use crate::data::linear_algebra::EPSILON;
use crate::data::linear_algebra::matrix::DenseMatrix;
use crate::data::linear_program::elements::{ConstraintType, Objective, VariableKind};
use crate::data::linear_program::problem::Problem;
use crate::error::{Error, Result};

/// A linear program with equality constraints over non negative variables.
///
/// Never mutated after creation; extending it with rows yields a new instance, such that forms
/// derived from a common ancestor are independent.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalForm {
    /// Direction of the original problem, used to report objective values.
    objective: Objective,
    /// Minimization objective, one value per column.
    cost: Vec<f64>,
    /// Constraint matrix, one row per constraint and one column per canonical variable.
    constraints: DenseMatrix,
    b: Vec<f64>,
    /// Type of each row before slacks were introduced.
    relations: Vec<ConstraintType>,
    /// The slack or surplus column of each row, if the row had one.
    slack_columns: Vec<Option<usize>>,
    /// Whether each column can only attain integral values in an integer solution.
    integral: Vec<bool>,
    /// Indices that separate the column groups.
    column_group_end: EnumMap<ColumnGroup, usize>,

    variable_map: VariableMap,
}

/// Indexing within the different column types.
#[derive(Enum, Debug, Copy, Clone, Eq, PartialEq)]
pub enum ColumnGroup {
    /// Columns that an original variable expands to.
    Structural,
    /// Slacks `s` for a row like `<a, x> + s = b` or surplus for `<a, x> - s = b`.
    Slack,
}

/// For each original variable, the canonical columns it expands to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableMap {
    variables: Vec<MappedVariable>,
}

/// An original variable and its canonical columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedVariable {
    /// Name in the original problem.
    pub name: String,
    /// Domain in the original problem.
    pub kind: VariableKind,
    /// One column, or a `(plus, minus)` pair for unrestricted variables.
    pub columns: Vec<usize>,
}

impl VariableMap {
    /// All mapped variables, in original order.
    pub fn variables(&self) -> &[MappedVariable] {
        &self.variables
    }

    /// Original variable and position within its columns for a structural column.
    fn find(&self, j: usize) -> Option<(&MappedVariable, usize)> {
        self.variables.iter().find_map(|variable| {
            variable.columns.iter()
                .position(|&column| column == j)
                .map(|position| (variable, position))
        })
    }

    fn nr_columns(&self) -> usize {
        self.variables.iter().map(|variable| variable.columns.len()).sum()
    }
}

impl CanonicalForm {
    /// Convert a problem into canonical form.
    ///
    /// # Arguments
    ///
    /// * `problem`: Problem to convert. It is validated first.
    ///
    /// # Return value
    ///
    /// Fails with `DimensionMismatch` or `NonFiniteValue` if the problem is malformed, and with
    /// `AmbiguousVariableName` if two canonical columns would be named identically.
    pub fn new(problem: &Problem) -> Result<Self> {
        problem.validate()?;

        let sign = problem.objective.sign();

        // Structural columns
        let mut variables = Vec::with_capacity(problem.nr_variables());
        // (original variable, factor) for each structural column
        let mut structural = Vec::new();
        for (j, variable) in problem.variables.iter().enumerate() {
            let first = structural.len();
            match variable.kind {
                VariableKind::NonPositive => structural.push((j, -1f64)),
                VariableKind::Unrestricted => {
                    structural.push((j, 1f64));
                    structural.push((j, -1f64));
                }
                VariableKind::NonNegative | VariableKind::Integer | VariableKind::Binary => {
                    structural.push((j, 1f64));
                }
            }
            variables.push(MappedVariable {
                name: variable.name.clone(),
                kind: variable.kind,
                columns: (first..structural.len()).collect(),
            });
        }
        let nr_structural = structural.len();

        // Slack columns
        let nr_slacks = problem.constraints.iter()
            .filter(|constraint| constraint.relation != ConstraintType::Equal)
            .count();
        let nr_columns = nr_structural + nr_slacks;

        let mut cost = structural.iter()
            .map(|&(j, factor)| sign * factor * problem.cost[j])
            .collect::<Vec<_>>();
        cost.resize(nr_columns, 0f64);

        let mut rows = Vec::with_capacity(problem.nr_constraints());
        let mut slack_columns = Vec::with_capacity(problem.nr_constraints());
        let mut next_slack = nr_structural;
        for constraint in &problem.constraints {
            let mut row = structural.iter()
                .map(|&(j, factor)| factor * constraint.coefficients[j])
                .collect::<Vec<_>>();
            row.resize(nr_columns, 0f64);
            match constraint.relation.slack_coefficient::<f64>() {
                Some(coefficient) => {
                    row[next_slack] = coefficient;
                    slack_columns.push(Some(next_slack));
                    next_slack += 1;
                }
                None => slack_columns.push(None),
            }
            rows.push(row);
        }
        debug_assert_eq!(next_slack, nr_columns);

        let mut integral = structural.iter()
            .map(|&(j, _)| problem.variables[j].kind.is_integer())
            .collect::<Vec<_>>();
        for (i, constraint) in problem.constraints.iter().enumerate() {
            if slack_columns[i].is_some() {
                integral.push(is_integral_row(&rows[i][..nr_structural], constraint.rhs, &integral[..nr_structural]));
            }
        }

        let cumulative = cumsum_array_owned([nr_structural, nr_slacks]);
        let column_group_end = enum_map! {
            ColumnGroup::Structural => cumulative[0],
            ColumnGroup::Slack      => cumulative[1],
        };

        let form = Self {
            objective: problem.objective,
            cost,
            constraints: DenseMatrix::new(rows, nr_columns),
            b: problem.constraints.iter().map(|constraint| constraint.rhs).collect(),
            relations: problem.constraints.iter().map(|constraint| constraint.relation).collect(),
            slack_columns,
            integral,
            column_group_end,
            variable_map: VariableMap { variables },
        };
        form.check_names()?;

        debug_assert_eq!(form.variable_map.nr_columns(), form.nr_structural());
        debug_assert_eq!(form.nr_columns(), form.nr_structural() + form.nr_slacks());

        Ok(form)
    }

    /// Create a new form with one extra row.
    ///
    /// Existing rows get a zero in the new slack column (if any), and the objective gains a zero.
    ///
    /// # Arguments
    ///
    /// * `coefficients`: One value for each column of this form.
    /// * `relation`: Type of the new row. Inequalities get a fresh slack or surplus column.
    /// * `rhs`: Right hand side of the new row.
    pub fn with_constraint(&self, coefficients: Vec<f64>, relation: ConstraintType, rhs: f64) -> Result<Self> {
        if coefficients.len() != self.nr_columns() {
            return Err(Error::dimension("added constraint", self.nr_columns(), coefficients.len()));
        }
        if coefficients.iter().any(|value| !value.is_finite()) || !rhs.is_finite() {
            return Err(Error::NonFiniteValue("added constraint".to_string()));
        }

        let mut extended = self.clone();
        let integral_row = is_integral_row(&coefficients, rhs, &self.integral);
        let mut row = coefficients;
        match relation.slack_coefficient::<f64>() {
            Some(coefficient) => {
                let column = extended.nr_columns();
                extended.constraints.extend_with_zero_columns(1);
                row.push(coefficient);
                extended.cost.push(0f64);
                extended.integral.push(integral_row);
                extended.slack_columns.push(Some(column));
                extended.column_group_end[ColumnGroup::Slack] += 1;
            }
            None => extended.slack_columns.push(None),
        }
        extended.constraints.push_row(row);
        extended.b.push(rhs);
        extended.relations.push(relation);
        extended.check_names()?;

        Ok(extended)
    }

    /// Create a new form with an `x <= 1` row for every binary column.
    pub fn with_binary_upper_bounds(&self) -> Result<Self> {
        self.binary_columns().into_iter()
            .try_fold(self.clone(), |form, j| {
                let mut coefficients = vec![0f64; form.nr_columns()];
                coefficients[j] = 1f64;
                form.with_constraint(coefficients, ConstraintType::Less, 1f64)
            })
    }

    /// Name of a canonical column.
    ///
    /// The original name for variables that map to a single column, `name+` and `name-` for the
    /// two halves of an unrestricted variable and `s<k>` for the `k`'th slack column.
    pub fn variable_name(&self, j: usize) -> String {
        debug_assert!(j < self.nr_columns());

        match self.column_group(j) {
            ColumnGroup::Structural => match self.variable_map.find(j) {
                Some((variable, position)) if variable.kind == VariableKind::Unrestricted => {
                    let suffix = if position == 0 { '+' } else { '-' };
                    format!("{}{}", variable.name, suffix)
                }
                Some((variable, _)) => variable.name.clone(),
                None => format!("x{}", j + 1),
            },
            ColumnGroup::Slack => format!("s{}", j - self.nr_structural() + 1),
        }
    }

    /// All column names, in column order.
    pub fn variable_names(&self) -> Vec<String> {
        (0..self.nr_columns()).map(|j| self.variable_name(j)).collect()
    }

    fn check_names(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.nr_columns());
        for name in self.variable_names() {
            if !seen.insert(name.clone()) {
                return Err(Error::AmbiguousVariableName(name));
            }
        }

        Ok(())
    }

    /// Group that a column belongs to.
    pub fn column_group(&self, j: usize) -> ColumnGroup {
        debug_assert!(j < self.nr_columns());

        if j < self.column_group_end[ColumnGroup::Structural] {
            ColumnGroup::Structural
        } else {
            ColumnGroup::Slack
        }
    }

    /// Values of the original variables given values of the canonical columns.
    ///
    /// Non positive variables are negated back, unrestricted variables are `plus - minus`.
    pub fn original_values(&self, x: &[f64]) -> Vec<f64> {
        self.variable_map.variables.iter()
            .map(|variable| match (variable.kind, variable.columns.as_slice()) {
                (VariableKind::Unrestricted, &[plus, minus]) => x[plus] - x[minus],
                (VariableKind::NonPositive, &[column]) => -x[column],
                (_, columns) => columns.first().map_or(0f64, |&column| x[column]),
            })
            .collect()
    }

    /// Canonical objective value `c^T x`.
    pub fn objective_value(&self, x: &[f64]) -> f64 {
        self.cost.iter().zip(x).map(|(c, v)| c * v).sum()
    }

    /// Convert a canonical (minimization) objective value into the original sense.
    pub fn reported_objective(&self, canonical_value: f64) -> f64 {
        self.objective.sign() * canonical_value
    }

    /// Whether `x` satisfies `Ax = b` and `x >= 0` up to a tolerance.
    pub fn is_feasible(&self, x: &[f64], epsilon: f64) -> bool {
        x.len() == self.nr_columns()
            && x.iter().all(|&value| value >= -epsilon)
            && self.constraints.multiply_column(x).iter().zip(&self.b)
                .all(|(lhs, rhs)| (lhs - rhs).abs() <= epsilon * rhs.abs().max(1f64))
    }

    /// Columns that belong to binary variables.
    pub fn binary_columns(&self) -> Vec<usize> {
        self.variable_map.variables.iter()
            .filter(|variable| variable.kind == VariableKind::Binary)
            .flat_map(|variable| variable.columns.iter().copied())
            .collect()
    }

    /// Structural columns that need to be integral.
    pub fn integer_columns(&self) -> Vec<usize> {
        (0..self.nr_structural()).filter(|&j| self.integral[j]).collect()
    }

    /// Whether any structural column needs to be integral.
    pub fn has_integer_columns(&self) -> bool {
        self.integral[..self.nr_structural()].iter().any(|&integral| integral)
    }

    /// Whether column `j` attains an integral value in every integer solution.
    pub fn is_integral(&self, j: usize) -> bool {
        self.integral[j]
    }

    /// Direction of the original problem.
    pub fn objective(&self) -> Objective {
        self.objective
    }

    /// Minimization cost vector.
    pub fn cost(&self) -> &[f64] {
        &self.cost
    }

    /// Constraint matrix.
    pub fn constraints(&self) -> &DenseMatrix {
        &self.constraints
    }

    /// Right hand side.
    pub fn b(&self) -> &[f64] {
        &self.b
    }

    /// Original relation of row `i`.
    pub fn relation(&self, i: usize) -> ConstraintType {
        self.relations[i]
    }

    /// Slack or surplus column of row `i`.
    pub fn slack_column(&self, i: usize) -> Option<usize> {
        self.slack_columns[i]
    }

    /// Mapping from the original variables to the columns.
    pub fn variable_map(&self) -> &VariableMap {
        &self.variable_map
    }

    /// Number of structural columns.
    pub fn nr_structural(&self) -> usize {
        self.column_group_end[ColumnGroup::Structural]
    }

    /// Number of slack and surplus columns.
    pub fn nr_slacks(&self) -> usize {
        self.column_group_end[ColumnGroup::Slack] - self.column_group_end[ColumnGroup::Structural]
    }

    /// Total number of columns.
    pub fn nr_columns(&self) -> usize {
        self.column_group_end[ColumnGroup::Slack]
    }

    /// Number of constraints.
    pub fn nr_rows(&self) -> usize {
        self.constraints.nr_rows()
    }
}

impl TryFrom<&Problem> for CanonicalForm {
    type Error = Error;

    fn try_from(problem: &Problem) -> Result<Self> {
        Self::new(problem)
    }
}

/// Whether the slack of a row is integral in any integer solution.
///
/// That is the case if the row only has integer coefficients on integral columns, and an integer
/// right hand side.
fn is_integral_row(coefficients: &[f64], rhs: f64, integral: &[bool]) -> bool {
    let is_integer = |value: f64| (value - value.round()).abs() <= EPSILON;

    is_integer(rhs) && coefficients.iter().zip(integral).all(|(&coefficient, &integral)| {
        coefficient == 0f64 || (integral && is_integer(coefficient))
    })
}
