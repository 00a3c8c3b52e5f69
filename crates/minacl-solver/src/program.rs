//! Backend-neutral 0/1 integer programs.
//!
//! An [`IntegerProgram`] is a set of named binary variables, a linear
//! objective to minimize, and named linear constraints. Any oracle that can
//! solve such a program can be plugged into the pipeline.

use minacl_core::{Error, Result};
use std::fmt;

/// Handle to a variable of an [`IntegerProgram`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(pub(crate) usize);

impl VarId {
    /// Position of the variable in the program.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Linear expression `Σ coefficient · variable`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinearExpr {
    terms: Vec<(VarId, f64)>,
}

impl LinearExpr {
    /// Creates an empty expression.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of variables with unit coefficients.
    pub fn sum<I: IntoIterator<Item = VarId>>(vars: I) -> Self {
        Self {
            terms: vars.into_iter().map(|v| (v, 1.0)).collect(),
        }
    }

    /// Adds a term.
    pub fn add(mut self, var: VarId, coefficient: f64) -> Self {
        self.terms.push((var, coefficient));
        self
    }

    /// Adds every term of another expression, scaled.
    pub fn add_scaled(mut self, other: &LinearExpr, factor: f64) -> Self {
        self.terms
            .extend(other.terms.iter().map(|&(v, c)| (v, c * factor)));
        self
    }

    /// Terms, possibly with repeated variables.
    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }

    /// Returns `true` if there are no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Evaluates the expression for a full assignment.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(v, c)| c * values.get(v.0).copied().unwrap_or(0.0))
            .sum()
    }
}

/// Relation between a constraint's expression and its right-hand side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparison {
    /// `expr = rhs`
    Equal,
    /// `expr ≤ rhs`
    LessOrEqual,
    /// `expr ≥ rhs`
    GreaterOrEqual,
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "="),
            Self::LessOrEqual => write!(f, "<="),
            Self::GreaterOrEqual => write!(f, ">="),
        }
    }
}

/// One named linear constraint.
#[derive(Clone, Debug, PartialEq)]
pub struct Constraint {
    /// Name used in diagnostics.
    pub name: String,
    /// Left-hand side.
    pub expr: LinearExpr,
    /// Comparison operator.
    pub comparison: Comparison,
    /// Right-hand side.
    pub rhs: f64,
}

impl Constraint {
    /// Returns whether an assignment satisfies the constraint, within `tolerance`.
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.expr.evaluate(values);
        match self.comparison {
            Comparison::Equal => (lhs - self.rhs).abs() <= tolerance,
            Comparison::LessOrEqual => lhs <= self.rhs + tolerance,
            Comparison::GreaterOrEqual => lhs >= self.rhs - tolerance,
        }
    }
}

/// A minimization problem over binary variables.
#[derive(Clone, Debug, Default)]
pub struct IntegerProgram {
    name: String,
    variables: Vec<String>,
    constraints: Vec<Constraint>,
    objective: LinearExpr,
}

impl IntegerProgram {
    /// Creates an empty program.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Program name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a binary variable.
    pub fn add_binary(&mut self, name: impl Into<String>) -> VarId {
        self.variables.push(name.into());
        VarId(self.variables.len() - 1)
    }

    /// Adds a constraint.
    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        expr: LinearExpr,
        comparison: Comparison,
        rhs: f64,
    ) {
        self.constraints.push(Constraint {
            name: name.into(),
            expr,
            comparison,
            rhs,
        });
    }

    /// Replaces the objective (always minimized).
    pub fn set_objective(&mut self, objective: LinearExpr) {
        self.objective = objective;
    }

    /// Variable names, indexed by [`VarId::index`].
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Name of one variable.
    pub fn variable_name(&self, var: VarId) -> &str {
        self.variables.get(var.0).map(String::as_str).unwrap_or("?")
    }

    /// Constraints in insertion order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// The objective.
    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    /// Number of variables.
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Rejects unknown variables and non-finite numbers.
    pub fn validate(&self) -> Result<()> {
        let check_expr = |what: &str, expr: &LinearExpr| -> Result<()> {
            for &(var, coefficient) in expr.terms() {
                if var.0 >= self.variables.len() {
                    return Err(Error::invalid_model(format!(
                        "{what} references unknown variable #{}",
                        var.0
                    )));
                }
                if !coefficient.is_finite() {
                    return Err(Error::invalid_model(format!(
                        "{what} has non-finite coefficient for {}",
                        self.variables[var.0]
                    )));
                }
            }
            Ok(())
        };

        check_expr("objective", &self.objective)?;
        for constraint in &self.constraints {
            check_expr(&constraint.name, &constraint.expr)?;
            if !constraint.rhs.is_finite() {
                return Err(Error::invalid_model(format!(
                    "{} has non-finite right-hand side",
                    constraint.name
                )));
            }
        }
        Ok(())
    }
}
