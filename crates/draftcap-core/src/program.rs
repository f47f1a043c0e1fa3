// Solver-neutral linear program: binary variables, linear constraints, and a
// maximize objective. The solver adapter translates this into a backend model.

use std::fmt;

/// Index of a decision variable within a `LinearProgram`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(pub(crate) usize);

impl VarId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Sum of `coefficient * variable` terms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    terms: Vec<(VarId, f64)>,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_term(&mut self, var: VarId, coefficient: f64) {
        self.terms.push((var, coefficient));
    }

    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Evaluate against a full 0/1 (or fractional) assignment.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(var, coef)| coef * values.get(var.0).copied().unwrap_or(0.0))
            .sum()
    }
}

impl FromIterator<(VarId, f64)> for LinearExpr {
    fn from_iter<I: IntoIterator<Item = (VarId, f64)>>(iter: I) -> Self {
        LinearExpr {
            terms: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Le,
    Ge,
}

impl Comparison {
    /// Whether `lhs <cmp> rhs` holds within `tolerance`.
    pub fn holds(self, lhs: f64, rhs: f64, tolerance: f64) -> bool {
        match self {
            Comparison::Eq => (lhs - rhs).abs() <= tolerance,
            Comparison::Le => lhs <= rhs + tolerance,
            Comparison::Ge => lhs >= rhs - tolerance,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Comparison::Eq => "==",
            Comparison::Le => "<=",
            Comparison::Ge => ">=",
        }
    }
}

/// `expr <cmp> rhs`, tagged with a name for logging.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    pub name: String,
    pub expr: LinearExpr,
    pub cmp: Comparison,
    pub rhs: f64,
}

impl LinearConstraint {
    pub fn new(name: impl Into<String>, expr: LinearExpr, cmp: Comparison, rhs: f64) -> Self {
        LinearConstraint {
            name: name.into(),
            expr,
            cmp,
            rhs,
        }
    }

    pub fn is_satisfied_by(&self, values: &[f64], tolerance: f64) -> bool {
        self.cmp.holds(self.expr.evaluate(values), self.rhs, tolerance)
    }
}

impl fmt::Display for LinearConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} terms {} {}",
            self.name,
            self.expr.terms().len(),
            self.cmp.symbol(),
            self.rhs
        )
    }
}

/// A binary integer program with a maximize objective.
#[derive(Debug, Clone, Default)]
pub struct LinearProgram {
    pub variable_names: Vec<String>,
    pub constraints: Vec<LinearConstraint>,
    pub objective: LinearExpr,
}

impl LinearProgram {
    pub fn num_variables(&self) -> usize {
        self.variable_names.len()
    }
}
