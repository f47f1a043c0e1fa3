// Solver adapter: the seam between the roster model and an external
// integer-programming engine.

use good_lp::{
    constraint, microlp, variable, Expression, ProblemVariables, ResolutionError, Solution,
    SolverModel, Variable,
};
use tracing::{debug, trace};

use crate::error::SolverError;
use crate::program::{Comparison, LinearConstraint, LinearProgram};

/// Slack allowed when checking constraints against a returned assignment.
pub const FEASIBILITY_TOLERANCE: f64 = 1e-6;

/// Result of a single solve.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverOutcome {
    /// 0/1 value per variable (indexed by `VarId`) and the objective value.
    Optimal { values: Vec<f64>, objective: f64 },
    Infeasible,
}

/// An engine that maximizes a binary linear program.
pub trait SolverAdapter {
    fn solve(&self, program: &LinearProgram) -> Result<SolverOutcome, SolverError>;
}

impl<S: SolverAdapter + ?Sized> SolverAdapter for &S {
    fn solve(&self, program: &LinearProgram) -> Result<SolverOutcome, SolverError> {
        (**self).solve(program)
    }
}

// ---------------------------------------------------------------------------
// microlp backend
// ---------------------------------------------------------------------------

/// Pure-Rust branch-and-bound backend via `good_lp`'s `microlp` solver.
///
/// A fresh backend problem is created per call; no state survives between
/// solves.
#[derive(Debug, Clone, Copy, Default)]
pub struct MicroLpSolver;

impl MicroLpSolver {
    pub fn new() -> Self {
        MicroLpSolver
    }
}

impl SolverAdapter for MicroLpSolver {
    fn solve(&self, program: &LinearProgram) -> Result<SolverOutcome, SolverError> {
        // Constraints with no terms are decided here: the backend cannot
        // express them and an unsatisfiable one means the model is infeasible.
        let mut active = Vec::with_capacity(program.constraints.len());
        for c in &program.constraints {
            if !c.expr.is_empty() {
                active.push(c);
            } else if !c.is_satisfied_by(&[], FEASIBILITY_TOLERANCE) {
                debug!("constraint `{}` has no eligible players; model infeasible", c.name);
                return Ok(SolverOutcome::Infeasible);
            }
        }

        if program.num_variables() == 0 {
            return Ok(SolverOutcome::Optimal {
                values: Vec::new(),
                objective: 0.0,
            });
        }

        let mut problem = ProblemVariables::new();
        let xs: Vec<Variable> = program
            .variable_names
            .iter()
            .map(|name| problem.add(variable().binary().name(name.as_str())))
            .collect();

        let objective: Expression = program
            .objective
            .terms()
            .iter()
            .map(|&(var, coef)| coef * xs[var.index()])
            .sum();

        let mut model = problem.maximise(objective).using(microlp);
        for c in active {
            trace!("adding {}", c);
            model = model.with(to_backend(c, &xs));
        }

        let solution = match model.solve() {
            Ok(solution) => solution,
            Err(ResolutionError::Infeasible) => return Ok(SolverOutcome::Infeasible),
            Err(ResolutionError::Unbounded) => return Err(SolverError::Unbounded),
            Err(e) => return Err(SolverError::Backend(e.to_string())),
        };

        let values: Vec<f64> = xs
            .iter()
            .map(|&x| if solution.value(x) > 0.5 { 1.0 } else { 0.0 })
            .collect();

        if let Some(violated) = program
            .constraints
            .iter()
            .find(|c| !c.is_satisfied_by(&values, FEASIBILITY_TOLERANCE))
        {
            return Err(SolverError::Backend(format!(
                "rounded assignment violates `{}`",
                violated.name
            )));
        }

        let objective = program.objective.evaluate(&values);
        Ok(SolverOutcome::Optimal { values, objective })
    }
}

fn to_backend(c: &LinearConstraint, xs: &[Variable]) -> good_lp::Constraint {
    let lhs: Expression = c
        .expr
        .terms()
        .iter()
        .map(|&(var, coef)| coef * xs[var.index()])
        .sum();
    let rhs = c.rhs;

    match c.cmp {
        Comparison::Eq => constraint!(lhs == rhs),
        Comparison::Le => constraint!(lhs <= rhs),
        Comparison::Ge => constraint!(lhs >= rhs),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
