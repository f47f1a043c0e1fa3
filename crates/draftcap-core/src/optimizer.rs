// Roster optimizer: BUILD -> CONSTRAIN -> SOLVE -> {OPTIMAL, INFEASIBLE}.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::constraints::{ConstraintSet, EvaluationMode};
use crate::error::OptimizerError;
use crate::ledger::{DraftStatus, PlayerKey, Position, RosterLedger};
use crate::model::{self, DecisionVariables};
use crate::program::LinearProgram;
use crate::solver::{SolverAdapter, SolverOutcome};

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// A player selected into the optimal roster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterEntry {
    pub name: String,
    pub position: Position,
    pub points: f64,
    pub bid: f64,
    pub status: DraftStatus,
}

/// An optimal roster and its projected point total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterResult {
    /// Σ points over the selected players.
    pub objective_value: f64,
    /// Selected players, highest bid first.
    pub roster: Vec<RosterEntry>,
    /// 0/1 decision per (player, position).
    #[serde(skip)]
    pub assignment: BTreeMap<PlayerKey, bool>,
}

impl RosterResult {
    pub fn total_bid(&self) -> f64 {
        self.roster.iter().map(|e| e.bid).sum()
    }

    pub fn contains(&self, name: &str, position: Position) -> bool {
        self.roster
            .iter()
            .any(|e| e.name == name && e.position == position)
    }
}

/// Tagged outcome of a single solve. Callers must handle both arms.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    Optimal(RosterResult),
    Infeasible,
}

impl SolveOutcome {
    pub fn objective_value(&self) -> Option<f64> {
        match self {
            SolveOutcome::Optimal(result) => Some(result.objective_value),
            SolveOutcome::Infeasible => None,
        }
    }

    /// Convert infeasibility into `OptimizerError::Infeasible`.
    pub fn into_result(self) -> Result<RosterResult, OptimizerError> {
        match self {
            SolveOutcome::Optimal(result) => Ok(result),
            SolveOutcome::Infeasible => Err(OptimizerError::Infeasible),
        }
    }
}

// ---------------------------------------------------------------------------
// Optimizer
// ---------------------------------------------------------------------------

pub struct Optimizer<S> {
    solver: S,
}

impl<S: SolverAdapter> Optimizer<S> {
    pub fn new(solver: S) -> Self {
        Optimizer { solver }
    }

    /// Solve for the best roster given a budget and the ledger's fixed
    /// statuses. `evaluation` forces the `evaluate` player in or out; `None`
    /// leaves them free.
    pub fn solve_roster(
        &self,
        budget: f64,
        ledger: &RosterLedger,
        evaluation: Option<EvaluationMode>,
    ) -> Result<SolveOutcome, OptimizerError> {
        // BUILD
        let vars = DecisionVariables::build(ledger);

        // CONSTRAIN
        let constraints = ConstraintSet::assemble(ledger, &vars, budget, evaluation)?;
        debug!(
            "model built: {} variables, {} constraints, budget ${budget:.2}, evaluation {:?}",
            vars.len(),
            constraints.len(),
            evaluation
        );

        let program = LinearProgram {
            variable_names: vars.names(),
            objective: model::objective(ledger, &vars),
            constraints: constraints.into_vec(),
        };

        // SOLVE
        match self.solver.solve(&program)? {
            SolverOutcome::Optimal { values, objective } => {
                debug!("solve optimal: objective {objective:.2}");
                Ok(SolveOutcome::Optimal(collect_roster(ledger, &vars, &values)))
            }
            SolverOutcome::Infeasible => {
                debug!("solve infeasible");
                Ok(SolveOutcome::Infeasible)
            }
        }
    }

    /// Optimal roster for `initial_budget` minus what drafted players cost.
    pub fn compute_optimal_roster(
        &self,
        initial_budget: f64,
        ledger: &RosterLedger,
    ) -> Result<RosterResult, OptimizerError> {
        let budget = ledger.remaining_budget(initial_budget);
        info!(
            "optimizing {} players: initial budget ${initial_budget:.0}, remaining ${budget:.0}",
            ledger.len()
        );
        let result = self.solve_roster(budget, ledger, None)?.into_result()?;
        info!(
            "optimal roster: {} players, {:.2} points, ${:.0} spent",
            result.roster.len(),
            result.objective_value,
            result.total_bid()
        );
        Ok(result)
    }
}

fn collect_roster(ledger: &RosterLedger, vars: &DecisionVariables, values: &[f64]) -> RosterResult {
    let mut assignment = BTreeMap::new();
    let mut roster = Vec::new();

    for (var, key) in vars.iter() {
        let selected = values.get(var.index()).is_some_and(|&v| v > 0.5);
        assignment.insert(key.clone(), selected);
        if !selected {
            continue;
        }
        if let Some(player) = ledger.get(key) {
            roster.push(RosterEntry {
                name: player.name.clone(),
                position: player.position,
                points: player.points,
                bid: player.bid,
                status: player.status,
            });
        }
    }

    roster.sort_by(|a, b| {
        b.bid
            .total_cmp(&a.bid)
            .then(b.points.total_cmp(&a.points))
            .then_with(|| a.name.cmp(&b.name))
    });

    RosterResult {
        objective_value: roster.iter().map(|e| e.points).sum(),
        roster,
        assignment,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
