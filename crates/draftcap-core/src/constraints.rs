// Constraint families for the roster model.
//
// Each family is built independently from the ledger and the run's decision
// variables. All constraints are simultaneous; assembly order carries no
// meaning.

use crate::error::OptimizerError;
use crate::ledger::{DraftStatus, Position, RosterLedger};
use crate::model::DecisionVariables;
use crate::program::{Comparison, LinearConstraint, LinearExpr};

/// Whether the evaluation target is forced onto or off the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationMode {
    MustDraft,
    MustNotDraft,
}

impl EvaluationMode {
    fn forced_value(self) -> f64 {
        match self {
            EvaluationMode::MustDraft => 1.0,
            EvaluationMode::MustNotDraft => 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Individual families
// ---------------------------------------------------------------------------

/// Exact staffing for non-flex positions, a lower bound for flex-eligible ones.
pub fn positional_capacity(ledger: &RosterLedger, vars: &DecisionVariables) -> Vec<LinearConstraint> {
    let caps = ledger.capacities();
    let mut constraints = Vec::new();

    for position in Position::ALL {
        let required = caps.base(position) as f64;
        let expr = vars.position_sum(ledger, position);

        if caps.is_flex_eligible(position) {
            if required > 0.0 {
                constraints.push(LinearConstraint::new(
                    format!("{position} positional constraint"),
                    expr,
                    Comparison::Ge,
                    required,
                ));
            }
        } else if required > 0.0 || !expr.is_empty() {
            constraints.push(LinearConstraint::new(
                format!("{position} positional constraint"),
                expr,
                Comparison::Eq,
                required,
            ));
        }
    }

    constraints
}

/// Total flex-eligible headcount equals their base slots plus the flex slots.
///
/// Returns `None` when no position is flex-eligible.
pub fn flex_aggregate(ledger: &RosterLedger, vars: &DecisionVariables) -> Option<LinearConstraint> {
    let caps = ledger.capacities();
    if caps.flex_eligible().is_empty() {
        return None;
    }

    let mut expr = LinearExpr::new();
    for &position in caps.flex_eligible() {
        for &(var, coef) in vars.position_sum(ledger, position).terms() {
            expr.add_term(var, coef);
        }
    }

    Some(LinearConstraint::new(
        "flex constraint",
        expr,
        Comparison::Eq,
        caps.flex_total() as f64,
    ))
}

/// Spend on players not already drafted stays within the remaining budget.
///
/// Drafted players are excluded because their price was already subtracted
/// when the remaining budget was computed.
pub fn budget(
    ledger: &RosterLedger,
    vars: &DecisionVariables,
    remaining_budget: f64,
) -> LinearConstraint {
    let expr = ledger
        .players()
        .iter()
        .filter(|p| p.status != DraftStatus::Drafted)
        .filter_map(|p| vars.of(p).map(|var| (var, p.bid)))
        .collect();

    LinearConstraint::new("budget constraint", expr, Comparison::Le, remaining_budget)
}

/// Pin drafted players to 1, taken players to 0, and (when requested) the
/// evaluation target to the requested side.
pub fn status_forcing(
    ledger: &RosterLedger,
    vars: &DecisionVariables,
    evaluation: Option<EvaluationMode>,
) -> Result<Vec<LinearConstraint>, OptimizerError> {
    if evaluation.is_some() && ledger.evaluation_target().is_none() {
        return Err(OptimizerError::MissingEvaluationTarget);
    }

    let mut constraints = Vec::new();
    for player in ledger.players() {
        let (label, value) = match player.status {
            DraftStatus::None => continue,
            DraftStatus::Drafted => ("draft", 1.0),
            DraftStatus::Taken => ("taken", 0.0),
            DraftStatus::Evaluate => match evaluation {
                Some(mode) => ("eval", mode.forced_value()),
                None => continue,
            },
        };
        let Some(var) = vars.of(player) else {
            continue;
        };

        let mut expr = LinearExpr::new();
        expr.add_term(var, 1.0);
        constraints.push(LinearConstraint::new(
            format!("{} {label} constraint", player.name),
            expr,
            Comparison::Eq,
            value,
        ));
    }

    Ok(constraints)
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Every constraint for one run.
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    constraints: Vec<LinearConstraint>,
}

impl ConstraintSet {
    pub fn assemble(
        ledger: &RosterLedger,
        vars: &DecisionVariables,
        remaining_budget: f64,
        evaluation: Option<EvaluationMode>,
    ) -> Result<Self, OptimizerError> {
        let mut constraints = positional_capacity(ledger, vars);
        constraints.extend(flex_aggregate(ledger, vars));
        constraints.push(budget(ledger, vars, remaining_budget));
        constraints.extend(status_forcing(ledger, vars, evaluation)?);
        Ok(ConstraintSet { constraints })
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LinearConstraint> {
        self.constraints.iter()
    }

    pub fn into_vec(self) -> Vec<LinearConstraint> {
        self.constraints
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
