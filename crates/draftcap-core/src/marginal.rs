// Marginal value analysis: the highest bid at which drafting the evaluation
// target still beats leaving them on the board.

use serde::Serialize;
use tracing::{debug, info};

use crate::constraints::EvaluationMode;
use crate::error::OptimizerError;
use crate::ledger::{PlayerKey, RosterLedger};
use crate::optimizer::{Optimizer, SolveOutcome};
use crate::solver::SolverAdapter;

// ---------------------------------------------------------------------------
// Bid schedule
// ---------------------------------------------------------------------------

/// Ascending candidate prices to force onto the evaluation target.
#[derive(Debug, Clone, PartialEq)]
pub struct BidSchedule {
    bids: Vec<f64>,
}

impl BidSchedule {
    /// `min, min + step, ...` up to and including `max`.
    pub fn range(min: f64, max: f64, step: f64) -> Result<Self, OptimizerError> {
        if !(step.is_finite() && step > 0.0) {
            return Err(OptimizerError::InvalidBidSchedule(format!(
                "step must be positive, got {step}"
            )));
        }
        if !(min.is_finite() && max.is_finite()) || min < 0.0 || max < min {
            return Err(OptimizerError::InvalidBidSchedule(format!(
                "need 0 <= min <= max, got min={min} max={max}"
            )));
        }

        let count = ((max - min) / step + 1e-9).floor() as usize;
        let bids = (0..=count).map(|i| min + i as f64 * step).collect();
        Ok(BidSchedule { bids })
    }

    /// An explicit list of prices; sorted ascending and deduplicated.
    pub fn explicit(bids: impl IntoIterator<Item = f64>) -> Result<Self, OptimizerError> {
        let mut bids: Vec<f64> = bids.into_iter().collect();
        if let Some(bad) = bids.iter().find(|b| !b.is_finite() || **b < 0.0) {
            return Err(OptimizerError::InvalidBidSchedule(format!(
                "bids must be finite and non-negative, got {bad}"
            )));
        }
        bids.sort_by(f64::total_cmp);
        bids.dedup();
        Ok(BidSchedule { bids })
    }

    pub fn bids(&self) -> &[f64] {
        &self.bids
    }
}

impl Default for BidSchedule {
    /// $0 through $100 in $5 steps.
    fn default() -> Self {
        BidSchedule {
            bids: (0..=20).map(|i| i as f64 * 5.0).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValuePoint {
    pub bid: f64,
    pub objective_value: f64,
}

/// Outcome of a bid sweep for one player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarginalValue {
    pub target: PlayerKey,
    /// Optimal points with the target excluded.
    pub baseline: f64,
    /// (bid, optimal points with the target drafted at that bid), ascending.
    pub curve: Vec<ValuePoint>,
    /// First candidate bid that made the model infeasible, if any.
    pub stopped_at: Option<f64>,
    /// Highest candidate bid whose drafted total beats the baseline; 0 if none.
    pub threshold: f64,
}

/// Round a point total to hundredths before comparing against the baseline.
pub fn round_points(points: f64) -> f64 {
    (points * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Analyzer
// ---------------------------------------------------------------------------

pub struct MarginalValueAnalyzer<'a, S> {
    optimizer: &'a Optimizer<S>,
    schedule: BidSchedule,
}

impl<'a, S: SolverAdapter> MarginalValueAnalyzer<'a, S> {
    pub fn new(optimizer: &'a Optimizer<S>, schedule: BidSchedule) -> Self {
        MarginalValueAnalyzer {
            optimizer,
            schedule,
        }
    }

    /// Sweep the schedule for the ledger's `evaluate` player.
    ///
    /// The sweep stops at the first infeasible bid; every larger bid is
    /// assumed infeasible too. An infeasible baseline is an error.
    pub fn compute_marginal_value(
        &self,
        initial_budget: f64,
        ledger: &RosterLedger,
    ) -> Result<MarginalValue, OptimizerError> {
        let target = ledger
            .evaluation_target()
            .ok_or(OptimizerError::MissingEvaluationTarget)?
            .key();
        let budget = ledger.remaining_budget(initial_budget);
        info!("evaluating {target}: remaining budget ${budget:.0}");

        let baseline = self
            .optimizer
            .solve_roster(budget, ledger, Some(EvaluationMode::MustNotDraft))?
            .into_result()?
            .objective_value;
        debug!("baseline without {target}: {baseline:.2}");

        let mut curve = Vec::with_capacity(self.schedule.bids().len());
        let mut stopped_at = None;
        let mut threshold = 0.0;

        for &bid in self.schedule.bids() {
            let priced = ledger.with_bid(&target, bid)?;
            let budget = priced.remaining_budget(initial_budget);
            match self
                .optimizer
                .solve_roster(budget, &priced, Some(EvaluationMode::MustDraft))?
            {
                SolveOutcome::Optimal(result) => {
                    debug!("{target} at ${bid:.0}: {:.2}", result.objective_value);
                    if round_points(result.objective_value) > round_points(baseline) {
                        threshold = bid;
                    }
                    curve.push(ValuePoint {
                        bid,
                        objective_value: result.objective_value,
                    });
                }
                SolveOutcome::Infeasible => {
                    debug!("{target} at ${bid:.0}: infeasible, stopping sweep");
                    stopped_at = Some(bid);
                    break;
                }
            }
        }

        info!("{target}: draft value ${threshold:.0} (baseline {baseline:.2})");
        Ok(MarginalValue {
            target,
            baseline,
            curve,
            stopped_at,
            threshold,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
