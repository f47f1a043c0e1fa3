// Runs the optimizer and the marginal-value sweep for one configured draft.

use anyhow::Context;
use draftcap_core::{
    MarginalValue, MarginalValueAnalyzer, MicroLpSolver, Optimizer, PlayerRecord, RosterLedger,
    RosterResult,
};
use tracing::info;

use crate::config::Config;
use crate::report::Report;

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct DraftReport {
    pub optimal: RosterResult,
    /// Present when the pool has an `evaluate` player and evaluation is on.
    pub evaluation: Option<MarginalValue>,
}

impl DraftReport {
    pub fn as_report(&self) -> Report<'_> {
        Report {
            optimal: &self.optimal,
            evaluation: self.evaluation.as_ref(),
        }
    }
}

/// Build the ledger from `players` and solve.
pub fn run(config: &Config, players: Vec<PlayerRecord>, evaluate: bool) -> anyhow::Result<DraftReport> {
    let capacities = config
        .roster
        .capacity_map()
        .context("invalid roster configuration")?;
    let schedule = config.sweep.schedule().context("invalid bid sweep")?;
    let ledger = RosterLedger::new(players, capacities).context("invalid player pool")?;

    let optimizer = Optimizer::new(MicroLpSolver::new());
    let budget = config.league.initial_budget;

    let optimal = optimizer
        .compute_optimal_roster(budget, &ledger)
        .context("failed to compute optimal roster")?;

    let evaluation = match ledger.evaluation_target() {
        Some(target) if evaluate => {
            let analyzer = MarginalValueAnalyzer::new(&optimizer, schedule);
            let value = analyzer
                .compute_marginal_value(budget, &ledger)
                .with_context(|| format!("failed to evaluate {}", target.key()))?;
            Some(value)
        }
        Some(target) => {
            info!("skipping evaluation of {}", target.key());
            None
        }
        None => None,
    };

    Ok(DraftReport {
        optimal,
        evaluation,
    })
}
