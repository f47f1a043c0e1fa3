// Salary-cap auction roster optimizer: builds a binary integer program over
// (player, position) pairs, solves it through a pluggable adapter, and sweeps
// forced bids to find a player's breakeven price.

pub mod constraints;
pub mod error;
pub mod ledger;
pub mod marginal;
pub mod model;
pub mod optimizer;
pub mod program;
pub mod solver;

pub use constraints::{ConstraintSet, EvaluationMode};
pub use error::{OptimizerError, SolverError};
pub use ledger::{CapacityMap, DraftStatus, PlayerKey, PlayerRecord, Position, RosterLedger};
pub use marginal::{BidSchedule, MarginalValue, MarginalValueAnalyzer, ValuePoint};
pub use optimizer::{Optimizer, RosterEntry, RosterResult, SolveOutcome};
pub use solver::{MicroLpSolver, SolverAdapter, SolverOutcome};
