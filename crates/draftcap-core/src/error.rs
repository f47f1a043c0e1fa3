// Error types for the roster optimization core.

use thiserror::Error;

use crate::ledger::Position;

/// Failures raised by the external integer-programming backend.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("solver reported an unbounded objective")]
    Unbounded,

    #[error("solver backend failure: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum OptimizerError {
    /// No assignment satisfies every constraint simultaneously.
    #[error("no roster satisfies every constraint (infeasible model)")]
    Infeasible,

    #[error("duplicate player `{name}` at position {position}")]
    DuplicatePlayer { name: String, position: Position },

    #[error("invalid player `{name}` at position {position}: {reason}")]
    InvalidPlayer {
        name: String,
        position: Position,
        reason: String,
    },

    #[error("marginal value analysis requested but no player is marked `evaluate`")]
    MissingEvaluationTarget,

    #[error("at most one player may be marked `evaluate`, found {count}")]
    MultipleEvaluationTargets { count: usize },

    #[error("invalid position capacities: {0}")]
    InvalidCapacity(String),

    #[error("invalid bid schedule: {0}")]
    InvalidBidSchedule(String),

    #[error(transparent)]
    Solver(#[from] SolverError),
}
