//! Crate-wide error type.

use thiserror::Error;

/// Errors surfaced by instance loading, search configuration, and the
/// exact-solver boundary.
#[derive(Error, Debug)]
pub enum FenceError {
    /// The input graph or cycle data violates a structural invariant.
    /// Fatal: a malformed instance is never partially accepted.
    #[error("malformed instance: {0}")]
    MalformedInstance(String),

    /// The search was configured inconsistently.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The exact solver reported infeasibility on a sub-problem that is
    /// feasible by construction.
    #[error("exact solver contract violation: {0}")]
    SolverContract(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FenceError>;
