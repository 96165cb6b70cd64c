//! Adaptive Large Neighborhood Search (ALNS) over fence sets.
//!
//! The search iteratively destroys part of the current fence set and
//! repairs the cycles that reopen, drawing both operators from portfolios
//! whose selection probabilities adapt to past performance. Acceptance,
//! termination, and the initial state are pluggable policies.
//!
//! # References
//!
//! Ropke & Pisinger (2006), "An Adaptive Large Neighborhood Search Heuristic
//! for the Pickup and Delivery Problem with Time Windows"

mod accept;
mod config;
mod destroy;
mod initial;
mod repair;
mod runner;
mod select;
mod stop;

pub use accept::AcceptancePolicy;
pub use config::AlnsConfig;
pub use destroy::DestroyOp;
pub use initial::InitialStateGen;
pub use repair::RepairOp;
pub use runner::{AlnsResult, AlnsRunner, OperatorRecord, RunSummary, SearchStats};
pub use select::SelectionPolicy;
pub use stop::StopPolicy;
