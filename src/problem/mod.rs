//! Fence-placement problem: the immutable instance and the mutable
//! solution states the search moves between.

mod instance;
mod state;

pub use instance::ProblemInstance;
pub use state::SolutionState;
