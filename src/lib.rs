//! Minimal fence placement for TSO-like weak memory models.
//!
//! Given an abstract event graph (AEG) and its precomputed critical cycles,
//! this crate searches for a smallest set of program-order edges that, once
//! fenced, breaks every cycle:
//!
//! - **`aeg`**: the event graph, critical cycles, and the JSON wire format
//!   they arrive in.
//! - **`problem`**: the immutable instance shared by every state and the
//!   cheap-to-clone [`SolutionState`](problem::SolutionState) the search
//!   moves between.
//! - **`alns`**: the adaptive large neighborhood search engine with its
//!   destroy/repair portfolios and selection, acceptance, and stopping
//!   policies.
//! - **`ilp`**: the boundary to an exact 0/1 cover backend, usable for the
//!   initial state and as repair operators.
//!
//! The crate computes fence positions; emitting the instrumented program is
//! the caller's concern.

pub mod aeg;
pub mod alns;
pub mod error;
pub mod ilp;
pub mod problem;

pub use error::{FenceError, Result};
