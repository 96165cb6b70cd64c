//! Abstract event graph (AEG) domain model and its wire format.
//!
//! The graph and its critical cycles arrive precomputed from an upstream
//! cycle finder; this module validates their id layout once at load and
//! exposes the containers every later stage indexes into.

mod cycles;
mod graph;
mod wire;

pub use cycles::CriticalCycle;
pub use graph::{AbstractEventGraph, AccessKind, Edge, EdgeId, EdgeKind, Node, NodeId};
pub use wire::{WireAeg, WireCycle, WireDocument, WireEdge, WireNode};
