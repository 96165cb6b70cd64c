//! Critical cycles, referencing their graph by id only.

use super::graph::{EdgeId, NodeId};

/// A critical cycle of the abstract event graph.
///
/// Both lists are back-references into the owning graph. `edges` holds the
/// program-order edges of the cycle where a fence may be placed; the cycle
/// is broken once at least one of them is fenced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriticalCycle {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<EdgeId>,
}

impl CriticalCycle {
    pub fn new(nodes: Vec<NodeId>, edges: Vec<EdgeId>) -> Self {
        Self { nodes, edges }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
