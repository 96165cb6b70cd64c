//! Abstract event graph: events, the edges between them, and the validated
//! graph container all later stages index into.

use serde::{Deserialize, Serialize};

use crate::error::{FenceError, Result};

/// Identifier of a node. Node ids equal positions in the graph's node list.
pub type NodeId = usize;

/// Identifier of an edge. Edge ids equal positions in the graph's edge list.
pub type EdgeId = usize;

/// Kind of memory access an event performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessKind {
    Read,
    Write,
}

/// Classification of an edge.
///
/// `ProgramOrder` connects successive events of one thread; `Competing`
/// connects conflicting accesses to the same variable from different
/// threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeKind {
    ProgramOrder,
    Competing,
}

/// A memory event: one access of `variable` performed by `thread`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub kind: AccessKind,
    pub thread: String,
    pub variable: String,
}

impl Node {
    pub fn new(
        id: NodeId,
        kind: AccessKind,
        thread: impl Into<String>,
        variable: impl Into<String>,
    ) -> Self {
        Self {
            id,
            kind,
            thread: thread.into(),
            variable: variable.into(),
        }
    }
}

/// A directed edge between two events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub kind: EdgeKind,
}

impl Edge {
    pub fn new(id: EdgeId, source: NodeId, target: NodeId, kind: EdgeKind) -> Self {
        Self {
            id,
            source,
            target,
            kind,
        }
    }
}

/// The abstract event graph an instance is defined over.
///
/// Construction validates the id layout exactly once: every node and edge id
/// must equal its position, and every edge endpoint must name an existing
/// node. All id-based indexing afterwards relies on this and performs no
/// further checks.
#[derive(Debug, Clone)]
pub struct AbstractEventGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl AbstractEventGraph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self> {
        for (pos, node) in nodes.iter().enumerate() {
            if node.id != pos {
                return Err(FenceError::MalformedInstance(format!(
                    "node at position {pos} carries id {}",
                    node.id
                )));
            }
        }
        for (pos, edge) in edges.iter().enumerate() {
            if edge.id != pos {
                return Err(FenceError::MalformedInstance(format!(
                    "edge at position {pos} carries id {}",
                    edge.id
                )));
            }
            if edge.source >= nodes.len() || edge.target >= nodes.len() {
                return Err(FenceError::MalformedInstance(format!(
                    "edge {pos} references a node outside 0..{}",
                    nodes.len()
                )));
            }
        }
        Ok(Self { nodes, edges })
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// In-degree of every node, indexed by node id.
    pub fn in_degrees(&self) -> Vec<u32> {
        let mut degrees = vec![0u32; self.nodes.len()];
        for edge in &self.edges {
            degrees[edge.target] += 1;
        }
        degrees
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(n: usize) -> Vec<Node> {
        (0..n)
            .map(|i| Node::new(i, AccessKind::Write, "t0", "x"))
            .collect()
    }

    #[test]
    fn test_accepts_consistent_layout() {
        let graph = AbstractEventGraph::new(
            nodes(3),
            vec![
                Edge::new(0, 0, 1, EdgeKind::ProgramOrder),
                Edge::new(1, 1, 2, EdgeKind::Competing),
                Edge::new(2, 2, 0, EdgeKind::Competing),
            ],
        )
        .unwrap();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.edge(1).target, 2);
        assert_eq!(graph.edge(1).kind, EdgeKind::Competing);
    }

    #[test]
    fn test_rejects_edge_id_mismatch() {
        let result = AbstractEventGraph::new(
            nodes(2),
            vec![Edge::new(5, 0, 1, EdgeKind::ProgramOrder)],
        );
        let err = result.unwrap_err();
        assert!(err.to_string().contains("edge at position 0 carries id 5"));
    }

    #[test]
    fn test_rejects_node_id_mismatch() {
        let mut ns = nodes(2);
        ns[1].id = 9;
        let result = AbstractEventGraph::new(ns, vec![]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_dangling_endpoint() {
        let result = AbstractEventGraph::new(
            nodes(2),
            vec![Edge::new(0, 0, 4, EdgeKind::ProgramOrder)],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_in_degrees_count_incoming_edges() {
        let graph = AbstractEventGraph::new(
            nodes(3),
            vec![
                Edge::new(0, 0, 2, EdgeKind::ProgramOrder),
                Edge::new(1, 1, 2, EdgeKind::Competing),
                Edge::new(2, 2, 0, EdgeKind::ProgramOrder),
            ],
        )
        .unwrap();

        assert_eq!(graph.in_degrees(), vec![1, 0, 2]);
    }
}
