//! The immutable problem instance shared by every solution state.

use std::path::Path;

use crate::aeg::{AbstractEventGraph, CriticalCycle, EdgeId, WireDocument};
use crate::error::{FenceError, Result};

/// A validated fence-placement instance: the event graph, its critical
/// cycles, and statistics derived from them once at construction.
///
/// The instance is immutable for the lifetime of a search and is shared by
/// reference from every [`SolutionState`](crate::problem::SolutionState);
/// it is never cloned on the search path.
#[derive(Debug, Clone)]
pub struct ProblemInstance {
    graph: AbstractEventGraph,
    cycles: Vec<CriticalCycle>,
    /// Every edge occurring in some cycle, in first-occurrence order over
    /// the cycle list.
    potential_fences: Vec<EdgeId>,
    /// For each edge id, the number of critical cycles it occurs in.
    /// Zero for edges outside every cycle; at least one for every
    /// potential fence.
    edge_cycle_count: Vec<u32>,
}

impl ProblemInstance {
    pub fn new(graph: AbstractEventGraph, cycles: Vec<CriticalCycle>) -> Result<Self> {
        for (pos, cycle) in cycles.iter().enumerate() {
            if cycle.edges.is_empty() {
                return Err(FenceError::MalformedInstance(format!(
                    "critical cycle {pos} has no fence-eligible edges"
                )));
            }
            if let Some(&node) = cycle.nodes.iter().find(|&&n| n >= graph.node_count()) {
                return Err(FenceError::MalformedInstance(format!(
                    "critical cycle {pos} references node {node} outside 0..{}",
                    graph.node_count()
                )));
            }
            if let Some(&edge) = cycle.edges.iter().find(|&&e| e >= graph.edge_count()) {
                return Err(FenceError::MalformedInstance(format!(
                    "critical cycle {pos} references edge {edge} outside 0..{}",
                    graph.edge_count()
                )));
            }
        }

        let mut edge_cycle_count = vec![0u32; graph.edge_count()];
        let mut potential_fences = Vec::new();
        for cycle in &cycles {
            for &edge in &cycle.edges {
                if edge_cycle_count[edge] == 0 {
                    potential_fences.push(edge);
                }
                edge_cycle_count[edge] += 1;
            }
        }

        Ok(Self {
            graph,
            cycles,
            potential_fences,
            edge_cycle_count,
        })
    }

    /// Builds an instance straight from a decoded wire document.
    pub fn from_wire(document: WireDocument) -> Result<Self> {
        let (graph, cycles) = document.into_parts()?;
        Self::new(graph, cycles)
    }

    /// Loads and validates an instance from a finder output file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_wire(WireDocument::load(path)?)
    }

    pub fn graph(&self) -> &AbstractEventGraph {
        &self.graph
    }

    pub fn cycles(&self) -> &[CriticalCycle] {
        &self.cycles
    }

    pub fn cycle_count(&self) -> usize {
        self.cycles.len()
    }

    /// Candidate edges for fence placement, deduplicated, in first-occurrence
    /// order over the cycle list.
    pub fn potential_fences(&self) -> &[EdgeId] {
        &self.potential_fences
    }

    /// Number of critical cycles `edge` occurs in.
    pub fn edge_cycle_count(&self, edge: EdgeId) -> u32 {
        self.edge_cycle_count[edge]
    }

    pub fn edge_cycle_counts(&self) -> &[u32] {
        &self.edge_cycle_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aeg::{AccessKind, Edge, EdgeKind, Node};

    fn graph(node_count: usize, endpoints: &[(usize, usize)]) -> AbstractEventGraph {
        let nodes = (0..node_count)
            .map(|i| Node::new(i, AccessKind::Write, "t0", "x"))
            .collect();
        let edges = endpoints
            .iter()
            .enumerate()
            .map(|(id, &(s, t))| Edge::new(id, s, t, EdgeKind::ProgramOrder))
            .collect();
        AbstractEventGraph::new(nodes, edges).unwrap()
    }

    #[test]
    fn test_counts_cycles_per_edge() {
        let g = graph(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
        let cycles = vec![
            CriticalCycle::new(vec![0, 1, 2], vec![0, 2]),
            CriticalCycle::new(vec![1, 2, 3], vec![1, 2]),
            CriticalCycle::new(vec![2, 3, 0], vec![2]),
        ];
        let instance = ProblemInstance::new(g, cycles).unwrap();

        assert_eq!(instance.edge_cycle_count(0), 1);
        assert_eq!(instance.edge_cycle_count(1), 1);
        assert_eq!(instance.edge_cycle_count(2), 3);
        assert_eq!(instance.edge_cycle_count(3), 0);
    }

    #[test]
    fn test_potential_fences_keep_first_occurrence_order() {
        let g = graph(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
        let cycles = vec![
            CriticalCycle::new(vec![0, 1], vec![3, 1]),
            CriticalCycle::new(vec![1, 2], vec![1, 0]),
        ];
        let instance = ProblemInstance::new(g, cycles).unwrap();

        assert_eq!(instance.potential_fences(), &[3, 1, 0]);
    }

    #[test]
    fn test_rejects_edgeless_cycle() {
        let g = graph(2, &[(0, 1)]);
        let cycles = vec![CriticalCycle::new(vec![0, 1], vec![])];
        let err = ProblemInstance::new(g, cycles).unwrap_err();
        assert!(err.to_string().contains("no fence-eligible edges"));
    }

    #[test]
    fn test_rejects_out_of_range_references() {
        let g = graph(2, &[(0, 1)]);
        let cycles = vec![CriticalCycle::new(vec![0, 9], vec![0])];
        assert!(ProblemInstance::new(g.clone(), cycles).is_err());

        let cycles = vec![CriticalCycle::new(vec![0, 1], vec![4])];
        assert!(ProblemInstance::new(g, cycles).is_err());
    }

    #[test]
    fn test_builds_from_wire_document() {
        let text = r#"{
            "aeg": {
                "nodes": [{"Write": ["t1", "x"]}, {"Read": ["t2", "x"]}],
                "edges": [[0, 1, "ProgramOrder"], [1, 0, "Competing"]]
            },
            "critical_cycles": [{"cycle": [0, 1], "potential_fences": [0]}]
        }"#;
        let doc = WireDocument::from_json_str(text).unwrap();
        let instance = ProblemInstance::from_wire(doc).unwrap();

        assert_eq!(instance.cycle_count(), 1);
        assert_eq!(instance.potential_fences(), &[0]);
        assert_eq!(instance.edge_cycle_count(1), 0);
    }
}
