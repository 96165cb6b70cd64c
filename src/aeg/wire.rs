//! Wire format of the upstream cycle finder.
//!
//! The finder emits one JSON document per program:
//!
//! ```json
//! {
//!   "aeg": {
//!     "nodes": [{"Read": ["t1", "x"]}, {"Write": ["t1", "y"]}],
//!     "edges": [[0, 1, "ProgramOrder"], [1, 0, "Competing"]]
//!   },
//!   "critical_cycles": [{"cycle": [0, 1], "potential_fences": [0]}]
//! }
//! ```
//!
//! Node and edge ids are implicit: each element's id is its position in the
//! list. Extra keys in the graph object are ignored. A node tag other than
//! `Read` or `Write` fails the whole load; a partially understood document
//! is never accepted.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::cycles::CriticalCycle;
use super::graph::{AbstractEventGraph, AccessKind, Edge, EdgeKind, Node, NodeId};
use crate::error::Result;

/// One event as represented on the wire: access kind tag over
/// `[thread, variable]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WireNode {
    Read(String, String),
    Write(String, String),
}

/// One edge as represented on the wire: `[source, target, kind]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireEdge(pub NodeId, pub NodeId, pub EdgeKind);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireAeg {
    pub nodes: Vec<WireNode>,
    pub edges: Vec<WireEdge>,
}

/// One critical cycle: node ids of the cycle and the ids of its
/// fence-eligible edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireCycle {
    pub cycle: Vec<usize>,
    pub potential_fences: Vec<usize>,
}

/// A complete finder output document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireDocument {
    pub aeg: WireAeg,
    pub critical_cycles: Vec<WireCycle>,
}

impl WireDocument {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Loads a document from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Converts the document into the validated domain representation,
    /// assigning position ids to nodes and edges.
    pub fn into_parts(self) -> Result<(AbstractEventGraph, Vec<CriticalCycle>)> {
        let nodes = self
            .aeg
            .nodes
            .into_iter()
            .enumerate()
            .map(|(id, node)| match node {
                WireNode::Read(thread, variable) => {
                    Node::new(id, AccessKind::Read, thread, variable)
                }
                WireNode::Write(thread, variable) => {
                    Node::new(id, AccessKind::Write, thread, variable)
                }
            })
            .collect();
        let edges = self
            .aeg
            .edges
            .into_iter()
            .enumerate()
            .map(|(id, WireEdge(source, target, kind))| Edge::new(id, source, target, kind))
            .collect();
        let graph = AbstractEventGraph::new(nodes, edges)?;
        let cycles = self
            .critical_cycles
            .into_iter()
            .map(|cc| CriticalCycle::new(cc.cycle, cc.potential_fences))
            .collect();
        Ok((graph, cycles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FenceError;

    const DOC: &str = r#"{
        "aeg": {
            "nodes": [
                {"Write": ["t1", "x"]},
                {"Read": ["t1", "y"]},
                {"Write": ["t2", "y"]},
                {"Read": ["t2", "x"]}
            ],
            "node_holes": [],
            "edge_property": "directed",
            "edges": [
                [0, 1, "ProgramOrder"],
                [2, 3, "ProgramOrder"],
                [1, 2, "Competing"],
                [3, 0, "Competing"]
            ]
        },
        "critical_cycles": [
            {"cycle": [0, 1, 2, 3], "potential_fences": [0, 1]}
        ]
    }"#;

    #[test]
    fn test_parses_finder_output() {
        let doc = WireDocument::from_json_str(DOC).unwrap();
        assert_eq!(doc.aeg.nodes.len(), 4);
        assert_eq!(doc.aeg.nodes[1], WireNode::Read("t1".into(), "y".into()));
        assert_eq!(doc.aeg.edges[2], WireEdge(1, 2, EdgeKind::Competing));
        assert_eq!(doc.critical_cycles[0].potential_fences, vec![0, 1]);
    }

    #[test]
    fn test_into_parts_assigns_position_ids() {
        let (graph, cycles) = WireDocument::from_json_str(DOC).unwrap().into_parts().unwrap();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.node(2).kind, AccessKind::Write);
        assert_eq!(graph.node(2).thread, "t2");
        assert_eq!(graph.edge(3).source, 3);
        assert_eq!(graph.edge(3).id, 3);
        assert_eq!(cycles[0].edges, vec![0, 1]);
    }

    #[test]
    fn test_rejects_unknown_node_tag() {
        let text = r#"{
            "aeg": {"nodes": [{"Fence": ["t1", "x"]}], "edges": []},
            "critical_cycles": []
        }"#;
        let err = WireDocument::from_json_str(text).unwrap_err();
        assert!(matches!(err, FenceError::Json(_)));
    }

    #[test]
    fn test_rejects_dangling_edge_on_conversion() {
        let text = r#"{
            "aeg": {"nodes": [{"Read": ["t1", "x"]}], "edges": [[0, 9, "Competing"]]},
            "critical_cycles": []
        }"#;
        let doc = WireDocument::from_json_str(text).unwrap();
        assert!(matches!(
            doc.into_parts(),
            Err(FenceError::MalformedInstance(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let doc = WireDocument::from_json_str(DOC).unwrap();
        let text = doc.to_json_string().unwrap();
        let again = WireDocument::from_json_str(&text).unwrap();
        assert_eq!(doc, again);
    }
}
