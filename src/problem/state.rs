//! Solution states over a shared instance.

use crate::aeg::EdgeId;
use crate::problem::ProblemInstance;

/// One fence placement: which edges of the instance carry a fence.
///
/// The state borrows its instance, so cloning copies only the fence vector;
/// the search loop clones freely on every destroy application. The fence
/// list is duplicate-free and keeps insertion order, which makes removals
/// and the operator statistics reproducible under a fixed seed.
#[derive(Debug, Clone)]
pub struct SolutionState<'a> {
    instance: &'a ProblemInstance,
    fences: Vec<EdgeId>,
}

impl<'a> SolutionState<'a> {
    /// A state with no fences placed.
    pub fn empty(instance: &'a ProblemInstance) -> Self {
        Self {
            instance,
            fences: Vec::new(),
        }
    }

    /// A state with the given fences. Callers pass duplicate-free lists.
    pub fn with_fences(instance: &'a ProblemInstance, fences: Vec<EdgeId>) -> Self {
        debug_assert!(distinct(&fences), "duplicate fence in initial list");
        Self { instance, fences }
    }

    pub fn instance(&self) -> &'a ProblemInstance {
        self.instance
    }

    pub fn fences(&self) -> &[EdgeId] {
        &self.fences
    }

    /// Number of placed fences. This is the whole objective.
    pub fn objective(&self) -> usize {
        self.fences.len()
    }

    pub fn is_fenced(&self, edge: EdgeId) -> bool {
        self.fences.contains(&edge)
    }

    /// Dense fence membership by edge id.
    pub fn fence_mask(&self) -> Vec<bool> {
        let mut mask = vec![false; self.instance.graph().edge_count()];
        for &edge in &self.fences {
            mask[edge] = true;
        }
        mask
    }

    pub fn push_fence(&mut self, edge: EdgeId) {
        debug_assert!(!self.is_fenced(edge), "edge {edge} already fenced");
        self.fences.push(edge);
    }

    /// Removes the fence at `index`, preserving the order of the rest.
    pub fn remove_fence_at(&mut self, index: usize) -> EdgeId {
        self.fences.remove(index)
    }

    pub fn retain_fences(&mut self, mut keep: impl FnMut(EdgeId) -> bool) {
        self.fences.retain(|&edge| keep(edge));
    }

    /// Whether every critical cycle has at least one fenced edge.
    pub fn is_feasible(&self) -> bool {
        let mask = self.fence_mask();
        self.instance
            .cycles()
            .iter()
            .all(|cycle| cycle.edges.iter().any(|&edge| mask[edge]))
    }

    /// Indices of cycles with no fenced edge, in cycle-list order.
    pub fn unbroken_cycles(&self) -> Vec<usize> {
        let mask = self.fence_mask();
        self.instance
            .cycles()
            .iter()
            .enumerate()
            .filter(|(_, cycle)| !cycle.edges.iter().any(|&edge| mask[edge]))
            .map(|(idx, _)| idx)
            .collect()
    }
}

fn distinct(fences: &[EdgeId]) -> bool {
    fences
        .iter()
        .enumerate()
        .all(|(i, edge)| !fences[..i].contains(edge))
}
