//! Construction of the search's first feasible state.

use crate::error::{FenceError, Result};
use crate::ilp::{solve_cycle_cover, CoverModel, ExactSolver, SolveLimits};
use crate::problem::{ProblemInstance, SolutionState};

/// Strategy for building the initial fence set. All three produce a
/// feasible state; they differ in how far from optimal they start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialStateGen {
    /// Fence the first candidate edge of every cycle.
    FirstEdges,
    /// Fence, per cycle, the candidate occurring in the most cycles.
    HotEdges,
    /// Hand the whole instance to the exact solver and adopt its fences.
    Ilp,
}

impl InitialStateGen {
    pub fn name(&self) -> &'static str {
        match self {
            Self::FirstEdges => "first-edges",
            Self::HotEdges => "hot-edges",
            Self::Ilp => "ilp",
        }
    }

    pub fn needs_solver(&self) -> bool {
        matches!(self, Self::Ilp)
    }

    pub fn generate<'a>(
        &self,
        instance: &'a ProblemInstance,
        solver: Option<&dyn ExactSolver>,
    ) -> Result<SolutionState<'a>> {
        match self {
            Self::FirstEdges => Ok(first_edges(instance)),
            Self::HotEdges => Ok(hot_edges(instance)),
            Self::Ilp => ilp(instance, solver),
        }
    }
}

fn first_edges(instance: &ProblemInstance) -> SolutionState<'_> {
    let mut fenced = vec![false; instance.graph().edge_count()];
    let mut fences = Vec::new();
    for cycle in instance.cycles() {
        let pick = cycle.edges[0];
        if !fenced[pick] {
            fenced[pick] = true;
            fences.push(pick);
        }
    }
    SolutionState::with_fences(instance, fences)
}

fn hot_edges(instance: &ProblemInstance) -> SolutionState<'_> {
    let mut fenced = vec![false; instance.graph().edge_count()];
    let mut fences = Vec::new();
    for cycle in instance.cycles() {
        let mut pick = cycle.edges[0];
        for &edge in &cycle.edges[1..] {
            if instance.edge_cycle_count(edge) > instance.edge_cycle_count(pick) {
                pick = edge;
            }
        }
        if !fenced[pick] {
            fenced[pick] = true;
            fences.push(pick);
        }
    }
    SolutionState::with_fences(instance, fences)
}

fn ilp<'a>(
    instance: &'a ProblemInstance,
    solver: Option<&dyn ExactSolver>,
) -> Result<SolutionState<'a>> {
    let solver = solver.ok_or_else(|| {
        FenceError::Configuration("the ilp initial state needs an exact solver attached".into())
    })?;
    let covers = instance
        .cycles()
        .iter()
        .map(|cycle| cycle.edges.clone())
        .collect();
    let model = CoverModel::new(covers);
    let solution = solve_cycle_cover(solver, &model, &SolveLimits::none())?;
    Ok(SolutionState::with_fences(instance, solution.fences))
}
