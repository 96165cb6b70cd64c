//! Repair operators: restore feasibility by fencing still-open cycles.
//!
//! Repairs are append-only; fences already placed are never moved or
//! dropped. A feasible input passes through unchanged, so every repair is
//! idempotent on its own output.

use std::fmt;

use rand::Rng;

use crate::aeg::EdgeId;
use crate::error::{FenceError, Result};
use crate::ilp::{solve_cycle_cover, CoverModel, ExactSolver, SolveLimits};
use crate::problem::SolutionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairOp {
    /// Fence a uniformly chosen candidate edge of each open cycle.
    UnbrokenRandom,
    /// Fence each open cycle's candidate occurring in the most cycles.
    HotEdges,
    /// Greedy cover: repeatedly fence the candidate breaking the most
    /// still-open cycles.
    MostCycles,
    /// Greedy cover ranked by the in-degree of a candidate's source node.
    InDegrees,
    /// Exact cover over the open cycles, stopping at the first feasible
    /// assignment.
    IlpPartial,
    /// Exact cover over the open cycles, run to optimality.
    IlpFull,
}

impl RepairOp {
    /// The solver-free portfolio used by default.
    pub fn default_portfolio() -> Vec<RepairOp> {
        vec![
            Self::UnbrokenRandom,
            Self::HotEdges,
            Self::InDegrees,
            Self::MostCycles,
        ]
    }

    /// Whether this operator needs an exact solver attached at run time.
    pub fn needs_solver(&self) -> bool {
        matches!(self, Self::IlpPartial | Self::IlpFull)
    }

    pub fn apply<'a, R: Rng>(
        &self,
        state: SolutionState<'a>,
        rng: &mut R,
        solver: Option<&dyn ExactSolver>,
    ) -> Result<SolutionState<'a>> {
        match self {
            Self::UnbrokenRandom => Ok(repair_unbroken_random(state, rng)),
            Self::HotEdges => Ok(repair_hot_edges(state)),
            Self::MostCycles => Ok(repair_most_cycles(state)),
            Self::InDegrees => Ok(repair_in_degrees(state)),
            Self::IlpPartial => repair_ilp(
                state,
                solver,
                SolveLimits::none().first_feasible(),
                "ilp_partial",
            ),
            Self::IlpFull => repair_ilp(state, solver, SolveLimits::none(), "ilp_full"),
        }
    }
}

impl fmt::Display for RepairOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UnbrokenRandom => "unbroken",
            Self::HotEdges => "hot_fences",
            Self::MostCycles => "most_cycles",
            Self::InDegrees => "in_degrees",
            Self::IlpPartial => "ilp_partial",
            Self::IlpFull => "ilp_full",
        };
        f.write_str(name)
    }
}

fn repair_unbroken_random<'a, R: Rng>(
    mut state: SolutionState<'a>,
    rng: &mut R,
) -> SolutionState<'a> {
    let instance = state.instance();
    let mut fenced = state.fence_mask();
    for cycle in instance.cycles() {
        if cycle.edges.iter().any(|&edge| fenced[edge]) {
            continue;
        }
        let pick = cycle.edges[rng.random_range(0..cycle.edges.len())];
        fenced[pick] = true;
        state.push_fence(pick);
    }
    state
}

fn repair_hot_edges<'a>(mut state: SolutionState<'a>) -> SolutionState<'a> {
    let instance = state.instance();
    let mut fenced = state.fence_mask();
    for cycle in instance.cycles() {
        if cycle.edges.iter().any(|&edge| fenced[edge]) {
            continue;
        }
        let mut pick = cycle.edges[0];
        for &edge in &cycle.edges[1..] {
            if instance.edge_cycle_count(edge) > instance.edge_cycle_count(pick) {
                pick = edge;
            }
        }
        fenced[pick] = true;
        state.push_fence(pick);
    }
    state
}

/// Candidate edges of the open cycles, in first-encounter order, each with
/// the open cycles it would break.
struct Candidates {
    order: Vec<EdgeId>,
    cycles_of: Vec<Vec<usize>>,
}

fn open_candidates(state: &SolutionState<'_>, open: &[usize]) -> Candidates {
    let instance = state.instance();
    let mut order = Vec::new();
    let mut cycles_of = vec![Vec::new(); instance.graph().edge_count()];
    for &cycle_index in open {
        for &edge in &instance.cycles()[cycle_index].edges {
            if cycles_of[edge].is_empty() {
                order.push(edge);
            }
            cycles_of[edge].push(cycle_index);
        }
    }
    Candidates { order, cycles_of }
}

fn repair_most_cycles<'a>(mut state: SolutionState<'a>) -> SolutionState<'a> {
    let open = state.unbroken_cycles();
    if open.is_empty() {
        return state;
    }
    let candidates = open_candidates(&state, &open);
    let mut covered = vec![false; state.instance().cycle_count()];
    let mut remaining = open.len();

    while remaining > 0 {
        let mut best: Option<EdgeId> = None;
        let mut best_count = 0;
        for &edge in &candidates.order {
            let count = candidates.cycles_of[edge]
                .iter()
                .filter(|&&cycle| !covered[cycle])
                .count();
            if count > best_count {
                best_count = count;
                best = Some(edge);
            }
        }
        let pick = match best {
            Some(edge) => edge,
            None => break,
        };
        state.push_fence(pick);
        for &cycle in &candidates.cycles_of[pick] {
            if !covered[cycle] {
                covered[cycle] = true;
                remaining -= 1;
            }
        }
    }
    state
}

fn repair_in_degrees<'a>(mut state: SolutionState<'a>) -> SolutionState<'a> {
    let open = state.unbroken_cycles();
    if open.is_empty() {
        return state;
    }
    let instance = state.instance();
    let candidates = open_candidates(&state, &open);
    let mut in_degrees = instance.graph().in_degrees();
    let mut covered = vec![false; instance.cycle_count()];
    let mut remaining = open.len();

    while remaining > 0 {
        let mut best: Option<EdgeId> = None;
        let mut best_degree = 0;
        for &edge in &candidates.order {
            if candidates.cycles_of[edge].iter().all(|&cycle| covered[cycle]) {
                continue;
            }
            let degree = in_degrees[instance.graph().edge(edge).source];
            if best.is_none() || degree > best_degree {
                best_degree = degree;
                best = Some(edge);
            }
        }
        let pick = match best {
            Some(edge) => edge,
            None => break,
        };
        // Each placement dampens the picked source for later rounds.
        let source = instance.graph().edge(pick).source;
        in_degrees[source] = in_degrees[source].saturating_sub(1);
        state.push_fence(pick);
        for &cycle in &candidates.cycles_of[pick] {
            if !covered[cycle] {
                covered[cycle] = true;
                remaining -= 1;
            }
        }
    }
    state
}

fn repair_ilp<'a>(
    mut state: SolutionState<'a>,
    solver: Option<&dyn ExactSolver>,
    limits: SolveLimits,
    name: &str,
) -> Result<SolutionState<'a>> {
    let open = state.unbroken_cycles();
    if open.is_empty() {
        return Ok(state);
    }
    let solver = solver.ok_or_else(|| {
        FenceError::Configuration(format!("the {name} repair needs an exact solver attached"))
    })?;
    let instance = state.instance();
    let covers = open
        .iter()
        .map(|&cycle| instance.cycles()[cycle].edges.clone())
        .collect();
    let model = CoverModel::new(covers);
    let solution = solve_cycle_cover(solver, &model, &limits)?;
    for edge in solution.fences {
        state.push_fence(edge);
    }
    Ok(state)
}
