//! Destroy operators: remove placed fences to reopen part of the search
//! space.
//!
//! Operators never mutate their input. The result's fence set is a strict
//! subset of the input's whenever the input has any fences; a state with
//! no fences passes through unchanged.

use std::fmt;

use rand::Rng;

use super::select::roulette;
use crate::problem::SolutionState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DestroyOp {
    /// Remove `max(1, floor(pct * fences))` fences chosen uniformly.
    Random { pct: f64 },
    /// Drop every fence on the cycle carrying the most fenced edges.
    BiggestCycle,
    /// Drop the fences of the cycle carrying the most distinct fenced edges.
    SameCycle,
    /// Remove a tenth of the fences, biased toward edges in many cycles.
    Hot,
    /// Remove a tenth of the fences, biased toward edges in few cycles.
    Cold,
}

impl DestroyOp {
    /// The stock portfolio, in its operational order.
    pub fn default_portfolio() -> Vec<DestroyOp> {
        vec![
            Self::Cold,
            Self::SameCycle,
            Self::Hot,
            Self::Random { pct: 0.10 },
            Self::Random { pct: 0.30 },
            Self::BiggestCycle,
        ]
    }

    pub fn apply<'a, R: Rng>(&self, state: &SolutionState<'a>, rng: &mut R) -> SolutionState<'a> {
        if state.fences().is_empty() {
            return state.clone();
        }
        match *self {
            Self::Random { pct } => destroy_random(state, pct, rng),
            Self::BiggestCycle => destroy_cycle_fences(state, CycleMetric::Occurrences),
            Self::SameCycle => destroy_cycle_fences(state, CycleMetric::Distinct),
            Self::Hot => destroy_weighted(state, true, rng),
            Self::Cold => destroy_weighted(state, false, rng),
        }
    }
}

impl fmt::Display for DestroyOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random { pct } => write!(f, "random_{}", (pct * 100.0).round() as u32),
            Self::BiggestCycle => write!(f, "biggest_cycle"),
            Self::SameCycle => write!(f, "same_cycle"),
            Self::Hot => write!(f, "hot_fences"),
            Self::Cold => write!(f, "cold_fences"),
        }
    }
}

fn removal_count(fences: usize, pct: f64) -> usize {
    ((pct * fences as f64) as usize).max(1)
}

fn destroy_random<'a, R: Rng>(
    state: &SolutionState<'a>,
    pct: f64,
    rng: &mut R,
) -> SolutionState<'a> {
    let len = state.fences().len();
    let count = removal_count(len, pct);
    let mut indices: Vec<usize> = (0..len).collect();
    // Partial Fisher-Yates: the first `count` slots become the sample.
    for i in 0..count {
        let j = rng.random_range(i..len);
        indices.swap(i, j);
    }
    indices.truncate(count);
    remove_indices(state, indices)
}

#[derive(Clone, Copy)]
enum CycleMetric {
    /// Fenced entries over the cycle's edge list, multiplicity included.
    Occurrences,
    /// Distinct fenced edge ids.
    Distinct,
}

fn destroy_cycle_fences<'a>(state: &SolutionState<'a>, metric: CycleMetric) -> SolutionState<'a> {
    let instance = state.instance();
    let fenced = state.fence_mask();
    let edge_count = instance.graph().edge_count();

    let mut best_cycle = 0;
    let mut best_count = 0;
    // seen[e] holds the index of the last cycle that counted e.
    let mut seen = vec![usize::MAX; edge_count];
    for (index, cycle) in instance.cycles().iter().enumerate() {
        let mut count = 0;
        for &edge in &cycle.edges {
            if !fenced[edge] {
                continue;
            }
            match metric {
                CycleMetric::Occurrences => count += 1,
                CycleMetric::Distinct => {
                    if seen[edge] != index {
                        seen[edge] = index;
                        count += 1;
                    }
                }
            }
        }
        if count > best_count {
            best_count = count;
            best_cycle = index;
        }
    }
    if best_count == 0 {
        return state.clone();
    }

    let mut in_cycle = vec![false; edge_count];
    for &edge in &instance.cycles()[best_cycle].edges {
        in_cycle[edge] = true;
    }
    let mut next = state.clone();
    next.retain_fences(|edge| !in_cycle[edge]);
    next
}

fn destroy_weighted<'a, R: Rng>(
    state: &SolutionState<'a>,
    hot: bool,
    rng: &mut R,
) -> SolutionState<'a> {
    let instance = state.instance();
    let count = removal_count(state.fences().len(), 0.1);

    let mut pool: Vec<usize> = (0..state.fences().len()).collect();
    let mut weights: Vec<f64> = state
        .fences()
        .iter()
        .map(|&edge| {
            let occurrences = instance.edge_cycle_count(edge).max(1) as f64;
            if hot {
                occurrences
            } else {
                occurrences.recip()
            }
        })
        .collect();

    let mut picked = Vec::with_capacity(count);
    for _ in 0..count {
        let slot = roulette(&weights, rng);
        picked.push(pool.swap_remove(slot));
        weights.swap_remove(slot);
    }
    remove_indices(state, picked)
}

fn remove_indices<'a>(state: &SolutionState<'a>, mut indices: Vec<usize>) -> SolutionState<'a> {
    let mut next = state.clone();
    indices.sort_unstable_by(|a, b| b.cmp(a));
    for index in indices {
        next.remove_fence_at(index);
    }
    next
}
