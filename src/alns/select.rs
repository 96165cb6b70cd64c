//! Adaptive operator selection.
//!
//! Destroy and repair operators are drawn from separate pools, each with
//! its own weights. Every iteration credits the pair it used with the
//! iteration's objective improvement; once per adaptive period the weights
//! absorb the accumulated scores, so operators that recently found better
//! states are drawn more often.

use rand::Rng;

/// How operators are drawn from a pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionPolicy {
    /// Uniform choice; weights are kept for diagnostics but never consulted.
    Random,
    /// Roulette wheel over adaptive weights. Scores fold exponentially
    /// while they accumulate, so the most recent iterations dominate the
    /// period's verdict.
    RouletteWheel { decay: f64 },
    /// Roulette wheel whose scores accumulate raw within each period.
    RouletteWheelSegmented,
}

impl SelectionPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::RouletteWheel { .. } => "roulette-wheel",
            Self::RouletteWheelSegmented => "roulette-wheel-segmented",
        }
    }

    pub(super) fn validate(&self) -> Result<(), String> {
        if let Self::RouletteWheel { decay } = *self {
            if decay <= 0.0 || decay > 1.0 {
                return Err(format!("selection decay must be in (0, 1], got {decay}"));
            }
        }
        Ok(())
    }
}

/// Weight, score, and usage bookkeeping for one operator pool.
#[derive(Debug, Clone)]
pub(super) struct OperatorSelector {
    policy: SelectionPolicy,
    weights: Vec<f64>,
    scores: Vec<f64>,
    uses: Vec<u64>,
}

impl OperatorSelector {
    pub(super) fn new(policy: SelectionPolicy, operators: usize) -> Self {
        Self {
            policy,
            weights: vec![1.0 / operators as f64; operators],
            scores: vec![0.0; operators],
            uses: vec![0; operators],
        }
    }

    pub(super) fn pick<R: Rng>(&mut self, rng: &mut R) -> usize {
        let index = match self.policy {
            SelectionPolicy::Random => rng.random_range(0..self.weights.len()),
            _ => roulette(&self.weights, rng),
        };
        self.uses[index] += 1;
        index
    }

    /// Credits the operator with this iteration's objective improvement
    /// (negative when the candidate was worse).
    pub(super) fn record(&mut self, index: usize, improvement: f64) {
        match self.policy {
            SelectionPolicy::RouletteWheel { decay } => {
                self.scores[index] = decay * self.scores[index] + improvement;
            }
            _ => self.scores[index] += improvement,
        }
    }

    /// End-of-period update: each weight grows by its share of the period's
    /// total score, floors at `min_weight`, and the wheel is renormalized
    /// to sum 1. Scores reset to zero.
    pub(super) fn update_weights(&mut self, min_weight: f64) {
        if !matches!(self.policy, SelectionPolicy::Random) {
            let total: f64 = self.scores.iter().sum();
            if total > 0.0 {
                for (weight, score) in self.weights.iter_mut().zip(&self.scores) {
                    *weight += score / total;
                }
            }
            for weight in &mut self.weights {
                *weight = weight.max(min_weight);
            }
            let sum: f64 = self.weights.iter().sum();
            for weight in &mut self.weights {
                *weight /= sum;
            }
        }
        self.scores.fill(0.0);
    }

    pub(super) fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub(super) fn uses(&self) -> &[u64] {
        &self.uses
    }
}

/// Walks the wheel: draws a point in `[0, total)` and returns the slot it
/// lands in. Falls back to the first slot when the wheel has no mass.
pub(super) fn roulette<R: Rng>(weights: &[f64], rng: &mut R) -> usize {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return 0;
    }
    let mut roll = rng.random_range(0.0..total);
    for (index, &weight) in weights.iter().enumerate() {
        roll -= weight;
        if roll <= 0.0 {
            return index;
        }
    }
    weights.len() - 1
}
