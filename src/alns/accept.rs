//! Candidate acceptance policies.

use rand::Rng;

/// Policy deciding whether a repaired candidate replaces the current state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AcceptancePolicy {
    /// Accept iff the candidate is no worse than the current state.
    HillClimbing,
    /// Metropolis criterion: a candidate worse by `delta` is accepted with
    /// probability `exp(-delta / temperature)`; the temperature cools
    /// geometrically each iteration and floors at `min_temperature`.
    SimulatedAnnealing {
        initial_temperature: f64,
        cooling_rate: f64,
        min_temperature: f64,
    },
}

impl AcceptancePolicy {
    /// Simulated annealing with the stock schedule: start at 500, cool by
    /// 0.95 per iteration, floor at 1.
    pub fn simulated_annealing() -> Self {
        Self::SimulatedAnnealing {
            initial_temperature: 500.0,
            cooling_rate: 0.95,
            min_temperature: 1.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::HillClimbing => "hill-climbing",
            Self::SimulatedAnnealing { .. } => "simulated-annealing",
        }
    }

    pub(super) fn validate(&self) -> Result<(), String> {
        if let Self::SimulatedAnnealing {
            initial_temperature,
            cooling_rate,
            min_temperature,
        } = *self
        {
            if initial_temperature <= 0.0 {
                return Err(format!(
                    "initial temperature must be positive, got {initial_temperature}"
                ));
            }
            if cooling_rate <= 0.0 || cooling_rate >= 1.0 {
                return Err(format!(
                    "cooling rate must be in (0, 1), got {cooling_rate}"
                ));
            }
            if min_temperature <= 0.0 || min_temperature > initial_temperature {
                return Err(format!(
                    "minimum temperature must be in (0, {initial_temperature}], got {min_temperature}"
                ));
            }
        }
        Ok(())
    }
}

/// Runtime acceptance state; owns the annealing temperature.
#[derive(Debug, Clone)]
pub(super) struct Acceptance {
    policy: AcceptancePolicy,
    temperature: f64,
}

impl Acceptance {
    pub(super) fn new(policy: AcceptancePolicy) -> Self {
        let temperature = match policy {
            AcceptancePolicy::SimulatedAnnealing {
                initial_temperature,
                ..
            } => initial_temperature,
            AcceptancePolicy::HillClimbing => 0.0,
        };
        Self {
            policy,
            temperature,
        }
    }

    /// Decides on the candidate and advances the cooling schedule. Call
    /// exactly once per iteration.
    pub(super) fn accept<R: Rng>(&mut self, rng: &mut R, current: usize, candidate: usize) -> bool {
        match self.policy {
            AcceptancePolicy::HillClimbing => candidate <= current,
            AcceptancePolicy::SimulatedAnnealing {
                cooling_rate,
                min_temperature,
                ..
            } => {
                let accepted = if candidate < current {
                    true
                } else {
                    let delta = (candidate - current) as f64;
                    rng.random_range(0.0..1.0) < (-delta / self.temperature).exp()
                };
                self.temperature = (self.temperature * cooling_rate).max(min_temperature);
                accepted
            }
        }
    }

    /// Current temperature; `None` under hill climbing.
    pub(super) fn temperature(&self) -> Option<f64> {
        match self.policy {
            AcceptancePolicy::HillClimbing => None,
            AcceptancePolicy::SimulatedAnnealing { .. } => Some(self.temperature),
        }
    }
}
