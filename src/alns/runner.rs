//! Search execution loop.

use std::fmt::Display;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info};

use super::accept::Acceptance;
use super::config::AlnsConfig;
use super::select::OperatorSelector;
use crate::aeg::EdgeId;
use crate::error::{FenceError, Result};
use crate::ilp::ExactSolver;
use crate::problem::{ProblemInstance, SolutionState};

/// Final diagnostics for one operator.
#[derive(Debug, Clone, Serialize)]
pub struct OperatorRecord {
    /// Display name of the operator.
    pub name: String,
    /// Times the operator was drawn.
    pub uses: u64,
    /// Outcome counts: new best, improved current, accepted, rejected.
    pub outcomes: [u64; 4],
    /// Selection weight at the end of the run.
    pub weight: f64,
}

/// Per-run statistics.
#[derive(Debug, Clone, Serialize)]
pub struct SearchStats {
    /// Objective of the current state after each iteration.
    pub objectives: Vec<usize>,
    pub destroy: Vec<OperatorRecord>,
    pub repair: Vec<OperatorRecord>,
}

/// Result of a search run.
#[derive(Debug, Clone)]
pub struct AlnsResult<'a> {
    /// Best state found; always feasible.
    pub best: SolutionState<'a>,
    /// Fence count of `best`.
    pub best_objective: usize,
    /// Fence count of the initial state.
    pub initial_objective: usize,
    /// Iterations executed.
    pub iterations: u64,
    /// 1-based iteration that produced `best`; 0 when the initial state
    /// was never improved.
    pub best_iteration: u64,
    /// Wall time of the run, initial state included.
    pub elapsed: Duration,
    /// Final annealing temperature; `None` under hill climbing.
    pub final_temperature: Option<f64>,
    pub stats: SearchStats,
}

/// Serializable digest of a run, without the per-iteration trace.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub fences: Vec<EdgeId>,
    pub best_objective: usize,
    pub initial_objective: usize,
    pub iterations: u64,
    pub best_iteration: u64,
    pub elapsed_ms: u64,
    pub destroy: Vec<OperatorRecord>,
    pub repair: Vec<OperatorRecord>,
}

impl AlnsResult<'_> {
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            fences: self.best.fences().to_vec(),
            best_objective: self.best_objective,
            initial_objective: self.initial_objective,
            iterations: self.iterations,
            best_iteration: self.best_iteration,
            elapsed_ms: self.elapsed.as_millis() as u64,
            destroy: self.stats.destroy.clone(),
            repair: self.stats.repair.clone(),
        }
    }
}

#[derive(Clone, Copy)]
enum Outcome {
    NewBest = 0,
    Improved = 1,
    Accepted = 2,
    Rejected = 3,
}

/// Executes the adaptive destroy/repair search.
pub struct AlnsRunner;

impl AlnsRunner {
    /// Runs with no exact-solver backend attached.
    pub fn run<'a>(instance: &'a ProblemInstance, config: &AlnsConfig) -> Result<AlnsResult<'a>> {
        Self::run_with_observer(instance, config, None, |_, _| {})
    }

    /// Runs with an optional backend for the ILP initial state and repairs.
    pub fn run_with_solver<'a>(
        instance: &'a ProblemInstance,
        config: &AlnsConfig,
        solver: Option<&dyn ExactSolver>,
    ) -> Result<AlnsResult<'a>> {
        Self::run_with_observer(instance, config, solver, |_, _| {})
    }

    /// Runs and calls `on_best` after every new best state, with the state
    /// and the 1-based iteration that produced it.
    pub fn run_with_observer<'a, F>(
        instance: &'a ProblemInstance,
        config: &AlnsConfig,
        solver: Option<&dyn ExactSolver>,
        mut on_best: F,
    ) -> Result<AlnsResult<'a>>
    where
        F: FnMut(&SolutionState<'a>, u64),
    {
        config.validate().map_err(FenceError::Configuration)?;
        if config.requires_solver() && solver.is_none() {
            return Err(FenceError::Configuration(
                "the portfolio includes exact-solver operators but no solver was attached".into(),
            ));
        }

        let start = Instant::now();
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let initial = config.initial.generate(instance, solver)?;
        let initial_objective = initial.objective();
        info!(
            generator = config.initial.name(),
            objective = initial_objective,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "initial state built"
        );

        let mut current = initial;
        let mut best = current.clone();
        let mut best_objective = best.objective();
        let mut best_iteration = 0u64;

        let mut destroy_selector =
            OperatorSelector::new(config.selection, config.destroy_ops.len());
        let mut repair_selector = OperatorSelector::new(config.selection, config.repair_ops.len());
        let mut destroy_outcomes = vec![[0u64; 4]; config.destroy_ops.len()];
        let mut repair_outcomes = vec![[0u64; 4]; config.repair_ops.len()];
        let mut acceptance = Acceptance::new(config.acceptance);
        let mut objectives: Vec<usize> = Vec::new();

        let mut iteration = 0u64;
        loop {
            if config.stop.triggered(start.elapsed(), current.objective()) {
                break;
            }
            iteration += 1;

            let destroy_index = destroy_selector.pick(&mut rng);
            let repair_index = repair_selector.pick(&mut rng);

            let destroyed = config.destroy_ops[destroy_index].apply(&current, &mut rng);
            let candidate = config.repair_ops[repair_index].apply(destroyed, &mut rng, solver)?;

            let current_objective = current.objective();
            let candidate_objective = candidate.objective();
            let improvement = current_objective as f64 - candidate_objective as f64;

            let accepted = acceptance.accept(&mut rng, current_objective, candidate_objective);

            let outcome = if candidate_objective < best_objective {
                Outcome::NewBest
            } else if candidate_objective < current_objective {
                Outcome::Improved
            } else if accepted {
                Outcome::Accepted
            } else {
                Outcome::Rejected
            };
            destroy_outcomes[destroy_index][outcome as usize] += 1;
            repair_outcomes[repair_index][outcome as usize] += 1;

            if candidate_objective < best_objective {
                best = candidate.clone();
                best_objective = candidate_objective;
                best_iteration = iteration;
                info!(
                    objective = best_objective,
                    iteration,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "new best state"
                );
                on_best(&best, iteration);
            }

            if accepted {
                current = candidate;
            }

            destroy_selector.record(destroy_index, improvement);
            repair_selector.record(repair_index, improvement);
            objectives.push(current.objective());

            if iteration.is_multiple_of(config.adaptive_period as u64) {
                destroy_selector.update_weights(config.min_weight);
                repair_selector.update_weights(config.min_weight);
                debug!(
                    iteration,
                    destroy = ?destroy_selector.weights(),
                    repair = ?repair_selector.weights(),
                    "operator weights updated"
                );
            }
        }

        info!(
            best_objective,
            initial_objective,
            iterations = iteration,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "search finished"
        );

        let stats = SearchStats {
            objectives,
            destroy: operator_records(&config.destroy_ops, &destroy_selector, &destroy_outcomes),
            repair: operator_records(&config.repair_ops, &repair_selector, &repair_outcomes),
        };
        Ok(AlnsResult {
            best,
            best_objective,
            initial_objective,
            iterations: iteration,
            best_iteration,
            elapsed: start.elapsed(),
            final_temperature: acceptance.temperature(),
            stats,
        })
    }
}

fn operator_records<T: Display>(
    ops: &[T],
    selector: &OperatorSelector,
    outcomes: &[[u64; 4]],
) -> Vec<OperatorRecord> {
    ops.iter()
        .zip(selector.weights())
        .zip(selector.uses())
        .zip(outcomes)
        .map(|(((op, &weight), &uses), &outcomes)| OperatorRecord {
            name: op.to_string(),
            uses,
            outcomes,
            weight,
        })
        .collect()
}
