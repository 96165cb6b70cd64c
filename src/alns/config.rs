//! Search configuration.

use super::accept::AcceptancePolicy;
use super::destroy::DestroyOp;
use super::initial::InitialStateGen;
use super::repair::RepairOp;
use super::select::SelectionPolicy;
use super::stop::StopPolicy;

/// Configuration for one fence-minimization run.
///
/// The default mirrors the stock command line: hot-edges initial state,
/// uniform operator selection, hill-climbing acceptance, a 60 second
/// runtime budget, and the solver-free operator portfolios. The ILP
/// initial state and repairs join only through
/// [`with_initial`](Self::with_initial) /
/// [`with_repair_ops`](Self::with_repair_ops), since they need a backend
/// attached at run time.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use tso_fence::alns::{AlnsConfig, StopPolicy};
///
/// let config = AlnsConfig::default()
///     .with_seed(42)
///     .with_stop(StopPolicy::max_runtime(Duration::from_secs(5)));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct AlnsConfig {
    /// How the first feasible state is built.
    pub initial: InitialStateGen,
    /// How destroy and repair operators are drawn each iteration.
    pub selection: SelectionPolicy,
    /// Whether a repaired candidate replaces the current state.
    pub acceptance: AcceptancePolicy,
    /// When the loop stops.
    pub stop: StopPolicy,
    /// Iterations between operator weight updates.
    pub adaptive_period: usize,
    /// Floor applied to every operator weight at each update.
    pub min_weight: f64,
    /// Destroy operator portfolio.
    pub destroy_ops: Vec<DestroyOp>,
    /// Repair operator portfolio.
    pub repair_ops: Vec<RepairOp>,
    /// Seed for the run's random stream; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for AlnsConfig {
    fn default() -> Self {
        Self {
            initial: InitialStateGen::HotEdges,
            selection: SelectionPolicy::Random,
            acceptance: AcceptancePolicy::HillClimbing,
            stop: StopPolicy::default(),
            adaptive_period: 100,
            min_weight: 0.01,
            destroy_ops: DestroyOp::default_portfolio(),
            repair_ops: RepairOp::default_portfolio(),
            seed: None,
        }
    }
}

impl AlnsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial(mut self, initial: InitialStateGen) -> Self {
        self.initial = initial;
        self
    }

    pub fn with_selection(mut self, selection: SelectionPolicy) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_acceptance(mut self, acceptance: AcceptancePolicy) -> Self {
        self.acceptance = acceptance;
        self
    }

    pub fn with_stop(mut self, stop: StopPolicy) -> Self {
        self.stop = stop;
        self
    }

    /// Sets the adaptive period, clamped to at least 1.
    pub fn with_adaptive_period(mut self, period: usize) -> Self {
        self.adaptive_period = period.max(1);
        self
    }

    pub fn with_min_weight(mut self, min_weight: f64) -> Self {
        self.min_weight = min_weight;
        self
    }

    pub fn with_destroy_ops(mut self, ops: Vec<DestroyOp>) -> Self {
        self.destroy_ops = ops;
        self
    }

    pub fn with_repair_ops(mut self, ops: Vec<RepairOp>) -> Self {
        self.repair_ops = ops;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Whether this configuration needs an exact solver attached at run
    /// time.
    pub fn requires_solver(&self) -> bool {
        self.initial.needs_solver() || self.repair_ops.iter().any(RepairOp::needs_solver)
    }

    /// Validates the configuration, reporting the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.destroy_ops.is_empty() {
            return Err("destroy portfolio is empty".into());
        }
        if self.repair_ops.is_empty() {
            return Err("repair portfolio is empty".into());
        }
        if self.adaptive_period == 0 {
            return Err("adaptive_period must be at least 1".into());
        }
        if self.min_weight <= 0.0 {
            return Err(format!(
                "min_weight must be positive, got {}",
                self.min_weight
            ));
        }
        for op in &self.destroy_ops {
            if let DestroyOp::Random { pct } = *op {
                if pct <= 0.0 || pct > 1.0 {
                    return Err(format!("destroy fraction must be in (0, 1], got {pct}"));
                }
            }
        }
        self.selection.validate()?;
        self.acceptance.validate()?;
        self.stop.validate()?;
        Ok(())
    }
}
