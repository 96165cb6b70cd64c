//! Exact fence placement through an external 0/1 cover solve.
//!
//! The engine talks to an integer-programming backend through a narrow
//! boundary: it hands over a [`CoverModel`] (one binary variable per
//! candidate edge, one covering constraint per critical cycle, optionally a
//! set of already-placed fences pinned to 1) plus [`SolveLimits`], and gets
//! back a [`CoverSolution`]. Backends are opaque; they may shell out to an
//! external process and may parallelize internally. [`GreedyCoverSolver`]
//! is a bundled pure-Rust stand-in.
//!
//! Every model the engine builds draws its rows from cycle edge lists and
//! is therefore satisfiable; a backend answering [`SolveStatus::Infeasible`]
//! on such a model has broken its contract, which callers surface as
//! [`FenceError::SolverContract`](crate::error::FenceError::SolverContract).

use std::time::{Duration, Instant};

use crate::aeg::EdgeId;
use crate::error::{FenceError, Result};

/// A 0/1 covering model over edge variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverModel {
    variables: Vec<EdgeId>,
    covers: Vec<Vec<EdgeId>>,
    fixed: Vec<EdgeId>,
}

impl CoverModel {
    /// Builds a model from one edge row per cycle to break. The variable
    /// set is the union of all rows, in first-occurrence order.
    pub fn new(covers: Vec<Vec<EdgeId>>) -> Self {
        let mut variables = Vec::new();
        for row in &covers {
            for &edge in row {
                if !variables.contains(&edge) {
                    variables.push(edge);
                }
            }
        }
        Self {
            variables,
            covers,
            fixed: Vec::new(),
        }
    }

    /// Pins already-placed fences to 1. Fences outside the current variable
    /// set are registered as additional variables.
    pub fn with_fixed(mut self, fences: &[EdgeId]) -> Self {
        for &edge in fences {
            if !self.variables.contains(&edge) {
                self.variables.push(edge);
            }
            if !self.fixed.contains(&edge) {
                self.fixed.push(edge);
            }
        }
        self
    }

    /// Distinct candidate edges, in first-occurrence order over the rows,
    /// fixed-only edges last.
    pub fn variables(&self) -> &[EdgeId] {
        &self.variables
    }

    /// Covering rows; each solved assignment selects at least one edge per
    /// row.
    pub fn covers(&self) -> &[Vec<EdgeId>] {
        &self.covers
    }

    /// Edges every assignment must select.
    pub fn fixed(&self) -> &[EdgeId] {
        &self.fixed
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn cover_count(&self) -> usize {
        self.covers.len()
    }
}

/// Resource limits handed to a backend. The default imposes none.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolveLimits {
    /// Wall-time budget for the solve.
    pub time_limit: Option<Duration>,
    /// Stop at the first feasible assignment instead of proving optimality.
    pub first_feasible_only: bool,
    /// Cap on backend node exploration.
    pub max_nodes: Option<u64>,
}

impl SolveLimits {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn first_feasible(mut self) -> Self {
        self.first_feasible_only = true;
        self
    }

    pub fn with_max_nodes(mut self, max_nodes: u64) -> Self {
        self.max_nodes = Some(max_nodes);
        self
    }
}

/// Status of a backend after a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Proven optimal assignment found.
    Optimal,
    /// Feasible assignment found; optimality not proven (typically because
    /// a limit cut the solve short).
    Feasible,
    /// The backend claims no assignment satisfies the model.
    Infeasible,
}

/// Assignment returned by a backend.
#[derive(Debug, Clone)]
pub struct CoverSolution {
    pub status: SolveStatus,
    /// Selected edges, including any pinned fences.
    pub fences: Vec<EdgeId>,
    /// Number of selected edges.
    pub objective: usize,
    /// Incumbent objective values observed during the solve, if the
    /// backend reports them. Informational only.
    pub incumbents: Vec<usize>,
    /// Wall time the backend spent.
    pub solve_time: Duration,
}

impl CoverSolution {
    /// An empty assignment with the given status.
    pub fn empty(status: SolveStatus) -> Self {
        Self {
            status,
            fences: Vec::new(),
            objective: 0,
            incumbents: Vec::new(),
            solve_time: Duration::ZERO,
        }
    }

    /// Whether a usable assignment was found.
    pub fn is_solution_found(&self) -> bool {
        matches!(self.status, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

/// Boundary to an exact 0/1 cover backend.
///
/// Implementors provide the actual optimization. The call blocks until the
/// backend finishes or hits a limit.
pub trait ExactSolver {
    fn solve(&self, model: &CoverModel, limits: &SolveLimits) -> CoverSolution;
}

/// A greedy cover solver for testing and as a backend-free fallback.
///
/// Repeatedly selects the edge covering the most still-open rows until
/// every row is covered. This is a plain set-cover heuristic, not an exact
/// solver: it always reports [`SolveStatus::Feasible`], even when the
/// result happens to be optimal, and it ignores `limits`.
pub struct GreedyCoverSolver;

impl GreedyCoverSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GreedyCoverSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ExactSolver for GreedyCoverSolver {
    fn solve(&self, model: &CoverModel, _limits: &SolveLimits) -> CoverSolution {
        let start = Instant::now();

        // An empty row is genuinely unsatisfiable.
        if model.covers().iter().any(|row| row.is_empty()) {
            let mut solution = CoverSolution::empty(SolveStatus::Infeasible);
            solution.solve_time = start.elapsed();
            return solution;
        }

        let mut chosen: Vec<EdgeId> = model.fixed().to_vec();
        let mut open: Vec<&Vec<EdgeId>> = model
            .covers()
            .iter()
            .filter(|row| !row.iter().any(|edge| chosen.contains(edge)))
            .collect();

        while !open.is_empty() {
            let mut best_edge = None;
            let mut best_count = 0usize;
            for &edge in model.variables() {
                if chosen.contains(&edge) {
                    continue;
                }
                let count = open.iter().filter(|row| row.contains(&edge)).count();
                if count > best_count {
                    best_count = count;
                    best_edge = Some(edge);
                }
            }
            // Every open row still holds at least one unchosen edge.
            let edge = match best_edge {
                Some(edge) => edge,
                None => break,
            };
            chosen.push(edge);
            open.retain(|row| !row.contains(&edge));
        }

        let objective = chosen.len();
        CoverSolution {
            status: SolveStatus::Feasible,
            fences: chosen,
            objective,
            incumbents: vec![objective],
            solve_time: start.elapsed(),
        }
    }
}

/// Runs `solver` on `model` and checks the answer against the backend
/// contract: the status must signal a usable assignment, and the returned
/// fences must be distinct model variables.
pub fn solve_cycle_cover(
    solver: &dyn ExactSolver,
    model: &CoverModel,
    limits: &SolveLimits,
) -> Result<CoverSolution> {
    let solution = solver.solve(model, limits);
    if !solution.is_solution_found() {
        return Err(FenceError::SolverContract(format!(
            "backend reported {:?} on a {}-row cycle cover",
            solution.status,
            model.cover_count()
        )));
    }
    let mut seen = vec![false; model.variable_count()];
    for &fence in &solution.fences {
        match model.variables().iter().position(|&edge| edge == fence) {
            Some(index) if !seen[index] => seen[index] = true,
            _ => {
                return Err(FenceError::SolverContract(format!(
                    "backend assignment names edge {fence} outside the model or twice"
                )));
            }
        }
    }
    Ok(solution)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variables_in_first_occurrence_order() {
        let model = CoverModel::new(vec![vec![3, 1], vec![1, 0], vec![0, 3]]);
        assert_eq!(model.variables(), &[3, 1, 0]);
        assert_eq!(model.cover_count(), 3);
    }

    #[test]
    fn test_with_fixed_registers_unknown_edges() {
        let model = CoverModel::new(vec![vec![0, 1]]).with_fixed(&[1, 7]);
        assert_eq!(model.variables(), &[0, 1, 7]);
        assert_eq!(model.fixed(), &[1, 7]);
    }

    #[test]
    fn test_greedy_prefers_widest_cover() {
        let model = CoverModel::new(vec![vec![0, 2], vec![1, 2]]);
        let solution = GreedyCoverSolver::new().solve(&model, &SolveLimits::none());

        assert!(solution.is_solution_found());
        assert_eq!(solution.fences, vec![2]);
        assert_eq!(solution.objective, 1);
    }

    #[test]
    fn test_greedy_honors_fixed_fences() {
        let model = CoverModel::new(vec![vec![0], vec![1, 2]]).with_fixed(&[0]);
        let solution = GreedyCoverSolver::new().solve(&model, &SolveLimits::none());

        assert!(solution.fences.contains(&0));
        assert_eq!(solution.objective, 2);
        for row in model.covers() {
            assert!(row.iter().any(|edge| solution.fences.contains(edge)));
        }
    }

    #[test]
    fn test_greedy_reports_empty_row_infeasible() {
        let model = CoverModel::new(vec![vec![0], vec![]]);
        let solution = GreedyCoverSolver::new().solve(&model, &SolveLimits::none());

        assert_eq!(solution.status, SolveStatus::Infeasible);
        assert!(!solution.is_solution_found());
        assert!(solution.fences.is_empty());
    }

    #[test]
    fn test_greedy_with_no_rows_returns_fixed_only() {
        let model = CoverModel::new(Vec::new()).with_fixed(&[4]);
        let solution = GreedyCoverSolver::new().solve(&model, &SolveLimits::none());

        assert_eq!(solution.fences, vec![4]);
        assert_eq!(solution.objective, 1);
    }

    #[test]
    fn test_limit_builders() {
        let limits = SolveLimits::none()
            .with_time_limit(Duration::from_millis(500))
            .first_feasible()
            .with_max_nodes(10_000);

        assert_eq!(limits.time_limit, Some(Duration::from_millis(500)));
        assert!(limits.first_feasible_only);
        assert_eq!(limits.max_nodes, Some(10_000));

        let default = SolveLimits::default();
        assert!(default.time_limit.is_none());
        assert!(!default.first_feasible_only);
    }

    struct InfeasibleSolver;

    impl ExactSolver for InfeasibleSolver {
        fn solve(&self, _model: &CoverModel, _limits: &SolveLimits) -> CoverSolution {
            CoverSolution::empty(SolveStatus::Infeasible)
        }
    }

    struct AlienSolver;

    impl ExactSolver for AlienSolver {
        fn solve(&self, _model: &CoverModel, _limits: &SolveLimits) -> CoverSolution {
            CoverSolution {
                status: SolveStatus::Optimal,
                fences: vec![9],
                objective: 1,
                incumbents: vec![1],
                solve_time: Duration::ZERO,
            }
        }
    }

    #[test]
    fn test_solve_cycle_cover_passes_clean_answer() {
        let model = CoverModel::new(vec![vec![0, 1], vec![1, 2]]);
        let solution =
            solve_cycle_cover(&GreedyCoverSolver::new(), &model, &SolveLimits::none()).unwrap();

        assert_eq!(solution.fences, vec![1]);
    }

    #[test]
    fn test_solve_cycle_cover_rejects_infeasible_answer() {
        let model = CoverModel::new(vec![vec![0, 1]]);
        let err = solve_cycle_cover(&InfeasibleSolver, &model, &SolveLimits::none()).unwrap_err();

        assert!(matches!(err, FenceError::SolverContract(_)), "got {err}");
    }

    #[test]
    fn test_solve_cycle_cover_rejects_alien_edges() {
        let model = CoverModel::new(vec![vec![0, 1]]);
        let err = solve_cycle_cover(&AlienSolver, &model, &SolveLimits::none()).unwrap_err();

        assert!(matches!(err, FenceError::SolverContract(_)), "got {err}");
    }
}
