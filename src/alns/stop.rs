//! Termination policies for the search loop.

use std::time::Duration;

/// When the loop stops and hands back its best state.
///
/// The policy is polled once per iteration, before the iteration body
/// runs, so a satisfied policy costs no further operator applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopPolicy {
    /// Stop once wall time reaches `limit`.
    MaxRuntime { limit: Duration },
    /// Stop once the current objective reaches `target`. Without a `limit`
    /// the search runs until the target is hit, however long that takes.
    UntilObjective {
        target: usize,
        limit: Option<Duration>,
    },
}

impl StopPolicy {
    pub fn max_runtime(limit: Duration) -> Self {
        Self::MaxRuntime { limit }
    }

    pub fn until_objective(target: usize) -> Self {
        Self::UntilObjective {
            target,
            limit: None,
        }
    }

    pub fn until_objective_capped(target: usize, limit: Duration) -> Self {
        Self::UntilObjective {
            target,
            limit: Some(limit),
        }
    }

    pub fn triggered(&self, elapsed: Duration, current_objective: usize) -> bool {
        match *self {
            Self::MaxRuntime { limit } => elapsed >= limit,
            Self::UntilObjective { target, limit } => {
                current_objective <= target || limit.is_some_and(|cap| elapsed >= cap)
            }
        }
    }

    pub(super) fn validate(&self) -> Result<(), String> {
        let limit = match *self {
            Self::MaxRuntime { limit } => Some(limit),
            Self::UntilObjective { limit, .. } => limit,
        };
        if limit.is_some_and(|limit| limit.is_zero()) {
            return Err("runtime limit must be positive".into());
        }
        Ok(())
    }
}

impl Default for StopPolicy {
    fn default() -> Self {
        Self::MaxRuntime {
            limit: Duration::from_secs(60),
        }
    }
}
