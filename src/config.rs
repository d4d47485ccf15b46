//! # Global orchestrator configuration.
//!
//! Provides [`Config`] centralized settings for the orchestrator.
//!
//! Config is used in two ways:
//! 1. **Orchestrator creation**: `Orchestrator::builder(config)`
//! 2. **Run defaults**: `Orchestrator::run_with_defaults` takes its budget from `config.budget`
//!
//! ## Sentinel values
//! - `budget = 0s` → every run times out immediately (no provider is started)
//! - `grace = 0s` → stragglers that are not already finished are aborted right after cancellation
//! - `subscriber_capacity = 0` → clamped to 1

use std::time::Duration;

/// Global configuration for the orchestrator.
///
/// ## Field semantics
/// - `budget`: Default per-run deadline, used by `run_with_defaults`
/// - `grace`: Maximum wait for cancelled providers to report before they are aborted
/// - `subscriber_capacity`: Default per-subscriber queue size for subscribers that do not override it
#[derive(Clone, Debug)]
pub struct Config {
    /// Default deadline for one run.
    pub budget: Duration,

    /// Bounded wait for still-running providers after fail-fast or deadline.
    ///
    /// Providers that have not finished within `grace` are aborted so that no
    /// task outlives its run. The run's outcome is already decided at that point.
    pub grace: Duration,

    /// Default queue capacity for subscribers.
    pub subscriber_capacity: usize,
}

impl Config {
    /// Returns a subscriber capacity clamped to a minimum of 1.
    #[inline]
    pub fn subscriber_capacity_clamped(&self) -> usize {
        self.subscriber_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `budget = 10s`
    /// - `grace = 1s`
    /// - `subscriber_capacity = 1024`
    fn default() -> Self {
        Self {
            budget: Duration::from_secs(10),
            grace: Duration::from_secs(1),
            subscriber_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscriber_capacity_is_clamped() {
        let cfg = Config {
            subscriber_capacity: 0,
            ..Config::default()
        };
        assert_eq!(cfg.subscriber_capacity_clamped(), 1);
    }
}
