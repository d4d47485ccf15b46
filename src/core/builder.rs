use std::sync::Arc;

use crate::config::Config;
use crate::core::orchestrator::Orchestrator;
use crate::subscribers::{Subscribe, SubscriberSet};

/// Builder for constructing an [`Orchestrator`] with optional subscribers.
pub struct OrchestratorBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl OrchestratorBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive span and orchestration events through dedicated
    /// workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Adds a single subscriber.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Builds and returns the Orchestrator instance.
    ///
    /// Spawns one worker per subscriber, so it must run inside a tokio runtime
    /// unless no subscribers were given.
    pub fn build(self) -> Orchestrator {
        let subs = SubscriberSet::new(self.subscribers, self.cfg.subscriber_capacity_clamped());
        Orchestrator::new_internal(self.cfg, subs)
    }
}
