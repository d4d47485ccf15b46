//! # Orchestrator: concurrent fan-out with a shared deadline and fail-fast cancellation.
//!
//! The [`Orchestrator`] owns the configuration and the subscriber fan-out. Each call to
//! [`Orchestrator::run`] is fully independent: it gets a fresh [`ExecutionScope`], fresh
//! result slots and its own tasks, none of which outlive the call.
//!
//! ## High-level architecture
//! ```text
//! run(providers, params, budget)
//!   ├─► validate (non-empty, unique ids)          ──► Err(InvalidArgument)
//!   ├─► ExecutionScope::new(budget)                   (budget = 0 ─► Err(Timeout))
//!   ├─► for each ProviderSpec:
//!   │     ResultSlot ◄─┐
//!   │     tasks.spawn(run_provider(spec, scope.handle(), params, slot))
//!   │                  └─► pending.push(slot receiver)
//!   │
//!   ├─► wait for the first of:
//!   │     (a) a report carrying Failure   ─► scope.cancel()  ─┐
//!   │     (b) every slot reported         ─────────────────── ┤
//!   │     (c) deadline elapsed            ─► scope.expire()  ─┤
//!   │                                                         ▼
//!   ├─► drain remaining slots for at most `cfg.grace`, then abort stragglers
//!   └─► (c) ─► Err(Timeout)      otherwise ─► reduce(reports in completion order)
//! ```
//!
//! ## Rules
//! - Reports are observed in **completion order**, not input order. When two providers
//!   fail at (nearly) the same time, the one observed first is surfaced; this is not
//!   deterministic under true parallelism.
//! - A deadline overrides partial successes: the run returns `Timeout` even if every
//!   provider that did finish succeeded.
//! - No retries. Callers decide whether to run again.
//! - The sink never influences the outcome; an orchestrator without subscribers is valid.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use fanvisor::{Config, Orchestrator, ProviderSpec, StubProvider};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let orch = Orchestrator::builder(Config::default()).build();
//!
//!     let providers: Vec<ProviderSpec<()>> = vec![
//!         ProviderSpec::new(StubProvider::succeed("weather", "Sunny")),
//!         ProviderSpec::new(StubProvider::succeed("flights", "$500")),
//!     ];
//!
//!     let values = orch.run(providers, (), Duration::from_secs(1)).await.unwrap();
//!     assert_eq!(values["weather"], "Sunny");
//!     assert_eq!(values["flights"], "$500");
//! }
//! ```

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tokio::sync::oneshot;
use tokio::task::JoinSet;
use tokio::time;
use tracing::{Instrument, debug, info_span, warn};

use crate::config::Config;
use crate::core::builder::OrchestratorBuilder;
use crate::core::outcome::{Outcome, ProviderOutcome, ProviderReport, ResultSlot};
use crate::core::reducer::reduce;
use crate::core::runner::run_provider;
use crate::core::scope::{CancelCause, ExecutionScope};
use crate::error::RunError;
use crate::events::{Event, EventKind, RUN_SPAN};
use crate::providers::ProviderSpec;
use crate::subscribers::SubscriberSet;

/// Global run counter for event correlation.
static RUN_SEQ: AtomicU64 = AtomicU64::new(1);

/// Which of the three signals ended the wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    /// A provider reported a failure.
    Failed,
    /// Every provider reported.
    Complete,
    /// The deadline elapsed first.
    Deadline,
}

/// Launches providers concurrently and reconciles their results into one [`Outcome`].
pub struct Orchestrator {
    cfg: Config,
    subs: Arc<SubscriberSet>,
}

impl Orchestrator {
    /// Returns a builder for configuring subscribers.
    pub fn builder(cfg: Config) -> OrchestratorBuilder {
        OrchestratorBuilder::new(cfg)
    }

    pub(crate) fn new_internal(cfg: Config, subs: SubscriberSet) -> Self {
        Self {
            cfg,
            subs: Arc::new(subs),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Runs `providers` with the configured default budget.
    pub async fn run_with_defaults<P>(&self, providers: Vec<ProviderSpec<P>>, params: P) -> Outcome
    where
        P: Send + Sync + 'static,
    {
        self.run(providers, params, self.cfg.budget).await
    }

    /// Runs every provider concurrently under one deadline.
    ///
    /// Returns every provider's value keyed by id, or the first error observed:
    /// - [`RunError::InvalidArgument`] for an empty provider list or duplicate ids
    /// - [`RunError::ProviderFailure`] / [`RunError::InternalFault`] for the first failing provider
    /// - [`RunError::Timeout`] if `budget` elapses before every provider reported
    pub async fn run<P>(
        &self,
        providers: Vec<ProviderSpec<P>>,
        params: P,
        budget: Duration,
    ) -> Outcome
    where
        P: Send + Sync + 'static,
    {
        let run = RUN_SEQ.fetch_add(1, Ordering::Relaxed);
        let span = info_span!("run", run, providers = providers.len());

        async move {
            self.publish(
                Event::new(EventKind::SpanStarted)
                    .with_run(run)
                    .with_span(RUN_SPAN)
                    .with_attributes(vec![
                        ("providers", providers.len().to_string()),
                        ("budget_ms", budget.as_millis().to_string()),
                    ]),
            );

            let outcome = self.execute(run, providers, Arc::new(params), budget).await;

            if let Err(err) = &outcome {
                debug!(error = %err, label = err.as_label(), "run failed");
                self.publish(
                    Event::new(EventKind::SpanError)
                        .with_run(run)
                        .with_span(RUN_SPAN)
                        .with_reason(err.to_string()),
                );
            }
            self.publish(
                Event::new(EventKind::SpanEnded)
                    .with_run(run)
                    .with_span(RUN_SPAN),
            );
            outcome
        }
        .instrument(span)
        .await
    }

    /// Flushes pending subscriber events and stops subscriber workers.
    ///
    /// Call once no run is in flight.
    pub async fn shutdown(self) {
        match Arc::try_unwrap(self.subs) {
            Ok(set) => set.shutdown().await,
            Err(_) => warn!("subscribers still referenced; skipping flush"),
        }
    }

    async fn execute<P>(
        &self,
        run: u64,
        providers: Vec<ProviderSpec<P>>,
        params: Arc<P>,
        budget: Duration,
    ) -> Outcome
    where
        P: Send + Sync + 'static,
    {
        validate(&providers)?;

        let scope = ExecutionScope::new(budget);
        if scope.is_cancelled() {
            self.publish_deadline(run, budget);
            return Err(RunError::Timeout { budget });
        }

        let ids: Vec<Arc<str>> = providers.iter().map(ProviderSpec::id_arc).collect();
        let mut tasks = JoinSet::new();
        let mut pending = FuturesUnordered::new();

        for spec in providers {
            let (slot, rx) = ResultSlot::new();
            let id = spec.id_arc();
            let span = info_span!("provider", id = %id);
            pending.push(async move { (id, rx.await) });
            tasks.spawn(
                run_provider(
                    run,
                    spec,
                    scope.handle(),
                    Arc::clone(&params),
                    slot,
                    Arc::clone(&self.subs),
                )
                .instrument(span),
            );
        }

        let mut reports: Vec<ProviderReport> = Vec::with_capacity(ids.len());
        let deadline = time::sleep_until(scope.deadline());
        tokio::pin!(deadline);

        let stop = loop {
            tokio::select! {
                biased;
                next = pending.next() => match next {
                    Some((id, received)) => {
                        let report = ProviderReport::received(id, received);
                        let failed = report.outcome.is_failure();
                        reports.push(report);
                        if failed {
                            break Stop::Failed;
                        }
                    }
                    None => break Stop::Complete,
                },
                _ = &mut deadline => break Stop::Deadline,
            }
        };
        // The scope's own timer may fire first and let cancelled providers report
        // before the deadline branch is polled.
        let stop = if scope.cause() == Some(CancelCause::Deadline) {
            Stop::Deadline
        } else {
            stop
        };

        match stop {
            Stop::Complete => {}
            Stop::Failed => {
                scope.cancel();
                warn!(
                    provider = ?reports.last().map(|r| &*r.id),
                    "provider failed; cancelling siblings"
                );
                self.publish(
                    Event::new(EventKind::CancelRequested)
                        .with_run(run)
                        .with_reason("provider_failed"),
                );
            }
            Stop::Deadline => {
                scope.expire();
                self.publish_deadline(run, budget);
                self.publish(
                    Event::new(EventKind::CancelRequested)
                        .with_run(run)
                        .with_reason("deadline"),
                );
            }
        }

        if !pending.is_empty() {
            self.drain(run, &ids, &mut pending, &mut reports).await;
        }
        tasks.shutdown().await;

        match stop {
            Stop::Deadline => Err(RunError::Timeout { budget }),
            Stop::Failed | Stop::Complete => reduce(&reports),
        }
    }

    /// Collects late reports for at most `cfg.grace`; anything still pending is aborted
    /// by the caller and reported as `GraceExceeded`.
    async fn drain<F>(
        &self,
        run: u64,
        ids: &[Arc<str>],
        pending: &mut FuturesUnordered<F>,
        reports: &mut Vec<ProviderReport>,
    ) where
        F: Future<Output = (Arc<str>, Result<ProviderOutcome, oneshot::error::RecvError>)>,
    {
        let grace = self.cfg.grace;
        let collect = async {
            while let Some((id, received)) = pending.next().await {
                reports.push(ProviderReport::received(id, received));
            }
        };
        if time::timeout(grace, collect).await.is_ok() {
            return;
        }

        let stuck: Vec<&str> = ids
            .iter()
            .filter(|id| !reports.iter().any(|r| r.id == **id))
            .map(|id| &**id)
            .collect();
        warn!(?grace, ?stuck, "providers ignored cancellation; aborting");
        self.publish(
            Event::new(EventKind::GraceExceeded)
                .with_run(run)
                .with_timeout(grace)
                .with_reason(stuck.join(",")),
        );
    }

    fn publish_deadline(&self, run: u64, budget: Duration) {
        warn!(?budget, "deadline elapsed before all providers reported");
        self.publish(
            Event::new(EventKind::DeadlineHit)
                .with_run(run)
                .with_timeout(budget),
        );
    }

    #[inline]
    fn publish(&self, ev: Event) {
        self.subs.emit(ev);
    }
}

/// Rejects empty provider lists and duplicate ids.
fn validate<P>(providers: &[ProviderSpec<P>]) -> Result<(), RunError>
where
    P: Send + Sync + 'static,
{
    if providers.is_empty() {
        return Err(RunError::InvalidArgument {
            reason: "no providers given".to_string(),
        });
    }
    let mut seen = HashSet::with_capacity(providers.len());
    for spec in providers {
        if !seen.insert(spec.id()) {
            return Err(RunError::InvalidArgument {
                reason: format!("duplicate provider id: {}", spec.id()),
            });
        }
    }
    Ok(())
}
