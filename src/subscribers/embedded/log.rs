//! # LogWriter: forwards sink events to `tracing`
//!
//! A minimal subscriber that writes incoming [`Event`]s as structured
//! `tracing` records under the `fanvisor::events` target.
//!
//! ## Example output (fmt layer)
//! ```text
//! INFO fanvisor::events: span started run=3 span="run" attrs=[("providers", "3")]
//! INFO fanvisor::events: span started run=3 span="flights" attrs=[("city", "Paris"), ...]
//! WARN fanvisor::events: span error run=3 span="flights" err="rate limited"
//! WARN fanvisor::events: cancel requested run=3 reason="provider_failed"
//! INFO fanvisor::events: span ended run=3 span="run"
//! ```

use async_trait::async_trait;
use tracing::{info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

const TARGET: &str = "fanvisor::events";

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let span = e.span.as_deref().unwrap_or("unknown");
        match e.kind {
            EventKind::SpanStarted => {
                info!(target: TARGET, run = ?e.run, span, attrs = ?e.attributes, "span started");
            }
            EventKind::SpanEnded => {
                info!(target: TARGET, run = ?e.run, span, "span ended");
            }
            EventKind::SpanError => {
                warn!(target: TARGET, run = ?e.run, span, err = ?e.reason, "span error");
            }
            EventKind::CancelRequested => {
                warn!(target: TARGET, run = ?e.run, reason = ?e.reason, "cancel requested");
            }
            EventKind::DeadlineHit => {
                warn!(target: TARGET, run = ?e.run, budget_ms = ?e.timeout_ms, "deadline hit");
            }
            EventKind::GraceExceeded => {
                warn!(
                    target: TARGET,
                    run = ?e.run,
                    grace_ms = ?e.timeout_ms,
                    aborted = ?e.reason,
                    "grace exceeded"
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
