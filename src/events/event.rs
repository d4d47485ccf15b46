//! # Observability events emitted by the orchestrator.
//!
//! The [`EventKind`] enum classifies event types across two categories:
//! - **Span events**: one span per run and one nested span per provider task
//!   (started, ended, error recorded)
//! - **Orchestration events**: decisions taken by the run (cancel requested,
//!   deadline hit, grace exceeded)
//!
//! The [`Event`] struct carries additional metadata such as timestamps, the run
//! it belongs to, the span name, attributes and reasons.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use fanvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::SpanError)
//!     .with_run(7)
//!     .with_span("flights")
//!     .with_reason("rate limited");
//!
//! assert_eq!(ev.kind, EventKind::SpanError);
//! assert_eq!(ev.span.as_deref(), Some("flights"));
//! assert_eq!(ev.reason.as_deref(), Some("rate limited"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Name of the span that wraps a whole run.
pub const RUN_SPAN: &str = "run";

/// Key/value pair attached to a span when it starts.
pub type Attribute = (&'static str, String);

/// Classification of observability events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Span events ===
    /// A span started.
    ///
    /// Sets:
    /// - `run`: run id
    /// - `span`: [`RUN_SPAN`] or the provider id
    /// - `attributes`: span attributes (provider count for runs, provider-defined otherwise)
    SpanStarted,

    /// A span ended. Emitted exactly once for every `SpanStarted`.
    ///
    /// Sets:
    /// - `run`: run id
    /// - `span`: span name
    SpanEnded,

    /// An error was recorded on a span (always before its `SpanEnded`).
    ///
    /// Sets:
    /// - `run`: run id
    /// - `span`: span name
    /// - `reason`: error message
    SpanError,

    // === Orchestration events ===
    /// The run fired its scope cancellation (fail-fast or deadline).
    ///
    /// Sets:
    /// - `run`: run id
    /// - `reason`: `"provider_failed"` or `"deadline"`
    CancelRequested,

    /// The run's deadline elapsed before every provider reported.
    ///
    /// Sets:
    /// - `run`: run id
    /// - `timeout_ms`: the run budget (ms)
    DeadlineHit,

    /// Cancelled providers did not report within the grace period and were aborted.
    ///
    /// Sets:
    /// - `run`: run id
    /// - `timeout_ms`: the grace period (ms)
    /// - `reason`: ids of the aborted providers
    GraceExceeded,
}

/// Observability event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Id of the run this event belongs to.
    pub run: Option<u64>,
    /// Span name (`"run"` or a provider id).
    pub span: Option<Arc<str>>,
    /// Span attributes (only for `SpanStarted`).
    pub attributes: Vec<Attribute>,
    /// Human-readable reason (errors, cancel cause, aborted providers).
    pub reason: Option<Arc<str>>,
    /// Budget or grace in milliseconds (compact).
    pub timeout_ms: Option<u32>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            run: None,
            span: None,
            attributes: Vec::new(),
            reason: None,
            timeout_ms: None,
        }
    }

    /// Attaches the run id.
    #[inline]
    pub fn with_run(mut self, run: u64) -> Self {
        self.run = Some(run);
        self
    }

    /// Attaches a span name.
    #[inline]
    pub fn with_span(mut self, span: impl Into<Arc<str>>) -> Self {
        self.span = Some(span.into());
        self
    }

    /// Attaches span attributes.
    #[inline]
    pub fn with_attributes(mut self, attributes: Vec<Attribute>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a duration (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.timeout_ms = Some(ms);
        self
    }

    /// Looks up a span attribute by key.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// True for [`EventKind::SpanStarted`].
    #[inline]
    pub fn is_span_start(&self) -> bool {
        matches!(self.kind, EventKind::SpanStarted)
    }

    /// True for [`EventKind::SpanEnded`].
    #[inline]
    pub fn is_span_end(&self) -> bool {
        matches!(self.kind, EventKind::SpanEnded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_numbers_increase() {
        let a = Event::new(EventKind::SpanStarted);
        let b = Event::new(EventKind::SpanEnded);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn timeout_saturates_at_u32() {
        let ev = Event::new(EventKind::DeadlineHit).with_timeout(Duration::from_secs(u64::MAX));
        assert_eq!(ev.timeout_ms, Some(u32::MAX));
    }

    #[test]
    fn attribute_lookup() {
        let ev = Event::new(EventKind::SpanStarted)
            .with_span("hotels")
            .with_attributes(vec![("city", "Paris".into()), ("minBudget", "100".into())]);
        assert_eq!(ev.attribute("city"), Some("Paris"));
        assert_eq!(ev.attribute("maxBudget"), None);
        assert!(ev.is_span_start());
    }
}
