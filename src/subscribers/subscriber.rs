//! # Observability sink trait.
//!
//! Provides [`Subscribe`] an extension point for plugging custom event handlers into the orchestrator.
//!
//! Each subscriber gets:
//! - **Dedicated worker task** (runs independently)
//! - **Per-subscriber bounded queue** (capacity via [`Subscribe::queue_capacity`])
//! - **Panic isolation** (panics are caught and logged)
//!
//! ## Architecture
//! ```text
//! SubscriberSet ──► [bounded queue] ──► worker task ──► subscriber.on_event()
//!                                    └─► panic caught → tracing::warn!
//! ```
//!
//! ## Rules
//! - A slow subscriber only affects its own queue.
//! - Queue overflow drops the event **for this subscriber only**.
//! - Events are processed sequentially (FIFO) per subscriber.
//! - Subscribers never block a run; a run's outcome never depends on them.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use fanvisor::{Event, EventKind, Subscribe};
//!
//! struct Errors;
//!
//! #[async_trait]
//! impl Subscribe for Errors {
//!     async fn on_event(&self, ev: &Event) {
//!         if matches!(ev.kind, EventKind::SpanError) {
//!             // page someone, etc.
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "errors" }
//!     fn queue_capacity(&self) -> Option<usize> { Some(64) }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Event subscriber for run observability.
///
/// Span start/end and recorded errors arrive as [`EventKind::SpanStarted`](crate::EventKind::SpanStarted),
/// [`EventKind::SpanEnded`](crate::EventKind::SpanEnded) and [`EventKind::SpanError`](crate::EventKind::SpanError).
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; do not panic.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event.
    ///
    /// Called from a dedicated worker task, not in the publisher context.
    async fn on_event(&self, event: &Event);

    /// Returns the subscriber name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns the preferred queue capacity for this subscriber.
    ///
    /// `None` uses [`Config::subscriber_capacity`](crate::Config::subscriber_capacity).
    /// The runtime clamps capacity to a minimum of 1.
    fn queue_capacity(&self) -> Option<usize> {
        None
    }
}
