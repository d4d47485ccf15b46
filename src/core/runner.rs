//! # Run one provider task.
//!
//! Executes one provider call under the run's scope, publishes its span to the
//! sink, and fills the task's result slot.
//!
//! ## Event flow
//!
//! ```text
//! Success:
//!   SpanStarted → fetch() → Ok(v)                     → SpanEnded → fill(Success)
//!
//! Cancellation (scope fired):
//!   SpanStarted → fetch() → Err(Canceled)             → SpanEnded → fill(Cancelled)
//!
//! Failure:
//!   SpanStarted → fetch() → Err(Fail)                 → SpanError → SpanEnded → fill(Failure)
//!
//! Panic:
//!   SpanStarted → fetch() panics (caught)             → SpanError → SpanEnded → fill(Failure/InternalFault)
//!
//! Aborted after grace (task dropped mid-fetch):
//!   SpanStarted → fetch() ... dropped                 → SpanError("aborted after grace") → SpanEnded
//! ```
//!
//! ## Rules
//! - Fills its slot **exactly once**, and only after its span ended
//! - Every `SpanStarted` gets exactly one `SpanEnded`, even when the task is aborted
//! - `Canceled` counts as cancellation only if the scope actually fired; otherwise it is a failure
//! - Panics never escape the task

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::debug;

use crate::core::outcome::{ProviderOutcome, ResultSlot};
use crate::core::scope::Scope;
use crate::error::{ProviderError, RunError, panic_message};
use crate::events::{Event, EventKind};
use crate::providers::ProviderSpec;
use crate::subscribers::SubscriberSet;

/// Runs `spec`'s provider once and reports through `slot`.
pub(crate) async fn run_provider<P>(
    run: u64,
    spec: ProviderSpec<P>,
    scope: Scope,
    params: Arc<P>,
    slot: ResultSlot,
    sink: Arc<SubscriberSet>,
) where
    P: Send + Sync + 'static,
{
    let id = spec.id_arc();
    sink.emit(
        Event::new(EventKind::SpanStarted)
            .with_run(run)
            .with_span(Arc::clone(&id))
            .with_attributes(spec.provider().attributes(&params)),
    );
    let mut span = SpanGuard {
        run,
        id: Arc::clone(&id),
        sink,
        open: true,
    };

    let fetch = spec.provider().fetch(scope.clone(), params);
    let outcome = match AssertUnwindSafe(fetch).catch_unwind().await {
        Ok(Ok(value)) => ProviderOutcome::Success(value),
        Ok(Err(ProviderError::Canceled)) if scope.is_cancelled() => ProviderOutcome::Cancelled,
        Ok(Err(error)) => ProviderOutcome::Failure(RunError::ProviderFailure {
            provider: id.to_string(),
            error,
        }),
        Err(panic) => ProviderOutcome::Failure(RunError::InternalFault {
            provider: id.to_string(),
            reason: format!("panicked: {}", panic_message(panic.as_ref())),
        }),
    };

    match &outcome {
        ProviderOutcome::Failure(err) => {
            debug!(error = %err, label = err.as_label(), "provider failed");
            span.close(Some(err.to_string()));
        }
        other => {
            debug!(outcome = other.as_label(), "provider finished");
            span.close(None);
        }
    }

    slot.fill(outcome);
}

/// Closes a provider span exactly once; if the task is dropped mid-fetch the
/// span is closed on drop with an abort reason.
struct SpanGuard {
    run: u64,
    id: Arc<str>,
    sink: Arc<SubscriberSet>,
    open: bool,
}

impl SpanGuard {
    /// Publishes `SpanError` (if `error` is set) followed by `SpanEnded`.
    fn close(&mut self, error: Option<String>) {
        if !self.open {
            return;
        }
        self.open = false;
        if let Some(reason) = error {
            self.sink.emit(
                Event::new(EventKind::SpanError)
                    .with_run(self.run)
                    .with_span(Arc::clone(&self.id))
                    .with_reason(reason),
            );
        }
        self.sink.emit(
            Event::new(EventKind::SpanEnded)
                .with_run(self.run)
                .with_span(Arc::clone(&self.id)),
        );
    }
}

impl Drop for SpanGuard {
    fn drop(&mut self) {
        self.close(Some(ABORTED.to_string()));
    }
}

/// Reason recorded on a provider span whose task was aborted.
const ABORTED: &str = "aborted after grace";
