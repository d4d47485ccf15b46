//! # Per-provider and per-run results.
//!
//! - [`ProviderOutcome`]: what one provider task produced (exactly once per run)
//! - [`ProviderReport`]: an outcome tagged with its provider id, in completion order
//! - [`Outcome`]: the single externally observable result of a run
//! - `ResultSlot`: single-writer slot a provider task fills with its outcome
//!
//! ## Slot discipline
//! ```text
//! task i ── owns ResultSlot i ── fill(outcome) ──► oneshot ──► orchestrator
//!                                (consumes slot)              (sole reader)
//! ```
//! A slot is consumed by `fill`, so a second write cannot compile. A slot dropped
//! without being filled (aborted task) reads as an internal fault.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::oneshot;

use crate::error::RunError;

/// Successful run result: provider id → provider value.
pub type Values = BTreeMap<String, String>;

/// Result of one run: either every provider's value or one error.
pub type Outcome = Result<Values, RunError>;

/// What one provider task produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderOutcome {
    /// The provider returned a value.
    Success(String),
    /// The provider failed; the error is attributed to its id.
    Failure(RunError),
    /// The provider stopped because the run's scope was cancelled.
    Cancelled,
}

impl ProviderOutcome {
    /// True for [`ProviderOutcome::Failure`].
    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(self, ProviderOutcome::Failure(_))
    }

    /// Short label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ProviderOutcome::Success(_) => "success",
            ProviderOutcome::Failure(_) => "failure",
            ProviderOutcome::Cancelled => "cancelled",
        }
    }
}

/// A provider outcome tagged with the provider id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderReport {
    /// Provider id.
    pub id: Arc<str>,
    /// What the provider produced.
    pub outcome: ProviderOutcome,
}

impl ProviderReport {
    /// Creates a report.
    pub fn new(id: impl Into<Arc<str>>, outcome: ProviderOutcome) -> Self {
        Self {
            id: id.into(),
            outcome,
        }
    }

    /// Builds a report from what a slot delivered; an unfilled slot is an internal fault.
    pub(crate) fn received(
        id: Arc<str>,
        received: Result<ProviderOutcome, oneshot::error::RecvError>,
    ) -> Self {
        let outcome = received.unwrap_or_else(|_| {
            ProviderOutcome::Failure(RunError::InternalFault {
                provider: id.to_string(),
                reason: "provider task ended without reporting".to_string(),
            })
        });
        Self { id, outcome }
    }
}

/// Single-writer result slot owned by one provider task.
pub(crate) struct ResultSlot {
    tx: oneshot::Sender<ProviderOutcome>,
}

impl ResultSlot {
    /// Creates a slot and the receiver the orchestrator reads it through.
    pub(crate) fn new() -> (Self, oneshot::Receiver<ProviderOutcome>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Writes the outcome and notifies the orchestrator. Consumes the slot.
    ///
    /// If the orchestrator already stopped listening, the outcome is discarded.
    pub(crate) fn fill(self, outcome: ProviderOutcome) {
        let _ = self.tx.send(outcome);
    }
}
