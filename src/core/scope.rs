//! # Deadline controller: the per-run cancellation scope.
//!
//! [`ExecutionScope`] is owned by the orchestrator for the duration of one run.
//! Providers receive a read-only [`Scope`] handle and can only observe it.
//!
//! ## State machine
//! ```text
//! Active ──┬── budget elapsed (timer) ──► Cancelled(Deadline)
//!          └── ExecutionScope::cancel() ─► Cancelled(Explicit)
//! ```
//!
//! ## Rules
//! - Cancellation is **monotonic**: once fired it stays fired
//! - Firing again is a **no-op**; the first cause wins
//! - `budget = 0` yields a scope that is already `Cancelled(Deadline)` (no timer spawned)
//! - Dropping the [`ExecutionScope`] stops its timer; handles keep observing the last state
//! - Deadlines use [`tokio::time::Instant`], so paused test clocks apply

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::error::ProviderError;

/// Why a scope was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelCause {
    /// The budget elapsed.
    Deadline,
    /// The orchestrator fired cancellation early (fail-fast).
    Explicit,
}

struct Shared {
    token: CancellationToken,
    deadline: Instant,
    cause: OnceLock<CancelCause>,
}

impl Shared {
    /// Returns `true` if this call performed the transition.
    fn fire(&self, cause: CancelCause) -> bool {
        let first = self.cause.set(cause).is_ok();
        self.token.cancel();
        first
    }
}

/// Read-only view of a run's scope, handed to every provider.
///
/// Cheap to clone. Exposes the deadline and the cancellation signal but no way to fire it.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use fanvisor::{ProviderError, Scope};
///
/// async fn lookup(scope: Scope) -> Result<String, ProviderError> {
///     scope.sleep(Duration::from_millis(50)).await?; // simulated I/O, cancellable
///     Ok("Sunny".to_string())
/// }
/// ```
#[derive(Clone)]
pub struct Scope {
    shared: Arc<Shared>,
}

impl Scope {
    /// Instant at which the scope cancels itself.
    pub fn deadline(&self) -> Instant {
        self.shared.deadline
    }

    /// Time left until the deadline (zero once passed).
    pub fn remaining(&self) -> Duration {
        self.shared
            .deadline
            .saturating_duration_since(Instant::now())
    }

    /// True once cancellation has fired for any cause.
    pub fn is_cancelled(&self) -> bool {
        self.shared.token.is_cancelled()
    }

    /// Resolves once cancellation has fired.
    pub async fn cancelled(&self) {
        self.shared.token.cancelled().await
    }

    /// The cause of cancellation, if it has fired.
    pub fn cause(&self) -> Option<CancelCause> {
        self.shared.cause.get().copied()
    }

    /// Returns a child token that is cancelled together with this scope.
    ///
    /// Useful for handing the signal to libraries that speak [`CancellationToken`].
    pub fn child_token(&self) -> CancellationToken {
        self.shared.token.child_token()
    }

    /// Sleeps for `dur` unless the scope is cancelled first.
    ///
    /// Returns [`ProviderError::Canceled`] when cancellation wins, so providers can `?` it.
    pub async fn sleep(&self, dur: Duration) -> Result<(), ProviderError> {
        if self.is_cancelled() {
            return Err(ProviderError::Canceled);
        }
        tokio::select! {
            _ = time::sleep(dur) => Ok(()),
            _ = self.cancelled() => Err(ProviderError::Canceled),
        }
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("deadline", &self.shared.deadline)
            .field("cancelled", &self.is_cancelled())
            .field("cause", &self.cause())
            .finish()
    }
}

/// Cancellable, deadline-bound scope owned by one run.
///
/// Created with [`ExecutionScope::new`]; must be created inside a tokio runtime
/// when `budget > 0` (a timer task is spawned).
pub struct ExecutionScope {
    scope: Scope,
    timer: Option<JoinHandle<()>>,
}

impl ExecutionScope {
    /// Derives a scope that cancels itself once `budget` elapses.
    ///
    /// A zero budget produces a scope that is already cancelled.
    pub fn new(budget: Duration) -> Self {
        let now = Instant::now();
        let deadline = now.checked_add(budget).unwrap_or_else(far_future);
        let shared = Arc::new(Shared {
            token: CancellationToken::new(),
            deadline,
            cause: OnceLock::new(),
        });

        if budget.is_zero() {
            shared.fire(CancelCause::Deadline);
            return Self {
                scope: Scope { shared },
                timer: None,
            };
        }

        let watched = Arc::clone(&shared);
        let timer = tokio::spawn(async move {
            tokio::select! {
                _ = time::sleep_until(watched.deadline) => {
                    watched.fire(CancelCause::Deadline);
                }
                _ = watched.token.cancelled() => {}
            }
        });

        Self {
            scope: Scope { shared },
            timer: Some(timer),
        }
    }

    /// Fires cancellation early. Returns `true` if this call performed the transition.
    pub fn cancel(&self) -> bool {
        self.scope.shared.fire(CancelCause::Explicit)
    }

    /// Fires cancellation attributed to the deadline (used when the orchestrator
    /// observes the deadline before the timer task runs).
    pub(crate) fn expire(&self) -> bool {
        self.scope.shared.fire(CancelCause::Deadline)
    }

    /// Returns a read-only handle for providers.
    pub fn handle(&self) -> Scope {
        self.scope.clone()
    }

    /// Instant at which the scope cancels itself.
    pub fn deadline(&self) -> Instant {
        self.scope.deadline()
    }

    /// True once cancellation has fired.
    pub fn is_cancelled(&self) -> bool {
        self.scope.is_cancelled()
    }

    /// The cause of cancellation, if it has fired.
    pub fn cause(&self) -> Option<CancelCause> {
        self.scope.cause()
    }
}

impl Drop for ExecutionScope {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

/// Roughly thirty years from now; used when `now + budget` overflows.
fn far_future() -> Instant {
    Instant::now() + Duration::from_secs(86_400 * 365 * 30)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn zero_budget_is_cancelled_at_construction() {
        let scope = ExecutionScope::new(Duration::ZERO);
        assert!(scope.is_cancelled());
        assert_eq!(scope.cause(), Some(CancelCause::Deadline));
    }

    #[tokio::test(start_paused = true)]
    async fn fires_when_budget_elapses() {
        let scope = ExecutionScope::new(Duration::from_secs(2));
        let handle = scope.handle();
        assert!(!handle.is_cancelled());
        assert_eq!(handle.remaining(), Duration::from_secs(2));

        handle.cancelled().await;
        assert_eq!(handle.cause(), Some(CancelCause::Deadline));
        assert_eq!(handle.remaining(), Duration::ZERO);
    }

    #[tokio::test]
    async fn explicit_cancel_is_idempotent_and_first_cause_wins() {
        let scope = ExecutionScope::new(Duration::from_secs(60));
        assert!(scope.cancel());
        assert!(!scope.cancel());
        assert!(!scope.expire());
        assert_eq!(scope.cause(), Some(CancelCause::Explicit));
        assert!(scope.handle().child_token().is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn sleep_is_interrupted_by_cancel() {
        let scope = ExecutionScope::new(Duration::from_secs(60));
        let handle = scope.handle();
        let sleeper = tokio::spawn(async move { handle.sleep(Duration::from_secs(5)).await });

        tokio::task::yield_now().await;
        scope.cancel();
        assert_eq!(sleeper.await.unwrap(), Err(ProviderError::Canceled));
    }

    #[tokio::test(start_paused = true)]
    async fn sleep_completes_inside_budget() {
        let scope = ExecutionScope::new(Duration::from_secs(60));
        assert_eq!(scope.handle().sleep(Duration::from_secs(1)).await, Ok(()));
    }

    #[tokio::test]
    async fn handles_keep_state_after_owner_drops() {
        let scope = ExecutionScope::new(Duration::from_secs(60));
        let handle = scope.handle();
        scope.cancel();
        drop(scope);
        assert!(handle.is_cancelled());
    }
}
