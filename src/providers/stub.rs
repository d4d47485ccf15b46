//! # Configurable stub provider.
//!
//! [`StubProvider`] stands in for a real data source in tests and demos:
//! fixed latency, fixed behavior, and a [`StubProbe`] recording what it observed.
//!
//! ```text
//! fetch()
//!   ├─► calls += 1
//!   ├─► wait `latency`
//!   │     ├─ honoring cancel: scope fires first → saw_cancel, Err(Canceled)
//!   │     └─ ignoring cancel: full wait, saw_cancel if scope fired meanwhile
//!   └─► behave: Ok(value) | Err(Fail) | panic!
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time;

use crate::core::Scope;
use crate::error::ProviderError;
use crate::providers::provider::Provider;

/// What a stub does once its latency has elapsed.
#[derive(Debug, Clone)]
pub enum StubBehavior {
    /// Return the value.
    Succeed(String),
    /// Return [`ProviderError::Fail`] with the message.
    Fail(String),
    /// Panic with the message.
    Panic(String),
}

/// Shared record of what a stub observed. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct StubProbe {
    calls: Arc<AtomicUsize>,
    saw_cancel: Arc<AtomicBool>,
    completed: Arc<AtomicBool>,
}

impl StubProbe {
    /// Number of `fetch` calls.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// True if the stub observed scope cancellation.
    pub fn saw_cancel(&self) -> bool {
        self.saw_cancel.load(Ordering::SeqCst)
    }

    /// True if the stub ran to its configured behavior.
    pub fn completed(&self) -> bool {
        self.completed.load(Ordering::SeqCst)
    }
}

/// Stub provider with configurable latency and behavior.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use fanvisor::StubProvider;
///
/// let slow = StubProvider::succeed("weather", "Sunny").with_latency(Duration::from_secs(5));
/// let probe = slow.probe();
/// assert_eq!(probe.calls(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct StubProvider {
    id: String,
    latency: Duration,
    behavior: StubBehavior,
    honor_cancel: bool,
    probe: StubProbe,
}

impl StubProvider {
    /// Creates a stub with the given behavior, no latency, honoring cancellation.
    pub fn new(id: impl Into<String>, behavior: StubBehavior) -> Self {
        Self {
            id: id.into(),
            latency: Duration::ZERO,
            behavior,
            honor_cancel: true,
            probe: StubProbe::default(),
        }
    }

    /// Stub that returns `value`.
    pub fn succeed(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(id, StubBehavior::Succeed(value.into()))
    }

    /// Stub that fails with `error`.
    pub fn fail(id: impl Into<String>, error: impl Into<String>) -> Self {
        Self::new(id, StubBehavior::Fail(error.into()))
    }

    /// Stub that panics with `message`.
    pub fn panic(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(id, StubBehavior::Panic(message.into()))
    }

    /// Sets the simulated latency.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Makes the stub sit out its full latency even after cancellation.
    pub fn ignoring_cancel(mut self) -> Self {
        self.honor_cancel = false;
        self
    }

    /// Returns the probe shared with this stub.
    pub fn probe(&self) -> StubProbe {
        self.probe.clone()
    }
}

#[async_trait]
impl<P> Provider<P> for StubProvider
where
    P: Send + Sync + 'static,
{
    fn id(&self) -> &str {
        &self.id
    }

    async fn fetch(&self, scope: Scope, _params: Arc<P>) -> Result<String, ProviderError> {
        self.probe.calls.fetch_add(1, Ordering::SeqCst);

        if self.honor_cancel {
            if let Err(e) = scope.sleep(self.latency).await {
                self.probe.saw_cancel.store(true, Ordering::SeqCst);
                return Err(e);
            }
        } else {
            time::sleep(self.latency).await;
            if scope.is_cancelled() {
                self.probe.saw_cancel.store(true, Ordering::SeqCst);
            }
        }

        self.probe.completed.store(true, Ordering::SeqCst);
        match &self.behavior {
            StubBehavior::Succeed(value) => Ok(value.clone()),
            StubBehavior::Fail(error) => Err(ProviderError::fail(error.clone())),
            StubBehavior::Panic(message) => panic!("{message}"),
        }
    }
}
