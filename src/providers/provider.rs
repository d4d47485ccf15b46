//! # Provider abstraction.
//!
//! This module defines the [`Provider`] trait (async, cancel-aware).
//! The common handle type is [`ProviderRef`], an `Arc<dyn Provider<P>>` suitable for sharing across tasks.
//!
//! A provider receives a read-only [`Scope`] and should consult it around any
//! long-running or simulated work, returning [`ProviderError::Canceled`] once cancellation is observed.

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::Scope;
use crate::error::ProviderError;
use crate::events::Attribute;

/// # Asynchronous, cancel-aware data source.
///
/// A `Provider` has a stable [`id`](Provider::id) and an async [`fetch`](Provider::fetch)
/// producing one string-valued result per run. `P` is the request parameter type shared
/// (read-only) by every provider of a run.
///
/// Providers must not mutate shared state; their only output is the returned value.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use async_trait::async_trait;
/// use fanvisor::{Provider, ProviderError, Scope};
///
/// struct Weather;
///
/// #[async_trait]
/// impl Provider<String> for Weather {
///     fn id(&self) -> &str { "weather" }
///
///     async fn fetch(&self, scope: Scope, city: Arc<String>) -> Result<String, ProviderError> {
///         if scope.is_cancelled() {
///             return Err(ProviderError::Canceled);
///         }
///         Ok(format!("Sunny in {city}"))
///     }
/// }
/// ```
#[async_trait]
pub trait Provider<P>: Send + Sync + 'static
where
    P: Send + Sync + 'static,
{
    /// Returns a stable, human-readable provider id.
    fn id(&self) -> &str;

    /// Attributes attached to this provider's span for the given params.
    fn attributes(&self, _params: &P) -> Vec<Attribute> {
        Vec::new()
    }

    /// Produces this provider's value for one run.
    ///
    /// Implementations should watch `scope` and return [`ProviderError::Canceled`] promptly once it fires.
    async fn fetch(&self, scope: Scope, params: Arc<P>) -> Result<String, ProviderError>;
}

/// Shared handle to a provider.
pub type ProviderRef<P> = Arc<dyn Provider<P>>;
