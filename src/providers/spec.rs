//! # Provider registration for one run.
//!
//! [`ProviderSpec`] binds a provider to the id it is addressed by in a run:
//! the key of its value in the result map and the attribution of its errors.
//!
//! ## Rules
//! - Ids must be unique within one run (`Orchestrator::run` rejects duplicates).
//! - A spec is immutable once built.

use std::sync::Arc;

use crate::providers::provider::{Provider, ProviderRef};

/// A provider plus the id it is registered under.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use fanvisor::{ProviderError, ProviderFn, ProviderRef, ProviderSpec, Scope};
///
/// let flights: ProviderRef<()> = ProviderFn::arc("flights", |_s: Scope, _p: Arc<()>| async {
///     Ok::<_, ProviderError>("$500".to_string())
/// });
///
/// let spec = ProviderSpec::from_ref(flights.clone());
/// assert_eq!(spec.id(), "flights");
///
/// let renamed = ProviderSpec::named("air", flights);
/// assert_eq!(renamed.id(), "air");
/// ```
pub struct ProviderSpec<P: Send + Sync + 'static> {
    id: Arc<str>,
    provider: ProviderRef<P>,
}

impl<P: Send + Sync + 'static> ProviderSpec<P> {
    /// Registers `provider` under its own id.
    pub fn new<T: Provider<P>>(provider: T) -> Self {
        Self::from_ref(Arc::new(provider))
    }

    /// Registers an already shared provider under its own id.
    pub fn from_ref(provider: ProviderRef<P>) -> Self {
        Self {
            id: Arc::from(provider.id()),
            provider,
        }
    }

    /// Registers `provider` under an explicit id.
    pub fn named(id: impl Into<Arc<str>>, provider: ProviderRef<P>) -> Self {
        Self {
            id: id.into(),
            provider,
        }
    }

    /// Returns the registration id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the registration id as a shared string.
    pub(crate) fn id_arc(&self) -> Arc<str> {
        Arc::clone(&self.id)
    }

    /// Returns the provider.
    pub fn provider(&self) -> &ProviderRef<P> {
        &self.provider
    }
}

impl<P: Send + Sync + 'static> Clone for ProviderSpec<P> {
    fn clone(&self) -> Self {
        Self {
            id: Arc::clone(&self.id),
            provider: Arc::clone(&self.provider),
        }
    }
}

impl<P: Send + Sync + 'static> std::fmt::Debug for ProviderSpec<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSpec").field("id", &self.id).finish()
    }
}
