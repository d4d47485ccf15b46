//! # Function-backed provider (`ProviderFn`)
//!
//! [`ProviderFn`] wraps a closure `F: Fn(Scope, Arc<P>) -> Fut`, producing a fresh
//! future per fetch. Shared state, if any, must be captured explicitly (`Arc<...>`).
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use fanvisor::{ProviderFn, ProviderRef, ProviderError, Scope};
//!
//! let p: ProviderRef<()> = ProviderFn::arc("flights", |_scope: Scope, _params: Arc<()>| async move {
//!     Ok::<_, ProviderError>("$500".to_string())
//! });
//!
//! assert_eq!(p.id(), "flights");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::Scope;
use crate::error::ProviderError;
use crate::providers::provider::Provider;

/// Function-backed provider implementation.
#[derive(Debug)]
pub struct ProviderFn<F> {
    id: Cow<'static, str>,
    f: F,
}

impl<F> ProviderFn<F> {
    /// Creates a new function-backed provider.
    ///
    /// Prefer [`ProviderFn::arc`] when you immediately need a [`ProviderRef`](crate::ProviderRef).
    pub fn new(id: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { id: id.into(), f }
    }

    /// Creates the provider and returns it as a shared handle.
    pub fn arc(id: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(id, f))
    }
}

#[async_trait]
impl<P, F, Fut> Provider<P> for ProviderFn<F>
where
    P: Send + Sync + 'static,
    F: Fn(Scope, Arc<P>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String, ProviderError>> + Send + 'static,
{
    fn id(&self) -> &str {
        &self.id
    }

    async fn fetch(&self, scope: Scope, params: Arc<P>) -> Result<String, ProviderError> {
        (self.f)(scope, params).await
    }
}
