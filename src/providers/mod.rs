//! # Provider abstractions.
//!
//! This module provides the provider-related types:
//! - [`Provider`] - trait for implementing async, cancel-aware data sources
//! - [`ProviderFn`] - closure-backed provider implementation
//! - [`ProviderRef`] - shared reference to a provider (`Arc<dyn Provider<P>>`)
//! - [`ProviderSpec`] - provider bound to its id for one run
//! - [`StubProvider`] - configurable stand-in with latency, failure and panic modes

mod provider;
mod provider_fn;
mod spec;
mod stub;

pub use provider::{Provider, ProviderRef};
pub use provider_fn::ProviderFn;
pub use spec::ProviderSpec;
pub use stub::{StubBehavior, StubProbe, StubProvider};
