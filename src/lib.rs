//! # fanvisor
//!
//! **Fanvisor** is a small concurrent fan-out orchestrator for Rust.
//!
//! It launches several independent async data providers at once under one
//! shared deadline, cancels the rest as soon as one fails, and reconciles
//! whatever came back into a single result. The bundled `travel` module and
//! `travel-planner` binary use it to answer trip-planning requests from three
//! providers (weather, flights, hotels).
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │ ProviderSpec │   │ ProviderSpec │   │ ProviderSpec │
//!     │  (weather)   │   │  (flights)   │   │   (hotels)   │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Orchestrator::run(providers, params, budget)                     │
//! │  - ExecutionScope (deadline + cancellation, one per run)          │
//! │  - JoinSet (provider tasks never outlive the run)                 │
//! │  - ResultSlot per task (single writer, completion-order reads)    │
//! └──────┬──────────────────┬──────────────────┬───────────────┬──────┘
//!        ▼                  ▼                  ▼               │
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   │
//!     │ run_provider │   │ run_provider │   │ run_provider │   │
//!     │ (one fetch)  │   │ (one fetch)  │   │ (one fetch)  │   │
//!     └┬─────────────┘   └┬─────────────┘   └┬─────────────┘   │
//!      │ SpanStarted      │ SpanStarted      │ SpanStarted     │ run span,
//!      │ SpanEnded        │ SpanError        │ SpanEnded       │ CancelRequested,
//!      │                  │ SpanEnded        │                 │ DeadlineHit, ...
//!      ▼                  ▼                  ▼                 ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                SubscriberSet (per-subscriber queues)              │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                         ┌─────────┼─────────┐
//!                         ▼         ▼         ▼
//!                      worker1   worker2   workerN
//!                         ▼         ▼         ▼
//!                     sub1.on   sub2.on   subN.on
//!                      _event()  _event()  _event()
//! ```
//!
//! ### Lifecycle
//! ```text
//! run(providers, params, budget)
//!   ├─► validate: non-empty, unique ids        ─► Err(InvalidArgument)
//!   ├─► budget == 0                            ─► Err(Timeout), nothing spawned
//!   ├─► spawn one task per provider
//!   ├─► wait for the first of:
//!   │     ├─ a provider failed     ─► cancel siblings, drain (bounded by grace) ─► Err(first failure)
//!   │     ├─ every provider done   ─► reduce                                    ─► Ok(values)
//!   │     └─ deadline elapsed      ─► cancel, drain (bounded by grace)          ─► Err(Timeout)
//!   └─► every spawned task has finished or been aborted before `run` returns
//! ```
//!
//! ## Features
//! | Area              | Description                                                     | Key types / traits                         |
//! |-------------------|-----------------------------------------------------------------|--------------------------------------------|
//! | **Orchestration** | Fan-out with a shared deadline and fail-fast cancellation.      | [`Orchestrator`], [`Outcome`]              |
//! | **Scope**         | Per-run deadline and cancellation signal.                       | [`ExecutionScope`], [`Scope`]              |
//! | **Providers**     | Define data sources as trait impls or closures.                 | [`Provider`], [`ProviderFn`], [`ProviderSpec`] |
//! | **Reduction**     | Pure merge of per-provider reports.                             | [`reduce`], [`ProviderReport`]             |
//! | **Subscriber API**| Hook into run and provider spans (logging, metrics, custom).    | [`Subscribe`], [`LogWriter`]               |
//! | **Errors**        | Typed errors for runs and providers.                            | [`RunError`], [`ProviderError`]            |
//! | **Configuration** | Default budget, drain grace, subscriber queue size.             | [`Config`]                                 |
//!
//! ## Optional features
//! - `server` _(default)_: the axum HTTP surface (`GET /plan`) and the `travel-planner` binary.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use fanvisor::{Config, LogWriter, Orchestrator, ProviderError, ProviderFn, ProviderRef, ProviderSpec, Scope};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let orch = Orchestrator::builder(Config::default())
//!         .with_subscriber(Arc::new(LogWriter::default()))
//!         .build();
//!
//!     let weather: ProviderRef<String> = ProviderFn::arc("weather", |_scope: Scope, city: Arc<String>| async move {
//!         Ok::<_, ProviderError>(format!("Sunny in {city}"))
//!     });
//!     let flights: ProviderRef<String> = ProviderFn::arc("flights", |scope: Scope, city: Arc<String>| async move {
//!         scope.sleep(Duration::from_millis(10)).await?;
//!         Ok::<_, ProviderError>(format!("Flights to {city}: $500-$700"))
//!     });
//!
//!     let providers = vec![ProviderSpec::from_ref(weather), ProviderSpec::from_ref(flights)];
//!     let values = orch
//!         .run(providers, "Paris".to_string(), Duration::from_secs(1))
//!         .await
//!         .unwrap();
//!
//!     assert_eq!(values["weather"], "Sunny in Paris");
//!     assert_eq!(values["flights"], "Flights to Paris: $500-$700");
//!     orch.shutdown().await;
//! }
//! ```
mod config;
mod core;
mod error;
mod events;
mod providers;
mod subscribers;

pub mod travel;

// ---- Public re-exports ----

pub use config::Config;
pub use core::{
    CancelCause, ExecutionScope, Orchestrator, OrchestratorBuilder, Outcome, ProviderOutcome,
    ProviderReport, Scope, Values, reduce,
};
pub use error::{ProviderError, RunError};
pub use events::{Attribute, Event, EventKind, RUN_SPAN};
pub use providers::{
    Provider, ProviderFn, ProviderRef, ProviderSpec, StubBehavior, StubProbe, StubProvider,
};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};

// Optional: HTTP surface for the travel planner.
// Enable with: `--features server`
#[cfg(feature = "server")]
pub mod server;
