//! Observability events.
//!
//! This module holds the event **data model** handed to the Observability
//! Sink ([`Subscribe`](crate::Subscribe)) by the orchestrator.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`RUN_SPAN`] name of the span wrapping one run
//!
//! ## Quick reference
//! - **Publishers**: `Orchestrator::run` (run span, orchestration decisions) and
//!   `runner::run_provider` (one span per provider task).
//! - **Consumers**: [`SubscriberSet`](crate::SubscriberSet) fans events out to user subscribers.

mod event;

pub use event::{Attribute, Event, EventKind, RUN_SPAN};
