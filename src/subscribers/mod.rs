//! # Observability sink for orchestration runs.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out
//! and built-in implementations.
//!
//! ## Architecture
//! ```text
//! Orchestrator::run ──┐
//!                     ├── emit(Event) ──► SubscriberSet ──┬──► [queue] ──► LogWriter
//! runner (per task) ──┘                                   ├──► [queue] ──► Metrics
//!                                                         └──► [queue] ──► Custom ...
//! ```
//!
//! An empty set is a valid no-op sink.

mod embedded;
mod set;
mod subscriber;

pub use embedded::LogWriter;
pub use set::SubscriberSet;
pub use subscriber::Subscribe;
