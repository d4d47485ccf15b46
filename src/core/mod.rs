//! Orchestration core: scope, fan-out and reduction.
//!
//! The public API from this module is [`Orchestrator`] plus the types that cross its boundary.
//!
//! Internal modules:
//! - [`scope`]: deadline controller (per-run cancellation + deadline);
//! - [`runner`]: executes one provider call, publishes its span, fills its slot;
//! - [`orchestrator`]: fan-out, first-of-three wait, fail-fast cancellation, drain;
//! - [`reducer`]: pure merge of reports into an [`Outcome`];
//! - [`outcome`]: per-provider and per-run result types, single-writer slots;
//! - [`builder`]: orchestrator construction with subscribers.

mod builder;
mod orchestrator;
mod outcome;
mod reducer;
mod runner;
mod scope;

pub use builder::OrchestratorBuilder;
pub use orchestrator::Orchestrator;
pub use outcome::{Outcome, ProviderOutcome, ProviderReport, Values};
pub use reducer::reduce;
pub use scope::{CancelCause, ExecutionScope, Scope};
