//! # Result reducer.
//!
//! Pure merge of per-provider reports (in completion order) into one [`Outcome`].
//!
//! ## Policy
//! ```text
//! for report in completion order:
//!   Failure(e) → return Err(e)         (first failure wins)
//!   Success(v) → values[id] = v
//!   Cancelled  → skipped               (only ever downstream of a failure or deadline)
//! return Ok(values)
//! ```
//!
//! Deadline handling is not a reduction concern: a run that hit its deadline
//! never reaches the reducer (see `Orchestrator::run`).

use crate::core::outcome::{Outcome, ProviderOutcome, ProviderReport, Values};

/// Reduces reports, in the order they were observed, into a run outcome.
///
/// Deterministic: the same sequence always yields the same outcome.
///
/// # Example
/// ```
/// use fanvisor::{reduce, ProviderError, ProviderOutcome, ProviderReport, RunError};
///
/// let failure = RunError::ProviderFailure {
///     provider: "flights".into(),
///     error: ProviderError::fail("rate limited"),
/// };
/// let reports = vec![
///     ProviderReport::new("weather", ProviderOutcome::Success("Sunny".into())),
///     ProviderReport::new("flights", ProviderOutcome::Failure(failure.clone())),
///     ProviderReport::new("hotels", ProviderOutcome::Cancelled),
/// ];
/// assert_eq!(reduce(&reports), Err(failure));
/// ```
pub fn reduce(reports: &[ProviderReport]) -> Outcome {
    let mut values = Values::new();
    for report in reports {
        match &report.outcome {
            ProviderOutcome::Failure(err) => return Err(err.clone()),
            ProviderOutcome::Success(value) => {
                values.insert(report.id.to_string(), value.clone());
            }
            ProviderOutcome::Cancelled => {}
        }
    }
    Ok(values)
}
