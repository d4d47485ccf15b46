//! Error types used by the orchestrator and by providers.
//!
//! This module defines two main error enums:
//!
//! - [`RunError`]: the error side of a run's [`Outcome`](crate::Outcome).
//! - [`ProviderError`]: errors returned by individual provider calls.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by one orchestration run.
///
/// A run ends with exactly one of these or with a complete value map, never both.
/// Provider errors are always attributed to the provider id that produced them.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    /// The call into the orchestrator violated its preconditions
    /// (empty provider set, duplicate ids).
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the call.
        reason: String,
    },

    /// A provider reported an error; siblings were cancelled.
    #[error("error fetching {provider}: {error}")]
    ProviderFailure {
        /// Id of the failing provider.
        provider: String,
        /// The provider's own error.
        error: ProviderError,
    },

    /// The run's deadline elapsed before every provider reported.
    #[error("timed out after {budget:?}")]
    Timeout {
        /// The budget that was exceeded.
        budget: Duration,
    },

    /// A provider task terminated abnormally (panic, abort) without a well-formed result.
    #[error("internal fault in {provider}: {reason}")]
    InternalFault {
        /// Id of the faulted provider.
        provider: String,
        /// Panic payload or abort description.
        reason: String,
    },
}

impl RunError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use fanvisor::RunError;
    /// use std::time::Duration;
    ///
    /// let err = RunError::Timeout { budget: Duration::from_secs(10) };
    /// assert_eq!(err.as_label(), "run_timeout");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RunError::InvalidArgument { .. } => "run_invalid_argument",
            RunError::ProviderFailure { .. } => "run_provider_failure",
            RunError::Timeout { .. } => "run_timeout",
            RunError::InternalFault { .. } => "run_internal_fault",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RunError::InvalidArgument { reason } => format!("invalid argument: {reason}"),
            RunError::ProviderFailure { provider, error } => {
                format!("provider {provider} failed: {}", error.as_message())
            }
            RunError::Timeout { budget } => format!("deadline of {budget:?} elapsed"),
            RunError::InternalFault { provider, reason } => {
                format!("provider {provider} faulted: {reason}")
            }
        }
    }

    /// Returns the id of the provider this error is attributed to, if any.
    ///
    /// # Example
    /// ```
    /// use fanvisor::{ProviderError, RunError};
    ///
    /// let err = RunError::ProviderFailure {
    ///     provider: "flights".into(),
    ///     error: ProviderError::fail("rate limited"),
    /// };
    /// assert_eq!(err.provider(), Some("flights"));
    /// ```
    pub fn provider(&self) -> Option<&str> {
        match self {
            RunError::ProviderFailure { provider, .. } | RunError::InternalFault { provider, .. } => {
                Some(provider)
            }
            RunError::InvalidArgument { .. } | RunError::Timeout { .. } => None,
        }
    }

    /// True for [`RunError::Timeout`].
    pub fn is_timeout(&self) -> bool {
        matches!(self, RunError::Timeout { .. })
    }
}

/// # Errors returned by a provider call.
///
/// Providers report either a plain failure or that they stopped because
/// the run's scope was cancelled. The orchestrator never retries.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The call failed.
    #[error("{error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The provider observed scope cancellation and stopped early.
    #[error("context cancelled")]
    Canceled,
}

impl ProviderError {
    /// Shorthand for [`ProviderError::Fail`].
    pub fn fail(error: impl Into<String>) -> Self {
        ProviderError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ProviderError::Fail { .. } => "provider_failed",
            ProviderError::Canceled => "provider_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ProviderError::Fail { error } => format!("error: {error}"),
            ProviderError::Canceled => "context cancelled".to_string(),
        }
    }
}

/// Extracts a printable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_failure_display_names_provider() {
        let err = RunError::ProviderFailure {
            provider: "weather".into(),
            error: ProviderError::fail("city cannot be empty"),
        };
        assert_eq!(
            err.to_string(),
            "error fetching weather: city cannot be empty"
        );
        assert_eq!(err.as_label(), "run_provider_failure");
    }

    #[test]
    fn only_provider_errors_are_attributed() {
        let fault = RunError::InternalFault {
            provider: "hotels".into(),
            reason: "boom".into(),
        };
        assert_eq!(fault.provider(), Some("hotels"));

        let timeout = RunError::Timeout {
            budget: Duration::from_secs(1),
        };
        assert_eq!(timeout.provider(), None);
        assert!(timeout.is_timeout());

        let invalid = RunError::InvalidArgument {
            reason: "no providers".into(),
        };
        assert_eq!(invalid.provider(), None);
        assert!(!invalid.is_timeout());
    }

    #[test]
    fn provider_error_labels() {
        assert_eq!(ProviderError::fail("x").as_label(), "provider_failed");
        assert_eq!(ProviderError::Canceled.as_label(), "provider_canceled");
        assert_eq!(ProviderError::Canceled.to_string(), "context cancelled");
    }

    #[test]
    fn panic_message_downcasts() {
        let owned: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        let borrowed: Box<dyn std::any::Any + Send> = Box::new("static");
        let other: Box<dyn std::any::Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(owned.as_ref()), "owned");
        assert_eq!(panic_message(borrowed.as_ref()), "static");
        assert_eq!(panic_message(other.as_ref()), "unknown panic");
    }
}
