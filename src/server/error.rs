//! HTTP error mapping for the planner endpoint.
//!
//! | error                               | status | body                               |
//! |-------------------------------------|--------|------------------------------------|
//! | [`ParamsError`]                     | 400    | parameter message                  |
//! | [`RunError::Timeout`]               | 504    | `Timeout while fetching data`      |
//! | any other [`RunError`]              | 500    | `error fetching {provider}: {err}` |
//! | response encoding                   | 500    | `Error marshalling JSON response`  |

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::error::RunError;
use crate::travel::ParamsError;

/// Errors surfaced by the `/plan` handler.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Query parameters were missing or malformed.
    #[error(transparent)]
    Params(#[from] ParamsError),

    /// The orchestration run did not produce values.
    #[error(transparent)]
    Run(#[from] RunError),

    /// The value map could not be encoded.
    #[error("Error marshalling JSON response: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ApiError {
    /// Status code for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Params(_) => StatusCode::BAD_REQUEST,
            ApiError::Run(RunError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Run(_) | ApiError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> String {
        match self {
            ApiError::Run(RunError::Timeout { .. }) => "Timeout while fetching data".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Params(err) => warn!(label = err.as_label(), "rejected plan request: {err}"),
            ApiError::Run(err) => warn!(label = err.as_label(), "plan request failed: {err}"),
            ApiError::Encode(err) => error!("failed to encode plan response: {err}"),
        }
        (status, self.body()).into_response()
    }
}
