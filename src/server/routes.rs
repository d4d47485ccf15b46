//! Routes: `GET /plan` and `GET /health`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::core::Orchestrator;
use crate::providers::ProviderSpec;
use crate::server::error::ApiError;
use crate::travel::{self, TripParams};

/// Shared state of the planner routes.
#[derive(Clone)]
pub struct AppState {
    orchestrator: Arc<Orchestrator>,
    providers: Arc<[ProviderSpec<TripParams>]>,
    budget: Duration,
}

impl AppState {
    /// State running `providers` under the orchestrator's default budget.
    pub fn new(orchestrator: Arc<Orchestrator>, providers: Vec<ProviderSpec<TripParams>>) -> Self {
        let budget = orchestrator.config().budget;
        Self {
            orchestrator,
            providers: providers.into(),
            budget,
        }
    }

    /// State running the standard travel providers with no added latency.
    pub fn with_travel_providers(orchestrator: Arc<Orchestrator>) -> Self {
        Self::new(orchestrator, travel::providers(Duration::ZERO))
    }

    /// Overrides the per-request budget.
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = budget;
        self
    }
}

/// Builds the planner router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/plan", get(plan))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn plan(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let params = TripParams::from_query(&query)?;
    info!(city = %params.city, start = %params.start_date, end = %params.end_date, "planning trip");

    let values = state
        .orchestrator
        .run(state.providers.to_vec(), params, state.budget)
        .await?;

    let body = serde_json::to_string_pretty(&values)?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

async fn health() -> &'static str {
    "ok"
}
