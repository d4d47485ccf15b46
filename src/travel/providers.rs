//! # Travel data providers.
//!
//! Three canned providers answering a [`TripParams`] request. Each one logs the
//! request it serves, optionally waits out a simulated latency (cancel-aware),
//! and rejects an empty city.
//!
//! | id        | value                                        |
//! |-----------|----------------------------------------------|
//! | `weather` | `Sunny in {city} from {start} to {end}`      |
//! | `flights` | `Flights to {city}: $500-$700`               |
//! | `hotels`  | `Hotels in {city}: $100-$200`                |

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::core::Scope;
use crate::error::ProviderError;
use crate::events::Attribute;
use crate::providers::{Provider, ProviderSpec};
use crate::travel::params::TripParams;

/// Provider id of [`WeatherProvider`].
pub const WEATHER: &str = "weather";
/// Provider id of [`FlightsProvider`].
pub const FLIGHTS: &str = "flights";
/// Provider id of [`HotelsProvider`].
pub const HOTELS: &str = "hotels";

const EMPTY_CITY: &str = "city cannot be empty";

/// Returns the standard travel provider set, each with the given simulated latency.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use fanvisor::travel;
///
/// let specs = travel::providers(Duration::ZERO);
/// let ids: Vec<&str> = specs.iter().map(|s| s.id()).collect();
/// assert_eq!(ids, ["weather", "flights", "hotels"]);
/// ```
pub fn providers(latency: Duration) -> Vec<ProviderSpec<TripParams>> {
    vec![
        ProviderSpec::new(WeatherProvider::new().with_latency(latency)),
        ProviderSpec::new(FlightsProvider::new().with_latency(latency)),
        ProviderSpec::new(HotelsProvider::new().with_latency(latency)),
    ]
}

/// Shared prologue: reject an empty city, then wait out the latency.
async fn prepare(
    scope: &Scope,
    params: &TripParams,
    latency: Duration,
) -> Result<(), ProviderError> {
    if params.city.is_empty() {
        return Err(ProviderError::fail(EMPTY_CITY));
    }
    scope.sleep(latency).await
}

fn date_attributes(params: &TripParams) -> [Attribute; 3] {
    [
        ("city", params.city.clone()),
        ("startDate", params.start_date.to_string()),
        ("endDate", params.end_date.to_string()),
    ]
}

fn budget_attributes(params: &TripParams) -> [Attribute; 2] {
    [
        ("minBudget", params.min_budget.to_string()),
        ("maxBudget", params.max_budget.to_string()),
    ]
}

/// Weather forecast for the trip window.
#[derive(Debug, Clone, Default)]
pub struct WeatherProvider {
    latency: Duration,
}

impl WeatherProvider {
    /// Creates the provider with no simulated latency.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the simulated latency.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[async_trait]
impl Provider<TripParams> for WeatherProvider {
    fn id(&self) -> &str {
        WEATHER
    }

    fn attributes(&self, params: &TripParams) -> Vec<Attribute> {
        date_attributes(params).into()
    }

    async fn fetch(&self, scope: Scope, params: Arc<TripParams>) -> Result<String, ProviderError> {
        info!(
            city = %params.city,
            start = %params.start_date,
            end = %params.end_date,
            "fetching weather"
        );
        prepare(&scope, &params, self.latency).await?;
        Ok(format!(
            "Sunny in {} from {} to {}",
            params.city, params.start_date, params.end_date
        ))
    }
}

/// Flight prices for the trip.
#[derive(Debug, Clone, Default)]
pub struct FlightsProvider {
    latency: Duration,
}

impl FlightsProvider {
    /// Creates the provider with no simulated latency.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the simulated latency.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[async_trait]
impl Provider<TripParams> for FlightsProvider {
    fn id(&self) -> &str {
        FLIGHTS
    }

    fn attributes(&self, params: &TripParams) -> Vec<Attribute> {
        let mut attrs: Vec<Attribute> = date_attributes(params).into();
        attrs.extend(budget_attributes(params));
        attrs
    }

    async fn fetch(&self, scope: Scope, params: Arc<TripParams>) -> Result<String, ProviderError> {
        info!(
            city = %params.city,
            start = %params.start_date,
            end = %params.end_date,
            min_budget = params.min_budget,
            max_budget = params.max_budget,
            "fetching flights"
        );
        prepare(&scope, &params, self.latency).await?;
        Ok(format!("Flights to {}: $500-$700", params.city))
    }
}

/// Hotel prices for the trip.
#[derive(Debug, Clone, Default)]
pub struct HotelsProvider {
    latency: Duration,
}

impl HotelsProvider {
    /// Creates the provider with no simulated latency.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the simulated latency.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[async_trait]
impl Provider<TripParams> for HotelsProvider {
    fn id(&self) -> &str {
        HOTELS
    }

    fn attributes(&self, params: &TripParams) -> Vec<Attribute> {
        let mut attrs = vec![("city", params.city.clone())];
        attrs.extend(budget_attributes(params));
        attrs
    }

    async fn fetch(&self, scope: Scope, params: Arc<TripParams>) -> Result<String, ProviderError> {
        info!(
            city = %params.city,
            min_budget = params.min_budget,
            max_budget = params.max_budget,
            "fetching hotels"
        );
        prepare(&scope, &params, self.latency).await?;
        Ok(format!("Hotels in {}: $100-$200", params.city))
    }
}
