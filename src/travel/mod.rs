//! # Travel planning domain.
//!
//! - [`TripParams`]: parsed request parameters (`city`, dates, budget range)
//! - [`WeatherProvider`], [`FlightsProvider`], [`HotelsProvider`]: canned providers
//! - [`providers`]: the standard set, ready for [`Orchestrator::run`](crate::Orchestrator::run)

mod params;
mod providers;

pub use params::{DEFAULT_MAX_BUDGET, DEFAULT_MIN_BUDGET, ParamsError, TripParams};
pub use providers::{
    FLIGHTS, FlightsProvider, HOTELS, HotelsProvider, WEATHER, WeatherProvider, providers,
};
