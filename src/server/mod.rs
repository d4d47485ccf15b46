//! # HTTP surface for the travel planner.
//!
//! ```text
//! GET /plan?city=..&start-date=..&end-date=..[&min-budget=..&max-budget=..]
//!   ├─► TripParams::from_query        ─► 400 on missing / malformed params
//!   ├─► Orchestrator::run(providers)  ─► 504 on timeout, 500 on provider failure
//!   └─► 200 application/json  {"flights": .., "hotels": .., "weather": ..}
//!
//! GET /health ─► 200 "ok"
//! ```

mod error;
mod routes;
mod signal;

pub use error::ApiError;
pub use routes::{AppState, router};
pub use signal::shutdown_signal;
