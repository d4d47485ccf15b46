//! `travel-planner`: HTTP front end over the fan-out orchestrator.
//!
//! ```text
//! travel-planner --addr 0.0.0.0:8080 --budget-ms 10000 --grace-ms 1000
//! curl 'localhost:8080/plan?city=Paris&start-date=2025-06-01&end-date=2025-06-07'
//! ```

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use fanvisor::server::{AppState, router, shutdown_signal};
use fanvisor::{Config, LogWriter, Orchestrator, travel};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, Parser)]
#[command(
    name = "travel-planner",
    version,
    about = "Plans trips by querying weather, flights and hotels concurrently"
)]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "TRAVEL_PLANNER_ADDR", default_value = "0.0.0.0:8080")]
    addr: SocketAddr,

    /// Deadline for one plan request, in milliseconds.
    #[arg(long, env = "TRAVEL_PLANNER_BUDGET_MS", default_value_t = 10_000)]
    budget_ms: u64,

    /// How long cancelled providers may keep running before they are aborted, in milliseconds.
    #[arg(long, env = "TRAVEL_PLANNER_GRACE_MS", default_value_t = 1_000)]
    grace_ms: u64,

    /// Simulated latency of every provider, in milliseconds.
    #[arg(long, env = "TRAVEL_PLANNER_LATENCY_MS", default_value_t = 0)]
    latency_ms: u64,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            budget: Duration::from_millis(self.budget_ms),
            grace: Duration::from_millis(self.grace_ms),
            ..Config::default()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let orchestrator = Arc::new(
        Orchestrator::builder(args.config())
            .with_subscriber(Arc::new(LogWriter::new()))
            .build(),
    );

    let providers = travel::providers(Duration::from_millis(args.latency_ms));
    let app = router(AppState::new(Arc::clone(&orchestrator), providers));

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("failed to bind {}", args.addr))?;
    tracing::info!(addr = %listener.local_addr()?, "travel planner listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    // The router (and its clone of the state) is gone once `serve` returns.
    match Arc::try_unwrap(orchestrator) {
        Ok(orchestrator) => orchestrator.shutdown().await,
        Err(_) => tracing::warn!("orchestrator still shared at exit; skipping subscriber flush"),
    }
    tracing::info!("travel planner stopped");
    Ok(())
}
