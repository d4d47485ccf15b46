//! Shutdown signal for the HTTP server.
//!
//! **Unix:** SIGINT, SIGTERM, SIGQUIT and Ctrl-C. **Elsewhere:** Ctrl-C only.

use tracing::{info, warn};

/// Completes once the process is asked to terminate.
///
/// If the signal listeners cannot be installed the failure is logged and the
/// future never completes, leaving the server to run until killed.
pub async fn shutdown_signal() {
    match wait().await {
        Ok(name) => info!(signal = name, "shutdown requested"),
        Err(err) => {
            warn!(error = %err, "cannot listen for shutdown signals");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(unix)]
async fn wait() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    let name = tokio::select! {
        _ = sigint.recv()  => "SIGINT",
        _ = sigterm.recv() => "SIGTERM",
        _ = sigquit.recv() => "SIGQUIT",
    };
    Ok(name)
}

#[cfg(not(unix))]
async fn wait() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("ctrl-c")
}
