//! Debug Collector - Binary Entry Point

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use debug_collector::logging::init_tracing;
use debug_collector::{create_router, AppState, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::parse();
    init_tracing(&config.log_level, config.log_format);

    let state = AppState::from_config(&config)
        .with_context(|| format!("failed to open record log {}", config.log_file.display()))?;

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("cannot listen on {} (is another instance running?)", address))?;

    tracing::info!(
        address = %address,
        log_file = %config.log_file.display(),
        version = debug_collector::VERSION,
        "debug collector listening"
    );

    axum::serve(listener, create_router(Arc::new(state)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("debug collector stopped");
    Ok(())
}

/// Resolve on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
