mod bootstrap;
mod health;
mod routes;
mod services;

use std::time::Duration;

use anyhow::Result;
use storefront_core::config::{AppConfig, LoadOptions};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use crate::health::HealthState;
use crate::routes::AppState;

fn init_logging(config: &AppConfig) {
    use storefront_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Logging must be up before bootstrap so connection and migration events are recorded
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config).await?;
    let address = app.config.server_address();
    let grace = Duration::from_secs(app.config.server.graceful_shutdown_secs);

    let router = routes::router(AppState::new(app.products.clone())).merge(health::router(
        HealthState::new(app.config.storage.backend, app.db_pool.clone()),
    ));

    let listener = TcpListener::bind(&address).await?;
    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        address = %address,
        storage_backend = app.config.storage.backend.as_str(),
        "storefront-server listening"
    );

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = stop_rx.await;
            })
            .await
    });

    tokio::select! {
        signal = tokio::signal::ctrl_c() => signal?,
        served = &mut server => {
            served??;
            return Ok(());
        }
    }

    tracing::info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        grace_secs = grace.as_secs(),
        "storefront-server stopping"
    );
    let _ = stop_tx.send(());

    match tokio::time::timeout(grace, server).await {
        Ok(served) => served??,
        Err(_) => tracing::warn!(
            event_name = "system.server.shutdown_timeout",
            correlation_id = "shutdown",
            "in-flight requests did not finish within the grace period"
        ),
    }

    if let Some(pool) = app.db_pool {
        pool.close().await;
    }
    tracing::info!(
        event_name = "system.server.stopped",
        correlation_id = "shutdown",
        "storefront-server stopped"
    );

    Ok(())
}
