use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use shipsplit_api::{app, AppState};
use shipsplit_order::{SplitOrchestrator, SplitRules};
use shipsplit_store::{app_config::Config, ShipStationClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shipsplit_api=debug,shipsplit_order=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting shipsplit on port {}", config.server.port);

    let rules = SplitRules::with_suffixes(
        config.split.primary_sku_prefix.clone(),
        config.split.primary_suffix.clone(),
        config.split.secondary_suffix.clone(),
    )
    .context("Invalid split configuration")?;
    tracing::info!("Primary sku prefix: '{}'", rules.primary_sku_prefix);

    // One client serves both directions: fetching batches and creating split orders.
    let shipstation = Arc::new(
        ShipStationClient::new(&config.shipstation).context("Failed to create ShipStation client")?,
    );
    let orchestrator = SplitOrchestrator::new(shipstation.clone(), shipstation, rules);

    let app = app(AppState::new(orchestrator));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
