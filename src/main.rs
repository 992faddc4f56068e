use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

mod config;
mod dashboard;
mod scoreboard;
mod ticker;

use config::Config;
use dashboard::AppState;
use scoreboard::{HttpRenderer, LoadPolicy, SnapshotService};
use ticker::{start_poller, TickerStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let renderer = HttpRenderer::new(config.fetch_timeout(), &config.user_agent)?;
    let service = SnapshotService::new(
        Arc::new(renderer),
        config.match_url.clone(),
        LoadPolicy::DomContentLoaded,
    );

    if config.once {
        let snapshot = service
            .fetch()
            .await
            .with_context(|| format!("Failed to load {}", config.match_url))?;
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    info!("Tracking {}", config.match_url);

    let store = TickerStore::new();
    let _poller = start_poller(
        Arc::new(service.clone()),
        store.clone(),
        config.refresh_interval(),
    );

    let app = dashboard::router(AppState {
        store,
        service,
        refresh_interval_ms: config.refresh_interval_ms,
    });
    let addr: SocketAddr = config.dashboard_addr.parse()?;
    info!("Ticker listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    // Run the ticker server (blocks until shutdown); the poller stops when
    // its handle drops on the way out
    axum::serve(listener, app).await?;

    Ok(())
}
