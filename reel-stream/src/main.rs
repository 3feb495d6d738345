//! reel-stream - catalog gateway and stream-embed rewriting proxy
//!
//! Serves read-only catalog endpoints (through a bounded-concurrency,
//! retrying catalog client) and the `/api/stream` embed rewriting proxy.

use anyhow::Result;
use clap::Parser;
use reel_catalog::CatalogClient;
use reel_common::Settings;
use reel_stream::{build_router, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "reel-stream", about = "Reel catalog gateway and stream proxy")]
struct Cli {
    /// Path to a TOML config file (overrides REEL_CONFIG and the default
    /// config location)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// Network tuning class: standard, constrained or metered
    #[arg(long)]
    client_class: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting Reel stream gateway (reel-stream) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let cli = Cli::parse();

    // Settings resolution: CLI > environment > TOML file > defaults
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        settings.stream.bind_port = port;
    }
    if let Some(class) = &cli.client_class {
        settings.client_class = class.parse()?;
    }

    let profile = settings.network_profile();
    profile.validate()?;
    info!(
        class = ?settings.client_class,
        timeout_ms = profile.timeout_ms,
        max_concurrent = profile.max_concurrent,
        "Network profile resolved"
    );

    if settings.catalog.api_key.is_empty() {
        info!("No catalog API key configured (set REEL_TMDB_API_KEY); catalog requests will be rejected upstream");
    }

    let catalog = Arc::new(CatalogClient::new(settings.catalog.clone(), &profile)?);
    let state = AppState::new(catalog, settings.stream.clone())?;
    let app = build_router(state);

    let bind = format!(
        "{}:{}",
        settings.stream.bind_host, settings.stream.bind_port
    );
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("reel-stream listening on http://{bind}");
    info!("Health check: http://{bind}/health");

    axum::serve(listener, app).await?;

    Ok(())
}
