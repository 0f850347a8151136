// ABOUTME: Main server binary wiring config, database, cache and routes
// ABOUTME: Serves the Peak Planner REST API over HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Peak Planner Server Binary
//!
//! Starts the REST API with the SQLite database, the in-memory provider
//! cache, and clients for the external geo and weather services.

use anyhow::Result;
use clap::Parser;
use peak_planner::{
    cache::{memory::InMemoryCache, CacheConfig, CacheProvider},
    config::ServerConfig,
    context::ServerResources,
    database::Database,
    logging,
    routes::app_router,
};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "peak-planner-server")]
#[command(about = "Peak Planner - ascent planning API with external geo/weather data")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }

    logging::init_from_env()?;

    info!("Starting Peak Planner server");
    info!("Database URL: {}", config.database_url);

    let database = Database::new(&config.database_url).await?;
    info!("Database initialized and migrated");

    let cache = InMemoryCache::new(CacheConfig::default()).await?;
    let http_port = config.http_port;
    let resources = Arc::new(ServerResources::new(config, database, cache)?);

    let app = app_router(resources);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{http_port}")).await?;
    info!("Listening on port {http_port}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {e}");
    }
    info!("Shutdown signal received");
}
