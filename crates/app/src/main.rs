//! Weekly goal tracker server.

mod config;

use anyhow::{Context, Result};
use api::CorsOrigin;
use clap::Parser;
use services::{AppServices, Clock};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, prepare_sqlite_file};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::parse();
    run(config).await
}

async fn run(config: Config) -> Result<()> {
    let db_url = config.database_url();
    prepare_sqlite_file(&db_url)?;

    let services = AppServices::new_sqlite(&db_url, Clock::default_clock(), config.week_zone.into())
        .await
        .with_context(|| format!("opening database {db_url}"))?;
    let app = api::router(services, &CorsOrigin::parse(&config.frontend_url));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, database = %db_url, week_zone = ?config.week_zone, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
