mod cluster;
mod config;
mod dedup;
mod models;
mod normalize;
mod pipeline;
mod score;
mod server;
mod sources;

use std::sync::Arc;

use anyhow::Result;
use axum::routing::get;
use axum::Router;
use clap::Parser;
use tracing::info;

use config::Config;
use server::AppState;

/// Trendwave - trending-topic aggregation API
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Port to listen on (overrides the PORT environment variable)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Starting trendwave");

    let args = Args::parse();
    let mut config = Config::from_env();
    if let Some(port) = args.port {
        config.port = port;
    }

    info!(
        "Configuration - port={}, newsapi_key={}",
        config.port,
        if config.newsapi_key.is_some() { "set" } else { "missing (source disabled)" }
    );

    let client = reqwest::Client::builder().build()?;
    let port = config.port;
    let state = Arc::new(AppState { config, client });

    let app = Router::new()
        .route("/trending", get(server::trending))
        .route("/health", get(server::health))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Listening on http://0.0.0.0:{port}");
    info!("Endpoints - GET /trending?geo=ID&lang=id&limit=20, GET /health");

    axum::serve(listener, app).await?;
    Ok(())
}
