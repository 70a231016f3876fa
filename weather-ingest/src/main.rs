mod config;
mod error;
mod handlers;
mod ingest;
mod readings;
mod state;

use axum::Router;
use config::Config;
use state::AppState;
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config_path =
        std::env::var("WEATHER_INGEST_CONFIG").unwrap_or_else(|_| "config.toml".into());
    let cfg = Config::load(&config_path)?;

    let state = Arc::new(AppState::from_config(&cfg)?);

    let app = Router::new()
        .route("/api/v1/readings", axum::routing::post(handlers::submit_reading_handler))
        .route("/api/v1/readings/latest", axum::routing::get(handlers::latest_reading_handler))
        .route("/api/v1/readings/recent", axum::routing::get(handlers::recent_readings_handler))
        .route("/health", axum::routing::get(handlers::health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listen = cfg.listen.unwrap_or_else(|| "0.0.0.0:8080".into());
    let addr: SocketAddr = listen.parse()?;
    info!(%addr, "Starting weather-ingest");

    let server = axum::Server::bind(&addr).serve(app.into_make_service());

    let graceful = server.with_graceful_shutdown(shutdown_signal());
    graceful.await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    info!("Shutdown signal received");
}
