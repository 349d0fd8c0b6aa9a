use anyhow::Result;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use telemetry_relay::config::RelayConfig;
use telemetry_relay::store::StoreClient;
use telemetry_relay::{AppState, build_router};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    eprintln!("[telemetry-relay] booting...");

    // Initialize tracing with a sensible default if RUST_LOG isn't set
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RelayConfig::from_env()?;
    tracing::info!(
        store_host = config.store_url.host_str().unwrap_or("-"),
        table = %config.store_table,
        "store target resolved"
    );

    let store = StoreClient::new(&config)?;
    let state = Arc::new(AppState { store });
    let app: Router = build_router(state);

    let addr: SocketAddr = config.bind_address().parse()?;
    tracing::info!("telemetry-relay listening on http://{addr}");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("telemetry-relay shutdown complete");
    Ok(())
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};
    let mut sigint = signal(SignalKind::interrupt()).expect("listen SIGINT");
    let mut sigterm = signal(SignalKind::terminate()).expect("listen SIGTERM");
    tokio::select! {
        _ = sigint.recv() => {},
        _ = sigterm.recv() => {},
    }
    tracing::info!("shutdown signal received");
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    tracing::info!("shutdown signal received");
}
