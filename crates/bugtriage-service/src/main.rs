//! `bugtriaged` — the bug duplicate-detection HTTP service.
//!
//! Wires configuration, storage, the vector index, and the detection
//! pipeline into an axum app, starts the background index-rebuild task
//! alongside it, and serves until the process is killed.

use std::net::SocketAddr;
use std::sync::Arc;

use bugtriage_core::config::BugtriageConfig;
use bugtriage_observability::tracing_setup;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_setup::init();

    let config = BugtriageConfig::from_env();
    let port: u16 = std::env::var("SERVICE_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8080);

    info!(log_level = %config.log_level, port, "starting bugtriaged");

    let state = Arc::new(bugtriage_service::build_state(config)?);

    let rebuild_state = state.clone();
    tokio::spawn(bugtriage_service::rebuild::run(rebuild_state));

    let app = bugtriage_service::routes::router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "HTTP API listening");

    axum::serve(listener, app).await?;
    Ok(())
}
