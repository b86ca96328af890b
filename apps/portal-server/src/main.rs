//! RI2MAPS Portal Server binary.

use std::net::SocketAddr;

use portal_server::{config::Config, create_app, create_state, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    init_tracing(&config.log_level);

    tracing::info!(
        backend = ?config.backend,
        project_id = %config.project_id,
        bucket = %config.bucket,
        "Starting RI2MAPS Portal Server"
    );

    // A missing or broken backend does not stop startup; the gateway runs
    // degraded and the page shows the error.
    let state = create_state(config.clone());
    if let Some(reason) = state.gateway.connection_error() {
        tracing::warn!(error = %reason, "Portal running without a backend");
    }

    let app = create_app(state);

    let addr: SocketAddr = config.server_addr().parse()?;

    tracing::info!(addr = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
