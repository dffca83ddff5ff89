use std::sync::Arc;

use ac_support_chat::{
    build_app,
    config::{RelayConfig, ServerConfig},
    routes::RELAY_PATH,
    state::AppState,
};
use anyhow::Context;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ac_support_chat=debug".into()),
        )
        .init();

    let relay_config = RelayConfig::from_env().context("loading relay configuration")?;
    let server_config = ServerConfig::from_env().context("loading server configuration")?;

    info!(
        model = %relay_config.model,
        api_base = %relay_config.api_base,
        "relay configured"
    );

    let state = Arc::new(AppState::new(&relay_config));
    let app = build_app(state);

    let addr = server_config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    info!("AC support relay listening on http://{addr}{RELAY_PATH}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server failed")?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
