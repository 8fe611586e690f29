//! The `flowmind serve` subcommand (§6 "HTTP control plane", §10.5).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::collaborators::DefaultCollaborators;
use crate::config::ServeConfig;
use crate::http::state::AuthConfig;
use crate::http::{router, AppState};
use crate::rate_limit::RateLimiter;

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    port: Option<u16>,
    jwt_secret: Option<String>,
    api_keys: Vec<String>,
    rate_limit: Option<u32>,
    no_auth: bool,
    config_file: Option<PathBuf>,
    checkpoint_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = ServeConfig::load(config_file.as_deref())?
        .apply_cli_overrides(port, jwt_secret, api_keys, rate_limit, no_auth, checkpoint_dir);

    let collaborators = Arc::new(DefaultCollaborators::new(config.checkpoint_dir.clone()));
    let auth = Arc::new(AuthConfig {
        enabled: !config.no_auth,
        jwt_secret: config.jwt_secret.clone(),
        api_keys: config.parsed_api_keys(),
    });
    let rate_limiter = config.rate_limit.map(|rps| Arc::new(RateLimiter::new(rps)));

    let state = AppState { collaborators, auth, rate_limiter };

    let app = router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "flowmind control plane listening");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
