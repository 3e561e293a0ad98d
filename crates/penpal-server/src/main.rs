//! PenPal letter service binary.

use penpal_server::{AppState, ServerConfig, router};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "penpal_server=info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let state = Arc::new(AppState::new());
    let app = router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!("PenPal letter service listening on {}", config.addr);
    info!("Letters are served at /{}/<id>", config.route_prefix);

    axum::serve(listener, app).await?;
    Ok(())
}
