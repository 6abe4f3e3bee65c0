use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;

use bitesize_intelligence::IntelligenceService;
use bitesize_intelligence::catalog::SeedCatalog;
use bitesize_intelligence::config::Config;
use bitesize_intelligence::http::{AppState, router};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load();

    let service = Arc::new(IntelligenceService::new(&config));
    let catalog = Arc::new(SeedCatalog::load(config.catalog.seed_path.as_deref()));

    let app = router(AppState { service, catalog });

    let bind: SocketAddr = config.server.bind.parse().map_err(|e| {
        anyhow::anyhow!("Invalid server bind '{}': {e}", config.server.bind)
    })?;
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(%bind, name = %config.server.name, "Starting HTTP server");

    axum::serve(listener, app).await?;
    Ok(())
}
