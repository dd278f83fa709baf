pub mod api; // HTTP surface
pub mod avatar;
pub mod chat; // Direct messaging
pub mod config;
pub mod core_state; // Transport-agnostic state
pub mod db;
pub mod fixtures;
pub mod models;
pub mod permissions; // Chat permission + audit
pub mod requests; // Friend & transfer request lifecycle
pub mod timeline; // Timeline grouping & filtering

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::avatar::UiAvatars;
use crate::config::{ConfigError, PortalConfig};
use crate::core_state::{CoreError, PortalState};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Storage error: {0}")]
    Core(#[from] CoreError),
    #[error("Server error: {0}")]
    Server(#[from] api::ServerError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Builds the state described by `config`, seeding fixtures into an empty
/// store when asked to.
pub fn build_state(config: &PortalConfig) -> Result<PortalState, StartupError> {
    if let config::StorageConfig::Sqlite(path) = &config.storage {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
    }

    let state = PortalState::from_config(&config.storage)?;

    if config.seed_fixtures {
        if state.patient("876364").is_ok() {
            tracing::info!("Store already populated, skipping fixtures");
        } else {
            state.seed(fixtures::sample(&UiAvatars::default()))?;
        }
    }
    Ok(state)
}

pub async fn run() -> Result<(), StartupError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = PortalConfig::from_env()?;
    tracing::info!(
        addr = %config.addr,
        storage = ?config.storage,
        actor_id = %config.default_actor.id,
        "Configuration loaded"
    );

    let core = Arc::new(build_state(&config)?);
    let mut server = api::start_server(core, config.default_actor.clone(), config.addr).await?;
    tracing::info!(addr = %server.session.server_addr, "Portal API listening");

    tokio::signal::ctrl_c().await?;
    server.shutdown();
    server.wait().await;
    Ok(())
}
