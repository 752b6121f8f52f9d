pub mod api;
pub mod config;
pub mod core_state;
pub mod crypto;
pub mod db;
pub mod dto;
pub mod models;
pub mod services;
pub mod validation;

use tracing_subscriber::EnvFilter;

pub use api::ServerError;

/// Initialize logging, load configuration and serve until Ctrl-C.
pub async fn run() -> Result<(), ServerError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = config::ServerConfig::from_env()?;
    api::serve(config).await
}
