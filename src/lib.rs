pub mod alerts;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod events;
pub mod models;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the host process. Safe to call once at startup.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
}
