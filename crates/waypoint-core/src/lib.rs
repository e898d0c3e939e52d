pub mod config;
pub mod error;
pub mod retry;

pub use config::{
    Config, PlacesConfig, ProviderConfig, RetrySettings, SearchConfig, ValidationResult,
};
pub use error::{AppError, ConfigError, NetworkError, ReqwestErrorExt};
pub use retry::{send_with_retry, RetryConfig};

use anyhow::Result;

/// Initialize logging for the application. Logs go to stderr so they never
/// interleave with rendered results.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    tracing::info!("Waypoint core initialized");
    Ok(())
}
