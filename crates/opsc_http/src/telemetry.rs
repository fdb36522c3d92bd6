use opsc_core::error::AppError;
use tracing_subscriber::EnvFilter;

use crate::config::ClientConfig;

/// Install the global fmt subscriber.
///
/// `RUST_LOG` wins over `config.log_filter`. Fails if a subscriber is already installed.
pub fn init(config: &ClientConfig) -> Result<(), AppError> {
    let filter = build_filter(config)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| {
            AppError::new("TELEMETRY_INIT_FAILED", "Failed to install log subscriber")
                .with_details(e.to_string())
        })
}

pub fn build_filter(config: &ClientConfig) -> Result<EnvFilter, AppError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.log_filter).map_err(|e| {
        AppError::new("CONFIG_INVALID", "log_filter is not a valid tracing filter")
            .with_details(format!("log_filter={}; err={e}", config.log_filter))
    })
}
