//! Tracing subscriber setup.
//!
//! The library only emits `tracing` events. Applications and benchmarks that
//! want them printed call [`init_tracing`] once at startup.

use crate::config::{ConfigError, LoggingConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Builds the filter for `config`. `RUST_LOG`, when set, takes precedence.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if the level is not a valid filter.
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, ConfigError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level).map_err(|e| ConfigError::InvalidValue {
        key: "logging.level".to_string(),
        message: e.to_string(),
    })
}

/// Installs a global subscriber with a text or JSON `fmt` layer.
///
/// Returns `Ok(false)` if a global subscriber was already installed.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] for an unknown format or level.
pub fn init_tracing(config: &LoggingConfig) -> Result<bool, ConfigError> {
    let filter = env_filter(config)?;

    let (text, json) = match config.format.as_str() {
        "text" => (Some(tracing_subscriber::fmt::layer()), None),
        "json" => (None, Some(tracing_subscriber::fmt::layer().json())),
        other => {
            return Err(ConfigError::InvalidValue {
                key: "logging.format".to_string(),
                message: format!("value '{other}' is invalid, expected one of: text, json"),
            })
        }
    };

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(level = %config.level, format = %config.format, "tracing initialized");
    }
    Ok(installed)
}
