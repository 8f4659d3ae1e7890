//! Tracing initialization
//!
//! Installs a global `tracing` subscriber shaped by [`LoggingConfig`].
//! `RUST_LOG` wins over the configured level when set. Calling
//! [`init_tracing`] again after a subscriber is installed is a no-op.

use tracing_subscriber::EnvFilter;

use rl_shared::config::{LogFormat, LoggingConfig};

use crate::InfrastructureError;

/// Build the level filter, preferring `RUST_LOG`
pub fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, InfrastructureError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level).map_err(|e| {
        InfrastructureError::Config(format!("Invalid log level '{}': {}", config.level, e))
    })
}

/// Install the global subscriber
pub fn init_tracing(config: &LoggingConfig) -> Result<(), InfrastructureError> {
    let filter = build_env_filter(config)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.colored)
        .with_file(config.source_location)
        .with_line_number(config.source_location)
        .with_target(true);

    let installed = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    match installed {
        Ok(()) => {
            tracing::debug!(level = %config.level, format = ?config.format, "Tracing initialized");
        }
        Err(_) => {
            tracing::debug!("Tracing subscriber already installed");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_is_config_error() {
        std::env::remove_var("RUST_LOG");
        let config = LoggingConfig {
            level: "rl_core=loudest".to_string(),
            ..LoggingConfig::default()
        };
        assert!(matches!(
            build_env_filter(&config),
            Err(InfrastructureError::Config(_))
        ));
    }

    #[test]
    fn test_init_is_idempotent() {
        let config = LoggingConfig {
            format: LogFormat::Compact,
            ..LoggingConfig::default()
        };
        assert!(init_tracing(&config).is_ok());
        assert!(init_tracing(&config).is_ok());
    }
}
