//! Configuration module
//!
//! - `api` - ResqLine backend endpoint and timeouts
//! - `environment` - Environment detection and logging configuration
//! - `otp` - OTP challenge limits and provider selection

pub mod api;
pub mod environment;
pub mod otp;

use serde::{Deserialize, Serialize};

pub use api::ApiConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use otp::{OtpConfig, OtpProvider};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Backend API configuration
    pub api: ApiConfig,

    /// OTP challenge configuration
    #[serde(default)]
    pub otp: OtpConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            api: ApiConfig::default(),
            otp: OtpConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Create configuration for development environment
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig::default(),
            otp: OtpConfig::development(),
            logging: LoggingConfig::for_environment(Environment::Development),
        }
    }

    /// Create configuration for production environment
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig::new("https://api.resqline.ph/api").with_timeout_secs(20),
            otp: OtpConfig::default(),
            logging: LoggingConfig::for_environment(Environment::Production),
        }
    }

    /// Load configuration from environment
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            api: ApiConfig::from_env(),
            otp: OtpConfig::from_env(environment),
            logging: LoggingConfig::from_env(environment),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_uses_mock_provider() {
        let config = AppConfig::development();
        assert_eq!(config.otp.provider, OtpProvider::Mock);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_production_profile() {
        let config = AppConfig::production();
        assert!(config.environment.is_production());
        assert_eq!(config.otp.provider, OtpProvider::Rest);
        assert_eq!(config.api.timeout_secs, 20);
    }
}
