//! OTP challenge configuration
//!
//! Cooldowns are per flow because the sign-up screen historically used a
//! shorter resend window than login and phone-number change.

use serde::{Deserialize, Serialize};

use super::environment::Environment;
use crate::utils::validation::{Validate, ValidationErrors};

/// Which backend delivers and checks codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OtpProvider {
    /// ResqLine REST backend
    #[default]
    Rest,
    /// In-process mock that logs codes instead of sending SMS
    Mock,
}

impl std::str::FromStr for OtpProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rest" | "http" => Ok(OtpProvider::Rest),
            "mock" => Ok(OtpProvider::Mock),
            _ => Err(format!("Invalid OTP provider: {}", s)),
        }
    }
}

/// OTP challenge configuration shared by all verification screens
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Code delivery/verification provider
    #[serde(default)]
    pub provider: OtpProvider,

    /// Maximum wrong submissions before the challenge locks
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Resend cooldown on the login screen, in seconds
    #[serde(default = "default_cooldown")]
    pub login_cooldown_secs: u32,

    /// Resend cooldown on the sign-up screen, in seconds
    #[serde(default = "default_registration_cooldown")]
    pub registration_cooldown_secs: u32,

    /// Resend cooldown on the phone-number change screen, in seconds
    #[serde(default = "default_cooldown")]
    pub phone_change_cooldown_secs: u32,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            provider: OtpProvider::default(),
            max_attempts: default_max_attempts(),
            login_cooldown_secs: default_cooldown(),
            registration_cooldown_secs: default_registration_cooldown(),
            phone_change_cooldown_secs: default_cooldown(),
        }
    }
}

impl OtpConfig {
    /// Defaults for `env`, overridden by the `OTP_*` variables
    pub fn from_env(env: Environment) -> Self {
        let defaults = Self {
            provider: env.default_otp_provider(),
            ..Self::default()
        };
        Self {
            provider: env_parse("OTP_PROVIDER").unwrap_or(defaults.provider),
            max_attempts: env_parse("OTP_MAX_ATTEMPTS").unwrap_or(defaults.max_attempts),
            login_cooldown_secs: env_parse("OTP_LOGIN_COOLDOWN_SECS")
                .unwrap_or(defaults.login_cooldown_secs),
            registration_cooldown_secs: env_parse("OTP_REGISTRATION_COOLDOWN_SECS")
                .unwrap_or(defaults.registration_cooldown_secs),
            phone_change_cooldown_secs: env_parse("OTP_PHONE_CHANGE_COOLDOWN_SECS")
                .unwrap_or(defaults.phone_change_cooldown_secs),
        }
    }

    /// Configuration used in development (mock provider)
    pub fn development() -> Self {
        Self {
            provider: OtpProvider::Mock,
            ..Default::default()
        }
    }
}

impl Validate for OtpConfig {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.max_attempts == 0 {
            errors.add_error(
                "max_attempts",
                "Maximum attempts must be at least 1",
                "OUT_OF_RANGE",
            );
        }
        if errors.has_errors() {
            Err(errors)
        } else {
            Ok(())
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn default_max_attempts() -> u32 {
    5
}

fn default_cooldown() -> u32 {
    60
}

fn default_registration_cooldown() -> u32 {
    15
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_screens() {
        let config = OtpConfig::default();
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.login_cooldown_secs, 60);
        assert_eq!(config.registration_cooldown_secs, 15);
        assert_eq!(config.phone_change_cooldown_secs, 60);
        assert_eq!(config.provider, OtpProvider::Rest);
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let config = OtpConfig {
            max_attempts: 0,
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.errors().len(), 1);
        assert_eq!(errors.errors()[0].field, "max_attempts");
        assert!(OtpConfig::default().validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: OtpConfig =
            serde_json::from_str(r#"{"provider":"mock","max_attempts":3}"#).unwrap();
        assert_eq!(config.provider, OtpProvider::Mock);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.registration_cooldown_secs, 15);
    }
}
