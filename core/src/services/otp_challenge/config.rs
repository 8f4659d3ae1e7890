//! Configuration for an OTP challenge

use rl_shared::config::OtpConfig;

use crate::domain::OtpPurpose;
use crate::errors::{DomainError, DomainResult};

/// Default number of wrong codes before lockout
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default resend cooldown in seconds
pub const DEFAULT_COOLDOWN_SECONDS: u32 = 60;

/// Resend cooldown used by the sign-up screen
pub const REGISTRATION_COOLDOWN_SECONDS: u32 = 15;

/// Limits applied to one challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtpChallengeConfig {
    /// Maximum verification attempts before lockout (>= 1)
    pub max_attempts: u32,
    /// Seconds the resend action stays disabled after a code is sent
    pub cooldown_seconds: u32,
}

impl Default for OtpChallengeConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            cooldown_seconds: DEFAULT_COOLDOWN_SECONDS,
        }
    }
}

impl OtpChallengeConfig {
    pub fn new(max_attempts: u32, cooldown_seconds: u32) -> Self {
        Self {
            max_attempts,
            cooldown_seconds,
        }
    }

    /// Built-in preset for a screen
    pub fn for_purpose(purpose: OtpPurpose) -> Self {
        match purpose {
            OtpPurpose::Login | OtpPurpose::PhoneChange => Self::default(),
            OtpPurpose::Registration => Self {
                cooldown_seconds: REGISTRATION_COOLDOWN_SECONDS,
                ..Self::default()
            },
        }
    }

    /// Preset taken from application configuration
    pub fn from_config(config: &OtpConfig, purpose: OtpPurpose) -> Self {
        let cooldown_seconds = match purpose {
            OtpPurpose::Login => config.login_cooldown_secs,
            OtpPurpose::Registration => config.registration_cooldown_secs,
            OtpPurpose::PhoneChange => config.phone_change_cooldown_secs,
        };
        Self {
            max_attempts: config.max_attempts,
            cooldown_seconds,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.max_attempts == 0 {
            return Err(DomainError::Validation {
                message: "max_attempts must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(
            OtpChallengeConfig::for_purpose(OtpPurpose::Login),
            OtpChallengeConfig::new(5, 60)
        );
        assert_eq!(
            OtpChallengeConfig::for_purpose(OtpPurpose::Registration),
            OtpChallengeConfig::new(5, 15)
        );
        assert_eq!(
            OtpChallengeConfig::for_purpose(OtpPurpose::PhoneChange),
            OtpChallengeConfig::new(5, 60)
        );
    }

    #[test]
    fn test_from_config_overrides() {
        let shared = OtpConfig {
            max_attempts: 3,
            phone_change_cooldown_secs: 90,
            ..OtpConfig::default()
        };
        let config = OtpChallengeConfig::from_config(&shared, OtpPurpose::PhoneChange);
        assert_eq!(config, OtpChallengeConfig::new(3, 90));
        let config = OtpChallengeConfig::from_config(&shared, OtpPurpose::Registration);
        assert_eq!(config.cooldown_seconds, 15);
    }

    #[test]
    fn test_validate() {
        assert!(OtpChallengeConfig::default().validate().is_ok());
        assert!(OtpChallengeConfig::new(1, 0).validate().is_ok());
        assert!(matches!(
            OtpChallengeConfig::new(0, 60).validate(),
            Err(DomainError::Validation { .. })
        ));
    }
}
