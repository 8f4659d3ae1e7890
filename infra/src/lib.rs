//! # Infrastructure Layer
//!
//! Concrete implementations behind the ResqLine OTP challenge:
//!
//! - **API**: reqwest client for the ResqLine backend
//! - **OTP**: REST and mock dispatch/verification collaborators
//! - **Session**: async host that serializes submits/resends and drives
//!   the resend countdown
//! - **Logging**: tracing subscriber setup

use rl_core::{DomainError, OtpServiceError};
use rl_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};

pub mod api;
pub mod logging;
pub mod otp;
pub mod session;

pub use logging::init_tracing;
pub use otp::{create_otp_services, MockOtpService, OtpFlow, OtpServices, Registrant, RestOtpService};
pub use session::{ChallengeSession, CountdownDriver};

/// Configuration loading
pub mod config {
    use rl_shared::config::{AppConfig, Environment};
    use rl_shared::validation::Validate;

    use crate::InfrastructureError;

    /// Load application configuration from dotenv files and the environment
    ///
    /// Variables already set in the process win over `.env.<environment>`,
    /// which wins over `.env`.
    pub fn load_config() -> Result<AppConfig, InfrastructureError> {
        let environment = Environment::from_env();
        dotenvy::from_filename(environment.env_file()).ok();
        dotenvy::dotenv().ok();

        let config = AppConfig::from_env();
        config
            .otp
            .validate()
            .map_err(|errors| InfrastructureError::Config(errors.to_string()))?;

        tracing::debug!(
            environment = %config.environment,
            provider = ?config.otp.provider,
            "Configuration loaded"
        );
        Ok(config)
    }
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// HTTP request error for the backend
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Phone number that cannot receive a code
    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),

    /// Code could not be sent when the challenge started
    #[error("OTP request failed: {0}")]
    OtpRequest(String),

    /// OTP collaborator failure
    #[error(transparent)]
    OtpService(#[from] OtpServiceError),

    /// Domain rule violation
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<InfrastructureError> for OtpServiceError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Http(e) => match e.status() {
                Some(status) => OtpServiceError::server(status.as_u16(), e.to_string()),
                None => OtpServiceError::network(e.to_string()),
            },
            InfrastructureError::OtpService(e) => e,
            other => OtpServiceError::server(0, other.to_string()),
        }
    }
}

impl IntoErrorResponse for InfrastructureError {
    fn to_error_response(&self) -> ErrorResponse {
        match self {
            Self::InvalidPhone(_) => ErrorResponse::new(
                error_codes::PHONE_INVALID,
                "Please enter a valid mobile number.",
            ),
            Self::OtpRequest(message) => {
                ErrorResponse::new(error_codes::OTP_REQUEST_FAILED, message.clone())
            }
            Self::Http(_) => ErrorResponse::new(
                error_codes::NETWORK_ERROR,
                "Please check your internet connection and try again.",
            ),
            Self::Config(_) | Self::Serialization(_) => ErrorResponse::new(
                error_codes::INTERNAL_ERROR,
                "Something went wrong. Please try again.",
            ),
            Self::OtpService(err) => err.to_error_response(),
            Self::Domain(err) => err.to_error_response(),
        }
    }
}
