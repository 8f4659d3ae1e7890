//! Domain-specific error types and error handling.

use rl_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};
use thiserror::Error;

/// Failure reported by an OTP dispatch or verification collaborator
///
/// A rejected code is not an error: collaborators return `Ok(false)` for that.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OtpServiceError {
    /// Transport failure: no response, timeout, connection reset
    #[error("Network error: {message}")]
    Network { message: String },

    /// The backend answered with an unexpected status
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },
}

impl OtpServiceError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// Network failures may go away by themselves
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Server { status, .. } => *status >= 500,
        }
    }
}

impl IntoErrorResponse for OtpServiceError {
    fn to_error_response(&self) -> ErrorResponse {
        match self {
            Self::Network { .. } => ErrorResponse::new(
                error_codes::NETWORK_ERROR,
                "Please check your internet connection and try again.",
            ),
            Self::Server { status, .. } => ErrorResponse::new(
                error_codes::SERVER_ERROR,
                "The server could not process the request. Please try again.",
            )
            .add_detail("status", status),
        }
    }
}

/// Core domain errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error(transparent)]
    OtpService(#[from] OtpServiceError),
}

impl IntoErrorResponse for DomainError {
    fn to_error_response(&self) -> ErrorResponse {
        match self {
            Self::Validation { message } => {
                ErrorResponse::new(error_codes::VALIDATION_ERROR, message.clone())
            }
            Self::Internal { .. } => ErrorResponse::new(
                error_codes::INTERNAL_ERROR,
                "Something went wrong. Please try again.",
            ),
            Self::OtpService(err) => err.to_error_response(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
