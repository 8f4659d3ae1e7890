//! Collaborator traits for OTP delivery and verification

use async_trait::async_trait;

use crate::errors::OtpServiceError;

/// Trait for the service that delivers codes
#[async_trait]
pub trait OtpDispatchService: Send + Sync {
    /// Request delivery of a new code; `Ok(true)` when one was dispatched
    async fn send_code(&self, destination: &str) -> Result<bool, OtpServiceError>;
}

/// Trait for the service that checks codes
#[async_trait]
pub trait OtpVerificationService: Send + Sync {
    /// `Ok(true)` when accepted, `Ok(false)` when rejected
    async fn verify_code(&self, destination: &str, code: &str) -> Result<bool, OtpServiceError>;
}
