//! OTP challenge module
//!
//! This module provides the verification-screen workflow:
//! - 4-digit code entry with paste support and focus hints
//! - Attempt counting with lockout
//! - Resend cooldown driven by host ticks
//! - Integration with dispatch and verification collaborators

mod config;
mod controller;
mod traits;

#[cfg(test)]
mod tests;

pub use config::{
    OtpChallengeConfig, DEFAULT_COOLDOWN_SECONDS, DEFAULT_MAX_ATTEMPTS,
    REGISTRATION_COOLDOWN_SECONDS,
};
pub use controller::{OtpChallengeController, PendingDispatch, PendingVerification};
pub use traits::{OtpDispatchService, OtpVerificationService};
