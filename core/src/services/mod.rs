//! Business services containing domain logic and use cases.

pub mod otp_challenge;

// Re-export commonly used types
pub use otp_challenge::{
    OtpChallengeConfig, OtpChallengeController, OtpDispatchService, OtpVerificationService,
    PendingDispatch, PendingVerification,
};
