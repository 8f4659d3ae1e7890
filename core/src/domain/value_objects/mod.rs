//! Value objects representing immutable domain concepts.

pub mod challenge_snapshot;
pub mod otp_outcome;
pub mod otp_purpose;

pub use challenge_snapshot::{ChallengePhase, ChallengeSnapshot};
pub use otp_outcome::OtpOutcome;
pub use otp_purpose::OtpPurpose;
