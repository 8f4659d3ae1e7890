//! Result of a challenge command as seen by the screen.

use serde::{Deserialize, Serialize};

use rl_shared::errors::{error_codes, ErrorResponse};

/// Outcome of `submit()` or `resend()`
///
/// Expected flows never surface as `Err`; the host renders one of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OtpOutcome {
    /// Precondition not met; the UI should not have offered the action
    Ignored,
    /// Code accepted, hand control back to the caller
    Success,
    /// Wrong code, more attempts allowed
    Invalid { remaining_attempts: u32 },
    /// Wrong code and no attempts left; only a resend unlocks the challenge
    LockedOut,
    /// Transport or server failure
    Error { message: String },
    /// A new code was dispatched
    Resent,
}

impl OtpOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored)
    }

    /// Text for an alert, `None` when nothing should be shown
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::Ignored | Self::Success => None,
            Self::Invalid { remaining_attempts } => Some(format!(
                "Code is incorrect. {} {} remaining.",
                remaining_attempts,
                if *remaining_attempts == 1 { "attempt" } else { "attempts" }
            )),
            Self::LockedOut => Some(
                "You've reached the maximum number of attempts. Please request a new code."
                    .to_string(),
            ),
            Self::Error { message } => Some(format!("{}. Please try again.", message)),
            Self::Resent => {
                Some("A new verification code has been sent to your phone.".to_string())
            }
        }
    }

    /// Error payload for failure outcomes
    pub fn error_response(&self) -> Option<ErrorResponse> {
        let message = self.user_message()?;
        match self {
            Self::Invalid { remaining_attempts } => Some(
                ErrorResponse::new(error_codes::VERIFICATION_CODE_INVALID, message)
                    .add_detail("remaining_attempts", remaining_attempts),
            ),
            Self::LockedOut => Some(ErrorResponse::new(
                error_codes::MAX_ATTEMPTS_EXCEEDED,
                message,
            )),
            Self::Error { .. } => Some(ErrorResponse::new(
                error_codes::OTP_REQUEST_FAILED,
                message,
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_message_pluralization() {
        let many = OtpOutcome::Invalid { remaining_attempts: 3 };
        assert_eq!(
            many.user_message().unwrap(),
            "Code is incorrect. 3 attempts remaining."
        );
        let one = OtpOutcome::Invalid { remaining_attempts: 1 };
        assert_eq!(
            one.user_message().unwrap(),
            "Code is incorrect. 1 attempt remaining."
        );
    }

    #[test]
    fn test_silent_outcomes() {
        assert!(OtpOutcome::Ignored.user_message().is_none());
        assert!(OtpOutcome::Success.user_message().is_none());
        assert!(OtpOutcome::Resent.error_response().is_none());
    }

    #[test]
    fn test_error_response_codes() {
        let locked = OtpOutcome::LockedOut.error_response().unwrap();
        assert_eq!(locked.error, error_codes::MAX_ATTEMPTS_EXCEEDED);

        let invalid = OtpOutcome::Invalid { remaining_attempts: 2 }
            .error_response()
            .unwrap();
        assert_eq!(invalid.error, error_codes::VERIFICATION_CODE_INVALID);
        assert_eq!(
            invalid.details.unwrap()["remaining_attempts"],
            serde_json::json!(2)
        );
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(OtpOutcome::Invalid { remaining_attempts: 4 }).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "invalid", "remaining_attempts": 4}));
        let json = serde_json::to_value(OtpOutcome::LockedOut).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "locked_out"}));
    }
}
