//! Read-only view of a challenge for UI binding.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a challenge stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengePhase {
    /// Some slots still empty
    AwaitingInput,
    /// All slots filled, submit allowed
    ReadyToSubmit,
    /// Attempts exhausted, resend required
    Locked,
    /// Code accepted
    Completed,
}

/// Snapshot of the state a verification screen renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeSnapshot {
    pub challenge_id: Uuid,
    /// Masked phone number, safe to show or log
    pub destination_masked: String,
    pub digits: Vec<String>,
    pub code: String,
    pub attempt_count: u32,
    pub remaining_attempts: u32,
    pub is_locked: bool,
    pub resend_cooldown_remaining: u32,
    pub is_cooldown_active: bool,
    pub phase: ChallengePhase,
}

impl ChallengeSnapshot {
    /// Label for the resend button, e.g. "Resend Code (42s)"
    pub fn resend_label(&self) -> String {
        if self.is_cooldown_active {
            format!("Resend Code ({}s)", self.resend_cooldown_remaining)
        } else {
            "Resend Code".to_string()
        }
    }

    pub fn can_submit(&self) -> bool {
        self.phase == ChallengePhase::ReadyToSubmit
    }

    pub fn can_resend(&self) -> bool {
        !self.is_cooldown_active && self.phase != ChallengePhase::Completed
    }
}
