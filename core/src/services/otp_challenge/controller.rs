//! OTP challenge controller
//!
//! Owns digit entry, the resend cooldown, attempt counting and lockout for a
//! single verification screen. The controller holds no timer: the host calls
//! [`OtpChallengeController::tick`] once per elapsed second.

use std::sync::Arc;
use uuid::Uuid;

use rl_shared::phone::mask_phone_number;

use crate::domain::{ChallengePhase, ChallengeSnapshot, OtpDigits, OtpOutcome, CODE_LENGTH};
use crate::errors::{DomainError, DomainResult, OtpServiceError};

use super::config::OtpChallengeConfig;
use super::traits::{OtpDispatchService, OtpVerificationService};

/// Verification call detached from the controller
pub struct PendingVerification<V: OtpVerificationService + ?Sized> {
    verifier: Arc<V>,
    destination: String,
    code: String,
}

impl<V: OtpVerificationService + ?Sized> PendingVerification<V> {
    pub fn code(&self) -> &str {
        &self.code
    }

    pub async fn run(self) -> Result<bool, OtpServiceError> {
        self.verifier.verify_code(&self.destination, &self.code).await
    }
}

/// Dispatch call detached from the controller
pub struct PendingDispatch<D: OtpDispatchService + ?Sized> {
    dispatcher: Arc<D>,
    destination: String,
}

impl<D: OtpDispatchService + ?Sized> PendingDispatch<D> {
    pub async fn run(self) -> Result<bool, OtpServiceError> {
        self.dispatcher.send_code(&self.destination).await
    }
}

/// State machine for one OTP challenge
///
/// Operations take `&mut self`; the host serializes calls and must not run
/// `submit` and `resend` concurrently on the same instance. Hosts that must
/// keep reading state during a collaborator call use the `begin_*` /
/// `finish_*` pairs instead.
pub struct OtpChallengeController<V, D>
where
    V: OtpVerificationService + ?Sized,
    D: OtpDispatchService + ?Sized,
{
    /// Correlates log lines of this challenge
    challenge_id: Uuid,
    /// Phone number the code was sent to
    destination: String,
    config: OtpChallengeConfig,
    digits: OtpDigits,
    attempt_count: u32,
    is_locked: bool,
    completed: bool,
    resend_cooldown_remaining: u32,
    verifier: Arc<V>,
    dispatcher: Arc<D>,
}

impl<V, D> OtpChallengeController<V, D>
where
    V: OtpVerificationService + ?Sized,
    D: OtpDispatchService + ?Sized,
{
    /// Create a controller for a code that was just sent to `destination`
    ///
    /// The resend cooldown starts running immediately.
    ///
    /// # Errors
    ///
    /// * `DomainError::Validation` - empty destination or `max_attempts == 0`
    pub fn new(
        destination: impl Into<String>,
        config: OtpChallengeConfig,
        verifier: Arc<V>,
        dispatcher: Arc<D>,
    ) -> DomainResult<Self> {
        let destination = destination.into().trim().to_string();
        if destination.is_empty() {
            return Err(DomainError::Validation {
                message: "Destination phone number is required".to_string(),
            });
        }
        config.validate()?;

        let challenge_id = Uuid::new_v4();
        tracing::info!(
            challenge_id = %challenge_id,
            phone = %mask_phone_number(&destination),
            max_attempts = config.max_attempts,
            cooldown_seconds = config.cooldown_seconds,
            event = "otp_challenge_started",
            "OTP challenge started"
        );

        Ok(Self {
            challenge_id,
            destination,
            config,
            digits: OtpDigits::new(),
            attempt_count: 0,
            is_locked: false,
            completed: false,
            resend_cooldown_remaining: config.cooldown_seconds,
            verifier,
            dispatcher,
        })
    }

    /// Write user input into slot `index` and return the slot to focus next
    ///
    /// Ignored while locked or after success.
    pub fn set_digit(&mut self, index: usize, value: &str) -> usize {
        if self.is_locked || self.completed {
            tracing::debug!(
                challenge_id = %self.challenge_id,
                index,
                "Digit input ignored"
            );
            return index.min(CODE_LENGTH - 1);
        }
        self.digits.write(index, value)
    }

    /// Focus hint for a backspace on slot `index`; never mutates state
    pub fn handle_backspace_at(&self, index: usize) -> usize {
        if index > 0 && index < CODE_LENGTH && self.digits.is_empty_at(index) {
            index - 1
        } else {
            index.min(CODE_LENGTH - 1)
        }
    }

    /// Submit the entered code for verification
    ///
    /// The attempt is charged before the verifier answers, so a transport
    /// error still counts toward the limit. The error path never locks and
    /// leaves the digits in place for a retry.
    pub async fn submit(&mut self) -> OtpOutcome {
        let Some(pending) = self.begin_submit() else {
            return OtpOutcome::Ignored;
        };
        let result = pending.run().await;
        self.finish_submit(result)
    }

    /// First half of [`submit`](Self::submit): check preconditions and charge
    /// the attempt
    ///
    /// Returns `None` when the submit would be ignored. The returned call
    /// borrows nothing, so a host can run it without holding the controller.
    pub fn begin_submit(&mut self) -> Option<PendingVerification<V>> {
        if self.completed || self.is_locked || !self.digits.is_complete() {
            tracing::debug!(
                challenge_id = %self.challenge_id,
                filled = self.digits.filled_count(),
                is_locked = self.is_locked,
                "Submit ignored"
            );
            return None;
        }

        self.attempt_count += 1;
        Some(PendingVerification {
            verifier: self.verifier.clone(),
            destination: self.destination.clone(),
            code: self.digits.code(),
        })
    }

    /// Second half of [`submit`](Self::submit): apply the verifier's answer
    pub fn finish_submit(&mut self, result: Result<bool, OtpServiceError>) -> OtpOutcome {
        match result {
            Ok(true) => {
                self.completed = true;
                tracing::info!(
                    challenge_id = %self.challenge_id,
                    attempt = self.attempt_count,
                    event = "otp_verified_success",
                    "Verification code accepted"
                );
                OtpOutcome::Success
            }
            Ok(false) => {
                self.digits.clear();
                if self.attempt_count >= self.config.max_attempts {
                    self.is_locked = true;
                    tracing::warn!(
                        challenge_id = %self.challenge_id,
                        phone = %mask_phone_number(&self.destination),
                        attempts = self.attempt_count,
                        event = "otp_locked_out",
                        "Maximum verification attempts reached"
                    );
                    OtpOutcome::LockedOut
                } else {
                    let remaining_attempts = self.remaining_attempts();
                    tracing::warn!(
                        challenge_id = %self.challenge_id,
                        attempt = self.attempt_count,
                        remaining_attempts,
                        event = "otp_verification_failed",
                        "Verification code rejected"
                    );
                    OtpOutcome::Invalid { remaining_attempts }
                }
            }
            Err(e) => {
                tracing::error!(
                    challenge_id = %self.challenge_id,
                    attempt = self.attempt_count,
                    error = %e,
                    event = "otp_verification_error",
                    "Verification request failed"
                );
                OtpOutcome::Error {
                    message: e.to_string(),
                }
            }
        }
    }

    /// Ask for a new code once the cooldown has elapsed
    ///
    /// Success resets digits, attempts and lockout and restarts the cooldown.
    /// Failure leaves everything untouched.
    pub async fn resend(&mut self) -> OtpOutcome {
        let Some(pending) = self.begin_resend() else {
            return OtpOutcome::Ignored;
        };
        let result = pending.run().await;
        self.finish_resend(result)
    }

    /// First half of [`resend`](Self::resend); `None` when ignored
    pub fn begin_resend(&mut self) -> Option<PendingDispatch<D>> {
        if self.completed || self.is_cooldown_active() {
            tracing::debug!(
                challenge_id = %self.challenge_id,
                cooldown_remaining = self.resend_cooldown_remaining,
                "Resend ignored"
            );
            return None;
        }

        Some(PendingDispatch {
            dispatcher: self.dispatcher.clone(),
            destination: self.destination.clone(),
        })
    }

    /// Second half of [`resend`](Self::resend): apply the dispatcher's answer
    pub fn finish_resend(&mut self, result: Result<bool, OtpServiceError>) -> OtpOutcome {
        match result {
            Ok(true) => {
                self.digits.clear();
                self.attempt_count = 0;
                self.is_locked = false;
                self.resend_cooldown_remaining = self.config.cooldown_seconds;
                tracing::info!(
                    challenge_id = %self.challenge_id,
                    phone = %mask_phone_number(&self.destination),
                    event = "otp_resent",
                    "New verification code dispatched"
                );
                OtpOutcome::Resent
            }
            Ok(false) => {
                tracing::warn!(
                    challenge_id = %self.challenge_id,
                    event = "otp_resend_rejected",
                    "Code dispatch was rejected"
                );
                OtpOutcome::Error {
                    message: "Failed to resend code".to_string(),
                }
            }
            Err(e) => {
                tracing::error!(
                    challenge_id = %self.challenge_id,
                    error = %e,
                    event = "otp_resend_error",
                    "Resend request failed"
                );
                OtpOutcome::Error {
                    message: e.to_string(),
                }
            }
        }
    }

    /// Advance the resend cooldown by one second
    pub fn tick(&mut self) {
        if self.resend_cooldown_remaining > 0 {
            self.resend_cooldown_remaining -= 1;
            if self.resend_cooldown_remaining == 0 {
                tracing::debug!(
                    challenge_id = %self.challenge_id,
                    "Resend cooldown elapsed"
                );
            }
        }
    }

    pub fn challenge_id(&self) -> Uuid {
        self.challenge_id
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn config(&self) -> OtpChallengeConfig {
        self.config
    }

    pub fn digits(&self) -> &OtpDigits {
        &self.digits
    }

    pub fn code(&self) -> String {
        self.digits.code()
    }

    pub fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    pub fn max_attempts(&self) -> u32 {
        self.config.max_attempts
    }

    pub fn remaining_attempts(&self) -> u32 {
        self.config.max_attempts.saturating_sub(self.attempt_count)
    }

    pub fn is_locked(&self) -> bool {
        self.is_locked
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn resend_cooldown_remaining(&self) -> u32 {
        self.resend_cooldown_remaining
    }

    pub fn is_cooldown_active(&self) -> bool {
        self.resend_cooldown_remaining > 0
    }

    pub fn phase(&self) -> ChallengePhase {
        if self.completed {
            ChallengePhase::Completed
        } else if self.is_locked {
            ChallengePhase::Locked
        } else if self.digits.is_complete() {
            ChallengePhase::ReadyToSubmit
        } else {
            ChallengePhase::AwaitingInput
        }
    }

    pub fn snapshot(&self) -> ChallengeSnapshot {
        ChallengeSnapshot {
            challenge_id: self.challenge_id,
            destination_masked: mask_phone_number(&self.destination),
            digits: self.digits.as_strings(),
            code: self.digits.code(),
            attempt_count: self.attempt_count,
            remaining_attempts: self.remaining_attempts(),
            is_locked: self.is_locked,
            resend_cooldown_remaining: self.resend_cooldown_remaining,
            is_cooldown_active: self.is_cooldown_active(),
            phase: self.phase(),
        }
    }
}

impl<V, D> std::fmt::Debug for OtpChallengeController<V, D>
where
    V: OtpVerificationService + ?Sized,
    D: OtpDispatchService + ?Sized,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OtpChallengeController")
            .field("challenge_id", &self.challenge_id)
            .field("destination", &mask_phone_number(&self.destination))
            .field("digits", &self.digits)
            .field("attempt_count", &self.attempt_count)
            .field("is_locked", &self.is_locked)
            .field("completed", &self.completed)
            .field("resend_cooldown_remaining", &self.resend_cooldown_remaining)
            .finish()
    }
}
