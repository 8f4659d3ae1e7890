//! Host-side wrapper around one OTP challenge
//!
//! Screens share a session through `Arc`. The controller lock is only held
//! for synchronous steps; collaborator calls run outside it, so state stays
//! readable and the countdown keeps ticking while a request is pending. A
//! second submit/resend is refused while one is in flight, and results that
//! arrive after [`ChallengeSession::teardown`] are dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use rl_core::{
    ChallengeSnapshot, OtpChallengeConfig, OtpChallengeController, OtpDispatchService, OtpOutcome,
    OtpPurpose, OtpVerificationService,
};
use rl_shared::phone::{is_valid_phone, mask_phone_number, normalize_phone_number, to_ph_e164};

use crate::otp::OtpServices;
use crate::InfrastructureError;

use super::wait_until_closed;

/// Controller type hosted by a session
pub type SharedController =
    OtpChallengeController<dyn OtpVerificationService, dyn OtpDispatchService>;

#[derive(Debug, Clone, Copy)]
enum Action {
    Submit,
    Resend,
}

impl Action {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Resend => "resend",
        }
    }
}

// Clears the in-flight flag however the call ends
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Canonical form of a destination the backend can deliver to
///
/// Philippine mobiles become `+639XXXXXXXXX`; other E.164 numbers are kept.
pub fn normalize_destination(destination: &str) -> Result<String, InfrastructureError> {
    if !is_valid_phone(destination) {
        return Err(InfrastructureError::InvalidPhone(mask_phone_number(destination)));
    }
    Ok(to_ph_e164(destination).unwrap_or_else(|| normalize_phone_number(destination)))
}

fn lock(controller: &Mutex<SharedController>) -> MutexGuard<'_, SharedController> {
    // Nothing panics while the guard is held; recover the state if it ever does
    controller.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One verification screen's challenge
pub struct ChallengeSession {
    purpose: OtpPurpose,
    challenge_id: Uuid,
    controller: Arc<Mutex<SharedController>>,
    in_flight: AtomicBool,
    closed: watch::Sender<bool>,
}

impl ChallengeSession {
    /// Send a code to `destination` and open a challenge for it
    ///
    /// # Errors
    ///
    /// * `InvalidPhone` - the number cannot receive a code
    /// * `OtpRequest` - the backend declined to send
    /// * `OtpService` - the dispatch call failed
    pub async fn begin(
        destination: &str,
        purpose: OtpPurpose,
        config: OtpChallengeConfig,
        services: &OtpServices,
    ) -> Result<Self, InfrastructureError> {
        let phone = normalize_destination(destination)?;

        let sent = services.dispatcher.send_code(&phone).await?;
        if !sent {
            warn!(
                phone = %mask_phone_number(&phone),
                purpose = %purpose,
                event = "otp_request_failed",
                "Initial OTP was not sent"
            );
            return Err(InfrastructureError::OtpRequest(
                "Failed to send verification code".to_string(),
            ));
        }

        Self::attach(phone, purpose, config, services)
    }

    /// Open a challenge for a code that was already sent
    pub fn attach(
        destination: impl Into<String>,
        purpose: OtpPurpose,
        config: OtpChallengeConfig,
        services: &OtpServices,
    ) -> Result<Self, InfrastructureError> {
        let controller = OtpChallengeController::new(
            destination,
            config,
            services.verifier.clone(),
            services.dispatcher.clone(),
        )?;
        let challenge_id = controller.challenge_id();
        let (closed, _) = watch::channel(false);

        info!(
            challenge_id = %challenge_id,
            purpose = %purpose,
            event = "otp_session_opened",
            "Challenge session opened"
        );

        Ok(Self {
            purpose,
            challenge_id,
            controller: Arc::new(Mutex::new(controller)),
            in_flight: AtomicBool::new(false),
            closed,
        })
    }

    pub fn purpose(&self) -> OtpPurpose {
        self.purpose
    }

    pub fn challenge_id(&self) -> Uuid {
        self.challenge_id
    }

    /// A submit or resend is waiting on a collaborator
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    /// Receiver that flips to `true` on teardown
    pub fn closed_watch(&self) -> watch::Receiver<bool> {
        self.closed.subscribe()
    }

    /// Close the session; pending results are discarded
    pub fn teardown(&self) {
        if !self.closed.send_replace(true) {
            info!(
                challenge_id = %self.challenge_id,
                event = "otp_session_closed",
                "Challenge session closed"
            );
        }
    }

    /// Digit input; `None` while a call is in flight or after teardown
    pub fn set_digit(&self, index: usize, value: &str) -> Option<usize> {
        let mut controller = lock(&self.controller);
        if self.is_busy() || self.is_closed() {
            return None;
        }
        Some(controller.set_digit(index, value))
    }

    /// Backspace focus hint; `None` while busy or after teardown
    pub fn handle_backspace_at(&self, index: usize) -> Option<usize> {
        let controller = lock(&self.controller);
        if self.is_busy() || self.is_closed() {
            return None;
        }
        Some(controller.handle_backspace_at(index))
    }

    pub async fn submit(&self) -> OtpOutcome {
        self.run(Action::Submit).await
    }

    pub async fn resend(&self) -> OtpOutcome {
        self.run(Action::Resend).await
    }

    /// One elapsed second of the resend countdown
    pub fn tick(&self) {
        let mut controller = lock(&self.controller);
        if self.is_closed() {
            return;
        }
        controller.tick();
    }

    /// Current state for rendering; `None` after teardown
    pub fn snapshot(&self) -> Option<ChallengeSnapshot> {
        let controller = lock(&self.controller);
        if self.is_closed() {
            return None;
        }
        Some(controller.snapshot())
    }

    async fn run(&self, action: Action) -> OtpOutcome {
        if self.is_closed() {
            return OtpOutcome::Ignored;
        }
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!(
                challenge_id = %self.challenge_id,
                action = action.as_str(),
                "Call already in flight"
            );
            return OtpOutcome::Ignored;
        }
        let _in_flight = InFlightGuard(&self.in_flight);

        let mut closed = self.closed_watch();
        let controller = self.controller.clone();
        let mut task = tokio::spawn(async move {
            match action {
                Action::Submit => {
                    let pending = lock(&controller).begin_submit();
                    let Some(pending) = pending else {
                        return OtpOutcome::Ignored;
                    };
                    let result = pending.run().await;
                    let outcome = lock(&controller).finish_submit(result);
                    outcome
                }
                Action::Resend => {
                    let pending = lock(&controller).begin_resend();
                    let Some(pending) = pending else {
                        return OtpOutcome::Ignored;
                    };
                    let result = pending.run().await;
                    let outcome = lock(&controller).finish_resend(result);
                    outcome
                }
            }
        });

        let outcome = tokio::select! {
            joined = &mut task => match joined {
                Ok(outcome) => outcome,
                Err(err) if err.is_panic() => {
                    warn!(
                        challenge_id = %self.challenge_id,
                        action = action.as_str(),
                        event = "otp_call_panicked",
                        "OTP collaborator panicked"
                    );
                    OtpOutcome::Error {
                        message: "Unexpected error".to_string(),
                    }
                }
                Err(_) => OtpOutcome::Ignored,
            },
            _ = wait_until_closed(&mut closed) => {
                task.abort();
                OtpOutcome::Ignored
            }
        };

        if self.is_closed() {
            debug!(
                challenge_id = %self.challenge_id,
                action = action.as_str(),
                "Result dropped after teardown"
            );
            return OtpOutcome::Ignored;
        }
        outcome
    }
}

impl Drop for ChallengeSession {
    fn drop(&mut self) {
        self.closed.send_replace(true);
    }
}

impl std::fmt::Debug for ChallengeSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChallengeSession")
            .field("purpose", &self.purpose)
            .field("challenge_id", &self.challenge_id)
            .field("busy", &self.is_busy())
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::otp::MockOtpService;

    fn open(cooldown: u32) -> ChallengeSession {
        let services = OtpServices::from_service(Arc::new(MockOtpService::new()));
        ChallengeSession::attach(
            "+639171234567",
            OtpPurpose::Login,
            OtpChallengeConfig::new(5, cooldown),
            &services,
        )
        .unwrap()
    }

    #[test]
    fn test_tick_after_teardown_leaves_countdown() {
        let session = open(10);
        session.tick();
        session.teardown();
        session.tick();
        session.tick();

        let remaining = lock(&session.controller).snapshot().resend_cooldown_remaining;
        assert_eq!(remaining, 9);
    }

    #[test]
    fn test_teardown_while_tick_waits_on_lock() {
        let session = Arc::new(open(10));
        let guard = lock(&session.controller);

        let ticking = {
            let session = session.clone();
            std::thread::spawn(move || session.tick())
        };
        // Let the tick block on the held lock, then close underneath it
        std::thread::sleep(std::time::Duration::from_millis(50));
        session.teardown();
        drop(guard);
        ticking.join().unwrap();

        let remaining = lock(&session.controller).snapshot().resend_cooldown_remaining;
        assert_eq!(remaining, 10);
    }
}
