use std::sync::Arc;

use rl_core::{ChallengePhase, OtpChallengeConfig, OtpOutcome, OtpPurpose};

use crate::otp::{MockOtpService, OtpServices};
use crate::session::{normalize_destination, ChallengeSession};
use crate::InfrastructureError;

use super::mocks::{open_session, services_with_verifier, GatedVerifier, PanickingVerifier, TEST_PHONE};

#[test]
fn test_normalize_destination() {
    assert_eq!(normalize_destination("0917 123 4567").unwrap(), "+639171234567");
    assert_eq!(normalize_destination("639171234567").unwrap(), "+639171234567");
    assert_eq!(normalize_destination("+1 415 555 2671").unwrap(), "+14155552671");
    assert!(matches!(
        normalize_destination("12345"),
        Err(InfrastructureError::InvalidPhone(_))
    ));
}

#[tokio::test]
async fn test_begin_sends_code_to_normalized_number() {
    let mock = Arc::new(MockOtpService::new());
    let services = OtpServices::from_service(mock.clone());

    let session = ChallengeSession::begin(
        "09171234567",
        OtpPurpose::Registration,
        OtpChallengeConfig::for_purpose(OtpPurpose::Registration),
        &services,
    )
    .await
    .unwrap();

    let code = mock.issued_code(TEST_PHONE).unwrap();
    assert_eq!(session.set_digit(0, &code), Some(3));
    assert_eq!(session.submit().await, OtpOutcome::Success);

    let snapshot = session.snapshot().unwrap();
    assert_eq!(snapshot.phase, ChallengePhase::Completed);
    assert_eq!(snapshot.resend_cooldown_remaining, 15);
    assert_eq!(snapshot.destination_masked, "+63****4567");
}

#[tokio::test]
async fn test_begin_rejects_invalid_phone() {
    let services = OtpServices::from_service(Arc::new(MockOtpService::new()));
    let result =
        ChallengeSession::begin("555", OtpPurpose::Login, OtpChallengeConfig::default(), &services)
            .await;
    assert!(matches!(result, Err(InfrastructureError::InvalidPhone(_))));
}

#[tokio::test]
async fn test_begin_surfaces_dispatch_failure() {
    let mock = Arc::new(MockOtpService::new());
    mock.set_offline(true);
    let services = OtpServices::from_service(mock);

    let result = ChallengeSession::begin(
        TEST_PHONE,
        OtpPurpose::Login,
        OtpChallengeConfig::default(),
        &services,
    )
    .await;
    assert!(matches!(result, Err(InfrastructureError::OtpService(_))));
}

#[tokio::test]
async fn test_second_submit_ignored_while_in_flight() {
    let verifier = GatedVerifier::new(true);
    let services = services_with_verifier(verifier.clone());
    let session = open_session(&services, OtpChallengeConfig::default());
    session.set_digit(0, "1234");

    let pending = {
        let session = session.clone();
        tokio::spawn(async move { session.submit().await })
    };
    verifier.entered.notified().await;

    assert!(session.is_busy());
    assert_eq!(session.submit().await, OtpOutcome::Ignored);
    assert_eq!(session.resend().await, OtpOutcome::Ignored);
    assert_eq!(session.set_digit(0, "9"), None);

    verifier.release.notify_one();
    assert_eq!(pending.await.unwrap(), OtpOutcome::Success);
    assert!(!session.is_busy());

    let snapshot = session.snapshot().unwrap();
    assert_eq!(snapshot.attempt_count, 1);
}

#[tokio::test]
async fn test_teardown_drops_in_flight_result() {
    let verifier = GatedVerifier::new(true);
    let services = services_with_verifier(verifier.clone());
    let session = open_session(&services, OtpChallengeConfig::default());
    session.set_digit(0, "1234");

    let pending = {
        let session = session.clone();
        tokio::spawn(async move { session.submit().await })
    };
    verifier.entered.notified().await;

    session.teardown();
    assert_eq!(pending.await.unwrap(), OtpOutcome::Ignored);
    assert!(session.is_closed());
    assert!(!session.is_busy());

    assert_eq!(session.snapshot(), None);
    assert_eq!(session.set_digit(0, "1"), None);
    assert_eq!(session.handle_backspace_at(1), None);
    assert_eq!(session.submit().await, OtpOutcome::Ignored);
    assert_eq!(session.resend().await, OtpOutcome::Ignored);
}

#[tokio::test]
async fn test_collaborator_panic_becomes_error() {
    let services = services_with_verifier(Arc::new(PanickingVerifier));
    let session = open_session(&services, OtpChallengeConfig::default());
    session.set_digit(0, "1234");

    assert!(matches!(session.submit().await, OtpOutcome::Error { .. }));
    assert!(!session.is_busy());

    // The controller is still reachable afterwards
    let snapshot = session.snapshot().unwrap();
    assert_eq!(snapshot.attempt_count, 1);
    assert!(!snapshot.is_locked);
}

#[tokio::test]
async fn test_resend_through_session() {
    let mock = Arc::new(MockOtpService::with_fixed_code("4321"));
    let services = OtpServices::from_service(mock.clone());
    let session = open_session(&services, OtpChallengeConfig::new(5, 2));

    assert_eq!(session.resend().await, OtpOutcome::Ignored);
    session.tick();
    session.tick();
    assert_eq!(session.resend().await, OtpOutcome::Resent);
    assert_eq!(mock.sent_count(), 1);

    session.set_digit(0, "4321");
    assert_eq!(session.submit().await, OtpOutcome::Success);
}

#[tokio::test]
async fn test_state_readable_while_verification_pending() {
    let verifier = GatedVerifier::new(false);
    let services = services_with_verifier(verifier.clone());
    let session = open_session(&services, OtpChallengeConfig::new(5, 10));
    session.set_digit(0, "1234");

    let pending = {
        let session = session.clone();
        tokio::spawn(async move { session.submit().await })
    };
    verifier.entered.notified().await;

    let snapshot = session.snapshot().unwrap();
    assert_eq!(snapshot.attempt_count, 1);
    assert_eq!(snapshot.code, "1234");

    session.tick();
    session.tick();
    assert_eq!(session.snapshot().unwrap().resend_cooldown_remaining, 8);

    verifier.release.notify_one();
    assert_eq!(
        pending.await.unwrap(),
        OtpOutcome::Invalid { remaining_attempts: 4 }
    );
    assert_eq!(session.snapshot().unwrap().resend_cooldown_remaining, 8);
}

#[tokio::test]
async fn test_digit_input_refused_only_while_busy() {
    let verifier = GatedVerifier::new(false);
    let services = services_with_verifier(verifier.clone());
    let session = open_session(&services, OtpChallengeConfig::new(5, 10));

    // Reads and ticks never make input bounce
    session.tick();
    assert!(session.snapshot().is_some());
    assert_eq!(session.set_digit(0, "1234"), Some(3));

    let pending = {
        let session = session.clone();
        tokio::spawn(async move { session.submit().await })
    };
    verifier.entered.notified().await;

    assert_eq!(session.set_digit(0, "9"), None);
    assert_eq!(session.handle_backspace_at(2), None);

    verifier.release.notify_one();
    pending.await.unwrap();
    assert_eq!(session.set_digit(0, "5"), Some(1));
    assert_eq!(session.handle_backspace_at(1), Some(0));
}
