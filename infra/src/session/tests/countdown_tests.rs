use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use rl_core::{OtpChallengeConfig, OtpOutcome};

use crate::otp::{MockOtpService, OtpServices};
use crate::session::CountdownDriver;

use super::mocks::{open_session, services_with_verifier, GatedVerifier};

#[tokio::test(start_paused = true)]
async fn test_driver_ticks_once_per_second() {
    let services = OtpServices::from_service(Arc::new(MockOtpService::new()));
    let session = open_session(&services, OtpChallengeConfig::new(5, 5));
    let _driver = CountdownDriver::spawn(session.clone());

    sleep(Duration::from_millis(2500)).await;
    let snapshot = session.snapshot().unwrap();
    assert_eq!(snapshot.resend_cooldown_remaining, 3);
    assert!(snapshot.is_cooldown_active);

    sleep(Duration::from_millis(3000)).await;
    let snapshot = session.snapshot().unwrap();
    assert_eq!(snapshot.resend_cooldown_remaining, 0);
    assert_eq!(snapshot.resend_label(), "Resend Code");
}

#[tokio::test(start_paused = true)]
async fn test_driver_stops_on_teardown() {
    let services = OtpServices::from_service(Arc::new(MockOtpService::new()));
    let session = open_session(&services, OtpChallengeConfig::new(5, 60));
    let driver = CountdownDriver::spawn(session.clone());

    sleep(Duration::from_millis(1500)).await;
    session.teardown();
    sleep(Duration::from_millis(10)).await;

    assert!(driver.is_finished());
}

#[tokio::test(start_paused = true)]
async fn test_stopped_driver_leaves_cooldown_frozen() {
    let services = OtpServices::from_service(Arc::new(MockOtpService::new()));
    let session = open_session(&services, OtpChallengeConfig::new(5, 10));
    let driver = CountdownDriver::spawn(session.clone());

    sleep(Duration::from_millis(3500)).await;
    driver.stop();
    sleep(Duration::from_secs(5)).await;

    let snapshot = session.snapshot().unwrap();
    assert_eq!(snapshot.resend_cooldown_remaining, 7);
}

#[tokio::test(start_paused = true)]
async fn test_driver_keeps_ticking_during_verification() {
    let verifier = GatedVerifier::new(true);
    let services = services_with_verifier(verifier.clone());
    let session = open_session(&services, OtpChallengeConfig::new(5, 5));
    let _driver = CountdownDriver::spawn(session.clone());
    session.set_digit(0, "1234");

    let pending = {
        let session = session.clone();
        tokio::spawn(async move { session.submit().await })
    };
    verifier.entered.notified().await;

    sleep(Duration::from_millis(2500)).await;
    assert!(session.is_busy());
    assert_eq!(session.snapshot().unwrap().resend_cooldown_remaining, 3);

    verifier.release.notify_one();
    assert_eq!(pending.await.unwrap(), OtpOutcome::Success);
}
