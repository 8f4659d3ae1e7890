//! Interactive OTP challenge in the terminal
//!
//! Run with: OTP_PROVIDER=mock cargo run --example otp_challenge_demo -- 09171234567
//!
//! Type a 4-digit code to submit it, `r` to request a new code, `q` to quit.
//! With the mock provider the issued code is printed in the log.

use anyhow::Context;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use rl_core::{OtpChallengeConfig, OtpOutcome, OtpPurpose};
use rl_infra::config::load_config;
use rl_infra::{create_otp_services, init_tracing, ChallengeSession, CountdownDriver, OtpFlow};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    init_tracing(&config.logging)?;

    let phone = std::env::args()
        .nth(1)
        .context("usage: otp_challenge_demo <phone number>")?;

    let services = create_otp_services(&config.otp, &config.api, OtpFlow::Login)?;
    let challenge = OtpChallengeConfig::from_config(&config.otp, OtpPurpose::Login);
    let session = Arc::new(
        ChallengeSession::begin(&phone, OtpPurpose::Login, challenge, &services)
            .await
            .context("could not start the challenge")?,
    );
    let _countdown = CountdownDriver::spawn(session.clone());

    println!("Code sent. Enter the 4-digit code, `r` to resend, `q` to quit.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        let outcome = match input {
            "q" => break,
            "r" => session.resend().await,
            code => {
                session.set_digit(0, code);
                session.submit().await
            }
        };

        match &outcome {
            OtpOutcome::Ignored => {
                if let Some(snapshot) = session.snapshot() {
                    println!("Nothing to do. [{}]", snapshot.resend_label());
                }
            }
            OtpOutcome::Success => {
                println!("Verified.");
                if let Some(token) = services.take_session_token() {
                    println!("Session token: {}", token);
                }
                break;
            }
            other => {
                if let Some(message) = other.user_message() {
                    println!("{}", message);
                }
            }
        }
    }

    session.teardown();
    Ok(())
}
