//! Mock OTP service for development and testing
//!
//! Issues codes locally instead of calling the backend. Codes are logged so
//! a developer can complete the flow without a real SMS.

use async_trait::async_trait;
use rand::Rng;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use tracing::{info, warn};

use rl_core::{OtpDispatchService, OtpServiceError, OtpVerificationService, CODE_LENGTH};
use rl_shared::otp_input::is_valid_otp_code;
use rl_shared::phone::{mask_phone_number, normalize_phone_number};

/// Local OTP issuer and checker
pub struct MockOtpService {
    /// Latest code issued per normalized phone number
    codes: Mutex<HashMap<String, String>>,
    /// Code handed out for every request instead of a random one
    fixed_code: Option<String>,
    /// Simulate a dropped connection
    offline: AtomicBool,
    sent_count: AtomicU64,
}

impl MockOtpService {
    pub fn new() -> Self {
        Self {
            codes: Mutex::new(HashMap::new()),
            fixed_code: None,
            offline: AtomicBool::new(false),
            sent_count: AtomicU64::new(0),
        }
    }

    /// Always issue `code`, handy for demos
    pub fn with_fixed_code(code: impl Into<String>) -> Self {
        Self {
            fixed_code: Some(code.into()),
            ..Self::new()
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Code currently valid for `phone`
    pub fn issued_code(&self, phone: &str) -> Option<String> {
        let key = normalize_phone_number(phone);
        self.codes
            .lock()
            .ok()
            .and_then(|codes| codes.get(&key).cloned())
    }

    pub fn sent_count(&self) -> u64 {
        self.sent_count.load(Ordering::SeqCst)
    }

    fn generate_code(&self) -> String {
        match &self.fixed_code {
            Some(code) => code.clone(),
            None => {
                let upper = 10u32.pow(CODE_LENGTH as u32);
                let value = rand::thread_rng().gen_range(0..upper);
                format!("{:0width$}", value, width = CODE_LENGTH)
            }
        }
    }

    fn ensure_online(&self) -> Result<(), OtpServiceError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(OtpServiceError::network("Mock OTP service is offline"));
        }
        Ok(())
    }
}

impl Default for MockOtpService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OtpDispatchService for MockOtpService {
    async fn send_code(&self, destination: &str) -> Result<bool, OtpServiceError> {
        if let Err(err) = self.ensure_online() {
            warn!(
                phone = %mask_phone_number(destination),
                "Mock OTP service simulating network failure"
            );
            return Err(err);
        }

        let code = self.generate_code();
        let key = normalize_phone_number(destination);
        self.codes
            .lock()
            .map_err(|_| OtpServiceError::server(500, "Mock OTP store poisoned"))?
            .insert(key, code.clone());
        let count = self.sent_count.fetch_add(1, Ordering::SeqCst) + 1;

        info!(
            phone = %mask_phone_number(destination),
            code = %code,
            count,
            event = "mock_otp_sent",
            "Mock OTP issued"
        );
        Ok(true)
    }
}

#[async_trait]
impl OtpVerificationService for MockOtpService {
    async fn verify_code(&self, destination: &str, code: &str) -> Result<bool, OtpServiceError> {
        self.ensure_online()?;

        if !is_valid_otp_code(code, CODE_LENGTH) {
            warn!(
                phone = %mask_phone_number(destination),
                event = "mock_otp_malformed",
                "Mock OTP rejected malformed code"
            );
            return Ok(false);
        }

        let key = normalize_phone_number(destination);
        let matches = self
            .codes
            .lock()
            .map_err(|_| OtpServiceError::server(500, "Mock OTP store poisoned"))?
            .get(&key)
            .is_some_and(|issued| issued == code);

        info!(
            phone = %mask_phone_number(destination),
            accepted = matches,
            event = "mock_otp_verified",
            "Mock OTP checked"
        );
        Ok(matches)
    }
}
