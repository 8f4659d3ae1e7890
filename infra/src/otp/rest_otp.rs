//! REST implementation of the OTP collaborators
//!
//! Talks to the ResqLine backend's `/otp/...` endpoints. Login and
//! phone-number change share the login endpoints; sign-up verification also
//! carries the registrant's name so the backend can create the account.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use std::sync::Mutex;
use tracing::{info, warn};

use rl_core::{OtpDispatchService, OtpPurpose, OtpServiceError, OtpVerificationService};
use rl_shared::phone::{format_phone_for_api, mask_phone_number};

use crate::api::{ApiClient, ApiReply};

/// Name collected on the sign-up form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registrant {
    pub first_name: String,
    pub last_name: String,
}

impl Registrant {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}

/// Verification flow a REST service instance serves
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpFlow {
    Login,
    Registration(Registrant),
    PhoneChange,
}

impl OtpFlow {
    pub fn purpose(&self) -> OtpPurpose {
        match self {
            Self::Login => OtpPurpose::Login,
            Self::Registration(_) => OtpPurpose::Registration,
            Self::PhoneChange => OtpPurpose::PhoneChange,
        }
    }

    pub fn send_path(&self) -> &'static str {
        match self {
            Self::Registration(_) => "otp/register/send",
            Self::Login | Self::PhoneChange => "otp/login/send",
        }
    }

    pub fn verify_path(&self) -> &'static str {
        match self {
            Self::Registration(_) => "otp/register/verify",
            Self::Login | Self::PhoneChange => "otp/login/verify",
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendOtpRequest<'a> {
    mobile_number: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyOtpRequest<'a> {
    mobile_number: &'a str,
    otp: &'a str,
}

// The registration endpoint binds PascalCase fields
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct VerifyRegistrationRequest<'a> {
    mobile_number: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    otp: &'a str,
}

/// Map a backend status to the collaborator contract
///
/// Client errors mean the code (or number) was rejected; everything else
/// outside 2xx is a server failure.
pub(crate) fn classify_status(status: StatusCode, body: &str) -> Result<bool, OtpServiceError> {
    if status.is_success() {
        return Ok(true);
    }
    match status {
        StatusCode::BAD_REQUEST
        | StatusCode::UNAUTHORIZED
        | StatusCode::FORBIDDEN
        | StatusCode::NOT_FOUND
        | StatusCode::UNPROCESSABLE_ENTITY => Ok(false),
        _ => {
            let message = body.trim();
            let message = if message.is_empty() {
                status.canonical_reason().unwrap_or("Unexpected status")
            } else {
                message
            };
            Err(OtpServiceError::server(status.as_u16(), message))
        }
    }
}

/// Session token returned by a successful login verification
///
/// The backend answers with a bare JSON string; a plain-text body is
/// accepted as well.
pub(crate) fn parse_session_token(body: &str) -> Option<String> {
    let token = serde_json::from_str::<String>(body)
        .unwrap_or_else(|_| body.trim().to_string());
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// OTP dispatch and verification against the ResqLine REST API
pub struct RestOtpService {
    client: ApiClient,
    flow: OtpFlow,
    session_token: Mutex<Option<String>>,
}

impl RestOtpService {
    pub fn new(client: ApiClient, flow: OtpFlow) -> Self {
        Self {
            client,
            flow,
            session_token: Mutex::new(None),
        }
    }

    pub fn flow(&self) -> &OtpFlow {
        &self.flow
    }

    /// Token from the last successful login verification, handed over once
    pub fn take_session_token(&self) -> Option<String> {
        self.session_token
            .lock()
            .ok()
            .and_then(|mut token| token.take())
    }

    fn store_session_token(&self, token: String) {
        if let Ok(mut slot) = self.session_token.lock() {
            *slot = Some(token);
        }
    }

    fn handle_verify_reply(&self, reply: &ApiReply) -> Result<bool, OtpServiceError> {
        let accepted = classify_status(reply.status, &reply.body)?;
        if !accepted || matches!(self.flow, OtpFlow::Registration(_)) {
            return Ok(accepted);
        }

        match parse_session_token(&reply.body) {
            Some(token) => {
                self.store_session_token(token);
                Ok(true)
            }
            None => Err(OtpServiceError::server(
                reply.status.as_u16(),
                "Authentication successful but no token received",
            )),
        }
    }
}

#[async_trait]
impl OtpDispatchService for RestOtpService {
    async fn send_code(&self, destination: &str) -> Result<bool, OtpServiceError> {
        let mobile_number = format_phone_for_api(destination);
        let reply = self
            .client
            .post_json(self.flow.send_path(), &SendOtpRequest {
                mobile_number: &mobile_number,
            })
            .await?;

        let sent = classify_status(reply.status, &reply.body)?;
        if sent {
            info!(
                phone = %mask_phone_number(destination),
                purpose = %self.flow.purpose(),
                event = "otp_sent",
                "OTP requested from backend"
            );
        } else {
            warn!(
                phone = %mask_phone_number(destination),
                status = reply.status.as_u16(),
                event = "otp_send_rejected",
                "Backend refused to send OTP"
            );
        }
        Ok(sent)
    }
}

#[async_trait]
impl OtpVerificationService for RestOtpService {
    async fn verify_code(&self, destination: &str, code: &str) -> Result<bool, OtpServiceError> {
        let mobile_number = format_phone_for_api(destination);
        let reply = match &self.flow {
            OtpFlow::Registration(registrant) => {
                self.client
                    .post_json(self.flow.verify_path(), &VerifyRegistrationRequest {
                        mobile_number: &mobile_number,
                        first_name: &registrant.first_name,
                        last_name: &registrant.last_name,
                        otp: code,
                    })
                    .await?
            }
            OtpFlow::Login | OtpFlow::PhoneChange => {
                self.client
                    .post_json(self.flow.verify_path(), &VerifyOtpRequest {
                        mobile_number: &mobile_number,
                        otp: code,
                    })
                    .await?
            }
        };

        self.handle_verify_reply(&reply)
    }
}
