//! OTP Service Module
//!
//! Concrete dispatch/verification collaborators for the challenge controller:
//!
//! - **REST**: the ResqLine backend (`/otp/login/*`, `/otp/register/*`)
//! - **Mock**: local codes written to the log for development

use std::sync::Arc;
use tracing::info;

use rl_core::{OtpDispatchService, OtpVerificationService};
use rl_shared::config::{ApiConfig, OtpConfig, OtpProvider};

use crate::api::ApiClient;
use crate::InfrastructureError;

pub mod mock_otp;
pub mod rest_otp;

pub use mock_otp::MockOtpService;
pub use rest_otp::{OtpFlow, Registrant, RestOtpService};


/// Collaborators handed to a challenge session
///
/// Both halves usually point at the same service instance.
#[derive(Clone)]
pub struct OtpServices {
    pub verifier: Arc<dyn OtpVerificationService>,
    pub dispatcher: Arc<dyn OtpDispatchService>,
    rest: Option<Arc<RestOtpService>>,
}

impl OtpServices {
    pub fn new(
        verifier: Arc<dyn OtpVerificationService>,
        dispatcher: Arc<dyn OtpDispatchService>,
    ) -> Self {
        Self {
            verifier,
            dispatcher,
            rest: None,
        }
    }

    /// Wrap a single service that plays both roles
    pub fn from_service<S>(service: Arc<S>) -> Self
    where
        S: OtpVerificationService + OtpDispatchService + 'static,
    {
        Self {
            verifier: service.clone(),
            dispatcher: service,
            rest: None,
        }
    }

    fn from_rest(service: Arc<RestOtpService>) -> Self {
        Self {
            rest: Some(service.clone()),
            ..Self::from_service(service)
        }
    }

    /// Session token issued by a successful REST login verification
    pub fn take_session_token(&self) -> Option<String> {
        self.rest.as_ref().and_then(|rest| rest.take_session_token())
    }
}

impl std::fmt::Debug for OtpServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OtpServices")
            .field("rest", &self.rest.is_some())
            .finish()
    }
}

/// Create OTP collaborators for a flow based on configuration
pub fn create_otp_services(
    otp: &OtpConfig,
    api: &ApiConfig,
    flow: OtpFlow,
) -> Result<OtpServices, InfrastructureError> {
    match otp.provider {
        OtpProvider::Mock => {
            info!(purpose = %flow.purpose(), "Using mock OTP service");
            Ok(OtpServices::from_service(Arc::new(MockOtpService::new())))
        }
        OtpProvider::Rest => {
            info!(
                purpose = %flow.purpose(),
                base_url = %api.base_url,
                "Using REST OTP service"
            );
            let client = ApiClient::new(api.clone())?;
            Ok(OtpServices::from_rest(Arc::new(RestOtpService::new(client, flow))))
        }
    }
}
