//! HTTP client for the ResqLine backend

use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use rl_shared::config::ApiConfig;

use crate::InfrastructureError;

/// Status and raw body of a backend reply
#[derive(Debug, Clone)]
pub struct ApiReply {
    pub status: StatusCode,
    pub body: String,
}

/// Thin wrapper over `reqwest::Client` bound to one backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl ApiClient {
    /// Build a client with the configured timeout and user agent
    pub fn new(config: ApiConfig) -> Result<Self, InfrastructureError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// POST a JSON body and return the reply whatever its status
    ///
    /// Only transport failures are errors here; status handling is left to
    /// the caller.
    pub async fn post_json<B>(&self, path: &str, body: &B) -> Result<ApiReply, InfrastructureError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.config.endpoint(path);
        debug!(url = %url, "POST");

        let response = self.http.post(&url).json(body).send().await?;
        let status = response.status();
        let body = response.text().await?;

        debug!(url = %url, status = status.as_u16(), "Backend replied");
        Ok(ApiReply { status, body })
    }
}
