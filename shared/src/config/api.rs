//! Backend API client configuration

use serde::{Deserialize, Serialize};

/// ResqLine backend API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL of the reports/users API (no trailing slash)
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("http://localhost:5000/api"),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl ApiConfig {
    /// Create a configuration pointing at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    /// Set the request timeout
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let base_url = std::env::var("RESQLINE_API_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.base_url);
        let timeout_secs = std::env::var("RESQLINE_API_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.timeout_secs);

        Self {
            base_url,
            timeout_secs,
            user_agent: defaults.user_agent,
        }
    }

    /// Join a path onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn default_timeout() -> u64 {
    15
}

fn default_user_agent() -> String {
    format!("resqline/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let config = ApiConfig::new("https://api.resqline.ph/api/");
        assert_eq!(config.base_url, "https://api.resqline.ph/api");
        assert_eq!(config.timeout_secs, 15);
    }

    #[test]
    fn test_endpoint_join() {
        let config = ApiConfig::new("https://api.resqline.ph/api");
        assert_eq!(
            config.endpoint("/otp/login/send"),
            "https://api.resqline.ph/api/otp/login/send"
        );
        assert_eq!(
            config.endpoint("otp/register/verify"),
            "https://api.resqline.ph/api/otp/register/verify"
        );
    }
}
