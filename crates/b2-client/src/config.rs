//! Client configuration

use std::time::Duration;

/// Default API endpoint used for account authorization
pub const DEFAULT_API_URL: &str = "https://api.backblazeb2.com";

/// Client configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// API endpoint used for `b2_authorize_account`
    pub api_url: String,
    /// Application key id
    pub application_key_id: String,
    /// Application key secret
    pub application_key: String,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Maximum attempts for transient failures (network, 5xx)
    pub max_retries: u32,
    /// Base interval for linear retry backoff (delay = attempt * interval)
    pub retry_interval: Duration,
}

impl Config {
    /// Create a new config with the given credentials
    pub fn new(application_key_id: impl Into<String>, application_key: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            application_key_id: application_key_id.into(),
            application_key: application_key.into(),
            timeout: Duration::from_secs(60),
            user_agent: format!("b2-client/{}", env!("CARGO_PKG_VERSION")),
            max_retries: 3,
            retry_interval: Duration::from_secs(1),
        }
    }

    /// Override the authorization endpoint
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum transient retry attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the base interval for linear retry backoff
    pub fn with_retry_interval(mut self, retry_interval: Duration) -> Self {
        self.retry_interval = retry_interval;
        self
    }

    /// Set the user agent string
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
