//! Push dispatcher configuration module

use serde::{Deserialize, Serialize};

/// Expo push gateway endpoint
pub const DEFAULT_EXPO_PUSH_URL: &str = "https://exp.host/--/api/v2/push/send";

/// Push notification dispatcher configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PushConfig {
    /// Dispatcher provider ("expo", "mock")
    pub provider: String,

    /// Gateway endpoint receiving the message batch
    #[serde(default = "default_push_url")]
    pub url: String,

    /// Optional bearer token for gateways with enhanced push security enabled
    #[serde(default)]
    pub access_token: Option<String>,

    /// Timeout for the batch request in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            provider: "mock".to_string(),
            url: default_push_url(),
            access_token: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl PushConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            provider: std::env::var("PUSH_PROVIDER").unwrap_or_else(|_| "mock".to_string()),
            url: std::env::var("EXPO_PUSH_URL").unwrap_or_else(|_| default_push_url()),
            access_token: std::env::var("EXPO_ACCESS_TOKEN").ok().filter(|t| !t.is_empty()),
            request_timeout_secs: std::env::var("PUSH_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_request_timeout_secs),
        }
    }
}

fn default_push_url() -> String {
    DEFAULT_EXPO_PUSH_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}
