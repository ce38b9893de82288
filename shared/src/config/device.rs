//! Local device configuration module

use serde::{Deserialize, Serialize};

/// Identity of the device this process speaks for
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DeviceConfig {
    /// Push token issued to this device by the notification platform
    #[serde(default)]
    pub push_token: Option<String>,
}

impl DeviceConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            push_token: std::env::var("DEVICE_PUSH_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
        }
    }
}
