//! Configuration for the registry service

use std::time::Duration;

use crate::domain::entities::notification::NotificationPayload;

/// Configuration for the registry service
#[derive(Debug, Clone)]
pub struct RegistryServiceConfig {
    /// Payload sent when a caller does not supply one
    pub default_payload: NotificationPayload,
    /// Upper bound on a single dispatch call before it is reported as failed
    pub dispatch_timeout: Duration,
}

impl Default for RegistryServiceConfig {
    fn default() -> Self {
        Self {
            default_payload: NotificationPayload::default(),
            dispatch_timeout: Duration::from_secs(30),
        }
    }
}
