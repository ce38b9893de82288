use serde::{Deserialize, Serialize};
use validator::Validate;

use hc_core::domain::entities::NotificationPayload;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BroadcastRequest {
    /// Sender's own token, excluded from the recipients
    #[validate(length(min = 1, max = 4096))]
    pub token: String,

    /// Defaults to "<3"
    #[validate(length(min = 1, max = 256))]
    pub title: Option<String>,

    /// Defaults to the heart row
    #[validate(length(min = 1, max = 2048))]
    pub body: Option<String>,
}

impl BroadcastRequest {
    /// Payload with the request's overrides applied on top of `defaults`
    pub fn payload(&self, defaults: &NotificationPayload) -> NotificationPayload {
        NotificationPayload {
            title: self.title.clone().unwrap_or_else(|| defaults.title.clone()),
            body: self.body.clone().unwrap_or_else(|| defaults.body.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastAcceptedResponse {
    pub queued: bool,
    /// Masked sender token
    pub sender: String,
}
