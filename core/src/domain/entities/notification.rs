//! Notification payload and gateway message entities.

use serde::{Deserialize, Serialize};

use super::push_token::PushToken;

/// Title of the greeting notification
pub const DEFAULT_TITLE: &str = "<3";

/// Body of the greeting notification
pub const DEFAULT_BODY: &str = "❤️🧡💛💚💙!";

/// Sound requested for every message
pub const DEFAULT_SOUND: &str = "default";

/// Content shared by every message of one broadcast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
}

impl NotificationPayload {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

impl Default for NotificationPayload {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE, DEFAULT_BODY)
    }
}

/// One message of the batch posted to the push gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushMessage {
    /// Recipient push token
    pub to: String,
    pub sound: String,
    pub title: String,
    pub body: String,
}

impl PushMessage {
    /// Address the payload to one recipient
    pub fn new(to: &PushToken, payload: &NotificationPayload) -> Self {
        Self {
            to: to.as_str().to_string(),
            sound: DEFAULT_SOUND.to_string(),
            title: payload.title.clone(),
            body: payload.body.clone(),
        }
    }
}
