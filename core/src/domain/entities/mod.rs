//! Domain entities representing core business objects.

pub mod notification;
pub mod push_token;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use notification::{
    NotificationPayload, PushMessage, DEFAULT_BODY, DEFAULT_SOUND, DEFAULT_TITLE,
};
pub use push_token::{unique_tokens, PushToken, TokenRecord, MAX_TOKEN_LENGTH};
