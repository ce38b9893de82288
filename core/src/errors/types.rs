//! Error classes for push token registration and broadcast

use thiserror::Error;

/// Failures of the external collaborators a broadcast depends on
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PushError {
    /// The token store could not be read or written
    #[error("Token store unavailable: {message}")]
    StoreUnavailable { message: String },

    /// The push gateway rejected or never received the batch
    #[error("Notification dispatch failed: {message}")]
    DispatchFailed { message: String },

    /// The local device token could not be obtained or is malformed
    #[error("Local push token unavailable: {message}")]
    TokenUnavailable { message: String },
}

impl PushError {
    /// Build a `StoreUnavailable` error
    pub fn store(message: impl Into<String>) -> Self {
        PushError::StoreUnavailable {
            message: message.into(),
        }
    }

    /// Build a `DispatchFailed` error
    pub fn dispatch(message: impl Into<String>) -> Self {
        PushError::DispatchFailed {
            message: message.into(),
        }
    }

    /// Build a `TokenUnavailable` error
    pub fn token(message: impl Into<String>) -> Self {
        PushError::TokenUnavailable {
            message: message.into(),
        }
    }

    /// Stable code used in logs and API error bodies
    pub fn code(&self) -> &'static str {
        match self {
            PushError::StoreUnavailable { .. } => hc_shared::error_codes::STORE_UNAVAILABLE,
            PushError::DispatchFailed { .. } => hc_shared::error_codes::DISPATCH_FAILED,
            PushError::TokenUnavailable { .. } => hc_shared::error_codes::TOKEN_UNAVAILABLE,
        }
    }
}

/// Validation errors for incoming values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field required: {field}")]
    RequiredField { field: String },

    #[error("Invalid length for field: {field} (max: {max}, actual: {actual})")]
    TooLong {
        field: String,
        max: usize,
        actual: usize,
    },
}
