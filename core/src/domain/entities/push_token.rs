//! Push token entities.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use hc_shared::token::{is_expo_push_token, mask_token};

use crate::errors::ValidationError;

/// Upper bound on accepted token length
pub const MAX_TOKEN_LENGTH: usize = 4096;

/// Opaque push address issued by the notification platform.
///
/// Always trimmed and non-empty. Otherwise the value is not interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PushToken(String);

impl PushToken {
    /// Validate and wrap a raw token value
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "token".to_string(),
            });
        }

        if trimmed.len() > MAX_TOKEN_LENGTH {
            return Err(ValidationError::TooLong {
                field: "token".to_string(),
                max: MAX_TOKEN_LENGTH,
                actual: trimmed.len(),
            });
        }

        if trimmed.len() == value.len() {
            Ok(Self(value))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    /// Borrow the raw token value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the token and return the raw value
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Whether the token looks like an Expo push address
    pub fn is_expo_format(&self) -> bool {
        is_expo_push_token(&self.0)
    }

    /// Masked form for log output
    pub fn masked(&self) -> String {
        mask_token(&self.0)
    }
}

impl TryFrom<String> for PushToken {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<PushToken> for String {
    fn from(token: PushToken) -> Self {
        token.0
    }
}

impl AsRef<str> for PushToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PushToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stored document shape: `{"token": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Raw token value as written by the registering device
    #[serde(default)]
    pub token: String,
}

impl TokenRecord {
    /// Create a record for a validated token
    pub fn new(token: &PushToken) -> Self {
        Self {
            token: token.as_str().to_string(),
        }
    }

    /// The record's token, or `None` for blank documents
    pub fn push_token(&self) -> Option<PushToken> {
        PushToken::parse(self.token.as_str()).ok()
    }
}

impl From<PushToken> for TokenRecord {
    fn from(token: PushToken) -> Self {
        Self { token: token.0 }
    }
}

/// Reduce raw store records to distinct, non-blank tokens in first-seen order.
///
/// Legacy collections may hold duplicates written by racing registrations.
pub fn unique_tokens<I>(records: I) -> Vec<PushToken>
where
    I: IntoIterator<Item = TokenRecord>,
{
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter_map(|record| record.push_token())
        .filter(|token| seen.insert(token.clone()))
        .collect()
}
