//! Local token provider backed by a configured value

use async_trait::async_trait;

use crate::domain::entities::PushToken;
use crate::errors::PushError;
use crate::services::registry::LocalTokenProvider;

/// Provides a token fixed at construction, typically `DEVICE_PUSH_TOKEN`
#[derive(Debug, Clone, Default)]
pub struct StaticTokenProvider {
    token: Option<String>,
}

impl StaticTokenProvider {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    /// Whether a token value was configured at all
    pub fn is_configured(&self) -> bool {
        self.token.as_deref().map_or(false, |t| !t.trim().is_empty())
    }
}

#[async_trait]
impl LocalTokenProvider for StaticTokenProvider {
    async fn local_token(&self) -> Result<PushToken, PushError> {
        let raw = self
            .token
            .as_deref()
            .ok_or_else(|| PushError::token("no device push token configured"))?;

        PushToken::parse(raw).map_err(|e| PushError::token(e.to_string()))
    }
}
