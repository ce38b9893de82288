//! Expo Push Service Implementation
//!
//! Sends a whole batch of messages to the Expo push API in a single request
//! and turns the response into a [`DispatchReport`].
//!
//! ## Features
//!
//! - JSON array body of `{to, sound, title, body}` messages
//! - Optional bearer access token for projects with enhanced push security
//! - Per-message ticket parsing (accepted / rejected with reason)
//! - No retry: a failed batch is reported once and dropped

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use hc_core::domain::entities::PushMessage;
use hc_core::domain::value_objects::{DispatchReport, PushTicket};
use hc_core::errors::PushError;
use hc_core::services::NotificationDispatcher;
use hc_shared::config::PushConfig;
use hc_shared::token::mask_token;

use crate::InfrastructureError;

/// Longest slice of an error body kept in error messages
const MAX_ERROR_BODY: usize = 512;

/// Request-level error returned by the gateway
#[derive(Debug, Deserialize)]
pub(crate) struct GatewayError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// Response body of the send endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct SendResponse {
    #[serde(default)]
    pub data: Option<Vec<PushTicket>>,
    #[serde(default)]
    pub errors: Option<Vec<GatewayError>>,
}

/// Expo push gateway client
pub struct ExpoPushDispatcher {
    client: reqwest::Client,
    url: String,
    has_access_token: bool,
}

impl ExpoPushDispatcher {
    /// Create a new Expo push dispatcher
    pub fn new(config: &PushConfig) -> Result<Self, InfrastructureError> {
        reqwest::Url::parse(&config.url)
            .map_err(|e| InfrastructureError::Config(format!("Invalid push URL: {}", e)))?;

        let client = reqwest::Client::builder()
            .default_headers(Self::default_headers(config.access_token.as_deref())?)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        info!(
            url = %config.url,
            access_token = config.access_token.is_some(),
            "Expo push dispatcher initialized"
        );

        Ok(Self {
            client,
            url: config.url.clone(),
            has_access_token: config.access_token.is_some(),
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        Self::new(&PushConfig::from_env())
    }

    fn default_headers(access_token: Option<&str>) -> Result<HeaderMap, InfrastructureError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = access_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| InfrastructureError::Config("Invalid Expo access token".to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }

    async fn send(&self, messages: &[PushMessage]) -> Result<DispatchReport, InfrastructureError> {
        let response = self.client.post(&self.url).json(messages).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(InfrastructureError::Dispatch(format!(
                "HTTP {}: {}",
                status.as_u16(),
                truncate(&body)
            )));
        }

        parse_send_response(messages.len(), &body)
    }
}

/// Turn a 2xx response body into a report
///
/// A body that cannot be parsed is treated as accepted without tickets.
pub(crate) fn parse_send_response(
    submitted: usize,
    body: &str,
) -> Result<DispatchReport, InfrastructureError> {
    let parsed: SendResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(error = %e, "Unreadable push gateway response, assuming accepted");
            return Ok(DispatchReport::accepted_without_tickets(submitted));
        }
    };

    if let Some(errors) = parsed.errors.filter(|errors| !errors.is_empty()) {
        let summary = errors
            .iter()
            .map(|e| match &e.code {
                Some(code) => format!("{}: {}", code, e.message),
                None => e.message.clone(),
            })
            .collect::<Vec<_>>()
            .join("; ");
        return Err(InfrastructureError::Dispatch(summary));
    }

    Ok(DispatchReport {
        submitted,
        tickets: parsed.data.unwrap_or_default(),
    })
}

fn truncate(body: &str) -> &str {
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[async_trait]
impl NotificationDispatcher for ExpoPushDispatcher {
    async fn dispatch(&self, messages: &[PushMessage]) -> Result<DispatchReport, PushError> {
        if messages.is_empty() {
            return Ok(DispatchReport::default());
        }

        debug!(
            count = messages.len(),
            first = %mask_token(&messages[0].to),
            "Sending push batch to Expo"
        );

        let report = self.send(messages).await.map_err(PushError::from)?;

        info!(
            provider = "expo",
            submitted = report.submitted,
            accepted = report.accepted(),
            rejected = report.rejected(),
            "Push batch accepted by gateway"
        );

        Ok(report)
    }

    fn provider_name(&self) -> &str {
        "Expo"
    }

    async fn is_available(&self) -> bool {
        !self.url.is_empty()
    }
}

impl std::fmt::Debug for ExpoPushDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpoPushDispatcher")
            .field("url", &self.url)
            .field("has_access_token", &self.has_access_token)
            .finish()
    }
}
