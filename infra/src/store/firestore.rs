//! Firestore implementation of the TokenStore trait.
//!
//! Talks to the Firestore REST API. Each token is stored as a document
//! `{"token": "..."}` whose id is the SHA-256 hex of the token. Registration
//! first scans the collection, which may also hold auto-id documents, and
//! then creates with the derived id; a 409 from a concurrent writer is
//! reported as "already registered".

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::time::Duration;

use hc_core::domain::entities::{unique_tokens, PushToken, TokenRecord};
use hc_core::errors::DomainError;
use hc_core::repositories::TokenStore;
use hc_shared::config::FirestoreConfig;

use crate::InfrastructureError;

pub const DEFAULT_FIRESTORE_URL: &str = "https://firestore.googleapis.com";

const PAGE_SIZE: u32 = 300;

/// Typed Firestore field value. Only strings are used here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FieldValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub fields: HashMap<String, FieldValue>,
}

impl Document {
    fn from_token(token: &str) -> Self {
        let mut fields = HashMap::new();
        fields.insert(
            "token".to_string(),
            FieldValue {
                string_value: Some(token.to_string()),
            },
        );
        Self { name: None, fields }
    }

    /// The `token` field, empty when missing or not a string
    fn token(&self) -> String {
        self.fields
            .get("token")
            .and_then(|v| v.string_value.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListResponse {
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Firestore-backed token store
pub struct FirestoreTokenStore {
    client: reqwest::Client,
    collection_url: String,
    api_key: Option<String>,
}

impl FirestoreTokenStore {
    pub fn new(config: &FirestoreConfig, collection: &str) -> Result<Self, InfrastructureError> {
        if config.project_id.trim().is_empty() {
            return Err(InfrastructureError::Config(
                "FIRESTORE_PROJECT_ID not set".to_string(),
            ));
        }
        if collection.is_empty() || collection.contains('/') {
            return Err(InfrastructureError::Config(format!(
                "Invalid Firestore collection: {}",
                collection
            )));
        }

        let base = config
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_FIRESTORE_URL)
            .trim_end_matches('/');
        let collection_url = format!(
            "{}/v1/projects/{}/databases/(default)/documents/{}",
            base, config.project_id, collection
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        tracing::info!(
            project = %config.project_id,
            collection = %collection,
            "Firestore token store initialized"
        );

        Ok(Self {
            client,
            collection_url,
            api_key: config.api_key.clone(),
        })
    }

    /// Document id for a token
    pub fn document_id(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn with_key(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.query(&[("key", key.as_str())]),
            None => request,
        }
    }

    async fn fetch_page(&self, page_token: Option<&str>) -> Result<ListResponse, InfrastructureError> {
        let mut request = self
            .client
            .get(&self.collection_url)
            .query(&[("pageSize", PAGE_SIZE.to_string())]);
        if let Some(page_token) = page_token {
            request = request.query(&[("pageToken", page_token)]);
        }

        let response = self.with_key(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InfrastructureError::Store(format!(
                "list failed with HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        Ok(response.json::<ListResponse>().await?)
    }

    async fn create(&self, token: &str, document_id: Option<String>) -> Result<bool, InfrastructureError> {
        let mut request = self
            .client
            .post(&self.collection_url)
            .json(&Document::from_token(token));
        if let Some(id) = document_id {
            request = request.query(&[("documentId", id)]);
        }

        let response = self.with_key(request).send().await?;
        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::CONFLICT => Ok(false),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(InfrastructureError::Store(format!(
                    "create failed with HTTP {}: {}",
                    status.as_u16(),
                    body
                )))
            }
        }
    }
}

#[async_trait]
impl TokenStore for FirestoreTokenStore {
    async fn list(&self) -> Result<Vec<TokenRecord>, DomainError> {
        let mut records = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.fetch_page(page_token.as_deref()).await?;
            records.extend(
                page.documents
                    .iter()
                    .map(|doc| TokenRecord { token: doc.token() }),
            );

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        tracing::debug!(count = records.len(), "Listed Firestore tokens");
        Ok(records)
    }

    async fn add(&self, record: TokenRecord) -> Result<(), DomainError> {
        self.create(&record.token, None).await?;
        Ok(())
    }

    async fn insert_if_absent(&self, token: &PushToken) -> Result<bool, DomainError> {
        // Documents written by the app itself carry auto ids
        if unique_tokens(self.list().await?).contains(token) {
            return Ok(false);
        }

        let id = Self::document_id(token.as_str());
        Ok(self.create(token.as_str(), Some(id)).await?)
    }

    fn backend_name(&self) -> &str {
        "firestore"
    }
}
