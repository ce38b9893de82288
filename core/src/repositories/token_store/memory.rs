//! In-memory implementation of TokenStore
//!
//! Used for development and as the test double for the token store.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::push_token::{PushToken, TokenRecord};
use crate::errors::{DomainError, PushError};

use super::r#trait::TokenStore;

/// Process-local token store
#[derive(Clone, Default)]
pub struct InMemoryTokenStore {
    records: Arc<RwLock<Vec<TokenRecord>>>,
    unavailable: Arc<AtomicBool>,
    writes: Arc<AtomicUsize>,
}

impl InMemoryTokenStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with raw token values
    pub fn with_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let records = tokens
            .into_iter()
            .map(|t| TokenRecord { token: t.into() })
            .collect();
        Self {
            records: Arc::new(RwLock::new(records)),
            ..Self::default()
        }
    }

    /// Raw token values currently stored, duplicates included
    pub async fn tokens(&self) -> Vec<String> {
        self.records
            .read()
            .await
            .iter()
            .map(|r| r.token.clone())
            .collect()
    }

    /// Number of successful writes since creation
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make every operation fail with `StoreUnavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(PushError::store("in-memory store marked unavailable").into());
        }
        Ok(())
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn list(&self) -> Result<Vec<TokenRecord>, DomainError> {
        self.check_available()?;
        Ok(self.records.read().await.clone())
    }

    async fn add(&self, record: TokenRecord) -> Result<(), DomainError> {
        self.check_available()?;
        self.records.write().await.push(record);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn insert_if_absent(&self, token: &PushToken) -> Result<bool, DomainError> {
        self.check_available()?;

        // Check and insert under one write guard
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.token.trim() == token.as_str()) {
            return Ok(false);
        }

        records.push(TokenRecord::new(token));
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }

    fn backend_name(&self) -> &str {
        "memory"
    }

    async fn is_available(&self) -> bool {
        !self.unavailable.load(Ordering::SeqCst)
    }
}
