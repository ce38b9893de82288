//! Token store trait defining the interface for push token persistence.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::entities::push_token::{unique_tokens, PushToken, TokenRecord};
use crate::errors::DomainError;

/// Repository trait for the registered push token collection
///
/// The collection is append-only: records are added when a device first
/// registers and are never updated or deleted.
///
/// # Errors
/// Backends report connectivity and protocol failures as
/// `DomainError::Push(PushError::StoreUnavailable { .. })`.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// List every stored record, in backend order
    ///
    /// Records are returned as stored; blank or duplicate documents are the
    /// caller's concern (see [`unique_tokens`]).
    ///
    /// # Example
    /// ```no_run
    /// # use hc_core::repositories::TokenStore;
    /// # use hc_core::domain::entities::unique_tokens;
    /// # async fn example(store: &impl TokenStore) -> Result<(), Box<dyn std::error::Error>> {
    /// let tokens = unique_tokens(store.list().await?);
    /// println!("{} devices registered", tokens.len());
    /// # Ok(())
    /// # }
    /// ```
    async fn list(&self) -> Result<Vec<TokenRecord>, DomainError>;

    /// Append a record unconditionally
    async fn add(&self, record: TokenRecord) -> Result<(), DomainError>;

    /// Add the token unless it is already present
    ///
    /// # Returns
    /// * `Ok(true)` - The token was inserted
    /// * `Ok(false)` - The token was already registered
    ///
    /// The default is a list-then-add sequence and is not atomic: two
    /// concurrent callers can both insert. Backends with a conditional write
    /// override it.
    async fn insert_if_absent(&self, token: &PushToken) -> Result<bool, DomainError> {
        let existing = unique_tokens(self.list().await?);
        if existing.contains(token) {
            return Ok(false);
        }

        self.add(TokenRecord::new(token)).await?;
        Ok(true)
    }

    /// Number of distinct registered tokens
    async fn count(&self) -> Result<usize, DomainError> {
        Ok(unique_tokens(self.list().await?).len())
    }

    /// Backend name for logs
    fn backend_name(&self) -> &str;

    /// Cheap reachability probe used by the health endpoint
    async fn is_available(&self) -> bool {
        self.list().await.is_ok()
    }
}

#[async_trait]
impl<T: TokenStore + ?Sized> TokenStore for Arc<T> {
    async fn list(&self) -> Result<Vec<TokenRecord>, DomainError> {
        (**self).list().await
    }

    async fn add(&self, record: TokenRecord) -> Result<(), DomainError> {
        (**self).add(record).await
    }

    async fn insert_if_absent(&self, token: &PushToken) -> Result<bool, DomainError> {
        (**self).insert_if_absent(token).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        (**self).count().await
    }

    fn backend_name(&self) -> &str {
        (**self).backend_name()
    }

    async fn is_available(&self) -> bool {
        (**self).is_available().await
    }
}
