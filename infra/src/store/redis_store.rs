//! Redis implementation of the TokenStore trait.
//!
//! The collection is a Redis set, so `SADD` gives an atomic insert-if-absent.

use async_trait::async_trait;

use hc_core::domain::entities::{PushToken, TokenRecord};
use hc_core::errors::DomainError;
use hc_core::repositories::TokenStore;

use crate::cache::RedisClient;

pub struct RedisTokenStore {
    client: RedisClient,
    key: String,
}

impl RedisTokenStore {
    pub fn new(client: RedisClient, collection: &str) -> Self {
        let key = client.key(collection);
        Self { client, key }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

#[async_trait]
impl TokenStore for RedisTokenStore {
    async fn list(&self) -> Result<Vec<TokenRecord>, DomainError> {
        let mut members = self.client.set_members(&self.key).await?;
        // SMEMBERS order is unspecified
        members.sort();
        Ok(members.into_iter().map(|token| TokenRecord { token }).collect())
    }

    async fn add(&self, record: TokenRecord) -> Result<(), DomainError> {
        self.client.set_add(&self.key, &record.token).await?;
        Ok(())
    }

    async fn insert_if_absent(&self, token: &PushToken) -> Result<bool, DomainError> {
        Ok(self.client.set_add(&self.key, token.as_str()).await?)
    }

    fn backend_name(&self) -> &str {
        "redis"
    }

    async fn is_available(&self) -> bool {
        self.client.health_check().await.unwrap_or(false)
    }
}
