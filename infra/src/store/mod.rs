//! Token Store Module
//!
//! Backends for the registered-token collection and the factory that picks
//! one from configuration.

use std::sync::Arc;

use hc_core::repositories::InMemoryTokenStore;
use hc_shared::config::{StoreBackend, TokenStoreConfig};

use crate::SharedTokenStore;

pub mod firestore;
#[cfg(feature = "redis-cache")]
pub mod redis_store;

pub use firestore::FirestoreTokenStore;
#[cfg(feature = "redis-cache")]
pub use redis_store::RedisTokenStore;


/// Create a token store based on configuration
///
/// A backend that cannot be reached at startup falls back to the in-memory
/// store with an error log, so the process still serves requests.
///
/// # Arguments
///
/// * `config` - Token store configuration
pub async fn create_token_store(config: &TokenStoreConfig) -> SharedTokenStore {
    match config.backend {
        StoreBackend::Memory => Arc::new(InMemoryTokenStore::new()),
        #[cfg(feature = "redis-cache")]
        StoreBackend::Redis => {
            match crate::cache::RedisClient::new(config.redis.clone()).await {
                Ok(client) => Arc::new(RedisTokenStore::new(client, &config.collection)),
                Err(e) => fallback("redis", e),
            }
        }
        #[cfg(feature = "mysql")]
        StoreBackend::Mysql => match create_mysql_store(config).await {
            Ok(store) => Arc::new(store),
            Err(e) => fallback("mysql", e),
        },
        StoreBackend::Firestore => {
            match FirestoreTokenStore::new(&config.firestore, &config.collection) {
                Ok(store) => Arc::new(store),
                Err(e) => fallback("firestore", e),
            }
        }
        #[allow(unreachable_patterns)]
        other => {
            tracing::warn!(
                "Token store backend '{}' is not compiled in, using in-memory store",
                other
            );
            Arc::new(InMemoryTokenStore::new())
        }
    }
}

#[cfg(feature = "mysql")]
async fn create_mysql_store(
    config: &TokenStoreConfig,
) -> Result<crate::database::MySqlTokenStore, crate::InfrastructureError> {
    let pool = crate::database::DatabasePool::connect(&config.database).await?;
    let store = crate::database::MySqlTokenStore::new(pool, &config.collection)?;
    store.ensure_schema().await?;
    Ok(store)
}

fn fallback(backend: &str, error: crate::InfrastructureError) -> SharedTokenStore {
    tracing::error!("Failed to initialize {} token store: {}", backend, error);
    tracing::warn!("Falling back to in-memory token store, registrations will not persist");
    Arc::new(InMemoryTokenStore::new())
}
