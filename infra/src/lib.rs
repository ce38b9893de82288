//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the HeartCast backend.
//! It provides concrete implementations of the collaborators the core
//! registry service depends on.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Dispatch**: Expo push gateway client and a mock dispatcher
//! - **Store**: token store backends (Redis set, MySQL table, Firestore collection)
//! - **Cache**: Redis client with connection retry
//! - **Database**: MySQL connection pool using SQLx
//!
//! ## Features
//!
//! - `mysql`: Enable the MySQL token store (default)
//! - `redis-cache`: Enable the Redis token store (default)

use std::sync::Arc;

use hc_core::repositories::TokenStore;
use hc_core::services::NotificationDispatcher;

// Re-export core types for convenience
pub use hc_core::errors::*;

/// Cache module - Redis client and connection handling
#[cfg(feature = "redis-cache")]
pub mod cache;

/// Database module - MySQL connection pool using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Push gateway clients
pub mod dispatch;

/// Token store backends and factory
pub mod store;

pub use dispatch::{create_dispatcher, ExpoPushDispatcher, MockDispatcher};
pub use store::create_token_store;

/// Token store chosen at runtime
pub type SharedTokenStore = Arc<dyn TokenStore>;

/// Dispatcher chosen at runtime
pub type SharedDispatcher = Arc<dyn NotificationDispatcher>;

/// Configuration module for infrastructure services
pub mod config {
    //! Configuration management for infrastructure services
    //!
    //! Handles:
    //! - Token store backend selection and connection settings
    //! - Push gateway settings

    use serde::{Deserialize, Serialize};

    // Re-export shared configs
    pub use hc_shared::config::{
        CacheConfig, DatabaseConfig, FirestoreConfig, PushConfig, StoreBackend, TokenStoreConfig,
    };

    /// Infrastructure configuration settings
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct InfrastructureConfig {
        /// Token store configuration
        pub store: TokenStoreConfig,
        /// Push gateway configuration
        pub push: PushConfig,
    }
}

/// Build the token store and dispatcher described by `config`
pub async fn initialize(
    config: &config::InfrastructureConfig,
) -> (SharedTokenStore, SharedDispatcher) {
    tracing::info!(
        store = %config.store.backend,
        push_provider = %config.push.provider,
        "Initializing infrastructure services"
    );

    let store = create_token_store(&config.store).await;
    let dispatcher = create_dispatcher(&config.push);

    tracing::info!(
        store = store.backend_name(),
        push_provider = dispatcher.provider_name(),
        "Infrastructure services initialized"
    );

    (store, dispatcher)
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Push gateway answered with an error
    #[error("Push dispatch error: {0}")]
    Dispatch(String),

    /// Token store answered with an error
    #[error("Token store error: {0}")]
    Store(String),
}

impl From<InfrastructureError> for PushError {
    fn from(error: InfrastructureError) -> Self {
        match error {
            InfrastructureError::Http(_) | InfrastructureError::Dispatch(_) => {
                PushError::dispatch(error.to_string())
            }
            _ => PushError::store(error.to_string()),
        }
    }
}

impl From<InfrastructureError> for DomainError {
    fn from(error: InfrastructureError) -> Self {
        match error {
            InfrastructureError::Config(message) => {
                DomainError::Internal { message }
            }
            other => DomainError::Push(other.into()),
        }
    }
}
