//! Redis client implementation
//!
//! This module provides a Redis client with a multiplexed connection, retry
//! logic, and the set operations the Redis token store is built on.

use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError, RedisResult};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::cache::CacheConfig;
use crate::InfrastructureError;

type RedisFuture<T> = Pin<Box<dyn Future<Output = RedisResult<T>> + Send>>;

/// Redis client with retry logic
///
/// Cloning is cheap; clones share the multiplexed connection.
#[derive(Clone)]
pub struct RedisClient {
    /// Redis multiplexed connection for async operations
    connection: MultiplexedConnection,
    /// Configuration used to create this client
    config: CacheConfig,
}

impl RedisClient {
    /// Create a new Redis client
    ///
    /// # Arguments
    /// * `config` - Cache configuration settings
    ///
    /// # Returns
    /// * `Result<Self, InfrastructureError>` - Redis client or error
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        info!("Creating Redis client with URL: {}", mask_url(&config.url));

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection =
            Self::create_connection_with_retry(client, config.max_retries, config.retry_delay_ms)
                .await?;

        info!("Redis client created successfully");

        Ok(Self { connection, config })
    }

    /// Create multiplexed connection with retry logic
    async fn create_connection_with_retry(
        client: Client,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = retry_delay_ms;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            match client.get_multiplexed_async_connection().await {
                Ok(connection) => {
                    info!("Successfully connected to Redis");
                    return Ok(connection);
                }
                Err(e) if attempts < max_retries => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    // Exponential backoff with cap at 5 seconds
                    delay = (delay * 2).min(5000);
                }
                Err(e) => {
                    error!(
                        "Failed to connect to Redis after {} attempts: {}",
                        attempts, e
                    );
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    /// Key with the configured prefix applied
    pub fn key(&self, key: &str) -> String {
        self.config.make_key(key)
    }

    /// Add a member to a set
    ///
    /// # Returns
    /// * `Ok(true)` - The member was added
    /// * `Ok(false)` - The member was already present
    pub async fn set_add(&self, key: &str, member: &str) -> Result<bool, InfrastructureError> {
        debug!("Adding member to set '{}'", key);

        let added = self
            .execute_with_retry(|mut conn| {
                let key = key.to_string();
                let member = member.to_string();
                Box::pin(async move { conn.sadd::<_, _, i64>(key, member).await })
            })
            .await
            .map_err(|e| {
                error!("Failed to add member to set '{}': {}", key, e);
                InfrastructureError::Cache(e)
            })?;

        Ok(added > 0)
    }

    /// All members of a set
    pub async fn set_members(&self, key: &str) -> Result<Vec<String>, InfrastructureError> {
        debug!("Reading members of set '{}'", key);

        self.execute_with_retry(|mut conn| {
            let key = key.to_string();
            Box::pin(async move { conn.smembers::<_, Vec<String>>(key).await })
        })
        .await
        .map_err(|e| {
            error!("Failed to read set '{}': {}", key, e);
            InfrastructureError::Cache(e)
        })
    }

    /// Check if the Redis connection is healthy
    ///
    /// Performs a PING command to verify connectivity.
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        debug!("Performing Redis health check");

        let result = self
            .execute_with_retry(|mut conn| {
                Box::pin(async move { redis::cmd("PING").query_async::<_, String>(&mut conn).await })
            })
            .await;

        match result {
            Ok(response) if response == "PONG" => {
                debug!("Redis health check passed");
                Ok(true)
            }
            Ok(response) => {
                warn!("Redis health check returned unexpected response: {}", response);
                Ok(false)
            }
            Err(e) => {
                error!("Redis health check failed: {}", e);
                Err(InfrastructureError::Cache(e))
            }
        }
    }

    async fn execute_with_retry<F, T>(&self, operation: F) -> RedisResult<T>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        let mut attempts = 0;
        let mut delay = self.config.retry_delay_ms;

        loop {
            attempts += 1;
            let conn = self.connection.clone();

            match operation(conn).await {
                Ok(result) => return Ok(result),
                Err(e) if attempts < self.config.max_retries && is_retriable_error(&e) => {
                    warn!(
                        "Redis operation failed (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, self.config.max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(5000);
                }
                Err(e) => {
                    error!("Redis operation failed after {} attempts: {}", attempts, e);
                    return Err(e);
                }
            }
        }
    }
}

/// Whether an error is transient and the operation should be retried
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError
            | redis::ErrorKind::ClientError
            | redis::ErrorKind::BusyLoadingError
            | redis::ErrorKind::TryAgain
    )
}

/// Mask credentials in a Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(proto_end) = url.find("://") {
            let proto = &url[..proto_end + 3];
            let host_part = &url[at_pos..];
            return format!("{}****{}", proto, host_part);
        }
    }
    url.to_string()
}
