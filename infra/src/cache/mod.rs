//! Cache module for Redis access
//!
//! This module provides the Redis client used by the Redis token store,
//! with connection retry and set operations.

pub mod redis_client;


pub use redis_client::RedisClient;

// Re-export commonly used types
pub use hc_shared::config::cache::CacheConfig;
