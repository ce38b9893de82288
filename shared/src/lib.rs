//! Shared utilities and common types for the HeartCast server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Error response structures
//! - Push token utilities (masking, format checks)
//! - API response wrappers

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, DatabaseConfig, DeviceConfig, Environment, LoggingConfig,
    PushConfig, ServerConfig, StoreBackend, TokenStoreConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use types::{ApiResponse, HealthResponse, HealthStatus};
pub use utils::token;
