//! Configuration module with sub-modules per concern
//!
//! - `cache` - Redis connection configuration
//! - `database` - MySQL connection configuration
//! - `device` - Local device identity (push token)
//! - `environment` - Environment detection and logging configuration
//! - `push` - Push gateway configuration
//! - `server` - HTTP server and CORS configuration
//! - `store` - Token store backend selection

pub mod cache;
pub mod database;
pub mod device;
pub mod environment;
pub mod push;
pub mod server;
pub mod store;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use device::DeviceConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use push::{PushConfig, DEFAULT_EXPO_PUSH_URL};
pub use server::ServerConfig;
pub use store::{FirestoreConfig, StoreBackend, TokenStoreConfig, DEFAULT_TOKEN_COLLECTION};

/// Prefix for layered environment overrides, e.g. `HEARTCAST__SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "HEARTCAST";

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Token store configuration
    #[serde(default)]
    pub store: TokenStoreConfig,

    /// Push dispatcher configuration
    #[serde(default)]
    pub push: PushConfig,

    /// Local device configuration
    #[serde(default)]
    pub device: DeviceConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            server: ServerConfig::from_env(),
            store: TokenStoreConfig::from_env(),
            push: PushConfig::from_env(),
            device: DeviceConfig::from_env(),
            logging: LoggingConfig::from_env(environment),
        }
    }

    /// Layered load: environment defaults, then an optional file, then
    /// `HEARTCAST__`-prefixed variables.
    ///
    /// `file` is passed to `config::File::with_name`, so the extension may be omitted.
    pub fn load(file: &str) -> Result<Self, config::ConfigError> {
        let defaults = Self::from_env();

        config::Config::builder()
            .add_source(config::Config::try_from(&defaults)?)
            .add_source(config::File::with_name(file).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
