//! Token store configuration module

use serde::{Deserialize, Serialize};

use super::{cache::CacheConfig, database::DatabaseConfig};

/// Collection name the greeting card app has always written to
pub const DEFAULT_TOKEN_COLLECTION: &str = "tokes";

/// Which backend holds the registered push tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local set, lost on restart
    Memory,
    /// Redis set
    Redis,
    /// MySQL table with a unique token column
    Mysql,
    /// Firestore document collection (REST API)
    Firestore,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "mock" => Ok(StoreBackend::Memory),
            "redis" => Ok(StoreBackend::Redis),
            "mysql" => Ok(StoreBackend::Mysql),
            "firestore" | "firebase" => Ok(StoreBackend::Firestore),
            _ => Err(format!("Unknown token store backend: {}", s)),
        }
    }
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Memory => write!(f, "memory"),
            StoreBackend::Redis => write!(f, "redis"),
            StoreBackend::Mysql => write!(f, "mysql"),
            StoreBackend::Firestore => write!(f, "firestore"),
        }
    }
}

/// Firestore REST access
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FirestoreConfig {
    /// Google Cloud project id
    pub project_id: String,

    /// Web API key appended as `?key=`
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL override (emulator or tests)
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Token store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenStoreConfig {
    /// Selected backend
    #[serde(default = "default_backend")]
    pub backend: StoreBackend,

    /// Collection / table / set name
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Redis settings (redis backend)
    #[serde(default)]
    pub redis: CacheConfig,

    /// MySQL settings (mysql backend)
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Firestore settings (firestore backend)
    #[serde(default)]
    pub firestore: FirestoreConfig,
}

impl Default for TokenStoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            collection: default_collection(),
            redis: CacheConfig::default(),
            database: DatabaseConfig::default(),
            firestore: FirestoreConfig::default(),
        }
    }
}

impl TokenStoreConfig {
    /// Create from environment variables
    ///
    /// An unrecognised `TOKEN_STORE` value keeps the in-memory backend.
    pub fn from_env() -> Self {
        let backend = std::env::var("TOKEN_STORE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(StoreBackend::Memory);

        Self {
            backend,
            collection: std::env::var("TOKEN_COLLECTION").unwrap_or_else(|_| default_collection()),
            redis: CacheConfig::from_env(),
            database: DatabaseConfig::from_env(),
            firestore: FirestoreConfig {
                project_id: std::env::var("FIRESTORE_PROJECT_ID").unwrap_or_default(),
                api_key: std::env::var("FIRESTORE_API_KEY").ok(),
                base_url: std::env::var("FIRESTORE_BASE_URL").ok(),
            },
        }
    }
}

fn default_backend() -> StoreBackend {
    StoreBackend::Memory
}

fn default_collection() -> String {
    DEFAULT_TOKEN_COLLECTION.to_string()
}
