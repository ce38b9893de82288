//! Connection pool for the MySQL token table

use sqlx::{
    mysql::{MySqlConnectOptions, MySqlPoolOptions},
    MySqlPool,
};
use std::str::FromStr;
use std::time::Duration;

use crate::database::DatabaseConfig;
use crate::InfrastructureError;

/// Pool shared by the MySQL token store
#[derive(Clone)]
pub struct DatabasePool {
    pool: MySqlPool,
}

impl DatabasePool {
    /// Connect using `config`, failing fast on a malformed URL
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, InfrastructureError> {
        let options = connect_options(&config.url)?;

        tracing::info!(
            max_connections = config.max_connections,
            "Connecting to token database"
        );

        let pool = pool_options(config)
            .connect_with(options)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to connect to token database");
                InfrastructureError::Database(e)
            })?;

        Ok(Self { pool })
    }

    /// Pool that opens connections on first use
    pub fn connect_lazy(config: &DatabaseConfig) -> Result<Self, InfrastructureError> {
        let options = connect_options(&config.url)?;
        Ok(Self {
            pool: pool_options(config).connect_lazy_with(options),
        })
    }

    pub fn inner(&self) -> &MySqlPool {
        &self.pool
    }

    /// `SELECT 1` round trip; false when the database cannot be reached
    pub async fn ping(&self) -> bool {
        match sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
        {
            Ok(1) => true,
            Ok(other) => {
                tracing::warn!(value = other, "Unexpected answer to database ping");
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "Token database unreachable");
                false
            }
        }
    }
}

fn pool_options(config: &DatabaseConfig) -> MySqlPoolOptions {
    MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout))
        .idle_timeout(Duration::from_secs(config.idle_timeout))
        .max_lifetime(Duration::from_secs(config.max_lifetime))
}

/// Parse a `mysql://` URL
pub(crate) fn connect_options(url: &str) -> Result<MySqlConnectOptions, InfrastructureError> {
    if !url.starts_with("mysql://") && !url.starts_with("mariadb://") {
        return Err(InfrastructureError::Config(
            "DATABASE_URL must use the mysql:// scheme".to_string(),
        ));
    }

    MySqlConnectOptions::from_str(url)
        .map_err(|e| InfrastructureError::Config(format!("Invalid database URL: {}", e)))
}
