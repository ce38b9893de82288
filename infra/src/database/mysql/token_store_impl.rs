//! MySQL implementation of the TokenStore trait.
//!
//! Tokens live in one table with a unique index on a SHA-256 hash of the
//! token, so concurrent registrations of the same device collapse into one
//! row through `INSERT IGNORE`.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use sqlx::Row;

use hc_core::domain::entities::{PushToken, TokenRecord};
use hc_core::errors::DomainError;
use hc_core::repositories::TokenStore;

use crate::database::DatabasePool;
use crate::InfrastructureError;

/// MySQL implementation of TokenStore
pub struct MySqlTokenStore {
    /// Database connection pool
    pool: DatabasePool,
    /// Table holding the tokens
    table: String,
}

impl MySqlTokenStore {
    /// Create a new MySQL token store
    ///
    /// # Arguments
    /// * `pool` - Token database pool
    /// * `table` - Table name, taken from the configured collection name
    pub fn new(pool: DatabasePool, table: impl Into<String>) -> Result<Self, InfrastructureError> {
        let table = table.into();
        if !is_valid_table_name(&table) {
            return Err(InfrastructureError::Config(format!(
                "Invalid token table name: {}",
                table
            )));
        }
        Ok(Self { pool, table })
    }

    /// Hash a token value using SHA-256
    ///
    /// # Returns
    /// Hexadecimal string representation of the SHA-256 hash
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Create the token table if it does not exist
    pub async fn ensure_schema(&self) -> Result<(), InfrastructureError> {
        let query = format!(
            r#"
            CREATE TABLE IF NOT EXISTS `{}` (
                id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
                token TEXT NOT NULL,
                token_hash CHAR(64) NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                UNIQUE KEY uq_token_hash (token_hash)
            )
            "#,
            self.table
        );

        sqlx::query(&query).execute(self.pool.inner()).await?;
        tracing::info!(table = %self.table, "Token table ready");
        Ok(())
    }
}

#[async_trait]
impl TokenStore for MySqlTokenStore {
    async fn list(&self) -> Result<Vec<TokenRecord>, DomainError> {
        let query = format!("SELECT token FROM `{}` ORDER BY id", self.table);

        let rows = sqlx::query(&query)
            .fetch_all(self.pool.inner())
            .await
            .map_err(InfrastructureError::Database)?;

        rows.iter()
            .map(|row| {
                row.try_get::<String, _>("token")
                    .map(|token| TokenRecord { token })
                    .map_err(|e| DomainError::Internal {
                        message: format!("Failed to get token: {}", e),
                    })
            })
            .collect()
    }

    async fn add(&self, record: TokenRecord) -> Result<(), DomainError> {
        let query = format!(
            "INSERT INTO `{}` (token, token_hash) VALUES (?, ?)",
            self.table
        );

        sqlx::query(&query)
            .bind(&record.token)
            .bind(Self::hash_token(&record.token))
            .execute(self.pool.inner())
            .await
            .map_err(InfrastructureError::Database)?;

        Ok(())
    }

    async fn insert_if_absent(&self, token: &PushToken) -> Result<bool, DomainError> {
        let query = format!(
            "INSERT IGNORE INTO `{}` (token, token_hash) VALUES (?, ?)",
            self.table
        );

        let result = sqlx::query(&query)
            .bind(token.as_str())
            .bind(Self::hash_token(token.as_str()))
            .execute(self.pool.inner())
            .await
            .map_err(InfrastructureError::Database)?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let query = count_query(&self.table);

        let row = sqlx::query(&query)
            .fetch_one(self.pool.inner())
            .await
            .map_err(InfrastructureError::Database)?;

        let total: i64 = row.try_get("total").map_err(|e| DomainError::Internal {
            message: format!("Failed to get count: {}", e),
        })?;

        Ok(total.max(0) as usize)
    }

    fn backend_name(&self) -> &str {
        "mysql"
    }

    async fn is_available(&self) -> bool {
        self.pool.ping().await
    }
}

/// Distinct non-blank tokens, matching what `list` yields after deduplication
pub(crate) fn count_query(table: &str) -> String {
    format!(
        "SELECT COUNT(DISTINCT TRIM(token)) AS total FROM `{}` WHERE TRIM(token) <> ''",
        table
    )
}

/// Table names are interpolated into SQL, so only `[A-Za-z0-9_]` is allowed
pub(crate) fn is_valid_table_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 64
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
