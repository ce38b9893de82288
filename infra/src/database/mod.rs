//! Database module - MySQL implementations using SQLx
//!
//! This module provides:
//! - Connection pool management
//! - The MySQL token store

pub mod connection;
pub mod mysql;


// Re-export commonly used types
pub use connection::DatabasePool;
pub use mysql::MySqlTokenStore;
pub use hc_shared::config::database::DatabaseConfig;
