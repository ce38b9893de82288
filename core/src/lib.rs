//! # HeartCast Core
//!
//! Core domain layer for the HeartCast backend.
//! This crate contains the push token entities, the `TokenStore` repository
//! interface with its in-memory implementation, the registration and broadcast
//! service, and the greeting session that ties them to one local device.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
