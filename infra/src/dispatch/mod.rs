//! Push Dispatch Module
//!
//! This module provides the clients that hand a batch of push messages to a
//! push gateway. It includes the Expo push service client and a mock
//! implementation for development.
//!
//! ## Features
//!
//! - **Expo Client**: one POST per batch, ticket parsing, optional access token
//! - **Mock Implementation**: logs messages and issues fake tickets
//! - **Security**: push tokens are masked in logs

use std::sync::Arc;

pub mod expo;
pub mod mock_dispatch;

pub use expo::ExpoPushDispatcher;
pub use mock_dispatch::MockDispatcher;

use hc_shared::config::PushConfig;

use crate::SharedDispatcher;

#[cfg(test)]
mod tests;

/// Create a dispatcher based on configuration
///
/// Unknown providers and Expo client construction failures fall back to the
/// mock dispatcher with a warning.
///
/// # Arguments
///
/// * `config` - Push configuration containing provider settings
pub fn create_dispatcher(config: &PushConfig) -> SharedDispatcher {
    match config.provider.to_lowercase().as_str() {
        "mock" => Arc::new(MockDispatcher::new()),
        "expo" => match ExpoPushDispatcher::new(config) {
            Ok(dispatcher) => Arc::new(dispatcher),
            Err(e) => {
                tracing::error!("Failed to initialize Expo push dispatcher: {}", e);
                tracing::warn!("Falling back to mock push dispatcher");
                Arc::new(MockDispatcher::new())
            }
        },
        _ => {
            tracing::warn!(
                "Unknown push provider '{}', using mock implementation",
                config.provider
            );
            Arc::new(MockDispatcher::new())
        }
    }
}
