//! Registry service module for push token registration and broadcast
//!
//! This module provides:
//! - Device registration against the token store
//! - Recipient selection (every registered token except the sender's)
//! - Fire-and-forget broadcast on a detached task
//! - Outcome counters for background work

mod config;
mod service;
mod stats;
mod traits;

#[cfg(test)]
pub(crate) mod tests;

pub use config::RegistryServiceConfig;
pub use service::{build_batch, BroadcastHandle, TokenRegistryService};
pub use stats::{BroadcastStats, BroadcastStatsSnapshot};
pub use traits::{LocalTokenProvider, NotificationDispatcher};
