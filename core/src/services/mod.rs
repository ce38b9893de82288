//! Business services containing domain logic and use cases.

pub mod greeting;
pub mod registry;

// Re-export commonly used types
pub use greeting::{GreetingSession, StaticTokenProvider};
pub use registry::{
    build_batch, BroadcastHandle, BroadcastStats, BroadcastStatsSnapshot, LocalTokenProvider,
    NotificationDispatcher, RegistryServiceConfig, TokenRegistryService,
};
