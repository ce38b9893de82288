//! Route handlers
//!
//! - `health`: liveness and dependency status
//! - `tokens`: device registration and registry size
//! - `broadcast`: greeting broadcast from an explicit sender, and stats
//! - `press`: greeting broadcast from this server's own device token

pub mod broadcast;
pub mod health;
pub mod press;
pub mod tokens;

use std::sync::Arc;

use hc_core::repositories::TokenStore;
use hc_core::services::{
    GreetingSession, LocalTokenProvider, NotificationDispatcher, StaticTokenProvider,
    TokenRegistryService,
};
use hc_infra::{SharedDispatcher, SharedTokenStore};

/// Application state that holds shared services
pub struct AppState<S, D, P>
where
    S: TokenStore,
    D: NotificationDispatcher,
    P: LocalTokenProvider,
{
    pub registry: Arc<TokenRegistryService<S, D>>,
    /// Present when a device push token is configured
    pub session: Option<Arc<GreetingSession<S, D, P>>>,
}

impl<S, D, P> AppState<S, D, P>
where
    S: TokenStore + 'static,
    D: NotificationDispatcher + 'static,
    P: LocalTokenProvider + 'static,
{
    pub fn new(
        registry: Arc<TokenRegistryService<S, D>>,
        session: Option<Arc<GreetingSession<S, D, P>>>,
    ) -> Self {
        Self { registry, session }
    }
}

/// State type used by the server binary
pub type ServerState = AppState<SharedTokenStore, SharedDispatcher, StaticTokenProvider>;
