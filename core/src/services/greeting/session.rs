//! Greeting session implementation

use std::sync::Arc;
use tokio::sync::OnceCell;
use tokio::task::JoinHandle;

use crate::domain::entities::{NotificationPayload, PushToken};
use crate::errors::{DomainError, DomainResult, PushError};
use crate::repositories::TokenStore;
use crate::services::registry::{
    BroadcastHandle, LocalTokenProvider, NotificationDispatcher, TokenRegistryService,
};

/// One device's view of the card.
///
/// The local token is requested from the provider at most once per
/// successful lookup and reused for every later press.
pub struct GreetingSession<S, D, P>
where
    S: TokenStore,
    D: NotificationDispatcher,
    P: LocalTokenProvider,
{
    registry: Arc<TokenRegistryService<S, D>>,
    provider: Arc<P>,
    local: OnceCell<PushToken>,
    payload: NotificationPayload,
}

impl<S, D, P> GreetingSession<S, D, P>
where
    S: TokenStore + 'static,
    D: NotificationDispatcher + 'static,
    P: LocalTokenProvider + 'static,
{
    /// Create a session sending the registry's default payload
    pub fn new(registry: Arc<TokenRegistryService<S, D>>, provider: Arc<P>) -> Self {
        let payload = registry.config().default_payload.clone();
        Self {
            registry,
            provider,
            local: OnceCell::new(),
            payload,
        }
    }

    /// Override the payload sent on press
    pub fn with_payload(mut self, payload: NotificationPayload) -> Self {
        self.payload = payload;
        self
    }

    /// The local device token, fetched on first use
    pub async fn local_token(&self) -> Result<PushToken, PushError> {
        self.local
            .get_or_try_init(|| self.provider.local_token())
            .await
            .cloned()
    }

    /// Register the local device on a background task
    ///
    /// The returned handle may be ignored. Failures are logged and counted
    /// in the registry stats either way.
    pub fn start(self: &Arc<Self>) -> JoinHandle<DomainResult<bool>> {
        let session = Arc::clone(self);
        tokio::spawn(async move { session.register_local().await })
    }

    /// Broadcast the greeting to every other registered device
    ///
    /// Returns `None` when the local token cannot be obtained. Without it the
    /// sender cannot be excluded, so nothing is sent.
    pub async fn press(&self) -> Option<BroadcastHandle> {
        match self.local_token().await {
            Ok(local) => Some(self.registry.broadcast(local, self.payload.clone())),
            Err(e) => {
                self.registry.stats_handle().record_press_without_token(&e);
                tracing::warn!(
                    error = %e,
                    event = "press_without_token",
                    "Button pressed but local push token is unavailable"
                );
                None
            }
        }
    }

    pub fn registry(&self) -> &Arc<TokenRegistryService<S, D>> {
        &self.registry
    }

    async fn register_local(&self) -> DomainResult<bool> {
        let local = match self.local_token().await {
            Ok(token) => token,
            Err(e) => {
                self.registry.stats_handle().record_registration_failure(&e);
                tracing::error!(
                    error = %e,
                    code = e.code(),
                    event = "local_token_unavailable",
                    "Could not obtain local push token, skipping registration"
                );
                return Err(DomainError::Push(e));
            }
        };

        if !local.is_expo_format() {
            tracing::debug!(
                token = %local.masked(),
                "Local token is not in Expo format, registering as-is"
            );
        }

        self.registry.register(&local).await
    }
}
