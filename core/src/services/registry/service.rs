//! Main registry service implementation

use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::domain::entities::{unique_tokens, NotificationPayload, PushMessage, PushToken};
use crate::domain::value_objects::{BroadcastOutcome, BroadcastStatus};
use crate::errors::{DomainResult, PushError};
use crate::repositories::TokenStore;

use super::config::RegistryServiceConfig;
use super::stats::{BroadcastStats, BroadcastStatsSnapshot};
use super::traits::NotificationDispatcher;

/// Handle to a detached broadcast.
///
/// Dropping it does not cancel the broadcast.
#[derive(Debug)]
pub struct BroadcastHandle {
    inner: JoinHandle<BroadcastOutcome>,
}

impl BroadcastHandle {
    /// Wait for the broadcast to finish
    pub async fn outcome(self) -> BroadcastOutcome {
        match self.inner.await {
            Ok(outcome) => outcome,
            Err(e) => BroadcastOutcome::Failed {
                recipients: 0,
                error: PushError::dispatch(format!("broadcast task aborted: {}", e)),
            },
        }
    }

    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }
}

/// Registry service: device registration and broadcast to every other device
pub struct TokenRegistryService<S: TokenStore, D: NotificationDispatcher> {
    /// Store holding registered tokens
    store: Arc<S>,
    /// Push gateway client
    dispatcher: Arc<D>,
    /// Service configuration
    config: RegistryServiceConfig,
    /// Totals shared with detached broadcast tasks
    stats: Arc<BroadcastStats>,
}

impl<S, D> TokenRegistryService<S, D>
where
    S: TokenStore + 'static,
    D: NotificationDispatcher + 'static,
{
    /// Create a new registry service
    ///
    /// # Arguments
    ///
    /// * `store` - Token store implementation
    /// * `dispatcher` - Push gateway implementation
    /// * `config` - Service configuration
    pub fn new(store: Arc<S>, dispatcher: Arc<D>, config: RegistryServiceConfig) -> Self {
        Self {
            store,
            dispatcher,
            config,
            stats: Arc::new(BroadcastStats::new()),
        }
    }

    /// Register a device token if it is not already stored
    ///
    /// One read and at most one write against the store. Sequential calls
    /// with the same token leave exactly one record.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The token was added
    /// * `Ok(false)` - The token was already registered
    /// * `Err(DomainError)` - The store could not be reached
    pub async fn register(&self, token: &PushToken) -> DomainResult<bool> {
        match self.store.insert_if_absent(token).await {
            Ok(inserted) => {
                self.stats.record_registration();
                tracing::info!(
                    token = %token.masked(),
                    backend = self.store.backend_name(),
                    inserted = inserted,
                    event = "token_registered",
                    "Push token registration complete"
                );
                Ok(inserted)
            }
            Err(e) => {
                self.stats.record_registration_failure(&e);
                tracing::error!(
                    token = %token.masked(),
                    backend = self.store.backend_name(),
                    error = %e,
                    event = "token_registration_failed",
                    "Failed to register push token"
                );
                Err(e)
            }
        }
    }

    /// Every registered token except `local`, without duplicates
    pub async fn recipients(&self, local: &PushToken) -> DomainResult<Vec<PushToken>> {
        Self::load_recipients(self.store.as_ref(), local).await
    }

    /// Number of distinct registered tokens
    pub async fn registered_count(&self) -> DomainResult<usize> {
        self.store.count().await
    }

    /// Start a broadcast from `local` and return immediately
    ///
    /// The store read and the gateway call run on a detached task. Failures
    /// never reach the caller; they are logged and counted in [`Self::stats`].
    pub fn broadcast(&self, local: PushToken, payload: NotificationPayload) -> BroadcastHandle {
        let store = self.store.clone();
        let dispatcher = self.dispatcher.clone();
        let stats = self.stats.clone();
        let timeout = self.config.dispatch_timeout;

        stats.record_started();
        tracing::debug!(
            sender = %local.masked(),
            provider = dispatcher.provider_name(),
            event = "broadcast_started",
            "Broadcast queued"
        );

        let inner = tokio::spawn(async move {
            let outcome =
                Self::run_broadcast(store.as_ref(), dispatcher.as_ref(), &local, &payload, timeout)
                    .await;
            stats.record_outcome(&outcome);
            Self::log_outcome(&local, &outcome);
            outcome
        });

        BroadcastHandle { inner }
    }

    /// Broadcast the configured default payload
    pub fn broadcast_default(&self, local: PushToken) -> BroadcastHandle {
        self.broadcast(local, self.config.default_payload.clone())
    }

    /// Current totals
    pub fn stats(&self) -> BroadcastStatsSnapshot {
        self.stats.snapshot()
    }

    /// Shared stats handle, for recording failures that happen before a broadcast starts
    pub fn stats_handle(&self) -> Arc<BroadcastStats> {
        self.stats.clone()
    }

    pub fn config(&self) -> &RegistryServiceConfig {
        &self.config
    }

    /// Reachability of the store and the gateway, for health checks
    pub async fn health(&self) -> (bool, bool) {
        (
            self.store.is_available().await,
            self.dispatcher.is_available().await,
        )
    }

    async fn load_recipients(store: &S, local: &PushToken) -> DomainResult<Vec<PushToken>> {
        let records = store.list().await?;
        Ok(unique_tokens(records)
            .into_iter()
            .filter(|token| token != local)
            .collect())
    }

    async fn run_broadcast(
        store: &S,
        dispatcher: &D,
        local: &PushToken,
        payload: &NotificationPayload,
        timeout: std::time::Duration,
    ) -> BroadcastOutcome {
        let recipients = match Self::load_recipients(store, local).await {
            Ok(recipients) => recipients,
            Err(e) => {
                let error = match e.push_error() {
                    Some(push_error) => push_error.clone(),
                    None => PushError::store(e.to_string()),
                };
                return BroadcastOutcome::Failed {
                    recipients: 0,
                    error,
                };
            }
        };

        if recipients.is_empty() {
            return BroadcastOutcome::Empty;
        }

        let batch = build_batch(&recipients, payload);
        let count = batch.len();

        match tokio::time::timeout(timeout, dispatcher.dispatch(&batch)).await {
            Ok(Ok(report)) => BroadcastOutcome::Delivered {
                recipients: count,
                report,
            },
            Ok(Err(error)) => BroadcastOutcome::Failed {
                recipients: count,
                error,
            },
            Err(_) => BroadcastOutcome::Failed {
                recipients: count,
                error: PushError::dispatch(format!("no response within {:?}", timeout)),
            },
        }
    }

    fn log_outcome(local: &PushToken, outcome: &BroadcastOutcome) {
        match outcome {
            BroadcastOutcome::Empty => {
                tracing::info!(
                    sender = %local.masked(),
                    event = "broadcast_empty",
                    "No other devices registered, nothing sent"
                );
            }
            BroadcastOutcome::Delivered { recipients, report } => {
                if outcome.status() == BroadcastStatus::Partial {
                    tracing::warn!(
                        sender = %local.masked(),
                        recipients = recipients,
                        accepted = report.accepted(),
                        rejected = report.rejected(),
                        reasons = ?report.rejection_reasons(),
                        event = "broadcast_partial",
                        "Push gateway rejected part of the batch"
                    );
                } else {
                    tracing::info!(
                        sender = %local.masked(),
                        recipients = recipients,
                        event = "broadcast_delivered",
                        "Broadcast handed to push gateway"
                    );
                }
            }
            BroadcastOutcome::Failed { recipients, error } => {
                tracing::error!(
                    sender = %local.masked(),
                    recipients = recipients,
                    error = %error,
                    code = error.code(),
                    event = "broadcast_failed",
                    "Broadcast failed"
                );
            }
        }
    }
}

/// One message per recipient, all carrying the same payload
pub fn build_batch(recipients: &[PushToken], payload: &NotificationPayload) -> Vec<PushMessage> {
    recipients
        .iter()
        .map(|to| PushMessage::new(to, payload))
        .collect()
}
