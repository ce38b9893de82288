//! Mock Push Dispatcher Implementation
//!
//! A mock implementation of the dispatcher for development and testing.
//! It logs each message instead of sending it.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use hc_core::domain::entities::PushMessage;
use hc_core::domain::value_objects::{DispatchReport, PushTicket};
use hc_core::errors::PushError;
use hc_core::services::NotificationDispatcher;
use hc_shared::token::mask_token;

/// Mock dispatcher for development and testing
///
/// This implementation:
/// - Logs each message with the token masked
/// - Issues one `ok` ticket per message with a generated id
/// - Tracks batch and message counts for testing
#[derive(Clone, Default)]
pub struct MockDispatcher {
    /// Number of batches dispatched
    batch_count: Arc<AtomicU64>,
    /// Number of messages dispatched
    message_count: Arc<AtomicU64>,
    /// Whether to simulate failures (for testing)
    simulate_failure: bool,
}

impl MockDispatcher {
    /// Create a new mock dispatcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock dispatcher that fails every batch
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            ..Self::default()
        }
    }

    pub fn get_batch_count(&self) -> u64 {
        self.batch_count.load(Ordering::SeqCst)
    }

    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Reset the counters
    pub fn reset_counters(&self) {
        self.batch_count.store(0, Ordering::SeqCst);
        self.message_count.store(0, Ordering::SeqCst);
    }

    /// Enable or disable failure simulation
    pub fn set_simulate_failure(&mut self, simulate: bool) {
        self.simulate_failure = simulate;
    }
}

#[async_trait]
impl NotificationDispatcher for MockDispatcher {
    async fn dispatch(&self, messages: &[PushMessage]) -> Result<DispatchReport, PushError> {
        if self.simulate_failure {
            warn!(
                count = messages.len(),
                "Mock push dispatcher simulating failure"
            );
            return Err(PushError::dispatch("Simulated push gateway failure"));
        }

        let batch = self.batch_count.fetch_add(1, Ordering::SeqCst) + 1;
        self.message_count
            .fetch_add(messages.len() as u64, Ordering::SeqCst);

        let tickets = messages
            .iter()
            .map(|message| {
                let id = format!("mock_{}", Uuid::new_v4());
                info!(
                    target: "push_dispatch",
                    provider = "mock",
                    batch = batch,
                    to = %mask_token(&message.to),
                    title = %message.title,
                    ticket = %id,
                    "Mock push message"
                );
                PushTicket::Ok { id: Some(id) }
            })
            .collect();

        Ok(DispatchReport {
            submitted: messages.len(),
            tickets,
        })
    }

    fn provider_name(&self) -> &str {
        "Mock"
    }
}
