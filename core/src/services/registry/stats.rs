//! Counters for background registration and broadcast outcomes

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::domain::value_objects::{BroadcastOutcome, BroadcastStatus};

/// Running totals. Shared between the service and its detached tasks.
#[derive(Debug, Default)]
pub struct BroadcastStats {
    broadcasts_started: AtomicU64,
    broadcasts_delivered: AtomicU64,
    broadcasts_partial: AtomicU64,
    broadcasts_failed: AtomicU64,
    broadcasts_empty: AtomicU64,
    messages_accepted: AtomicU64,
    messages_rejected: AtomicU64,
    registrations: AtomicU64,
    registration_failures: AtomicU64,
    presses_without_token: AtomicU64,
    last_error: Mutex<Option<String>>,
}

/// Point-in-time copy of [`BroadcastStats`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastStatsSnapshot {
    pub broadcasts_started: u64,
    pub broadcasts_delivered: u64,
    pub broadcasts_partial: u64,
    pub broadcasts_failed: u64,
    pub broadcasts_empty: u64,
    pub messages_accepted: u64,
    pub messages_rejected: u64,
    pub registrations: u64,
    pub registration_failures: u64,
    /// Presses dropped because the local token was unavailable
    pub presses_without_token: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl BroadcastStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_started(&self) {
        self.broadcasts_started.fetch_add(1, Ordering::Relaxed);
    }

    /// Fold a finished broadcast into the totals
    pub fn record_outcome(&self, outcome: &BroadcastOutcome) {
        match outcome.status() {
            BroadcastStatus::Empty => self.broadcasts_empty.fetch_add(1, Ordering::Relaxed),
            BroadcastStatus::Delivered => self.broadcasts_delivered.fetch_add(1, Ordering::Relaxed),
            BroadcastStatus::Partial => self.broadcasts_partial.fetch_add(1, Ordering::Relaxed),
            BroadcastStatus::Failed => self.broadcasts_failed.fetch_add(1, Ordering::Relaxed),
        };

        match outcome {
            BroadcastOutcome::Delivered { report, .. } => {
                self.messages_accepted
                    .fetch_add(report.accepted() as u64, Ordering::Relaxed);
                self.messages_rejected
                    .fetch_add(report.rejected() as u64, Ordering::Relaxed);
            }
            BroadcastOutcome::Failed { error, .. } => self.set_last_error(error.to_string()),
            BroadcastOutcome::Empty => {}
        }
    }

    pub fn record_registration(&self) {
        self.registrations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_registration_failure(&self, error: &impl ToString) {
        self.registration_failures.fetch_add(1, Ordering::Relaxed);
        self.set_last_error(error.to_string());
    }

    /// A press that could not broadcast because the sender is unknown
    pub fn record_press_without_token(&self, error: &impl ToString) {
        self.presses_without_token.fetch_add(1, Ordering::Relaxed);
        self.set_last_error(error.to_string());
    }

    pub fn snapshot(&self) -> BroadcastStatsSnapshot {
        BroadcastStatsSnapshot {
            broadcasts_started: self.broadcasts_started.load(Ordering::Relaxed),
            broadcasts_delivered: self.broadcasts_delivered.load(Ordering::Relaxed),
            broadcasts_partial: self.broadcasts_partial.load(Ordering::Relaxed),
            broadcasts_failed: self.broadcasts_failed.load(Ordering::Relaxed),
            broadcasts_empty: self.broadcasts_empty.load(Ordering::Relaxed),
            messages_accepted: self.messages_accepted.load(Ordering::Relaxed),
            messages_rejected: self.messages_rejected.load(Ordering::Relaxed),
            registrations: self.registrations.load(Ordering::Relaxed),
            registration_failures: self.registration_failures.load(Ordering::Relaxed),
            presses_without_token: self.presses_without_token.load(Ordering::Relaxed),
            last_error: self.last_error.lock().ok().and_then(|e| e.clone()),
        }
    }

    fn set_last_error(&self, message: String) {
        if let Ok(mut last) = self.last_error.lock() {
            *last = Some(message);
        }
    }
}
