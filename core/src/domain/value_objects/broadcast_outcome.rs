//! Result of one fire-and-forget broadcast.

use serde::{Deserialize, Serialize};

use super::dispatch_report::DispatchReport;
use crate::errors::PushError;

/// How a broadcast ended. Produced by the detached task, never returned to the presser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastOutcome {
    /// No other device was registered, nothing was sent
    Empty,
    /// The batch reached the gateway
    Delivered {
        recipients: usize,
        report: DispatchReport,
    },
    /// The store could not be read or the gateway did not take the batch
    Failed {
        recipients: usize,
        error: PushError,
    },
}

impl BroadcastOutcome {
    pub fn recipients(&self) -> usize {
        match self {
            BroadcastOutcome::Empty => 0,
            BroadcastOutcome::Delivered { recipients, .. }
            | BroadcastOutcome::Failed { recipients, .. } => *recipients,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, BroadcastOutcome::Failed { .. })
    }

    /// Short label for logs and stats
    pub fn status(&self) -> BroadcastStatus {
        match self {
            BroadcastOutcome::Empty => BroadcastStatus::Empty,
            BroadcastOutcome::Delivered { report, .. } if report.rejected() > 0 => {
                BroadcastStatus::Partial
            }
            BroadcastOutcome::Delivered { .. } => BroadcastStatus::Delivered,
            BroadcastOutcome::Failed { .. } => BroadcastStatus::Failed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BroadcastStatus {
    Empty,
    Delivered,
    Partial,
    Failed,
}
