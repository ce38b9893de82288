//! Gateway response for one submitted batch.

use serde::{Deserialize, Serialize};

/// Extra detail attached to a rejected message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketDetails {
    /// Machine-readable reason, e.g. `DeviceNotRegistered`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Per-message receipt returned by the push gateway, in batch order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PushTicket {
    Ok {
        #[serde(default)]
        id: Option<String>,
    },
    Error {
        #[serde(default)]
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<TicketDetails>,
    },
}

impl PushTicket {
    pub fn is_ok(&self) -> bool {
        matches!(self, PushTicket::Ok { .. })
    }

    /// Rejection reason: the detail code when present, else the message
    pub fn rejection_reason(&self) -> Option<&str> {
        match self {
            PushTicket::Ok { .. } => None,
            PushTicket::Error { message, details } => Some(
                details
                    .as_ref()
                    .and_then(|d| d.error.as_deref())
                    .unwrap_or(message.as_str()),
            ),
        }
    }
}

/// What the gateway said about a submitted batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReport {
    /// Number of messages in the submitted batch
    pub submitted: usize,
    /// Tickets, one per message when the gateway reports them
    #[serde(default)]
    pub tickets: Vec<PushTicket>,
}

impl DispatchReport {
    /// Report for a batch the gateway accepted without per-message tickets
    pub fn accepted_without_tickets(submitted: usize) -> Self {
        Self {
            submitted,
            tickets: Vec::new(),
        }
    }

    /// Messages the gateway accepted.
    ///
    /// Without tickets the whole batch counts as accepted.
    pub fn accepted(&self) -> usize {
        if self.tickets.is_empty() {
            self.submitted
        } else {
            self.tickets.iter().filter(|t| t.is_ok()).count()
        }
    }

    /// Messages the gateway rejected
    pub fn rejected(&self) -> usize {
        self.tickets.iter().filter(|t| !t.is_ok()).count()
    }

    /// Rejection reasons in batch order
    pub fn rejection_reasons(&self) -> Vec<&str> {
        self.tickets
            .iter()
            .filter_map(PushTicket::rejection_reason)
            .collect()
    }
}
