//! Value objects representing immutable domain concepts.

pub mod broadcast_outcome;
pub mod dispatch_report;


// Re-export commonly used types
pub use broadcast_outcome::{BroadcastOutcome, BroadcastStatus};
pub use dispatch_report::{DispatchReport, PushTicket, TicketDetails};
