pub mod broadcast;
pub mod tokens;

pub use broadcast::{BroadcastAcceptedResponse, BroadcastRequest};
pub use tokens::{RegisterTokenRequest, RegisterTokenResponse, TokenCountResponse};
