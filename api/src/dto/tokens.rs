use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterTokenRequest {
    /// Push address issued to the device, e.g. "ExponentPushToken[xxxx]"
    #[validate(length(min = 1, max = 4096))]
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterTokenResponse {
    /// false when the token was already registered
    pub registered: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenCountResponse {
    pub count: usize,
}
