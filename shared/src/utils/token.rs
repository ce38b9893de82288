//! Push token utilities

use once_cell::sync::Lazy;
use regex::Regex;

// Expo push addresses, e.g. ExponentPushToken[xxxxxxxxxxxxxxxxxxxxxx]
static EXPO_TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Expo(nent)?PushToken\[[^\[\]\s]+\]$").unwrap()
});

/// Check whether a token has the shape of an Expo push address
pub fn is_expo_push_token(token: &str) -> bool {
    EXPO_TOKEN_REGEX.is_match(token.trim())
}

/// Mask a push token for logging (e.g., Expone…xx]])
///
/// Keeps the first six and last three characters. Short tokens are fully masked.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 12 {
        return "*".repeat(chars.len());
    }

    let prefix: String = chars[..6].iter().collect();
    let suffix: String = chars[chars.len() - 3..].iter().collect();
    format!("{}…{}", prefix, suffix)
}
