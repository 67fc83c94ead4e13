use serde::{Deserialize, Serialize};

pub const BEARER_PREFIX: &str = "Bearer ";

/// Cached bearer token.
///
/// `value` is stored ready to use as an Authorization header, i.e. already
/// carrying the `Bearer ` prefix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    #[serde(rename = "access_token")]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// UNIX timestamp, seconds
    #[serde(rename = "access_token_expiration_date")]
    pub expires_at: f64,
}

impl Token {
    pub fn new(value: String, expires_at: f64) -> Self {
        Self { value, token_type: None, scope: None, expires_at }
    }

    /// Build a token from an authorization server grant issued at `now`.
    pub fn from_grant(
        access_token: &str,
        expires_in: f64,
        token_type: Option<String>,
        scope: Option<String>,
        now: f64,
    ) -> Self {
        Self {
            value: format!("{}{}", BEARER_PREFIX, access_token),
            token_type,
            scope,
            expires_at: now + expires_in,
        }
    }

    /// Half-open validity: the token is usable strictly before `expires_at`.
    pub fn is_valid(&self, now: f64) -> bool {
        self.expires_at - now > 0.0
    }

    pub fn seconds_left(&self, now: f64) -> f64 {
        self.expires_at - now
    }
}
