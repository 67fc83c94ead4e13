use serde::{Deserialize, Serialize};

/// Optional username / password pair of one endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    pub fn new(username: Option<String>, password: Option<String>) -> Self {
        Self { username, password }
    }

    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: Some(username.into()), password: Some(password.into()) }
    }

    pub fn none() -> Self {
        Self::default()
    }
}

/// How the Authorization header of a call is produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthScheme {
    /// no Authorization header is added; custom headers still apply
    #[default]
    None,
    Basic,
    #[serde(alias = "oauth")]
    OAuth2,
}

impl AuthScheme {
    pub fn as_str(&self) -> &'static str {
        match *self {
            AuthScheme::None => "none",
            AuthScheme::Basic => "basic",
            AuthScheme::OAuth2 => "oauth2",
        }
    }
}
