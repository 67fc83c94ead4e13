use std::collections::{BTreeMap, HashMap};

use http::Method;
use serde::Deserialize;

use crate::auth::credentials::{AuthScheme, Credentials};
use crate::auth::refresher::AuthorizationEndpoint;
use crate::config::settings::SettingsConfig;
use crate::config::values::GenericValue;
use crate::utils::constants::DEFAULT_TOKEN_STORE_PATH;

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    #[serde(default)]
    pub settings: SettingsConfig,
    #[serde(default)]
    pub token_store: TokenStoreConfig,
    /// Invariant: present whenever an endpoint uses `oauth2`.
    pub authorization: Option<AuthorizationConfig>,
    pub search: SearchConfig,
}

/// Where the bearer token is persisted between runs.
#[derive(Debug, Deserialize, Clone)]
pub struct TokenStoreConfig {
    pub path: String,
}

impl Default for TokenStoreConfig {
    fn default() -> Self {
        Self { path: DEFAULT_TOKEN_STORE_PATH.to_owned() }
    }
}

/// ================================
/// OAuth2 authorization server
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct AuthorizationConfig {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl AuthorizationConfig {
    pub fn endpoint(&self) -> AuthorizationEndpoint {
        AuthorizationEndpoint {
            url: self.url.to_owned(),
            credentials: Credentials::new(self.username.to_owned(), self.password.to_owned()),
        }
    }
}

/// ================================
/// Search endpoint
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    pub url: String,
    #[serde(with = "http_serde::method", default = "default_method")]
    pub method: Method,
    #[serde(default)]
    pub auth: AuthScheme,
    pub username: Option<String>,
    pub password: Option<String>,
    /// default query parameters, e.g. `location`, `term`
    #[serde(default)]
    pub query: BTreeMap<String, String>,
    pub headers: Option<HashMap<String, GenericValue>>,
}

impl SearchConfig {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.username.to_owned(), self.password.to_owned())
    }
}

fn default_method() -> Method {
    Method::GET
}
