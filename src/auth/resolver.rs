use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::auth::credentials::{AuthScheme, Credentials};
use crate::auth::refresher::TokenRefresher;
use crate::cache::token::Token;
use crate::cache::token_store::TokenStore;
use crate::error::ApiResult;
use crate::helpers::time::now_f64;
use crate::observability::metrics::get_metrics;

static OK_MSG: &str = "ok";
static ERROR_MSG: &str = "error";

/// Why a refresh was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    /// no cached token, or the cached one expired
    Expired,
    /// the resource server answered 403
    Forbidden,
}

impl RefreshTrigger {
    pub fn as_str(&self) -> &'static str {
        match *self {
            RefreshTrigger::Expired => "expired",
            RefreshTrigger::Forbidden => "forbidden",
        }
    }
}

/// Value of a Basic Authorization header.
///
/// A username without password is sent as is, nothing at all gives an empty
/// value.
pub fn basic_authorization(credentials: &Credentials) -> String {
    match (&credentials.username, &credentials.password) {
        (Some(username), Some(password)) => {
            format!("Basic {}", STANDARD.encode(format!("{}:{}", username, password)))
        }
        (Some(username), None) => username.to_owned(),
        _ => String::new(),
    }
}

/// Produces Authorization header values and owns the refresh policy of the
/// shared token store.
///
/// Refreshes run under `refresh_lock`; a caller that waited on the lock
/// re-reads the store first, so concurrent expirations cost one refresh.
#[derive(Debug)]
pub struct AuthResolver<S, R> {
    store: Arc<S>,
    refresher: R,
    refresh_lock: Mutex<()>,
}

impl<S: TokenStore, R: TokenRefresher> AuthResolver<S, R> {
    pub fn new(store: Arc<S>, refresher: R) -> Self {
        Self { store, refresher, refresh_lock: Mutex::new(()) }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// `Ok(None)` means the call carries no Authorization header.
    pub async fn resolve(&self, scheme: AuthScheme, credentials: &Credentials) -> ApiResult<Option<String>> {
        match scheme {
            AuthScheme::None => Ok(None),
            AuthScheme::Basic => Ok(Some(basic_authorization(credentials))),
            AuthScheme::OAuth2 => self.bearer().await.map(Some),
        }
    }

    /// Cached bearer value, refreshed first when absent or expired.
    pub async fn bearer(&self) -> ApiResult<String> {
        if let Some(token) = self.valid_token().await {
            get_metrics().await.token_cache_hits.inc();
            return Ok(token.value);
        }

        let _guard = self.refresh_lock.lock().await;
        // refreshed by another caller while we were waiting
        if let Some(token) = self.valid_token().await {
            get_metrics().await.token_cache_hits.inc();
            return Ok(token.value);
        }
        self.refresh_locked(RefreshTrigger::Expired).await.map(|token| token.value)
    }

    /// Unconditional refresh, used after the resource server rejected the
    /// current token.
    pub async fn force_refresh(&self) -> ApiResult<Token> {
        let _guard = self.refresh_lock.lock().await;
        self.refresh_locked(RefreshTrigger::Forbidden).await
    }

    async fn valid_token(&self) -> Option<Token> {
        let now = now_f64();
        self.store.load().await.filter(|token| {
            let valid = token.is_valid(now);
            if valid {
                debug!("access token active for {:.0} more seconds", token.seconds_left(now));
            }
            valid
        })
    }

    async fn refresh_locked(&self, trigger: RefreshTrigger) -> ApiResult<Token> {
        info!("refreshing access token, trigger '{}'", trigger.as_str());
        let result = self.refresher.refresh().await;
        let label = if result.is_ok() { OK_MSG } else { ERROR_MSG };
        get_metrics()
            .await
            .token_refreshes
            .with_label_values(&[trigger.as_str(), label])
            .inc();
        result
    }
}
