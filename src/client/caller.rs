use std::sync::Arc;

use http::{HeaderValue, StatusCode};
use reqwest::Client;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::auth::credentials::{AuthScheme, Credentials};
use crate::auth::refresher::TokenRefresher;
use crate::auth::resolver::AuthResolver;
use crate::cache::token_store::TokenStore;
use crate::client::request::{build_headers, send, RequestDescriptor};
use crate::client::response::{ApiFailure, ApiOutcome};
use crate::helpers::time::get_instant;
use crate::observability::metrics::get_metrics;

/// Status message reported for a 403 whose forced refresh succeeded.
pub const REFRESH_OK_MSG: &str = "OK";

/// Issues single HTTP calls with JSON headers and resolved authorization.
///
/// A 403 under OAuth2 forces one token refresh and is still reported as a
/// failure; the original request is not sent again.
#[derive(Debug)]
pub struct ApiCaller<S, R> {
    client: Client,
    resolver: Arc<AuthResolver<S, R>>,
}

impl<S: TokenStore, R: TokenRefresher> ApiCaller<S, R> {
    pub fn new(client: Client, resolver: Arc<AuthResolver<S, R>>) -> Self {
        Self { client, resolver }
    }

    pub fn resolver(&self) -> &Arc<AuthResolver<S, R>> {
        &self.resolver
    }

    pub async fn call(
        &self,
        descriptor: RequestDescriptor,
        scheme: AuthScheme,
        credentials: &Credentials,
    ) -> ApiOutcome {
        let metrics = get_metrics().await;
        let start = get_instant();
        let method = descriptor.method.clone();
        let url = descriptor.url.clone();

        let outcome = self.execute(descriptor, scheme, credentials).await;

        metrics
            .api_calls
            .with_label_values(&[method.as_str(), outcome.result_label()])
            .inc();
        metrics
            .api_call_duration
            .with_label_values(&[method.as_str()])
            .observe(start.elapsed().as_secs_f64());
        info!("{} '{}' finished: {}", method, url, outcome.status_label());
        outcome
    }

    /// Run the call on the runtime and hand the outcome to `callback`,
    /// which is invoked exactly once.
    pub fn call_with<F>(
        self: &Arc<Self>,
        descriptor: RequestDescriptor,
        scheme: AuthScheme,
        credentials: Credentials,
        callback: F,
    ) -> JoinHandle<()>
    where
        F: FnOnce(ApiOutcome) + Send + 'static,
    {
        let caller = Arc::clone(self);
        tokio::spawn(async move {
            let outcome = caller.call(descriptor, scheme, &credentials).await;
            callback(outcome);
        })
    }

    async fn execute(
        &self,
        descriptor: RequestDescriptor,
        scheme: AuthScheme,
        credentials: &Credentials,
    ) -> ApiOutcome {
        // -------------------------------
        // 1. Authorizing
        // -------------------------------

        let authorization = match self.resolver.resolve(scheme, credentials).await {
            Ok(value) => value,
            Err(err) => {
                warn!("authorization '{}' failed, request not sent: {}", scheme.as_str(), err);
                return ApiOutcome::Failure(ApiFailure::auth_failed(err.to_string()));
            }
        };
        let authorization = match authorization.map(|value| HeaderValue::from_str(&value)).transpose() {
            Ok(value) => value,
            Err(_) => {
                warn!("authorization '{}' produced an invalid header value", scheme.as_str());
                return ApiOutcome::Failure(ApiFailure::auth_failed("invalid Authorization header value"));
            }
        };

        // -------------------------------
        // 2. Sending
        // -------------------------------

        let headers = build_headers(&descriptor.headers, authorization);
        let response = match send(&self.client, descriptor, headers).await {
            Ok(response) => response,
            Err(err) => {
                warn!("request failed: {}", err);
                return ApiOutcome::Failure(ApiFailure::transport(err.to_string()));
            }
        };

        // -------------------------------
        // 3. Classifying
        // -------------------------------

        if !response.status.is_success() {
            if scheme == AuthScheme::OAuth2 && response.status == StatusCode::FORBIDDEN {
                debug!("403 under oauth2, forcing token refresh");
                let (message, refreshed) = match self.resolver.force_refresh().await {
                    Ok(_) => (REFRESH_OK_MSG.to_owned(), true),
                    Err(err) => (err.to_string(), false),
                };
                return ApiOutcome::Failure(ApiFailure::forbidden(response.headers, message, refreshed));
            }
            return ApiOutcome::Failure(ApiFailure::http(response.status, response.headers));
        }

        let body = if response.body.is_empty() { None } else { Some(response.body) };
        ApiOutcome::Success {
            status: response.status,
            headers: response.headers,
            body,
        }
    }
}
