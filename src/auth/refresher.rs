use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use http::{HeaderValue, Method, StatusCode};
use reqwest::Client;
use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

use crate::auth::credentials::Credentials;
use crate::auth::resolver::basic_authorization;
use crate::cache::token::Token;
use crate::cache::token_store::TokenStore;
use crate::client::request::{build_headers, send, RequestDescriptor};
use crate::error::{ApiError, ApiResult};
use crate::helpers::time::now_f64;

/// Source of fresh bearer tokens.
pub trait TokenRefresher: Send + Sync + 'static {
    fn refresh(&self) -> impl Future<Output = ApiResult<Token>> + Send;
}

/// Authorization endpoint of the OAuth2 server.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationEndpoint {
    pub url: String,
    pub credentials: Credentials,
}


/// Fetches tokens with a Basic-authenticated POST and keeps the store in
/// step: a successful grant is saved, any failure clears the cached token.
#[derive(Debug)]
pub struct OAuth2Refresher<S> {
    client: Client,
    store: Arc<S>,
    endpoint: AuthorizationEndpoint,
}

impl<S: TokenStore> OAuth2Refresher<S> {
    pub fn new(client: Client, store: Arc<S>, endpoint: AuthorizationEndpoint) -> Self {
        Self { client, store, endpoint }
    }

    async fn request_token(&self) -> ApiResult<Token> {
        let authorization = HeaderValue::from_str(&basic_authorization(&self.endpoint.credentials))
            .map_err(|_| ApiError::InvalidHeader("Authorization"))?;
        let headers = build_headers(&HashMap::new(), Some(authorization));
        let descriptor = RequestDescriptor::new(self.endpoint.url.as_str(), Method::POST);

        debug!("requesting token from '{}'", self.endpoint.url);
        let response = send(&self.client, descriptor, headers).await?;
        if response.status != StatusCode::OK {
            return Err(ApiError::AuthServer(response.status));
        }

        // only a non-object body is a parse error, a field of the wrong type counts as absent
        let grant: Map<String, Value> =
            serde_json::from_slice(&response.body).map_err(ApiError::TokenParse)?;
        let access_token = grant
            .get("access_token")
            .and_then(Value::as_str)
            .ok_or(ApiError::MalformedTokenResponse("access_token"))?;
        let expires_in = grant
            .get("expires_in")
            .and_then(Value::as_f64)
            .ok_or(ApiError::MalformedTokenResponse("expires_in"))?;
        let token_type = optional_string(&grant, "token_type");
        let scope = optional_string(&grant, "scope");

        Ok(Token::from_grant(access_token, expires_in, token_type, scope, now_f64()))
    }
}

fn optional_string(grant: &Map<String, Value>, key: &str) -> Option<String> {
    grant.get(key).and_then(Value::as_str).map(str::to_owned)
}

impl<S: TokenStore> TokenRefresher for OAuth2Refresher<S> {
    async fn refresh(&self) -> ApiResult<Token> {
        match self.request_token().await {
            Ok(token) => {
                self.store.save(token.clone()).await?;
                info!("access token updated, expires at {}", token.expires_at);
                Ok(token)
            }
            Err(err) => {
                error!("access token update failed: {}", err);
                if let Err(clear_err) = self.store.clear().await {
                    warn!("cached token could not be cleared: {}", clear_err);
                }
                Err(err)
            }
        }
    }
}
