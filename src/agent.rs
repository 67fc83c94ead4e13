//! Wiring of the production stack: file-backed token store, OAuth2
//! refresher, caller and restaurant fetcher.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{debug, info};

use crate::auth::refresher::OAuth2Refresher;
use crate::auth::resolver::AuthResolver;
use crate::cache::file_store::FileTokenStore;
use crate::client::caller::ApiCaller;
use crate::config::service::ServiceConfig;
use crate::search::fetcher::RestaurantFetcher;

pub type AgentRefresher = OAuth2Refresher<FileTokenStore>;
pub type AgentCaller = ApiCaller<FileTokenStore, AgentRefresher>;
pub type AgentFetcher = RestaurantFetcher<FileTokenStore, AgentRefresher>;

pub fn build_client(service_config: &ServiceConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_millis(service_config.settings.http_timeout_ms()))
        .build()
        .context("failed to build HTTP client")
}

/// Open the token store and assemble the caller around it.
pub async fn build_caller(service_config: &ServiceConfig, client: Client) -> Result<Arc<AgentCaller>> {
    let store = Arc::new(
        FileTokenStore::open(&service_config.token_store.path)
            .await
            .with_context(|| format!("cannot open token store '{}'", service_config.token_store.path))?,
    );
    debug!("token store at '{}'", store.path().display());
    // without an authorization block no endpoint uses oauth2, the refresher stays idle
    let endpoint = service_config
        .authorization
        .as_ref()
        .map(|authorization| authorization.endpoint())
        .unwrap_or_default();
    let refresher = OAuth2Refresher::new(client.clone(), store.clone(), endpoint);
    let resolver = Arc::new(AuthResolver::new(store, refresher));
    Ok(Arc::new(ApiCaller::new(client, resolver)))
}

pub async fn build_fetcher(service_config: &ServiceConfig) -> Result<Arc<AgentFetcher>> {
    let client = build_client(service_config)?;
    let caller = build_caller(service_config, client).await?;
    let fetcher = RestaurantFetcher::from_config(caller, &service_config.search)?;
    info!(
        "search endpoint '{}' ready, auth '{}'",
        service_config.search.url,
        service_config.search.auth.as_str()
    );
    Ok(Arc::new(fetcher))
}
