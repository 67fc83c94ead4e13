use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use anyhow::{Context, Result};
use http::Method;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::auth::credentials::{AuthScheme, Credentials};
use crate::auth::refresher::TokenRefresher;
use crate::cache::token_store::TokenStore;
use crate::client::caller::ApiCaller;
use crate::client::request::RequestDescriptor;
use crate::config::service::SearchConfig;
use crate::error::{ApiError, ApiResult};
use crate::observability::metrics::get_metrics;
use crate::search::models::{Businesses, Restaurant};

/// Per-request overrides of the configured query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub location: Option<String>,
    pub term: Option<String>,
}

impl SearchQuery {
    fn apply(&self, defaults: &BTreeMap<String, String>) -> BTreeMap<String, String> {
        let mut query = defaults.clone();
        if let Some(location) = &self.location {
            query.insert("location".to_owned(), location.to_owned());
        }
        if let Some(term) = &self.term {
            query.insert("term".to_owned(), term.to_owned());
        }
        query
    }
}

/// Runs business searches through the caller and decodes the result.
pub struct RestaurantFetcher<S, R> {
    caller: Arc<ApiCaller<S, R>>,
    url: String,
    method: Method,
    scheme: AuthScheme,
    credentials: Credentials,
    query: BTreeMap<String, String>,
    headers: HashMap<String, String>,
}

impl<S: TokenStore, R: TokenRefresher> RestaurantFetcher<S, R> {
    /// Header values (env, file) are resolved once here.
    pub fn from_config(caller: Arc<ApiCaller<S, R>>, search: &SearchConfig) -> Result<Self> {
        let mut headers = HashMap::new();
        if let Some(configured) = &search.headers {
            for (key, value) in configured {
                let resolved = value
                    .resolve()
                    .with_context(|| format!("search header '{}'", key))?;
                headers.insert(key.to_owned(), resolved);
            }
        }

        Ok(Self {
            caller,
            url: search.url.to_owned(),
            method: search.method.clone(),
            scheme: search.auth,
            credentials: search.credentials(),
            query: search.query.clone(),
            headers,
        })
    }

    pub async fn fetch(&self, query: &SearchQuery) -> ApiResult<Vec<Restaurant>> {
        let mut descriptor = RequestDescriptor::new(self.url.as_str(), self.method.clone())
            .with_headers(self.headers.clone());
        for (key, value) in query.apply(&self.query) {
            descriptor = descriptor.with_query(key, value);
        }

        let outcome = self.caller.call(descriptor, self.scheme, &self.credentials).await;
        let body = outcome
            .into_body()
            .map_err(|failure| {
                warn!("search failed: {}", failure.message);
                ApiError::Call(failure)
            })?
            .ok_or(ApiError::NoBody)?;

        debug!("decoding search response of {} bytes", body.len());
        let businesses: Businesses = serde_json::from_slice(&body).map_err(ApiError::Decode)?;
        info!("search returned {} restaurants", businesses.businesses.len());
        get_metrics()
            .await
            .restaurants_fetched
            .set(businesses.businesses.len() as i64);
        Ok(businesses.businesses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::resolver::AuthResolver;
    use crate::cache::token_store::MemoryTokenStore;
    use crate::client::response::FailureKind;
    use crate::config::values::GenericValue;
    use crate::search::models::tests::restaurant_json;
    use crate::tests::common::CountingRefresher;
    use httpmock::Method::GET;
    use httpmock::MockServer;
    use reqwest::Client;
    use serde_json::json;

    fn search_config(url: String) -> SearchConfig {
        let mut query = BTreeMap::new();
        query.insert("location".to_owned(), "NYC".to_owned());
        query.insert("term".to_owned(), "restaurants".to_owned());
        let mut headers = HashMap::new();
        headers.insert(
            "Authorization".to_owned(),
            GenericValue::Literal { value: "Bearer static-key".into() },
        );
        SearchConfig {
            url,
            method: Method::GET,
            auth: AuthScheme::None,
            username: None,
            password: None,
            query,
            headers: Some(headers),
        }
    }

    fn fetcher_for(search: &SearchConfig) -> RestaurantFetcher<MemoryTokenStore, CountingRefresher> {
        let resolver = Arc::new(AuthResolver::new(
            Arc::new(MemoryTokenStore::new()),
            CountingRefresher::new("unused"),
        ));
        let caller = Arc::new(ApiCaller::new(Client::new(), resolver));
        RestaurantFetcher::from_config(caller, search).unwrap()
    }

    #[tokio::test]
    async fn static_bearer_header_and_query_are_sent() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v3/businesses/search")
                    .query_param("location", "NYC")
                    .query_param("term", "restaurants")
                    .header("Authorization", "Bearer static-key");
                then.status(200).json_body(json!({
                    "businesses": [restaurant_json("lombardis", "Lombardi's Pizza", Some("32 Spring St"))]
                }));
            })
            .await;

        let fetcher = fetcher_for(&search_config(server.url("/v3/businesses/search")));
        let restaurants = fetcher.fetch(&SearchQuery::default()).await.unwrap();

        assert_eq!(mock.hits_async().await, 1);
        assert_eq!(restaurants.len(), 1);
        assert_eq!(restaurants[0].name, "Lombardi's Pizza");
    }

    #[tokio::test]
    async fn query_overrides_replace_defaults() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/search")
                    .query_param("location", "Boston")
                    .query_param("term", "restaurants");
                then.status(200).json_body(json!({"businesses": []}));
            })
            .await;

        let fetcher = fetcher_for(&search_config(server.url("/search")));
        let query = SearchQuery { location: Some("Boston".into()), term: None };
        let restaurants = fetcher.fetch(&query).await.unwrap();

        assert_eq!(mock.hits_async().await, 1);
        assert!(restaurants.is_empty());
    }

    #[tokio::test]
    async fn failed_call_is_surfaced() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search");
                then.status(401);
            })
            .await;

        let fetcher = fetcher_for(&search_config(server.url("/search")));
        let err = fetcher.fetch(&SearchQuery::default()).await.unwrap_err();
        match err {
            ApiError::Call(failure) => {
                assert_eq!(failure.kind, FailureKind::Http);
                assert_eq!(failure.message, "401");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_body_is_no_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search");
                then.status(200);
            })
            .await;

        let fetcher = fetcher_for(&search_config(server.url("/search")));
        let err = fetcher.fetch(&SearchQuery::default()).await.unwrap_err();
        assert!(matches!(err, ApiError::NoBody), "got {err:?}");
    }

    #[tokio::test]
    async fn unexpected_shape_is_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search");
                then.status(200).json_body(json!({"businesses": [{"id": "only-id"}]}));
            })
            .await;

        let fetcher = fetcher_for(&search_config(server.url("/search")));
        let err = fetcher.fetch(&SearchQuery::default()).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)), "got {err:?}");
    }

    #[test]
    fn unresolvable_header_fails_construction() {
        let mut search = search_config("http://localhost/search".into());
        let mut headers = HashMap::new();
        headers.insert(
            "Authorization".to_owned(),
            GenericValue::FromFile { path: "/nonexistent/api-agent/key".into(), prefix: None },
        );
        search.headers = Some(headers);

        let resolver = Arc::new(AuthResolver::new(
            Arc::new(MemoryTokenStore::new()),
            CountingRefresher::new("unused"),
        ));
        let caller = Arc::new(ApiCaller::new(Client::new(), resolver));
        assert!(RestaurantFetcher::from_config(caller, &search).is_err());
    }
}
