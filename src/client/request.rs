use std::collections::HashMap;

use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use reqwest::Client;
use serde::Serialize;
use tracing::warn;

pub const APPLICATION_JSON: &str = "application/json";

/// One outbound request. Built per call and consumed by it.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub url: String,
    pub method: Method,
    /// serialized JSON payload
    pub body: Option<Vec<u8>>,
    /// applied after the fixed JSON headers, so they may override them
    pub headers: HashMap<String, String>,
    pub query: Vec<(String, String)>,
}

impl RequestDescriptor {
    pub fn new(url: impl Into<String>, method: Method) -> Self {
        Self {
            url: url.into(),
            method,
            body: None,
            headers: HashMap::new(),
            query: Vec::new(),
        }
    }

    /// Attach `body` as pretty printed JSON. A payload that cannot be
    /// serialized is dropped and the request goes out without a body.
    pub fn with_json_body<T: Serialize + ?Sized>(mut self, body: &T) -> Self {
        self.body = match serde_json::to_vec_pretty(body) {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                warn!("request body for '{}' not serializable, sending none: {}", self.url, err);
                None
            }
        };
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in headers {
            self.headers.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// Fixed JSON headers, then custom headers, then Authorization.
pub(crate) fn build_headers(custom: &HashMap<String, String>, authorization: Option<HeaderValue>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
    headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));

    for (key, value) in custom {
        match (HeaderName::from_bytes(key.as_bytes()), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => warn!("skipping invalid custom header '{}'", key),
        }
    }

    if let Some(mut value) = authorization {
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    headers
}

/// Response as read off the wire.
#[derive(Debug)]
pub(crate) struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

pub(crate) async fn send(
    client: &Client,
    descriptor: RequestDescriptor,
    headers: HeaderMap,
) -> Result<RawResponse, reqwest::Error> {
    let mut request = client.request(descriptor.method, &descriptor.url).headers(headers);
    if !descriptor.query.is_empty() {
        request = request.query(&descriptor.query);
    }
    if let Some(body) = descriptor.body {
        request = request.body(body);
    }

    let response = request.send().await?;
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.bytes().await?.to_vec();
    Ok(RawResponse { status, headers, body })
}
