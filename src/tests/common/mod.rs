// tests/common/mod.rs
pub use axum::Router;
pub use tokio::task::JoinHandle;

use std::net::{SocketAddr, TcpListener};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use http::StatusCode;
use reqwest::Client;

use crate::auth::refresher::TokenRefresher;
use crate::cache::token::Token;
use crate::cache::token_store::{MemoryTokenStore, TokenStore};
use crate::error::{ApiError, ApiResult};
use crate::helpers::time::now_f64;

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

/// URL on a local port nothing listens on.
pub fn unused_local_url(path: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind failed");
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}{}", addr, path)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

/// Refresher double returning `Bearer <value>` valid for an hour.
pub struct CountingRefresher {
    pub calls: Arc<AtomicUsize>,
    value: String,
    store: Option<MemoryTokenStore>,
}

impl CountingRefresher {
    pub fn new(value: &str) -> Self {
        Self { calls: Arc::new(AtomicUsize::new(0)), value: value.to_owned(), store: None }
    }

    /// Also saves every issued token into `store`, like the real refresher.
    pub fn persisting(value: &str, store: MemoryTokenStore) -> Self {
        Self { store: Some(store), ..Self::new(value) }
    }
}

impl TokenRefresher for CountingRefresher {
    async fn refresh(&self) -> ApiResult<Token> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // long enough for concurrent callers to queue up on the refresh lock
        tokio::time::sleep(Duration::from_millis(50)).await;
        let token = Token::new(format!("Bearer {}", self.value), now_f64() + 3600.0);
        if let Some(store) = &self.store {
            store.save(token.clone()).await?;
        }
        Ok(token)
    }
}

/// Refresher double that always fails as the authorization server would.
pub struct FailingRefresher {
    pub calls: Arc<AtomicUsize>,
    status: StatusCode,
}

impl FailingRefresher {
    pub fn new(status: StatusCode) -> Self {
        Self { calls: Arc::new(AtomicUsize::new(0)), status }
    }
}

impl TokenRefresher for FailingRefresher {
    async fn refresh(&self) -> ApiResult<Token> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ApiError::AuthServer(self.status))
    }
}
