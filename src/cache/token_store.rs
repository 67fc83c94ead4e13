use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::cache::token::Token;
use crate::error::ApiResult;

/// Holder of the single cached bearer token.
///
/// `save` and `clear` are atomic with respect to `load`; nothing else is
/// synchronized here, refresh ordering is the resolver's job.
pub trait TokenStore: Send + Sync + 'static {
    /// Last saved token, if any. Expired tokens are returned as well.
    fn load(&self) -> impl Future<Output = Option<Token>> + Send;

    fn save(&self, token: Token) -> impl Future<Output = ApiResult<()>> + Send;

    fn clear(&self) -> impl Future<Output = ApiResult<()>> + Send;
}

/// Process-local store without persistence.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    inner: Arc<RwLock<Option<Token>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: Token) -> Self {
        Self { inner: Arc::new(RwLock::new(Some(token))) }
    }
}

impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Option<Token> {
        self.inner.read().await.clone()
    }

    async fn save(&self, token: Token) -> ApiResult<()> {
        *self.inner.write().await = Some(token);
        Ok(())
    }

    async fn clear(&self) -> ApiResult<()> {
        *self.inner.write().await = None;
        Ok(())
    }
}
