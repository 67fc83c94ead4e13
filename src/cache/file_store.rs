use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cache::token::Token;
use crate::cache::token_store::TokenStore;
use crate::error::ApiResult;

#[cfg(unix)]
const TOKEN_FILE_MODE: u32 = 0o600;

/// Token store persisted as a small JSON document.
///
/// The file is read once in [`FileTokenStore::open`]; afterwards reads are
/// served from memory and every write goes through to disk (tmp + rename).
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    inner: RwLock<Option<Token>>,
}

impl FileTokenStore {
    pub async fn open(path: impl Into<PathBuf>) -> ApiResult<Self> {
        let path = path.into();
        let token = read_token_file(&path).await?;
        match &token {
            Some(token) => info!(
                "token store '{}' loaded, expires at {}",
                path.display(),
                token.expires_at
            ),
            None => info!("token store '{}' is empty", path.display()),
        }
        Ok(Self { path, inner: RwLock::new(token) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    async fn load(&self) -> Option<Token> {
        self.inner.read().await.clone()
    }

    async fn save(&self, token: Token) -> ApiResult<()> {
        let mut guard = self.inner.write().await;
        write_token_file(&self.path, &token).await?;
        debug!("token persisted to '{}'", self.path.display());
        *guard = Some(token);
        Ok(())
    }

    async fn clear(&self) -> ApiResult<()> {
        let mut guard = self.inner.write().await;
        *guard = None;
        match fs::remove_file(&self.path).await {
            Ok(_) => {
                debug!("token file '{}' removed", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

async fn read_token_file(path: &Path) -> ApiResult<Option<Token>> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    if content.trim().is_empty() {
        return Ok(None);
    }
    // unreadable content is treated as an empty cache, the next refresh overwrites it
    match serde_json::from_str::<Token>(&content) {
        Ok(token) => Ok(Some(token)),
        Err(err) => {
            warn!("token file '{}' is corrupt, ignoring it: {}", path.display(), err);
            Ok(None)
        }
    }
}

async fn write_token_file(path: &Path, token: &Token) -> ApiResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    let content = serde_json::to_vec(token).map_err(std::io::Error::other)?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, content).await?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&tmp, std::fs::Permissions::from_mode(TOKEN_FILE_MODE)).await?;
    }
    fs::rename(&tmp, path).await?;
    Ok(())
}
