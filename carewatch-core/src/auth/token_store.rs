use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

/// Seam over the external persisted-session store.
///
/// Returning `None` means the operator has no usable session: every consumer
/// must abstain from join/fetch activity and defer to the external login
/// flow, never retry against the store.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn bearer_token(&self) -> Option<String>;
}

/// Fixed-token store, fed from the environment or a test.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenStore {
    token: Option<String>,
}

impl StaticTokenStore {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// A store with no session at all.
    pub fn empty() -> Self {
        Self { token: None }
    }
}

#[async_trait]
impl TokenStore for StaticTokenStore {
    async fn bearer_token(&self) -> Option<String> {
        self.token.clone()
    }
}

/// Store backed by the session file the login flow persists under the
/// platform config directory.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default session file location: `<config dir>/carewatch/session-token`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("carewatch").join("session-token"))
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn bearer_token(&self) -> Option<String> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => {
                let token = raw.trim().to_string();
                if token.is_empty() {
                    None
                } else {
                    Some(token)
                }
            }
            Err(e) => {
                debug!("No persisted session at {}: {}", self.path.display(), e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_store() {
        let store = StaticTokenStore::new("tok-123");
        assert_eq!(store.bearer_token().await.as_deref(), Some("tok-123"));

        let empty = StaticTokenStore::empty();
        assert!(empty.bearer_token().await.is_none());
    }

    #[tokio::test]
    async fn test_file_store_reads_trimmed_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session-token");
        tokio::fs::write(&path, "  tok-456\n").await.unwrap();

        let store = FileTokenStore::new(&path);
        assert_eq!(store.bearer_token().await.as_deref(), Some("tok-456"));
    }

    #[tokio::test]
    async fn test_file_store_missing_or_empty_is_none() {
        let dir = tempfile::tempdir().unwrap();

        let missing = FileTokenStore::new(dir.path().join("absent"));
        assert!(missing.bearer_token().await.is_none());

        let empty_path = dir.path().join("empty");
        tokio::fs::write(&empty_path, "\n").await.unwrap();
        let empty = FileTokenStore::new(&empty_path);
        assert!(empty.bearer_token().await.is_none());
    }
}
