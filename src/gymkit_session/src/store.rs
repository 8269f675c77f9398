use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;

/// Both halves of a held session. Saved and cleared as one unit: storage
/// never holds an access token without its refresh token or vice versa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Injected token storage. The session client owns the lifecycle; the store
/// only persists whatever pair it is handed.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self) -> Result<Option<SessionTokens>, SessionStoreError>;
    async fn save(&self, tokens: SessionTokens) -> Result<(), SessionStoreError>;
    async fn clear(&self) -> Result<(), SessionStoreError>;
}

#[derive(Default, Clone)]
pub struct MemorySessionStore {
    tokens: Arc<RwLock<Option<SessionTokens>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(RwLock::new(None)),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Result<Option<SessionTokens>, SessionStoreError> {
        Ok(self.tokens.read().await.clone())
    }

    async fn save(&self, tokens: SessionTokens) -> Result<(), SessionStoreError> {
        *self.tokens.write().await = Some(tokens);
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionStoreError> {
        *self.tokens.write().await = None;
        Ok(())
    }
}

/// Durable token storage backed by a single JSON file. Writes go through a
/// temp file and a rename so the pair on disk is always complete.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<SessionTokens>, SessionStoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SessionStoreError::Storage(e.to_string())),
        };

        // A file that cannot be parsed is treated as no session at all;
        // a partial pair must never count as logged in.
        match serde_json::from_slice(&bytes) {
            Ok(tokens) => Ok(Some(tokens)),
            Err(e) => {
                tracing::warn!(%e, "discarding unreadable session file");
                Ok(None)
            }
        }
    }

    async fn save(&self, tokens: SessionTokens) -> Result<(), SessionStoreError> {
        let payload = serde_json::to_vec(&tokens)
            .map_err(|e| SessionStoreError::Storage(e.to_string()))?;

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, payload)
            .await
            .map_err(|e| SessionStoreError::Storage(e.to_string()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| SessionStoreError::Storage(e.to_string()))
    }

    async fn clear(&self) -> Result<(), SessionStoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionStoreError::Storage(e.to_string())),
        }
    }
}
