use std::sync::Arc;

use chrono::Utc;
use redis::{Commands, Connection};
use tokio::sync::RwLock;

use gymkit_core::{RefreshRecord, RefreshTokenStore, RefreshTokenStoreError};

/// Redis-backed refresh token store. Records expire on their own via the key
/// TTL; `consume` relies on GETDEL so a token can be taken exactly once even
/// across processes.
#[derive(Clone)]
pub struct RedisRefreshTokenStore {
    conn: Arc<RwLock<Connection>>,
}

impl RedisRefreshTokenStore {
    pub fn new(conn: Arc<RwLock<Connection>>) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl RefreshTokenStore for RedisRefreshTokenStore {
    async fn put(
        &self,
        token: String,
        record: RefreshRecord,
    ) -> Result<(), RefreshTokenStoreError> {
        let key = get_key(&token);
        let payload = serde_json::to_string(&record)
            .map_err(|e| RefreshTokenStoreError::Unavailable(e.to_string()))?;

        let ttl = record
            .expires_at
            .saturating_sub(Utc::now().timestamp())
            .max(1) as u64;

        let mut conn = self.conn.write().await;
        conn.set_ex(key, payload, ttl)
            .map_err(|e| RefreshTokenStoreError::Unavailable(e.to_string()))
    }

    async fn consume(
        &self,
        token: &str,
    ) -> Result<Option<RefreshRecord>, RefreshTokenStoreError> {
        let key = get_key(token);
        let mut conn = self.conn.write().await;
        let payload: Option<String> = conn
            .get_del(&key)
            .map_err(|e| RefreshTokenStoreError::Unavailable(e.to_string()))?;

        match payload {
            None => Ok(None),
            Some(payload) => serde_json::from_str(&payload)
                .map(Some)
                .map_err(|e| RefreshTokenStoreError::Unavailable(e.to_string())),
        }
    }
}

// Key prefix to prevent collisions with other data in the same instance.
const REFRESH_TOKEN_KEY_PREFIX: &str = "refresh_token:";

fn get_key(token: &str) -> String {
    format!("{}{}", REFRESH_TOKEN_KEY_PREFIX, token)
}
