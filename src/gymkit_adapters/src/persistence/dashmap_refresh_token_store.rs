use std::sync::Arc;

use dashmap::DashMap;

use gymkit_core::{RefreshRecord, RefreshTokenStore, RefreshTokenStoreError};

/// In-memory refresh token store. `DashMap::remove` takes an entry out in a
/// single step, which is what makes `consume` single-use under concurrency.
#[derive(Default, Clone)]
pub struct DashMapRefreshTokenStore {
    records: Arc<DashMap<String, RefreshRecord>>,
}

impl DashMapRefreshTokenStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(DashMap::new()),
        }
    }
}

#[async_trait::async_trait]
impl RefreshTokenStore for DashMapRefreshTokenStore {
    async fn put(
        &self,
        token: String,
        record: RefreshRecord,
    ) -> Result<(), RefreshTokenStoreError> {
        self.records.insert(token, record);
        Ok(())
    }

    async fn consume(
        &self,
        token: &str,
    ) -> Result<Option<RefreshRecord>, RefreshTokenStoreError> {
        Ok(self.records.remove(token).map(|(_, record)| record))
    }
}
