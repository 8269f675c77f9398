use std::sync::Arc;
use tokio::sync::RwLock;

use gymkit_core::{ExerciseLibraryStore, ExerciseStoreError};

#[derive(Clone)]
pub struct HashMapExerciseStore {
    library: Arc<RwLock<serde_json::Value>>,
}

impl HashMapExerciseStore {
    pub fn new() -> Self {
        Self {
            library: Arc::new(RwLock::new(serde_json::Value::Array(Vec::new()))),
        }
    }
}

impl Default for HashMapExerciseStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ExerciseLibraryStore for HashMapExerciseStore {
    async fn load(&self) -> Result<serde_json::Value, ExerciseStoreError> {
        Ok(self.library.read().await.clone())
    }

    async fn replace(&self, library: serde_json::Value) -> Result<(), ExerciseStoreError> {
        *self.library.write().await = library;
        Ok(())
    }
}
