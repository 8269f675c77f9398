use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use gymkit_core::{Email, Trainer, TrainerStore, TrainerStoreError};

#[derive(Default, Clone)]
pub struct HashMapTrainerStore {
    trainers: Arc<RwLock<HashMap<Email, Trainer>>>,
}

impl HashMapTrainerStore {
    pub fn new() -> Self {
        Self {
            trainers: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait::async_trait]
impl TrainerStore for HashMapTrainerStore {
    async fn insert_if_absent(&self, trainer: Trainer) -> Result<(), TrainerStoreError> {
        // One write guard covers the presence check and the insert, so a
        // concurrent duplicate registration cannot slip in between.
        let mut trainers = self.trainers.write().await;
        if trainers.contains_key(trainer.email()) {
            return Err(TrainerStoreError::AlreadyExists);
        }
        trainers.insert(trainer.email().clone(), trainer);
        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Trainer>, TrainerStoreError> {
        Ok(self.trainers.read().await.get(email).cloned())
    }
}
