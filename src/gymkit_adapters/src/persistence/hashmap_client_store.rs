use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use gymkit_core::{Client, ClientStore, ClientStoreError, ClientUpdate, PrincipalId};

#[derive(Default, Clone)]
pub struct HashMapClientStore {
    clients: Arc<RwLock<HashMap<PrincipalId, Client>>>,
}

impl HashMapClientStore {
    pub fn new() -> Self {
        Self {
            clients: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait::async_trait]
impl ClientStore for HashMapClientStore {
    async fn insert(&self, client: Client) -> Result<(), ClientStoreError> {
        self.clients
            .write()
            .await
            .insert(client.id().clone(), client);
        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Client>, ClientStoreError> {
        let clients = self.clients.read().await;
        Ok(clients.values().find(|c| c.name() == name).cloned())
    }

    async fn find_by_id(&self, id: &PrincipalId) -> Result<Option<Client>, ClientStoreError> {
        Ok(self.clients.read().await.get(id).cloned())
    }

    async fn list_by_trainer(
        &self,
        trainer_id: &PrincipalId,
    ) -> Result<Vec<Client>, ClientStoreError> {
        let clients = self.clients.read().await;
        Ok(clients
            .values()
            .filter(|c| c.trainer_id() == trainer_id)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        id: &PrincipalId,
        update: ClientUpdate,
    ) -> Result<Client, ClientStoreError> {
        let mut clients = self.clients.write().await;
        let client = clients.get_mut(id).ok_or(ClientStoreError::NotFound)?;
        client.apply_update(update);
        Ok(client.clone())
    }

    async fn delete(&self, id: &PrincipalId) -> Result<(), ClientStoreError> {
        let mut clients = self.clients.write().await;
        clients.remove(id).ok_or(ClientStoreError::NotFound)?;
        Ok(())
    }

    async fn append_workout(
        &self,
        id: &PrincipalId,
        date: String,
        minutes: u32,
    ) -> Result<Client, ClientStoreError> {
        let mut clients = self.clients.write().await;
        let client = clients.get_mut(id).ok_or(ClientStoreError::NotFound)?;
        client.merge_workout(date, minutes);
        Ok(client.clone())
    }
}
