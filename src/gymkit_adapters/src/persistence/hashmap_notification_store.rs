use std::sync::Arc;
use tokio::sync::RwLock;

use gymkit_core::{Notification, NotificationStore, NotificationStoreError};

#[derive(Default, Clone)]
pub struct HashMapNotificationStore {
    notifications: Arc<RwLock<Vec<Notification>>>,
}

impl HashMapNotificationStore {
    pub fn new() -> Self {
        Self {
            notifications: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

#[async_trait::async_trait]
impl NotificationStore for HashMapNotificationStore {
    async fn add(&self, notification: Notification) -> Result<(), NotificationStoreError> {
        self.notifications.write().await.push(notification);
        Ok(())
    }

    async fn list_newest_first(&self) -> Result<Vec<Notification>, NotificationStoreError> {
        let mut notifications = self.notifications.read().await.clone();
        // RFC 3339 timestamps sort lexically.
        notifications.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(notifications)
    }

    async fn mark_all_read(&self) -> Result<(), NotificationStoreError> {
        for notification in self.notifications.write().await.iter_mut() {
            notification.read = true;
        }
        Ok(())
    }
}
