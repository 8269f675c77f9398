use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    email::Email,
    notification::Notification,
    principal::{Client, ClientUpdate, PrincipalId, Trainer},
    token::RefreshRecord,
};

// TrainerStore port trait and errors
#[derive(Debug, Error)]
pub enum TrainerStoreError {
    #[error("Trainer already exists")]
    AlreadyExists,
    #[error("Trainer not found")]
    NotFound,
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait TrainerStore: Send + Sync {
    /// Insert a trainer, enforcing email uniqueness in the store itself.
    /// Returns `AlreadyExists` if the email is taken; the check and the
    /// insert are one atomic operation, not a read followed by a write.
    async fn insert_if_absent(&self, trainer: Trainer) -> Result<(), TrainerStoreError>;

    async fn find_by_email(&self, email: &Email) -> Result<Option<Trainer>, TrainerStoreError>;
}

// ClientStore port trait and errors
#[derive(Debug, Error)]
pub enum ClientStoreError {
    #[error("Client not found")]
    NotFound,
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait ClientStore: Send + Sync {
    async fn insert(&self, client: Client) -> Result<(), ClientStoreError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Client>, ClientStoreError>;
    async fn find_by_id(&self, id: &PrincipalId) -> Result<Option<Client>, ClientStoreError>;
    async fn list_by_trainer(
        &self,
        trainer_id: &PrincipalId,
    ) -> Result<Vec<Client>, ClientStoreError>;
    async fn update(
        &self,
        id: &PrincipalId,
        update: ClientUpdate,
    ) -> Result<Client, ClientStoreError>;
    async fn delete(&self, id: &PrincipalId) -> Result<(), ClientStoreError>;

    /// Merge `minutes` into the client's log entry for `date` and return the
    /// updated record.
    async fn append_workout(
        &self,
        id: &PrincipalId,
        date: String,
        minutes: u32,
    ) -> Result<Client, ClientStoreError>;
}

// RefreshTokenStore port trait and errors
#[derive(Debug, Error)]
pub enum RefreshTokenStoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    async fn put(
        &self,
        token: String,
        record: RefreshRecord,
    ) -> Result<(), RefreshTokenStoreError>;

    /// Atomically remove and return the record for `token`. Two concurrent
    /// consumers of the same token must not both receive `Some`.
    async fn consume(
        &self,
        token: &str,
    ) -> Result<Option<RefreshRecord>, RefreshTokenStoreError>;
}

// ExerciseLibraryStore port trait and errors
#[derive(Debug, Error)]
pub enum ExerciseStoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// The exercise library is one opaque document, replaced wholesale.
#[async_trait]
pub trait ExerciseLibraryStore: Send + Sync {
    async fn load(&self) -> Result<serde_json::Value, ExerciseStoreError>;
    async fn replace(&self, library: serde_json::Value) -> Result<(), ExerciseStoreError>;
}

// NotificationStore port trait and errors
#[derive(Debug, Error)]
pub enum NotificationStoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn add(&self, notification: Notification) -> Result<(), NotificationStoreError>;
    async fn list_newest_first(&self) -> Result<Vec<Notification>, NotificationStoreError>;
    async fn mark_all_read(&self) -> Result<(), NotificationStoreError>;
}
