use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use gymkit_core::{
    Client, ClientStore, ClientStoreError, ClientUpdate, PrincipalId, WorkoutLog,
};

/// The document half of a client row. Lookup keys (id, trainer id, name) and
/// the password hash live in their own columns; everything else is one JSON
/// document, replaced wholesale on write.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ClientDoc {
    measurements: Vec<serde_json::Value>,
    custom_routine: Vec<serde_json::Value>,
    workout_logs: Vec<WorkoutLog>,
}

#[derive(Clone)]
pub struct PostgresClientStore {
    pool: PgPool,
}

impl PostgresClientStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn write_back(&self, client: &Client) -> Result<(), ClientStoreError> {
        let doc = doc_string(client)?;
        sqlx::query(
            r#"
                UPDATE clients
                SET name = $2, password_hash = $3, doc = $4
                WHERE id = $1
            "#,
        )
        .bind(client.id().as_str())
        .bind(client.name())
        .bind(client.password_hash().map(|h| h.expose_secret().clone()))
        .bind(doc)
        .execute(&self.pool)
        .await
        .map_err(|e| ClientStoreError::Unavailable(e.to_string()))?;
        Ok(())
    }
}

fn doc_string(client: &Client) -> Result<String, ClientStoreError> {
    let doc = ClientDoc {
        measurements: client.measurements().to_vec(),
        custom_routine: client.custom_routine().to_vec(),
        workout_logs: client.workout_logs().to_vec(),
    };
    serde_json::to_string(&doc).map_err(|e| ClientStoreError::Unavailable(e.to_string()))
}

fn row_to_client(row: &PgRow) -> Result<Client, ClientStoreError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| ClientStoreError::Unavailable(e.to_string()))?;
    let trainer_id: String = row
        .try_get("trainer_id")
        .map_err(|e| ClientStoreError::Unavailable(e.to_string()))?;
    let name: String = row
        .try_get("name")
        .map_err(|e| ClientStoreError::Unavailable(e.to_string()))?;
    let password_hash: Option<String> = row
        .try_get("password_hash")
        .map_err(|e| ClientStoreError::Unavailable(e.to_string()))?;
    let doc: String = row
        .try_get("doc")
        .map_err(|e| ClientStoreError::Unavailable(e.to_string()))?;

    let doc: ClientDoc =
        serde_json::from_str(&doc).map_err(|e| ClientStoreError::Unavailable(e.to_string()))?;

    Ok(Client::from_stored(
        PrincipalId::from(id),
        name,
        PrincipalId::from(trainer_id),
        password_hash.map(Secret::from),
        doc.measurements,
        doc.custom_routine,
        doc.workout_logs,
    ))
}

#[async_trait::async_trait]
impl ClientStore for PostgresClientStore {
    #[tracing::instrument(name = "Adding client to PostgreSQL", skip_all)]
    async fn insert(&self, client: Client) -> Result<(), ClientStoreError> {
        let doc = doc_string(&client)?;
        sqlx::query(
            r#"
                INSERT INTO clients (id, trainer_id, name, password_hash, doc)
                VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(client.id().as_str())
        .bind(client.trainer_id().as_str())
        .bind(client.name())
        .bind(client.password_hash().map(|h| h.expose_secret().clone()))
        .bind(doc)
        .execute(&self.pool)
        .await
        .map_err(|e| ClientStoreError::Unavailable(e.to_string()))?;
        Ok(())
    }

    #[tracing::instrument(name = "Finding client by name in PostgreSQL", skip_all)]
    async fn find_by_name(&self, name: &str) -> Result<Option<Client>, ClientStoreError> {
        let row = sqlx::query(
            "SELECT id, trainer_id, name, password_hash, doc FROM clients WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ClientStoreError::Unavailable(e.to_string()))?;

        row.as_ref().map(row_to_client).transpose()
    }

    #[tracing::instrument(name = "Finding client by id in PostgreSQL", skip_all)]
    async fn find_by_id(&self, id: &PrincipalId) -> Result<Option<Client>, ClientStoreError> {
        let row = sqlx::query(
            "SELECT id, trainer_id, name, password_hash, doc FROM clients WHERE id = $1",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ClientStoreError::Unavailable(e.to_string()))?;

        row.as_ref().map(row_to_client).transpose()
    }

    #[tracing::instrument(name = "Listing clients from PostgreSQL", skip_all)]
    async fn list_by_trainer(
        &self,
        trainer_id: &PrincipalId,
    ) -> Result<Vec<Client>, ClientStoreError> {
        let rows = sqlx::query(
            "SELECT id, trainer_id, name, password_hash, doc FROM clients WHERE trainer_id = $1",
        )
        .bind(trainer_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ClientStoreError::Unavailable(e.to_string()))?;

        rows.iter().map(row_to_client).collect()
    }

    #[tracing::instrument(name = "Updating client in PostgreSQL", skip_all)]
    async fn update(
        &self,
        id: &PrincipalId,
        update: ClientUpdate,
    ) -> Result<Client, ClientStoreError> {
        let mut client = self
            .find_by_id(id)
            .await?
            .ok_or(ClientStoreError::NotFound)?;
        client.apply_update(update);
        self.write_back(&client).await?;
        Ok(client)
    }

    #[tracing::instrument(name = "Deleting client from PostgreSQL", skip_all)]
    async fn delete(&self, id: &PrincipalId) -> Result<(), ClientStoreError> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| ClientStoreError::Unavailable(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(ClientStoreError::NotFound);
        }
        Ok(())
    }

    #[tracing::instrument(name = "Logging workout in PostgreSQL", skip_all)]
    async fn append_workout(
        &self,
        id: &PrincipalId,
        date: String,
        minutes: u32,
    ) -> Result<Client, ClientStoreError> {
        let mut client = self
            .find_by_id(id)
            .await?
            .ok_or(ClientStoreError::NotFound)?;
        client.merge_workout(date, minutes);
        self.write_back(&client).await?;
        Ok(client)
    }
}
