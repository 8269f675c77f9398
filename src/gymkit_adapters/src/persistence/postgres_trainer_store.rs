use secrecy::{ExposeSecret, Secret};
use sqlx::{PgPool, Row};

use gymkit_core::{Email, PrincipalId, Trainer, TrainerStore, TrainerStoreError};

#[derive(Clone)]
pub struct PostgresTrainerStore {
    pool: PgPool,
}

impl PostgresTrainerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl TrainerStore for PostgresTrainerStore {
    #[tracing::instrument(name = "Adding trainer to PostgreSQL", skip_all)]
    async fn insert_if_absent(&self, trainer: Trainer) -> Result<(), TrainerStoreError> {
        // The unique index on email makes the uniqueness check and the
        // insert one atomic statement.
        let result = sqlx::query(
            r#"
                INSERT INTO trainers (id, email, name, password_hash)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(trainer.id().as_str())
        .bind(trainer.email().as_str())
        .bind(trainer.name())
        .bind(trainer.password_hash().expose_secret())
        .execute(&self.pool)
        .await
        .map_err(|e| TrainerStoreError::Unavailable(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(TrainerStoreError::AlreadyExists);
        }

        Ok(())
    }

    #[tracing::instrument(name = "Retrieving trainer from PostgreSQL", skip_all)]
    async fn find_by_email(&self, email: &Email) -> Result<Option<Trainer>, TrainerStoreError> {
        let row = sqlx::query(
            r#"
                SELECT id, email, name, password_hash
                FROM trainers
                WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| TrainerStoreError::Unavailable(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let id: String = row
            .try_get("id")
            .map_err(|e| TrainerStoreError::Unavailable(e.to_string()))?;
        let stored_email: String = row
            .try_get("email")
            .map_err(|e| TrainerStoreError::Unavailable(e.to_string()))?;
        let name: String = row
            .try_get("name")
            .map_err(|e| TrainerStoreError::Unavailable(e.to_string()))?;
        let password_hash: String = row
            .try_get("password_hash")
            .map_err(|e| TrainerStoreError::Unavailable(e.to_string()))?;

        let email = Email::try_from(stored_email)
            .map_err(|e| TrainerStoreError::Unavailable(e.to_string()))?;

        Ok(Some(Trainer::from_stored(
            PrincipalId::from(id),
            name,
            email,
            Secret::from(password_hash),
        )))
    }
}
