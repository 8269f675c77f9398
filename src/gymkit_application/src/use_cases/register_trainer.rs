use gymkit_core::{
    CredentialHasher, Email, Password, PasswordHashError, RefreshTokenStore, Role, TokenIssuer,
    Trainer, TrainerStore, TrainerStoreError,
};

use crate::use_cases::{
    issue_session::{IssueSessionError, issue_session},
    session::LoginSession,
};

/// Error types specific to trainer registration
#[derive(Debug, thiserror::Error)]
pub enum RegisterTrainerError {
    #[error("This email address is already registered")]
    DuplicateEmail,
    #[error("Trainer store error: {0}")]
    TrainerStoreError(TrainerStoreError),
    #[error("Password hashing error: {0}")]
    PasswordHashError(#[from] PasswordHashError),
    #[error("Session error: {0}")]
    IssueSessionError(#[from] IssueSessionError),
}

/// Trainer registration use case.
///
/// Takes an already-validated [`Password`], so an empty password has been
/// rejected before any hashing or store access. On success it behaves like a
/// login: a fresh token pair plus the sanitized profile.
pub struct RegisterTrainerUseCase<TS, H, I, R>
where
    TS: TrainerStore,
    H: CredentialHasher,
    I: TokenIssuer,
    R: RefreshTokenStore,
{
    trainer_store: TS,
    hasher: H,
    issuer: I,
    refresh_tokens: R,
}

impl<TS, H, I, R> RegisterTrainerUseCase<TS, H, I, R>
where
    TS: TrainerStore,
    H: CredentialHasher,
    I: TokenIssuer,
    R: RefreshTokenStore,
{
    pub fn new(trainer_store: TS, hasher: H, issuer: I, refresh_tokens: R) -> Self {
        Self {
            trainer_store,
            hasher,
            issuer,
            refresh_tokens,
        }
    }

    #[tracing::instrument(name = "RegisterTrainerUseCase::execute", skip(self, password))]
    pub async fn execute(
        &self,
        name: String,
        email: Email,
        password: Password,
    ) -> Result<LoginSession, RegisterTrainerError> {
        let password_hash = self.hasher.hash(&password).await?;
        let trainer = Trainer::new(name, email, password_hash);

        // Uniqueness is enforced by the store itself; there is no separate
        // lookup that a concurrent registration could race past.
        self.trainer_store
            .insert_if_absent(trainer.clone())
            .await
            .map_err(|e| match e {
                TrainerStoreError::AlreadyExists => RegisterTrainerError::DuplicateEmail,
                other => RegisterTrainerError::TrainerStoreError(other),
            })?;

        let tokens = issue_session(
            &self.issuer,
            &self.refresh_tokens,
            trainer.id(),
            Role::Trainer,
        )
        .await?;

        Ok(LoginSession {
            tokens,
            user: trainer.profile(),
        })
    }
}
