use secrecy::Secret;

use gymkit_core::{
    CredentialHasher, Email, PasswordHashError, RefreshTokenStore, Role, TokenIssuer,
    TrainerStore, TrainerStoreError,
};

use crate::use_cases::{
    issue_session::{IssueSessionError, issue_session},
    session::LoginSession,
};

/// Error types specific to trainer login
#[derive(Debug, thiserror::Error)]
pub enum TrainerLoginError {
    /// Reported identically for an unknown email and a hash mismatch.
    #[error("Incorrect email or password")]
    InvalidCredentials,
    #[error("Trainer store error: {0}")]
    TrainerStoreError(#[from] TrainerStoreError),
    #[error("Password hashing error: {0}")]
    PasswordHashError(#[from] PasswordHashError),
    #[error("Session error: {0}")]
    IssueSessionError(#[from] IssueSessionError),
}

/// Trainer login use case - verifies email/password credentials and issues a
/// session token pair.
pub struct TrainerLoginUseCase<TS, H, I, R>
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

impl<TS, H, I, R> TrainerLoginUseCase<TS, H, I, R>
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

    #[tracing::instrument(name = "TrainerLoginUseCase::execute", skip(self, password))]
    pub async fn execute(
        &self,
        email: &Email,
        password: Secret<String>,
    ) -> Result<LoginSession, TrainerLoginError> {
        let Some(trainer) = self.trainer_store.find_by_email(email).await? else {
            return Err(TrainerLoginError::InvalidCredentials);
        };

        if !self
            .hasher
            .verify(&password, trainer.password_hash())
            .await?
        {
            return Err(TrainerLoginError::InvalidCredentials);
        }

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
