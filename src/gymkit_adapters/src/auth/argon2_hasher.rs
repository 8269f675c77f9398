use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordVerifier, Version,
    password_hash::{PasswordHasher, SaltString, rand_core},
};
use secrecy::{ExposeSecret, Secret};

use gymkit_core::{CredentialHasher, Password, PasswordHashError};

/// Argon2id hasher. Hashing is CPU-bound and runs on the blocking pool with
/// the current tracing span attached.
#[derive(Debug, Clone, Default)]
pub struct Argon2CredentialHasher;

#[async_trait::async_trait]
impl CredentialHasher for Argon2CredentialHasher {
    #[tracing::instrument(name = "Computing password hash", skip_all)]
    async fn hash(&self, password: &Password) -> Result<Secret<String>, PasswordHashError> {
        let password = password.clone();
        let current_span: tracing::Span = tracing::Span::current();

        let result = tokio::task::spawn_blocking(move || {
            current_span.in_scope(move || {
                let salt: SaltString = SaltString::generate(rand_core::OsRng);
                let hasher = Argon2::new(
                    Algorithm::Argon2id,
                    Version::V0x13,
                    Params::new(15000, 2, 1, None)
                        .map_err(|e| PasswordHashError::UnexpectedError(e.to_string()))?,
                );
                hasher
                    .hash_password(password.as_ref().expose_secret().as_bytes(), &salt)
                    .map(|h| Secret::from(h.to_string()))
                    .map_err(|e| PasswordHashError::UnexpectedError(e.to_string()))
            })
        })
        .await
        .map_err(|e| PasswordHashError::UnexpectedError(e.to_string()))?;

        result
    }

    #[tracing::instrument(name = "Verify password hash", skip_all)]
    async fn verify(
        &self,
        candidate: &Secret<String>,
        stored_hash: &Secret<String>,
    ) -> Result<bool, PasswordHashError> {
        let candidate = candidate.clone();
        let stored_hash = stored_hash.clone();
        let current_span: tracing::Span = tracing::Span::current();

        let result = tokio::task::spawn_blocking(move || {
            current_span.in_scope(|| {
                let expected_hash: PasswordHash<'_> =
                    PasswordHash::new(stored_hash.expose_secret())
                        .map_err(|e| PasswordHashError::InvalidHash(e.to_string()))?;

                let outcome = Argon2::new(
                    Algorithm::Argon2id,
                    Version::V0x13,
                    Params::new(15000, 2, 1, None)
                        .map_err(|e| PasswordHashError::UnexpectedError(e.to_string()))?,
                )
                .verify_password(candidate.expose_secret().as_bytes(), &expected_hash);

                // A mismatch is an expected outcome, not an error.
                match outcome {
                    Ok(()) => Ok(true),
                    Err(argon2::password_hash::Error::Password) => Ok(false),
                    Err(e) => Err(PasswordHashError::UnexpectedError(e.to_string())),
                }
            })
        })
        .await
        .map_err(|e| PasswordHashError::UnexpectedError(e.to_string()))?;

        result
    }
}
