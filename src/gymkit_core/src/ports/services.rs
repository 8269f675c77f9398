use async_trait::async_trait;
use secrecy::Secret;
use thiserror::Error;

use crate::domain::{
    password::Password,
    principal::PrincipalId,
    role::Role,
    token::{AuthenticatedPrincipal, TokenRejection},
};

// CredentialHasher port trait and errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Stored password hash is malformed: {0}")]
    InvalidHash(String),
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

/// One-way, salted password hashing.
///
/// `verify` answers with a boolean: a mismatch is an expected outcome, not an
/// error, and callers report it identically to "principal not found" so the
/// response never reveals which identifiers exist.
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    /// Hash with a fresh salt; two calls on the same input produce different
    /// stored values.
    async fn hash(&self, password: &Password) -> Result<Secret<String>, PasswordHashError>;

    async fn verify(
        &self,
        candidate: &Secret<String>,
        stored_hash: &Secret<String>,
    ) -> Result<bool, PasswordHashError>;
}

// TokenIssuer / TokenVerifier port traits and errors
#[derive(Debug, Error)]
pub enum TokenIssueError {
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

/// Mints the two halves of a session: a signed, stateless access token and
/// an opaque refresh token whose record the caller persists.
pub trait TokenIssuer: Send + Sync {
    fn issue_access_token(
        &self,
        principal_id: &PrincipalId,
        role: Role,
    ) -> Result<String, TokenIssueError>;

    /// Returns the opaque token string and its expiry as a unix timestamp.
    fn mint_refresh_token(&self) -> (String, i64);
}

/// Validates an access token's signature and expiry. Stateless: no store
/// lookup is involved.
pub trait TokenVerifier: Send + Sync {
    fn verify_access_token(
        &self,
        token: &str,
    ) -> Result<AuthenticatedPrincipal, TokenRejection>;
}
