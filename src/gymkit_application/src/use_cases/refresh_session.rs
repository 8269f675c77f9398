use chrono::Utc;

use gymkit_core::{RefreshTokenStore, RefreshTokenStoreError, TokenIssuer, TokenPair};

use crate::use_cases::issue_session::{IssueSessionError, issue_session};

/// Error types specific to session refresh
#[derive(Debug, thiserror::Error)]
pub enum RefreshSessionError {
    /// Unknown, already-consumed and expired refresh tokens all land here.
    /// The only remedy is a fresh login.
    #[error("Invalid refresh token")]
    Rejected,
    #[error("Refresh token store error: {0}")]
    RefreshTokenStoreError(#[from] RefreshTokenStoreError),
    #[error("Session error: {0}")]
    IssueSessionError(#[from] IssueSessionError),
}

/// Session refresh use case - exchanges a refresh token for a new token
/// pair.
///
/// Refresh tokens are rotated: the presented token is consumed atomically
/// before anything is issued, so a concurrent replay of the same token
/// cannot also succeed.
pub struct RefreshSessionUseCase<R, I>
where
    R: RefreshTokenStore,
    I: TokenIssuer,
{
    refresh_tokens: R,
    issuer: I,
}

impl<R, I> RefreshSessionUseCase<R, I>
where
    R: RefreshTokenStore,
    I: TokenIssuer,
{
    pub fn new(refresh_tokens: R, issuer: I) -> Self {
        Self {
            refresh_tokens,
            issuer,
        }
    }

    #[tracing::instrument(name = "RefreshSessionUseCase::execute", skip_all)]
    pub async fn execute(&self, presented: &str) -> Result<TokenPair, RefreshSessionError> {
        let Some(record) = self.refresh_tokens.consume(presented).await? else {
            return Err(RefreshSessionError::Rejected);
        };

        if record.is_expired_at(Utc::now().timestamp()) {
            return Err(RefreshSessionError::Rejected);
        }

        // The replacement pair is bound to the identity the consumed token
        // was issued for; a refresh can never switch principal or role.
        let tokens = issue_session(
            &self.issuer,
            &self.refresh_tokens,
            &record.principal_id,
            record.role,
        )
        .await?;

        Ok(tokens)
    }
}
