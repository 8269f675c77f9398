use gymkit_core::{
    PrincipalId, RefreshRecord, RefreshTokenStore, RefreshTokenStoreError, Role, TokenIssueError,
    TokenIssuer, TokenPair,
};

/// Error types for session issuance
#[derive(Debug, thiserror::Error)]
pub enum IssueSessionError {
    #[error("Token error: {0}")]
    TokenError(#[from] TokenIssueError),
    #[error("Refresh token store error: {0}")]
    RefreshTokenStoreError(#[from] RefreshTokenStoreError),
}

/// Mint a token pair for an authenticated principal and persist the refresh
/// record. The refresh token is bound to the principal and role it was
/// issued for, so a later refresh cannot switch identity or escalate role.
pub(crate) async fn issue_session<I, R>(
    issuer: &I,
    refresh_tokens: &R,
    principal_id: &PrincipalId,
    role: Role,
) -> Result<TokenPair, IssueSessionError>
where
    I: TokenIssuer,
    R: RefreshTokenStore,
{
    let access_token = issuer.issue_access_token(principal_id, role)?;
    let (refresh_token, expires_at) = issuer.mint_refresh_token();

    refresh_tokens
        .put(
            refresh_token.clone(),
            RefreshRecord {
                principal_id: principal_id.clone(),
                role,
                expires_at,
            },
        )
        .await?;

    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}
