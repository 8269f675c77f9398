use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Validation, decode, encode, errors::ErrorKind};
use rand::Rng;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use gymkit_core::{
    AuthenticatedPrincipal, PrincipalId, Role, TokenIssueError, TokenIssuer, TokenRejection,
    TokenVerifier,
};

use crate::config::constants::{
    DEFAULT_ACCESS_TOKEN_TTL_SECONDS, DEFAULT_REFRESH_TOKEN_TTL_SECONDS,
};

#[derive(Clone)]
pub struct JwtConfig {
    pub jwt_secret: Secret<String>,
    pub access_token_ttl_seconds: i64,
    pub refresh_token_ttl_seconds: i64,
}

impl JwtConfig {
    pub fn new(jwt_secret: Secret<String>) -> Self {
        Self {
            jwt_secret,
            access_token_ttl_seconds: DEFAULT_ACCESS_TOKEN_TTL_SECONDS,
            refresh_token_ttl_seconds: DEFAULT_REFRESH_TOKEN_TTL_SECONDS,
        }
    }
}

/// HS256 access tokens plus opaque refresh tokens.
///
/// Access tokens are stateless: identity and role travel in the claims, and
/// verification is signature-plus-expiry only. Refresh tokens carry no
/// structure at all; their meaning lives in the `RefreshTokenStore` record
/// the application layer persists alongside them.
#[derive(Clone)]
pub struct JwtTokenService {
    config: JwtConfig,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }
}

impl TokenIssuer for JwtTokenService {
    fn issue_access_token(
        &self,
        principal_id: &PrincipalId,
        role: Role,
    ) -> Result<String, TokenIssueError> {
        let delta = chrono::Duration::try_seconds(self.config.access_token_ttl_seconds).ok_or(
            TokenIssueError::UnexpectedError("Failed to create token duration".to_string()),
        )?;

        let now = Utc::now();
        let exp = now
            .checked_add_signed(delta)
            .ok_or(TokenIssueError::UnexpectedError(
                "Duration out of range".to_string(),
            ))?
            .timestamp();

        let claims = Claims {
            sub: principal_id.as_str().to_owned(),
            role,
            iat: now.timestamp(),
            exp,
        };

        encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.expose_secret().as_bytes()),
        )
        .map_err(|e| TokenIssueError::UnexpectedError(e.to_string()))
    }

    fn mint_refresh_token(&self) -> (String, i64) {
        let token: u128 = rand::rng().random();
        let expires_at = Utc::now().timestamp() + self.config.refresh_token_ttl_seconds;
        (format!("{token:032x}"), expires_at)
    }
}

impl TokenVerifier for JwtTokenService {
    fn verify_access_token(
        &self,
        token: &str,
    ) -> Result<AuthenticatedPrincipal, TokenRejection> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.expose_secret().as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenRejection::Expired,
            _ => TokenRejection::Malformed,
        })?;

        Ok(AuthenticatedPrincipal {
            id: PrincipalId::from(data.claims.sub),
            role: data.claims.role,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}
