use axum::extract::FromRequestParts;
use axum_extra::TypedHeader;
use axum_extra::headers::{Authorization, authorization::Bearer};
use http::request::Parts;

use gymkit_core::{AuthenticatedPrincipal, TokenVerifier};

use crate::routes::error::ApiError;

/// Bearer credential pulled from the `Authorization` header.
///
/// Absence is a 401, not a 400: an unauthenticated caller gets the same
/// class of answer whether the header is missing or the token inside it is
/// rejected.
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingToken)?;

        Ok(BearerToken(bearer.token().to_owned()))
    }
}

/// Verify the bearer credential presented to a protected route.
pub fn authorize<V: TokenVerifier>(
    verifier: &V,
    token: &BearerToken,
) -> Result<AuthenticatedPrincipal, ApiError> {
    verifier
        .verify_access_token(&token.0)
        .map_err(ApiError::from)
}
