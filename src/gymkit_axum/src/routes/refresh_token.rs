use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;

use gymkit_application::RefreshSessionUseCase;
use gymkit_core::{RefreshTokenStore, TokenIssuer};

use super::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Exchange a refresh token for a fresh token pair. The presented token is
/// consumed; the response carries its rotated replacement.
#[tracing::instrument(name = "Refresh session", skip_all)]
pub async fn refresh_token<R, I>(
    State((refresh_tokens, token_service)): State<(R, I)>,
    Json(request): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    R: RefreshTokenStore + Clone + 'static,
    I: TokenIssuer + Clone + 'static,
{
    let use_case = RefreshSessionUseCase::new(refresh_tokens, token_service);

    let pair = use_case.execute(&request.refresh_token).await?;

    Ok(Json(pair))
}
