use axum::{Json, extract::State, response::IntoResponse};
use secrecy::Secret;
use serde::Deserialize;

use gymkit_application::TrainerLoginUseCase;
use gymkit_core::{CredentialHasher, Email, RefreshTokenStore, TokenIssuer, TrainerStore};

use super::{SessionResponse, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct TrainerLoginRequest {
    pub email: String,
    pub password: Secret<String>,
}

#[tracing::instrument(name = "Trainer login", skip_all)]
pub async fn trainer_login<TS, H, I, R>(
    State((trainer_store, hasher, token_service, refresh_tokens)): State<(TS, H, I, R)>,
    Json(request): Json<TrainerLoginRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    TS: TrainerStore + Clone + 'static,
    H: CredentialHasher + Clone + 'static,
    I: TokenIssuer + Clone + 'static,
    R: RefreshTokenStore + Clone + 'static,
{
    // A syntactically invalid email cannot match a stored trainer; it gets
    // the same response as any other bad credential.
    let Ok(email) = Email::try_from(request.email) else {
        return Err(ApiError::InvalidCredentials);
    };

    let use_case = TrainerLoginUseCase::new(trainer_store, hasher, token_service, refresh_tokens);

    let session = use_case.execute(&email, request.password).await?;

    Ok(Json(SessionResponse::from(session)))
}
