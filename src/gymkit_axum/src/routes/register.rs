use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use secrecy::Secret;
use serde::Deserialize;

use gymkit_application::RegisterTrainerUseCase;
use gymkit_core::{
    CredentialHasher, Email, Password, RefreshTokenStore, TokenIssuer, TrainerStore,
};

use super::{SessionResponse, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct RegisterTrainerRequest {
    pub name: String,
    pub email: String,
    pub password: Secret<String>,
}

#[tracing::instrument(name = "Trainer registration", skip_all)]
pub async fn register_trainer<TS, H, I, R>(
    State((trainer_store, hasher, token_service, refresh_tokens)): State<(TS, H, I, R)>,
    Json(request): Json<RegisterTrainerRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    TS: TrainerStore + Clone + 'static,
    H: CredentialHasher + Clone + 'static,
    I: TokenIssuer + Clone + 'static,
    R: RefreshTokenStore + Clone + 'static,
{
    // An empty password is rejected here, before any hashing or store access.
    let password = Password::try_from(request.password)?;
    let email = Email::try_from(request.email)?;

    let use_case =
        RegisterTrainerUseCase::new(trainer_store, hasher, token_service, refresh_tokens);

    let session = use_case.execute(request.name, email, password).await?;

    Ok((StatusCode::CREATED, Json(SessionResponse::from(session))))
}
