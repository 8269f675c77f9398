use axum::{Json, extract::State, response::IntoResponse};
use secrecy::Secret;
use serde::Deserialize;

use gymkit_application::ClientLoginUseCase;
use gymkit_core::{ClientStore, CredentialHasher, RefreshTokenStore, TokenIssuer};

use super::{SessionResponse, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ClientLoginRequest {
    pub name: String,
    pub password: Secret<String>,
}

#[tracing::instrument(name = "Client login", skip_all)]
pub async fn client_login<CS, H, I, R>(
    State((client_store, hasher, token_service, refresh_tokens)): State<(CS, H, I, R)>,
    Json(request): Json<ClientLoginRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    CS: ClientStore + Clone + 'static,
    H: CredentialHasher + Clone + 'static,
    I: TokenIssuer + Clone + 'static,
    R: RefreshTokenStore + Clone + 'static,
{
    let use_case = ClientLoginUseCase::new(client_store, hasher, token_service, refresh_tokens);

    let session = use_case.execute(&request.name, request.password).await?;

    Ok(Json(SessionResponse::from(session)))
}
