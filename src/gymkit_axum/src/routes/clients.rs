use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use secrecy::Secret;
use serde::Deserialize;

use gymkit_core::{
    Client, ClientStore, ClientUpdate, ClientView, CredentialHasher, Password, PrincipalId,
    TokenVerifier,
};

use crate::extract::{BearerToken, authorize};

use super::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ClientListParams {
    #[serde(rename = "trainerId")]
    pub trainer_id: Option<String>,
}

pub async fn list_clients<V, CS, H>(
    State((verifier, client_store, _hasher)): State<(V, CS, H)>,
    token: BearerToken,
    Query(params): Query<ClientListParams>,
) -> Result<impl IntoResponse, ApiError>
where
    V: TokenVerifier + Clone + 'static,
    CS: ClientStore + Clone + 'static,
    H: Clone + Send + Sync + 'static,
{
    authorize(&verifier, &token)?;

    let trainer_id = params
        .trainer_id
        .ok_or(ApiError::MissingParameter("trainerId"))?;

    let clients = client_store
        .list_by_trainer(&PrincipalId::from(trainer_id))
        .await?;

    let views: Vec<ClientView> = clients.iter().map(Client::view).collect();
    Ok(Json(views))
}

#[derive(Debug, Deserialize)]
pub struct CreateClientRequest {
    #[serde(rename = "clientData")]
    pub client_data: ClientData,
    #[serde(rename = "trainerId")]
    pub trainer_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ClientData {
    pub name: String,
    #[serde(default)]
    pub password: Option<Secret<String>>,
}

#[tracing::instrument(name = "Create client", skip_all)]
pub async fn create_client<V, CS, H>(
    State((verifier, client_store, hasher)): State<(V, CS, H)>,
    token: BearerToken,
    Json(request): Json<CreateClientRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    V: TokenVerifier + Clone + 'static,
    CS: ClientStore + Clone + 'static,
    H: CredentialHasher + Clone + 'static,
{
    authorize(&verifier, &token)?;

    // An absent or empty password means the record is created without
    // credentials; such a client cannot log in until one is set.
    let password_hash = match request.client_data.password {
        Some(password) => match Password::try_from(password) {
            Ok(password) => Some(hasher.hash(&password).await?),
            Err(_) => None,
        },
        None => None,
    };

    let client = Client::new(
        request.client_data.name,
        PrincipalId::from(request.trainer_id),
        password_hash,
    );

    client_store.insert(client.clone()).await?;

    Ok((StatusCode::CREATED, Json(client.view())))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClientRequest {
    pub name: Option<String>,
    pub password: Option<Secret<String>>,
    pub measurements: Option<Vec<serde_json::Value>>,
    pub custom_routine: Option<Vec<serde_json::Value>>,
}

#[tracing::instrument(name = "Update client", skip_all)]
pub async fn update_client<V, CS, H>(
    State((verifier, client_store, hasher)): State<(V, CS, H)>,
    token: BearerToken,
    Path(id): Path<String>,
    Json(request): Json<UpdateClientRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    V: TokenVerifier + Clone + 'static,
    CS: ClientStore + Clone + 'static,
    H: CredentialHasher + Clone + 'static,
{
    authorize(&verifier, &token)?;

    let password_hash = match request.password {
        Some(password) => match Password::try_from(password) {
            Ok(password) => Some(hasher.hash(&password).await?),
            Err(_) => None,
        },
        None => None,
    };

    let update = ClientUpdate {
        name: request.name,
        password_hash,
        measurements: request.measurements,
        custom_routine: request.custom_routine,
    };

    let client = client_store
        .update(&PrincipalId::from(id), update)
        .await?;

    Ok(Json(client.view()))
}

#[tracing::instrument(name = "Delete client", skip_all)]
pub async fn delete_client<V, CS, H>(
    State((verifier, client_store, _hasher)): State<(V, CS, H)>,
    token: BearerToken,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    V: TokenVerifier + Clone + 'static,
    CS: ClientStore + Clone + 'static,
    H: Clone + Send + Sync + 'static,
{
    authorize(&verifier, &token)?;

    client_store.delete(&PrincipalId::from(id)).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogWorkoutRequest {
    pub duration_seconds: u64,
}

#[tracing::instrument(name = "Log workout", skip_all)]
pub async fn log_workout<V, CS>(
    State((verifier, client_store)): State<(V, CS)>,
    token: BearerToken,
    Path(id): Path<String>,
    Json(request): Json<LogWorkoutRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    V: TokenVerifier + Clone + 'static,
    CS: ClientStore + Clone + 'static,
{
    authorize(&verifier, &token)?;

    let minutes = ((request.duration_seconds as f64) / 60.0).round() as u32;
    let date = Utc::now().date_naive().format("%Y-%m-%d").to_string();

    let client = client_store
        .append_workout(&PrincipalId::from(id), date, minutes)
        .await?;

    Ok(Json(client.view()))
}
