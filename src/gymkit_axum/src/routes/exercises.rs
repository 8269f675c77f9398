use axum::{Json, extract::State, response::IntoResponse};

use gymkit_core::{ExerciseLibraryStore, TokenVerifier};

use crate::extract::{BearerToken, authorize};

use super::error::ApiError;

pub async fn get_exercises<V, ES>(
    State((verifier, exercise_store)): State<(V, ES)>,
    token: BearerToken,
) -> Result<impl IntoResponse, ApiError>
where
    V: TokenVerifier + Clone + 'static,
    ES: ExerciseLibraryStore + Clone + 'static,
{
    authorize(&verifier, &token)?;

    let library = exercise_store.load().await?;
    Ok(Json(library))
}

/// Replace the whole library document and echo it back.
pub async fn replace_exercises<V, ES>(
    State((verifier, exercise_store)): State<(V, ES)>,
    token: BearerToken,
    Json(library): Json<serde_json::Value>,
) -> Result<impl IntoResponse, ApiError>
where
    V: TokenVerifier + Clone + 'static,
    ES: ExerciseLibraryStore + Clone + 'static,
{
    authorize(&verifier, &token)?;

    exercise_store.replace(library.clone()).await?;
    Ok(Json(library))
}
