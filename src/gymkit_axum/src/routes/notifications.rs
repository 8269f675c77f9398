use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use serde::Deserialize;

use gymkit_core::{Notification, NotificationStore, TokenVerifier};

use crate::extract::{BearerToken, authorize};

use super::error::ApiError;

pub async fn list_notifications<V, NS>(
    State((verifier, notification_store)): State<(V, NS)>,
    token: BearerToken,
) -> Result<impl IntoResponse, ApiError>
where
    V: TokenVerifier + Clone + 'static,
    NS: NotificationStore + Clone + 'static,
{
    authorize(&verifier, &token)?;

    let notifications = notification_store.list_newest_first().await?;
    Ok(Json(notifications))
}

#[derive(Debug, Deserialize)]
pub struct CreateNotificationRequest {
    pub message: String,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
}

fn default_kind() -> String {
    "info".to_string()
}

pub async fn create_notification<V, NS>(
    State((verifier, notification_store)): State<(V, NS)>,
    token: BearerToken,
    Json(request): Json<CreateNotificationRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    V: TokenVerifier + Clone + 'static,
    NS: NotificationStore + Clone + 'static,
{
    authorize(&verifier, &token)?;

    let notification = Notification::new(request.message, request.kind, Utc::now().to_rfc3339());
    notification_store.add(notification.clone()).await?;

    Ok((StatusCode::CREATED, Json(notification)))
}

pub async fn clear_notifications<V, NS>(
    State((verifier, notification_store)): State<(V, NS)>,
    token: BearerToken,
) -> Result<impl IntoResponse, ApiError>
where
    V: TokenVerifier + Clone + 'static,
    NS: NotificationStore + Clone + 'static,
{
    authorize(&verifier, &token)?;

    notification_store.mark_all_read().await?;
    Ok(StatusCode::NO_CONTENT)
}
