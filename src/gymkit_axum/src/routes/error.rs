use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use gymkit_application::{
    ClientLoginError, RefreshSessionError, RegisterTrainerError, TrainerLoginError,
};
use gymkit_core::{
    ClientStoreError, EmailError, ExerciseStoreError, NotificationStoreError, PasswordError,
    PasswordHashError, TokenRejection,
};

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// One variant for unknown identifier and wrong password; the wire
    /// response is byte-identical in both cases.
    #[error("Incorrect name or password")]
    InvalidCredentials,

    #[error("Password is required")]
    MissingPassword,

    #[error("This email address is already registered")]
    DuplicateRegistration,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Missing access token")]
    MissingToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    TokenMalformed,

    #[error("Invalid refresh token")]
    RefreshRejected,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0} is required")]
    MissingParameter(&'static str),

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            ApiError::MissingPassword
            | ApiError::DuplicateRegistration
            | ApiError::InvalidEmail
            | ApiError::MissingParameter(_) => StatusCode::BAD_REQUEST,

            ApiError::InvalidCredentials
            | ApiError::MissingToken
            | ApiError::TokenExpired
            | ApiError::TokenMalformed
            | ApiError::RefreshRejected => StatusCode::UNAUTHORIZED,

            ApiError::NotFound(_) => StatusCode::NOT_FOUND,

            ApiError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match &self {
            // Store and other internal failures get logged server-side and
            // collapse into one generic message on the wire.
            ApiError::UnexpectedError(detail) => {
                tracing::error!(%detail, "request failed");
                "An internal server error occurred".to_string()
            }
            other => other.to_string(),
        };

        (status_code, Json(ErrorResponse { message })).into_response()
    }
}

impl From<TokenRejection> for ApiError {
    fn from(rejection: TokenRejection) -> Self {
        match rejection {
            TokenRejection::Expired => ApiError::TokenExpired,
            TokenRejection::Malformed => ApiError::TokenMalformed,
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(error: PasswordError) -> Self {
        match error {
            PasswordError::Missing => ApiError::MissingPassword,
        }
    }
}

impl From<EmailError> for ApiError {
    fn from(_: EmailError) -> Self {
        ApiError::InvalidEmail
    }
}

impl From<PasswordHashError> for ApiError {
    fn from(error: PasswordHashError) -> Self {
        ApiError::UnexpectedError(error.to_string())
    }
}

impl From<ClientLoginError> for ApiError {
    fn from(error: ClientLoginError) -> Self {
        match error {
            ClientLoginError::InvalidCredentials => ApiError::InvalidCredentials,
            other => ApiError::UnexpectedError(other.to_string()),
        }
    }
}

impl From<TrainerLoginError> for ApiError {
    fn from(error: TrainerLoginError) -> Self {
        match error {
            TrainerLoginError::InvalidCredentials => ApiError::InvalidCredentials,
            other => ApiError::UnexpectedError(other.to_string()),
        }
    }
}

impl From<RegisterTrainerError> for ApiError {
    fn from(error: RegisterTrainerError) -> Self {
        match error {
            RegisterTrainerError::DuplicateEmail => ApiError::DuplicateRegistration,
            other => ApiError::UnexpectedError(other.to_string()),
        }
    }
}

impl From<RefreshSessionError> for ApiError {
    fn from(error: RefreshSessionError) -> Self {
        match error {
            RefreshSessionError::Rejected => ApiError::RefreshRejected,
            other => ApiError::UnexpectedError(other.to_string()),
        }
    }
}

impl From<ClientStoreError> for ApiError {
    fn from(error: ClientStoreError) -> Self {
        match error {
            ClientStoreError::NotFound => ApiError::NotFound("Client"),
            ClientStoreError::Unavailable(e) => ApiError::UnexpectedError(e),
        }
    }
}

impl From<ExerciseStoreError> for ApiError {
    fn from(error: ExerciseStoreError) -> Self {
        ApiError::UnexpectedError(error.to_string())
    }
}

impl From<NotificationStoreError> for ApiError {
    fn from(error: NotificationStoreError) -> Self {
        ApiError::UnexpectedError(error.to_string())
    }
}
