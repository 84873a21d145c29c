use axum::{
    Json,
    extract::{FromRequest, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::{repository::RepoError, storage::StorageError, upload::UploadError};

/// ApiError
///
/// The route-level error taxonomy. Every handler returns `Result<_, ApiError>`,
/// so no failure reaches the client as anything but `{"error": "..."}` with one
/// of four status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, malformed, forged or expired session. The reason is never surfaced.
    #[error("Unauthorized")]
    Unauthorized,

    /// Wrong admin password at login.
    #[error("Invalid password")]
    InvalidPassword,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// Storage or database failure. The detail is logged, the client sees a generic message.
    #[error("internal error: {0}")]
    Internal(String),

    #[error("upload failed: {0}")]
    Upload(#[from] StorageError),
}

impl ApiError {
    pub fn not_found(resource: &str) -> Self {
        ApiError::NotFound(format!("{resource} not found"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::InvalidPassword => {
                (StatusCode::UNAUTHORIZED, "Invalid password".to_string())
            }
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Upload(e) => {
                tracing::error!(error = %e, "upload write failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to upload file".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<RepoError> for ApiError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Invalid(message) => ApiError::BadRequest(message),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(e: UploadError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// AppJson
///
/// Drop-in replacement for `axum::Json` as a request extractor whose rejection
/// renders through [`ApiError`] (400 with a JSON body) instead of axum's plain-text 422.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);
