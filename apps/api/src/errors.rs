use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::collab::CollabError;
use crate::forms::confirm::ConfirmError;
use crate::forms::SubmitError;
use crate::store::StoreError;
use crate::validation::Rejection;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// User-correctable; the message is meant to be shown next to the field.
    #[error("Validation error: {0}")]
    Validation(Rejection),

    #[error("Conflict: {0}")]
    Conflict(#[from] StoreError),

    #[error(transparent)]
    Collaborator(#[from] CollabError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<SubmitError> for AppError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Rejected(rejection) => AppError::Validation(rejection),
            SubmitError::Store(e) => AppError::Conflict(e),
        }
    }
}

impl From<ConfirmError> for AppError {
    fn from(err: ConfirmError) -> Self {
        AppError::NotFound(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, field) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None)
            }
            AppError::Validation(rejection) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                rejection.message.clone(),
                Some(rejection.field),
            ),
            AppError::Conflict(e) => (StatusCode::CONFLICT, "CONFLICT", e.to_string(), None),
            AppError::Collaborator(e) => {
                tracing::warn!("Collaborator error: {e}");
                let (status, code) = match e {
                    CollabError::PermissionDenied(_) => {
                        (StatusCode::FORBIDDEN, "PERMISSION_DENIED")
                    }
                    CollabError::Image(_) => (StatusCode::UNPROCESSABLE_ENTITY, "IMAGE_ERROR"),
                    CollabError::Pdf(_) => (StatusCode::BAD_GATEWAY, "PDF_ERROR"),
                    CollabError::Share(_) => (StatusCode::BAD_GATEWAY, "SHARE_ERROR"),
                };
                (status, code, e.to_string(), None)
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(field) = field {
            error["field"] = json!(field);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
