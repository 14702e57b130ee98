use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::collaborators::CollaboratorError;
use crate::editor::session::SessionError;
use crate::export::ExportError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Export not ready: {0}")]
    ExportNotReady(String),

    #[error("External call failed: {0}")]
    ExternalCallFailed(String),

    #[error("Session limit of {0} reached")]
    TooManySessions(usize),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::NotReady => AppError::ExportNotReady(err.to_string()),
        }
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        AppError::Conflict(err.to_string())
    }
}

impl From<CollaboratorError> for AppError {
    fn from(err: CollaboratorError) -> Self {
        match err {
            CollaboratorError::UnsupportedFile(_) => AppError::Validation(err.to_string()),
            CollaboratorError::Api { message, .. } => AppError::ExternalCallFailed(message),
            CollaboratorError::Http(e) => AppError::ExternalCallFailed(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::ExportNotReady(msg) => {
                (StatusCode::CONFLICT, "EXPORT_NOT_READY", msg.clone())
            }
            AppError::ExternalCallFailed(msg) => {
                tracing::warn!("External call failed: {msg}");
                (StatusCode::BAD_GATEWAY, "EXTERNAL_CALL_FAILED", msg.clone())
            }
            AppError::TooManySessions(max) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "TOO_MANY_SESSIONS",
                format!("The server is at its limit of {max} editing sessions"),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::session::ExternalCall;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::from(ExportError::NotReady), StatusCode::CONFLICT),
            (
                AppError::from(SessionError::Busy(ExternalCall::Save)),
                StatusCode::CONFLICT,
            ),
            (
                AppError::from(CollaboratorError::Api {
                    status: 500,
                    message: "Could not extract text".into(),
                }),
                StatusCode::BAD_GATEWAY,
            ),
            (
                AppError::from(CollaboratorError::UnsupportedFile("a.png".into())),
                StatusCode::BAD_REQUEST,
            ),
            (AppError::TooManySessions(1), StatusCode::SERVICE_UNAVAILABLE),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_collaborator_message_surfaces_verbatim() {
        let err = AppError::from(CollaboratorError::Api {
            status: 400,
            message: "Could not extract text".into(),
        });
        assert!(matches!(err, AppError::ExternalCallFailed(ref m) if m == "Could not extract text"));
    }
}
