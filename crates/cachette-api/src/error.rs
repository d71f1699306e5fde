use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

/// Per-request failure taxonomy. Validation and auth failures are terminal
/// and returned immediately with a user-facing message; store failures are
/// logged and surfaced as a generic 500 without leaking internals.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn unauthenticated() -> Self {
        ApiError::Unauthorized("Non authentifié".to_string())
    }

    pub fn user_not_found() -> Self {
        ApiError::NotFound("Utilisateur non trouvé".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            ApiError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message.clone()),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
            ApiError::Internal(cause) => {
                error!("internal error: {cause:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Erreur serveur".to_string())
            }
        };

        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}
