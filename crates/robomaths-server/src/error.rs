//! Error handling for the API server

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// API error types
///
/// User-facing messages stay in French, matching the site; every response
/// body has the shape `{"error": message}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Action non supportée.")]
    UnsupportedAction,

    #[error("Le token GitHub n'est pas configuré sur le serveur.")]
    MissingToken,

    #[error("Requête invalide: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Upstream(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::UnsupportedAction | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingToken
            | ApiError::Upstream(_)
            | ApiError::Config(_)
            | ApiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
