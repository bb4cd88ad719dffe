//! Error types for the admin API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use sitedoc_store_core::SaveError;

/// Application-level errors surfaced to the admin console.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Content was changed by another session; reload required")]
    Conflict,

    #[error("A previous save conflicted; reload before editing further")]
    ReloadRequired,

    #[error("Section not found: {0}")]
    SectionNotFound(String),

    #[error("Unknown section kind: {0}")]
    UnknownKind(String),

    #[error("Invalid section order: {0}")]
    InvalidOrder(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Reload failed: {0}")]
    ReloadFailed(String),
}

impl From<SaveError> for ApiError {
    fn from(err: SaveError) -> Self {
        match err {
            SaveError::Conflict => ApiError::Conflict,
            SaveError::Store(detail) => ApiError::Store(detail),
            SaveError::UnknownSection(id) => ApiError::SectionNotFound(id),
            SaveError::UnregisteredKind(kind) => ApiError::UnknownKind(kind.to_string()),
            SaveError::InvalidOrder(detail) => ApiError::InvalidOrder(detail),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorBody {
            error: String,
            code: &'static str,
        }

        let (status, code) = match &self {
            ApiError::Conflict => (StatusCode::CONFLICT, "VERSION_CONFLICT"),
            ApiError::ReloadRequired => (StatusCode::CONFLICT, "RELOAD_REQUIRED"),
            ApiError::SectionNotFound(_) => (StatusCode::NOT_FOUND, "SECTION_NOT_FOUND"),
            ApiError::UnknownKind(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "UNKNOWN_SECTION_KIND")
            }
            ApiError::InvalidOrder(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_SECTION_ORDER")
            }
            ApiError::Store(_) => (StatusCode::BAD_GATEWAY, "STORE_ERROR"),
            ApiError::ReloadFailed(_) => (StatusCode::BAD_GATEWAY, "RELOAD_FAILED"),
        };

        let body = ErrorBody {
            error: self.to_string(),
            code,
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
