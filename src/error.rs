use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum TrackError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    RoleConflict(String),

    #[error("invalid OTP")]
    InvalidOtp,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("no tokens provided")]
    NoTokens,

    #[error("mail delivery failed: {0}")]
    MailDeliveryFailed(String),

    #[error("image processing failed: {0}")]
    ImageProcessingFailed(String),

    #[error("push delivery failed: {0}")]
    Push(String),

    #[error("push credential error: {0}")]
    PushCredential(String),

    #[error("request body too large")]
    PayloadTooLarge,

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl TrackError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        TrackError::InvalidInput(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        TrackError::NotFound(msg.into())
    }

    /// Translate a unique-key violation into `Conflict`; other store errors pass through.
    pub fn from_insert(err: SqlxError, conflict_msg: &str) -> Self {
        match &err {
            SqlxError::Database(db) if db.is_unique_violation() => {
                TrackError::Conflict(conflict_msg.to_string())
            }
            _ => TrackError::DatabaseError(err),
        }
    }
}

impl IntoResponse for TrackError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = match self {
            TrackError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, "INVALID_INPUT", msg),
            TrackError::NoTokens => (
                StatusCode::BAD_REQUEST,
                "NO_TOKENS",
                "No tokens provided.".to_string(),
            ),
            TrackError::InvalidOtp => (
                StatusCode::UNAUTHORIZED,
                "INVALID_OTP",
                "Invalid OTP".to_string(),
            ),
            TrackError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            TrackError::RoleConflict(msg) => (StatusCode::CONFLICT, "ROLE_CONFLICT", msg),
            TrackError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
            TrackError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                "request body too large".to_string(),
            ),
            TrackError::MailDeliveryFailed(ref reason) => {
                error!(error = %reason, "OTP email delivery failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "MAIL_DELIVERY_FAILED",
                    "Failed to send OTP email".to_string(),
                )
            }
            TrackError::ImageProcessingFailed(ref reason) => {
                error!(error = %reason, "image ingest failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "IMAGE_PROCESSING_FAILED",
                    "Image processing failed".to_string(),
                )
            }
            TrackError::Reqwest(ref e) => {
                error!(error = %e, "upstream request failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "BAD_GATEWAY",
                    "Upstream service is unavailable.".to_string(),
                )
            }
            other => {
                error!(error = %other, "request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred.".to_string(),
                )
            }
        };
        let body = ApiErrorResponse {
            error: ApiErrorBody {
                code: code.to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
