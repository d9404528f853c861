use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
};
use serde::de::DeserializeOwned;

use crate::error::TrackError;

/// `Json<T>` whose rejections are reported through `TrackError`, so malformed
/// bodies get the same 400 error shape as failed field validation.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = TrackError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ValidJson(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> TrackError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return TrackError::PayloadTooLarge;
    }
    TrackError::InvalidInput(rejection.body_text())
}

/// Treat blank strings as absent.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// A required field; blank or absent fails with `InvalidInput(msg)`.
pub fn required(value: Option<String>, msg: &str) -> Result<String, TrackError> {
    non_empty(value).ok_or_else(|| TrackError::invalid(msg))
}
