use axum::{Json, extract::State};
use tracing::debug;

use crate::middleware::{ValidJson, non_empty, required};
use crate::router::TrackState;
use crate::service::registration::{RegisterRequest, RegistrationOutcome};
use crate::types::auth::{
    AuthResponse, ParentCheckBody, ParentCheckResponse, RegisterBody, VerifyOtpBody,
};
use crate::TrackError;

pub async fn register(
    State(state): State<TrackState>,
    ValidJson(body): ValidJson<RegisterBody>,
) -> Result<RegistrationOutcome, TrackError> {
    let Some(verified) = body.verified else {
        return Err(TrackError::invalid("Missing or invalid fields"));
    };
    let req = RegisterRequest {
        identity: non_empty(body.email_phone).unwrap_or_default(),
        verified,
        role: non_empty(body.role).unwrap_or_default(),
        token: non_empty(body.token).unwrap_or_default(),
    };
    state.registration.register(req).await
}

pub async fn verify_otp(
    State(state): State<TrackState>,
    ValidJson(body): ValidJson<VerifyOtpBody>,
) -> Result<Json<AuthResponse>, TrackError> {
    let identity = non_empty(body.email_phone).unwrap_or_default();
    let otp = non_empty(body.otp).unwrap_or_default();
    let verified = state.registration.verify_otp(&identity, &otp).await?;
    Ok(Json(verified.into()))
}

pub async fn parent_check(
    State(state): State<TrackState>,
    ValidJson(body): ValidJson<ParentCheckBody>,
) -> Result<Json<ParentCheckResponse>, TrackError> {
    let email_mobile = required(body.email_mobile, "email_mobile is required")?;
    let parent = state.storage.find_parent(&email_mobile).await?;
    debug!(email_mobile = %email_mobile, found = parent.is_some(), "parent lookup");
    let message = if parent.is_some() {
        "Parent found"
    } else {
        "Parent not found"
    };
    Ok(Json(ParentCheckResponse {
        exists: parent.is_some(),
        parent,
        message,
    }))
}
