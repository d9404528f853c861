use axum::{Json, extract::State};
use chrono::Utc;
use tracing::info;

use crate::db::models::NewSchool;
use crate::middleware::{ValidJson, non_empty, required};
use crate::router::TrackState;
use crate::service::ids;
use crate::types::schools::{
    SchoolCheckBody, SchoolCheckResponse, SchoolList, SchoolRegisterBody, SchoolRegistered,
};
use crate::TrackError;

pub async fn register(
    State(state): State<TrackState>,
    ValidJson(body): ValidJson<SchoolRegisterBody>,
) -> Result<Json<SchoolRegistered>, TrackError> {
    let (Some(name), Some(email_mobile)) = (non_empty(body.name), non_empty(body.email_mobile))
    else {
        return Err(TrackError::invalid("Name and email/mobile are required"));
    };

    let schoolid = ids::school_code(Utc::now());
    let school = NewSchool {
        schoolid: schoolid.clone(),
        name,
        email_mobile,
        website: non_empty(body.website),
        address: non_empty(body.address),
        location: non_empty(body.location),
    };
    state.storage.insert_school(&school).await?;
    info!(schoolid = %schoolid, "school registered");

    Ok(Json(SchoolRegistered {
        message: "School registered successfully",
        school_code: schoolid.clone(),
        schoolid,
    }))
}

pub async fn check(
    State(state): State<TrackState>,
    ValidJson(body): ValidJson<SchoolCheckBody>,
) -> Result<Json<SchoolCheckResponse>, TrackError> {
    let email_mobile = required(body.email_mobile, "email_mobile is required")?;
    let school = state.storage.find_school_by_contact(&email_mobile).await?;
    let message = if school.is_some() {
        "School found"
    } else {
        "School not found"
    };
    Ok(Json(SchoolCheckResponse {
        exists: school.is_some(),
        school,
        message,
    }))
}

pub async fn list(State(state): State<TrackState>) -> Result<Json<SchoolList>, TrackError> {
    let schools = state.storage.list_schools().await?;
    Ok(Json(SchoolList { schools }))
}
