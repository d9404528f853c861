use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use tracing::info;

use crate::db::Leg;
use crate::db::models::NewDriver;
use crate::middleware::{UploadForm, ValidJson, non_empty, required};
use crate::router::TrackState;
use crate::service::ids;
use crate::service::media::UploadKind;
use crate::types::drivers::{
    DriverBusBody, DriverBusFields, DriverCheckBody, DriverCheckResponse, DriverIdBody,
    DriverList, DriverLocationBody, DriverLocationFields, DriverRegistered, DriverUpdated,
    TripFields,
};
use crate::types::students::StudentList;
use crate::TrackError;

/// `POST /drivers/register` (multipart, required `dl_photo` file).
pub async fn register(
    State(state): State<TrackState>,
    mut form: UploadForm,
) -> Result<Json<DriverRegistered>, TrackError> {
    let (Some(name), Some(date_of_birth), Some(dl_number), Some(email_phone), Some(school_id)) = (
        form.text("name"),
        form.text("date_of_birth"),
        form.text("dl_number"),
        form.text("email_phone"),
        form.text("school_id"),
    ) else {
        return Err(TrackError::invalid("All fields are required"));
    };
    let Some(dl_photo) = form.take_file("dl_photo") else {
        return Err(TrackError::invalid("Driving licence photo is required"));
    };

    let image = state.media.ingest(dl_photo, UploadKind::DriverLicence).await?;
    let driver_id = ids::driver_id(Utc::now());
    let driver = NewDriver {
        driver_id: driver_id.clone(),
        name,
        date_of_birth,
        dl_number,
        dl_photo: image.public_path.clone(),
        email_phone,
        school_id,
    };

    if let Err(e) = state.storage.insert_driver(&driver).await {
        state.media.discard(&image).await;
        return Err(e);
    }
    info!(driver_id = %driver_id, school_id = %driver.school_id, "driver registered");

    Ok(Json(DriverRegistered {
        message: "Driver registered successfully",
        driver_id,
    }))
}

pub async fn check(
    State(state): State<TrackState>,
    ValidJson(body): ValidJson<DriverCheckBody>,
) -> Result<Response, TrackError> {
    let email_phone = required(body.email_phone, "email_phone is required")?;
    let response = match state.storage.find_driver_by_contact(&email_phone).await? {
        Some(driver) => (
            StatusCode::OK,
            Json(DriverCheckResponse {
                exists: true,
                driver: Some(driver),
                message: "Driver found",
            }),
        ),
        None => (
            StatusCode::NOT_FOUND,
            Json(DriverCheckResponse {
                exists: false,
                driver: None,
                message: "Driver not found",
            }),
        ),
    };
    Ok(response.into_response())
}

pub async fn unverified(
    State(state): State<TrackState>,
    Path(school_id): Path<String>,
) -> Result<Json<DriverList>, TrackError> {
    let drivers = state.storage.unverified_drivers(&school_id).await?;
    let message = if drivers.is_empty() {
        "No unverified drivers found"
    } else {
        "Unverified drivers fetched successfully"
    };
    Ok(Json(DriverList { message, drivers }))
}

pub async fn update_bus(
    State(state): State<TrackState>,
    ValidJson(body): ValidJson<DriverBusBody>,
) -> Result<Json<DriverUpdated<DriverBusFields>>, TrackError> {
    let driver_id = required(body.driver_id, "driver_id is required")?;
    let morning_bus = non_empty(body.morning_bus);
    let evening_bus = non_empty(body.evening_bus);

    let affected = state
        .storage
        .assign_driver_buses(&driver_id, morning_bus.as_deref(), evening_bus.as_deref())
        .await?;
    if affected == 0 {
        return Err(TrackError::not_found("Driver not found"));
    }
    info!(driver_id = %driver_id, ?morning_bus, ?evening_bus, "driver buses assigned");

    Ok(Json(DriverUpdated {
        message: "Driver bus details updated successfully",
        updated_fields: DriverBusFields {
            is_verified: true,
            morning_bus,
            evening_bus,
        },
    }))
}

pub async fn update_location(
    State(state): State<TrackState>,
    ValidJson(body): ValidJson<DriverLocationBody>,
) -> Result<Json<DriverUpdated<DriverLocationFields>>, TrackError> {
    let (Some(driver_id), Some(current_location)) =
        (non_empty(body.driver_id), non_empty(body.current_location))
    else {
        return Err(TrackError::invalid(
            "driver_id and current_location are required",
        ));
    };

    let affected = state
        .storage
        .update_driver_location(&driver_id, &current_location)
        .await?;
    if affected == 0 {
        return Err(TrackError::not_found("Driver not found"));
    }

    Ok(Json(DriverUpdated {
        message: "Driver location updated successfully",
        updated_fields: DriverLocationFields {
            driver_id,
            current_location,
        },
    }))
}

/// Acknowledges once the driver is off the road; parents are notified in
/// the background.
pub async fn end_trip(
    State(state): State<TrackState>,
    ValidJson(body): ValidJson<DriverIdBody>,
) -> Result<Json<DriverUpdated<TripFields>>, TrackError> {
    let driver_id = non_empty(body.driver_id).unwrap_or_default();
    let _fan_out = state.trips.end_trip(&driver_id).await?;

    Ok(Json(DriverUpdated {
        message: "Trip ended successfully",
        updated_fields: TripFields {
            driver_id,
            is_on_road: false,
        },
    }))
}

async fn students_for_leg(
    state: &TrackState,
    body: DriverIdBody,
    leg: Leg,
) -> Result<Json<StudentList>, TrackError> {
    let driver_id = required(body.driver_id, "driver_id is required")?;
    let bus = state
        .storage
        .driver_bus(&driver_id, leg)
        .await?
        .ok_or_else(|| TrackError::not_found("Driver not found"))?
        .ok_or_else(|| {
            TrackError::invalid(format!("No {} bus assigned to this driver", leg.as_str()))
        })?;

    let students = state.storage.students_on_bus(leg, &bus).await?;
    let message = format!("Students on {} bus {bus}", leg.as_str());
    Ok(Json(StudentList {
        count: None,
        students,
        message: Some(message),
    }))
}

pub async fn students_morning_bus(
    State(state): State<TrackState>,
    ValidJson(body): ValidJson<DriverIdBody>,
) -> Result<Json<StudentList>, TrackError> {
    students_for_leg(&state, body, Leg::Morning).await
}

pub async fn students_evening_bus(
    State(state): State<TrackState>,
    ValidJson(body): ValidJson<DriverIdBody>,
) -> Result<Json<StudentList>, TrackError> {
    students_for_leg(&state, body, Leg::Evening).await
}
