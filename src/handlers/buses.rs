use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use tracing::info;

use crate::db::models::{BusPatch, NewBus};
use crate::middleware::{ValidJson, non_empty, required};
use crate::router::TrackState;
use crate::service::ids;
use crate::types::MessageResponse;
use crate::types::schools::{BusAddBody, BusAdded, BusList, BusUpdateBody, BusesBySchoolBody};
use crate::TrackError;

const DEFAULT_CAPACITY: i64 = 40;

pub async fn add(
    State(state): State<TrackState>,
    ValidJson(body): ValidJson<BusAddBody>,
) -> Result<Json<BusAdded>, TrackError> {
    let (Some(busno), Some(schoolid)) = (non_empty(body.busno), non_empty(body.schoolid)) else {
        return Err(TrackError::invalid("busno and schoolid are required"));
    };

    let busid = ids::bus_id(Utc::now());
    let bus = NewBus {
        busid: busid.clone(),
        busno,
        schoolid,
        capacity: body.capacity.unwrap_or(DEFAULT_CAPACITY),
        busdescription: non_empty(body.busdescription),
    };
    state.storage.insert_bus(&bus).await?;
    info!(busid = %busid, schoolid = %bus.schoolid, "bus added");

    Ok(Json(BusAdded {
        message: "Bus added successfully",
        busid,
    }))
}

async fn school_buses(
    state: &TrackState,
    schoolid: &str,
    with_count: bool,
) -> Result<Json<BusList>, TrackError> {
    let buses = state.storage.buses_by_school(schoolid).await?;
    let message = if buses.is_empty() {
        "No buses found for this school"
    } else {
        "Buses fetched successfully"
    };
    Ok(Json(BusList {
        count: with_count.then_some(buses.len()),
        buses,
        message,
    }))
}

/// `GET /buses/{schoolid}`
pub async fn list_for_school(
    State(state): State<TrackState>,
    Path(schoolid): Path<String>,
) -> Result<Json<BusList>, TrackError> {
    school_buses(&state, &schoolid, false).await
}

pub async fn by_school(
    State(state): State<TrackState>,
    ValidJson(body): ValidJson<BusesBySchoolBody>,
) -> Result<Json<BusList>, TrackError> {
    let schoolid = required(body.schoolid, "schoolid is required")?;
    school_buses(&state, &schoolid, true).await
}

/// `PUT /buses/{busid}`: absent fields keep their stored value.
pub async fn update(
    State(state): State<TrackState>,
    Path(busid): Path<String>,
    ValidJson(body): ValidJson<BusUpdateBody>,
) -> Result<Json<MessageResponse>, TrackError> {
    let patch = BusPatch {
        busno: non_empty(body.busno),
        schoolid: non_empty(body.schoolid),
        capacity: body.capacity,
        busdescription: non_empty(body.busdescription),
    };
    if state.storage.update_bus(&busid, &patch).await? == 0 {
        return Err(TrackError::not_found("Bus not found"));
    }
    info!(busid = %busid, "bus updated");
    Ok(Json(MessageResponse {
        message: "Bus updated successfully",
    }))
}

pub async fn remove(
    State(state): State<TrackState>,
    Path(busid): Path<String>,
) -> Result<Json<MessageResponse>, TrackError> {
    if state.storage.delete_bus(&busid).await? == 0 {
        return Err(TrackError::not_found("Bus not found"));
    }
    info!(busid = %busid, "bus deleted");
    Ok(Json(MessageResponse {
        message: "Bus deleted successfully",
    }))
}
