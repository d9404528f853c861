use serde::{Deserialize, Serialize};

use crate::db::Driver;

#[derive(Debug, Deserialize)]
pub struct DriverIdBody {
    pub driver_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DriverCheckBody {
    pub email_phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DriverBusBody {
    pub driver_id: Option<String>,
    pub morning_bus: Option<String>,
    pub evening_bus: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DriverLocationBody {
    pub driver_id: Option<String>,
    pub current_location: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DriverRegistered {
    pub message: &'static str,
    pub driver_id: String,
}

#[derive(Debug, Serialize)]
pub struct DriverCheckResponse {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<Driver>,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DriverList {
    pub message: &'static str,
    pub drivers: Vec<Driver>,
}

#[derive(Debug, Serialize)]
pub struct DriverBusFields {
    pub is_verified: bool,
    pub morning_bus: Option<String>,
    pub evening_bus: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DriverLocationFields {
    pub driver_id: String,
    pub current_location: String,
}

#[derive(Debug, Serialize)]
pub struct TripFields {
    pub driver_id: String,
    pub is_on_road: bool,
}

/// `{message, updated_fields}` acknowledgement for driver mutations.
#[derive(Debug, Serialize)]
pub struct DriverUpdated<T> {
    pub message: &'static str,
    pub updated_fields: T,
}
