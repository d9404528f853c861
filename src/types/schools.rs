use serde::{Deserialize, Serialize};

use crate::db::{Bus, School};

#[derive(Debug, Deserialize)]
pub struct SchoolRegisterBody {
    pub name: Option<String>,
    pub email_mobile: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SchoolCheckBody {
    pub email_mobile: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SchoolRegistered {
    pub message: &'static str,
    pub schoolid: String,
    pub school_code: String,
}

#[derive(Debug, Serialize)]
pub struct SchoolCheckResponse {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<School>,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SchoolList {
    pub schools: Vec<School>,
}

#[derive(Debug, Deserialize)]
pub struct BusAddBody {
    pub busno: Option<String>,
    pub schoolid: Option<String>,
    pub capacity: Option<i64>,
    pub busdescription: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct BusUpdateBody {
    pub busno: Option<String>,
    pub schoolid: Option<String>,
    pub capacity: Option<i64>,
    pub busdescription: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BusesBySchoolBody {
    pub schoolid: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BusAdded {
    pub message: &'static str,
    pub busid: String,
}

#[derive(Debug, Serialize)]
pub struct BusList {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    pub buses: Vec<Bus>,
    pub message: &'static str,
}
