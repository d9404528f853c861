use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row of the `auth` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Identity {
    pub userid: i64,
    pub email_phone: String,
    pub otp: Option<String>,
    pub verified: bool,
    pub role: String,
    pub token: Option<String>,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Parent {
    pub id: i64,
    pub name: Option<String>,
    pub email_mobile: String,
    pub address: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct School {
    pub schoolid: String,
    pub name: String,
    pub email_mobile: String,
    pub website: Option<String>,
    pub address: Option<String>,
    pub location: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Bus {
    pub busid: String,
    pub busno: String,
    pub schoolid: String,
    pub capacity: Option<i64>,
    pub busdescription: Option<String>,
}

/// Row of the `students` table.
///
/// `verified = false` marks a student awaiting school confirmation; the
/// `/students/unverify` endpoint flips it to `true`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Student {
    pub student_id: String,
    pub parentid: Option<String>,
    pub name: String,
    pub date_of_birth: String,
    pub address: Option<String>,
    pub home_coordinates: Option<String>,
    pub school_id: String,
    pub school_name: Option<String>,
    pub morning_pick: Option<String>,
    pub morning_drop: Option<String>,
    pub evening_pick: Option<String>,
    pub evening_drop: Option<String>,
    pub morningbus: Option<String>,
    pub eveningbus: Option<String>,
    pub photo: Option<String>,
    pub verified: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Driver {
    pub driver_id: String,
    pub name: String,
    pub date_of_birth: String,
    pub dl_number: String,
    pub dl_photo: String,
    pub email_phone: String,
    pub is_on_road: bool,
    pub morning_bus: Option<String>,
    pub evening_bus: Option<String>,
    pub current_location: Option<String>,
    pub is_verified: bool,
    pub school_id: String,
}

/// Insert payloads. Generated ids are filled in by the caller.
#[derive(Debug, Clone, Default)]
pub struct NewSchool {
    pub schoolid: String,
    pub name: String,
    pub email_mobile: String,
    pub website: Option<String>,
    pub address: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewBus {
    pub busid: String,
    pub busno: String,
    pub schoolid: String,
    pub capacity: i64,
    pub busdescription: Option<String>,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct BusPatch {
    pub busno: Option<String>,
    pub schoolid: Option<String>,
    pub capacity: Option<i64>,
    pub busdescription: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewStudent {
    pub student_id: String,
    pub parentid: Option<String>,
    pub name: String,
    pub date_of_birth: String,
    pub address: Option<String>,
    pub home_coordinates: Option<String>,
    pub school_id: String,
    pub school_name: Option<String>,
    pub morning_pick: Option<String>,
    pub morning_drop: Option<String>,
    pub evening_pick: Option<String>,
    pub evening_drop: Option<String>,
    pub photo: Option<String>,
    pub verified: bool,
}

#[derive(Debug, Clone, Default)]
pub struct NewDriver {
    pub driver_id: String,
    pub name: String,
    pub date_of_birth: String,
    pub dl_number: String,
    pub dl_photo: String,
    pub email_phone: String,
    pub school_id: String,
}

/// Which route leg a bus assignment refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leg {
    Morning,
    Evening,
}

impl Leg {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Evening => "evening",
        }
    }
}
