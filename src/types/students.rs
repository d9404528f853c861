use serde::{Deserialize, Serialize};

use crate::db::Student;

#[derive(Debug, Deserialize)]
pub struct SchoolIdBody {
    pub school_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StudentIdBody {
    pub student_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StudentBusBody {
    pub student_id: Option<String>,
    pub morningbus: Option<String>,
    pub eveningbus: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StudentAdded {
    pub message: &'static str,
    pub student_id: String,
    pub photo_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StudentList {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    pub students: Vec<Student>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StudentBusFields {
    pub verified: bool,
    pub morningbus: Option<String>,
    pub eveningbus: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StudentBusUpdated {
    pub message: &'static str,
    pub updated_fields: StudentBusFields,
}
