use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use tracing::info;

use crate::db::models::NewStudent;
use crate::middleware::{UploadForm, ValidJson, non_empty, required};
use crate::router::TrackState;
use crate::service::ids;
use crate::service::media::UploadKind;
use crate::types::MessageResponse;
use crate::types::students::{
    SchoolIdBody, StudentAdded, StudentBusBody, StudentBusFields, StudentBusUpdated,
    StudentIdBody, StudentList,
};
use crate::TrackError;

/// `POST /students/add` (multipart, optional `photo` file).
pub async fn add(
    State(state): State<TrackState>,
    mut form: UploadForm,
) -> Result<Json<StudentAdded>, TrackError> {
    let (Some(name), Some(date_of_birth), Some(school_id)) = (
        form.text("name"),
        form.text("date_of_birth"),
        form.text("school_id"),
    ) else {
        return Err(TrackError::invalid(
            "Name, date of birth and school_id are required",
        ));
    };

    let photo = match form.take_file("photo") {
        Some(bytes) => Some(state.media.ingest(bytes, UploadKind::StudentPhoto).await?),
        None => None,
    };

    let student_id = ids::student_id(Utc::now());
    let student = NewStudent {
        student_id: student_id.clone(),
        parentid: form.text("parentid"),
        name,
        date_of_birth,
        address: form.text("address"),
        home_coordinates: form.text("home_coordinates"),
        school_id,
        school_name: form.text("school_name"),
        morning_pick: form.text("morning_pick"),
        morning_drop: form.text("morning_drop"),
        evening_pick: form.text("evening_pick"),
        evening_drop: form.text("evening_drop"),
        photo: photo.as_ref().map(|p| p.public_path.clone()),
        verified: form.flag("verified"),
    };

    if let Err(e) = state.storage.insert_student(&student).await {
        if let Some(image) = &photo {
            state.media.discard(image).await;
        }
        return Err(e);
    }
    info!(student_id = %student_id, school_id = %student.school_id, "student added");

    Ok(Json(StudentAdded {
        message: "Student added successfully",
        student_id,
        photo_url: student.photo,
    }))
}

async fn school_students(
    state: &TrackState,
    body: SchoolIdBody,
    verified: bool,
) -> Result<Json<StudentList>, TrackError> {
    let school_id = required(body.school_id, "school_id is required")?;
    let students = state.storage.students_by_school(&school_id, verified).await?;
    let message = if students.is_empty() {
        "No students found"
    } else {
        "Students fetched successfully"
    };
    Ok(Json(StudentList {
        count: Some(students.len()),
        students,
        message: Some(message.to_string()),
    }))
}

/// `POST /students/all`: students still awaiting confirmation (`verified = 0`).
pub async fn pending(
    State(state): State<TrackState>,
    ValidJson(body): ValidJson<SchoolIdBody>,
) -> Result<Json<StudentList>, TrackError> {
    school_students(&state, body, false).await
}

/// `POST /students/unverified`: students flagged with `verified = 1`.
pub async fn flagged(
    State(state): State<TrackState>,
    ValidJson(body): ValidJson<SchoolIdBody>,
) -> Result<Json<StudentList>, TrackError> {
    school_students(&state, body, true).await
}

pub async fn unverify(
    State(state): State<TrackState>,
    ValidJson(body): ValidJson<StudentIdBody>,
) -> Result<Json<MessageResponse>, TrackError> {
    let student_id = required(body.student_id, "student_id is required")?;
    if state.storage.set_student_verified(&student_id, true).await? == 0 {
        return Err(TrackError::not_found("Student not found"));
    }
    info!(student_id = %student_id, "student flagged");
    Ok(Json(MessageResponse {
        message: "Student unverified successfully",
    }))
}

pub async fn update_bus(
    State(state): State<TrackState>,
    ValidJson(body): ValidJson<StudentBusBody>,
) -> Result<Json<StudentBusUpdated>, TrackError> {
    let student_id = required(body.student_id, "student_id is required")?;
    let morningbus = non_empty(body.morningbus);
    let eveningbus = non_empty(body.eveningbus);

    let affected = state
        .storage
        .assign_student_buses(&student_id, morningbus.as_deref(), eveningbus.as_deref())
        .await?;
    if affected == 0 {
        return Err(TrackError::not_found("Student not found"));
    }
    info!(student_id = %student_id, ?morningbus, ?eveningbus, "student buses assigned");

    Ok(Json(StudentBusUpdated {
        message: "Student bus details updated successfully",
        updated_fields: StudentBusFields {
            verified: false,
            morningbus,
            eveningbus,
        },
    }))
}

/// `GET /students/{email_mobile}`: the parent's children.
pub async fn by_parent(
    State(state): State<TrackState>,
    Path(email_mobile): Path<String>,
) -> Result<Json<StudentList>, TrackError> {
    let students = state.storage.students_by_parent(&email_mobile).await?;
    if students.is_empty() {
        return Err(TrackError::not_found("No students found for this parent"));
    }
    Ok(Json(StudentList {
        count: Some(students.len()),
        students,
        message: None,
    }))
}

pub async fn remove(
    State(state): State<TrackState>,
    Path((student_id, parentid)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, TrackError> {
    if state.storage.delete_student(&student_id, &parentid).await? == 0 {
        return Err(TrackError::not_found("Student not found"));
    }
    info!(student_id = %student_id, parentid = %parentid, "student deleted");
    Ok(Json(MessageResponse {
        message: "Student deleted successfully",
    }))
}
