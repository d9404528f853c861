//! Request and response payloads of the HTTP API.

pub mod auth;
pub mod drivers;
pub mod schools;
pub mod students;

/// `{ "message": ... }` acknowledgement.
#[derive(Debug, serde::Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
