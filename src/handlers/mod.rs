//! Axum handlers, one module per resource.

pub mod auth;
pub mod buses;
pub mod drivers;
pub mod schools;
pub mod students;
