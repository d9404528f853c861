//! Request extractors shared by the handlers.

pub mod json;
pub mod multipart;

pub use json::{ValidJson, non_empty, required};
pub use multipart::UploadForm;
