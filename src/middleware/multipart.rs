use axum::{
    extract::{FromRequest, Multipart, Request, multipart::MultipartError},
    http::StatusCode,
};
use std::collections::HashMap;
use tracing::debug;

use crate::error::TrackError;

/// A multipart body split into text fields and at most one file per name.
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    files: HashMap<String, Vec<u8>>,
}

impl UploadForm {
    /// Text field; blank values count as absent.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// Loose boolean: `true`, `1`, `yes`, `on` (any case) are true.
    pub fn flag(&self, name: &str) -> bool {
        self.text(name)
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on"))
            .unwrap_or(false)
    }

    /// Take ownership of an uploaded file's bytes. Empty uploads count as absent.
    pub fn take_file(&mut self, name: &str) -> Option<Vec<u8>> {
        self.files.remove(name).filter(|b| !b.is_empty())
    }
}

impl<S> FromRequest<S> for UploadForm
where
    S: Send + Sync,
{
    type Rejection = TrackError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| TrackError::InvalidInput(e.body_text()))?;

        let mut form = UploadForm::default();
        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            if field.file_name().is_some() {
                let bytes = field.bytes().await.map_err(multipart_error)?;
                debug!(field = %name, size = bytes.len(), "multipart file received");
                form.files.insert(name, bytes.to_vec());
            } else {
                let text = field.text().await.map_err(multipart_error)?;
                form.fields.insert(name, text);
            }
        }
        Ok(form)
    }
}

fn multipart_error(e: MultipartError) -> TrackError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        TrackError::PayloadTooLarge
    } else {
        TrackError::InvalidInput(e.body_text())
    }
}

#[cfg(test)]
impl UploadForm {
    pub(crate) fn with_field(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_parsing_is_loose_but_not_truthy_on_false() {
        let form = UploadForm::default()
            .with_field("a", "true")
            .with_field("b", "1")
            .with_field("c", "false")
            .with_field("d", "0")
            .with_field("e", "   ")
            .with_field("f", "ON")
            .with_field("g", "no");
        assert!(form.flag("a"));
        assert!(form.flag("b"));
        assert!(!form.flag("c"));
        assert!(!form.flag("d"));
        assert!(!form.flag("e"));
        assert!(form.flag("f"));
        assert!(!form.flag("g"));
        assert!(!form.flag("missing"));
        assert_eq!(form.text("e"), None);
    }
}
