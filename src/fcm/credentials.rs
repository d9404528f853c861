use crate::error::TrackError;
use serde::Deserialize;
use std::{fs, path::Path};
use tracing::info;

/// The subset of a Google service-account key file needed to mint access tokens.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccount {
    pub project_id: String,
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

impl ServiceAccount {
    /// Load and validate a service-account JSON file.
    pub fn load(path: &Path) -> Result<Self, TrackError> {
        let contents = fs::read_to_string(path)?;
        let account = Self::from_json(&contents)?;
        info!(
            path = %path.display(),
            project_id = %account.project_id,
            "push credential loaded"
        );
        Ok(account)
    }

    pub fn from_json(contents: &str) -> Result<Self, TrackError> {
        let account: ServiceAccount = serde_json::from_str(contents)?;
        if account.project_id.is_empty() || account.client_email.is_empty() {
            return Err(TrackError::PushCredential(
                "service account is missing project_id or client_email".to_string(),
            ));
        }
        if !account.private_key.contains("PRIVATE KEY") {
            return Err(TrackError::PushCredential(
                "service account private_key is not a PEM key".to_string(),
            ));
        }
        Ok(account)
    }
}
