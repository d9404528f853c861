use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Environment keys read on top of the defaults.
const ENV_KEYS: &[&str] = &[
    "PORT",
    "DATABASE_URL",
    "LOGLEVEL",
    "UPLOAD_DIR",
    "MAX_BODY_BYTES",
    "SMTP_HOST",
    "EMAIL_USER",
    "EMAIL_PASS",
    "FIREBASE_CREDENTIALS",
    "FCM_ENDPOINT",
];

/// OAuth2 scope required to send FCM messages.
pub const FCM_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub loglevel: String,
    /// Root directory for processed uploads, served under `/uploads`.
    pub upload_dir: PathBuf,
    pub max_body_bytes: usize,
    pub smtp_host: String,
    pub email_user: Option<String>,
    pub email_pass: Option<String>,
    /// Service-account JSON for the push provider.
    pub firebase_credentials: Option<PathBuf>,
    pub fcm_endpoint: Url,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            database_url: "sqlite:bustrack.db".to_string(),
            loglevel: "info".to_string(),
            upload_dir: PathBuf::from("uploads"),
            max_body_bytes: 10 * 1024 * 1024,
            smtp_host: "smtp.gmail.com".to_string(),
            email_user: None,
            email_pass: None,
            firebase_credentials: None,
            fcm_endpoint: Url::parse("https://fcm.googleapis.com/")
                .expect("static FCM endpoint is a valid URL"),
        }
    }
}

impl Config {
    /// Defaults merged with the process environment.
    pub fn load() -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::raw().only(ENV_KEYS))
            .extract()
    }

    /// Mail credentials, present only when both halves are configured.
    pub fn mail_credentials(&self) -> Option<(&str, &str)> {
        match (self.email_user.as_deref(), self.email_pass.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }
}
