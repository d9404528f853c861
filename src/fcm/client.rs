use super::credentials::ServiceAccount;
use super::endpoints::FcmEndpoints;
use crate::error::TrackError;
use crate::service::push::{DisabledPush, PushTransport};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use url::Url;

/// Refresh the access token this long before it expires.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

/// FCM HTTP v1 client authenticated with a service account.
#[derive(Clone)]
pub struct FcmClient {
    account: Arc<ServiceAccount>,
    endpoint: Url,
    http: reqwest::Client,
    token: Arc<Mutex<Option<CachedToken>>>,
}

impl FcmClient {
    pub fn new(account: ServiceAccount, endpoint: Url, http: reqwest::Client) -> Self {
        Self {
            account: Arc::new(account),
            endpoint,
            http,
            token: Arc::new(Mutex::new(None)),
        }
    }

    async fn access_token(&self) -> Result<String, TrackError> {
        let mut guard = self.token.lock().await;
        if let Some(cached) = guard.as_ref() {
            if cached.expires_at > Utc::now() {
                return Ok(cached.value.clone());
            }
        }
        let fresh = FcmEndpoints::fetch_access_token(&self.account, &self.http).await?;
        let lifetime = (fresh.expires_in - EXPIRY_MARGIN_SECS).max(0);
        *guard = Some(CachedToken {
            value: fresh.access_token.clone(),
            expires_at: Utc::now() + Duration::seconds(lifetime),
        });
        Ok(fresh.access_token)
    }
}

#[async_trait]
impl PushTransport for FcmClient {
    async fn send(&self, token: &str, title: &str, body: &str) -> Result<(), TrackError> {
        let access_token = self.access_token().await?;
        FcmEndpoints::send_message(
            &self.endpoint,
            &self.account.project_id,
            &access_token,
            token,
            title,
            body,
            &self.http,
        )
        .await
    }
}

/// Push transport for the configured credential file. Without a usable file
/// push is disabled and every token fails.
pub fn push_transport(
    credentials: Option<&Path>,
    endpoint: Url,
    http: reqwest::Client,
) -> Arc<dyn PushTransport> {
    let Some(path) = credentials else {
        warn!("FIREBASE_CREDENTIALS not set; push notifications are disabled");
        return Arc::new(DisabledPush);
    };
    match ServiceAccount::load(path) {
        Ok(account) => {
            info!(project_id = %account.project_id, "push notifications enabled");
            Arc::new(FcmClient::new(account, endpoint, http))
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unusable push credential; push notifications are disabled");
            Arc::new(DisabledPush)
        }
    }
}
