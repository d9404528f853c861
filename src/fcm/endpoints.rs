use super::credentials::ServiceAccount;
use crate::config::FCM_SCOPE;
use crate::error::TrackError;
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use url::Url;

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Stateless FCM / Google token endpoints.
pub(super) struct FcmEndpoints;

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
pub(super) struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

impl FcmEndpoints {
    /// Exchange a signed service-account assertion for an access token.
    pub(super) async fn fetch_access_token(
        account: &ServiceAccount,
        http_client: &reqwest::Client,
    ) -> Result<TokenResponse, TrackError> {
        let assertion = sign_assertion(account)?;
        let resp = http_client
            .post(&account.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?
            .error_for_status()?;
        let token: TokenResponse = resp.json().await?;
        debug!(expires_in = token.expires_in, "push access token minted");
        Ok(token)
    }

    /// Send one notification to one registration token.
    pub(super) async fn send_message(
        endpoint: &Url,
        project_id: &str,
        access_token: &str,
        device_token: &str,
        title: &str,
        body: &str,
        http_client: &reqwest::Client,
    ) -> Result<(), TrackError> {
        let url = send_url(endpoint, project_id)?;
        http_client
            .post(url)
            .bearer_auth(access_token)
            .json(&message_payload(device_token, title, body))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

pub(super) fn send_url(endpoint: &Url, project_id: &str) -> Result<Url, TrackError> {
    endpoint
        .join(&format!("v1/projects/{project_id}/messages:send"))
        .map_err(|e| TrackError::Push(format!("invalid FCM endpoint: {e}")))
}

pub(super) fn message_payload(device_token: &str, title: &str, body: &str) -> serde_json::Value {
    json!({
        "message": {
            "token": device_token,
            "notification": { "title": title, "body": body }
        }
    })
}

fn sign_assertion(account: &ServiceAccount) -> Result<String, TrackError> {
    let now = Utc::now().timestamp();
    let claims = AssertionClaims {
        iss: &account.client_email,
        scope: FCM_SCOPE,
        aud: &account.token_uri,
        iat: now,
        exp: now + ASSERTION_LIFETIME_SECS,
    };
    let key = EncodingKey::from_rsa_pem(account.private_key.as_bytes())?;
    Ok(jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key)?)
}
