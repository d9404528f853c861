use crate::error::TrackError;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

const DEFAULT_TITLE: &str = "Notification";
const DEFAULT_BODY: &str = "You have a new alert";

/// Delivers one push message to one device token.
#[async_trait]
pub trait PushTransport: Send + Sync {
    async fn send(&self, token: &str, title: &str, body: &str) -> Result<(), TrackError>;
}

/// Used when no push credential is available; every token fails.
pub struct DisabledPush;

#[async_trait]
impl PushTransport for DisabledPush {
    async fn send(&self, _token: &str, _title: &str, _body: &str) -> Result<(), TrackError> {
        Err(TrackError::Push("push transport is not configured".to_string()))
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DispatchReport {
    pub success_count: usize,
    pub failure_count: usize,
    pub failed_tokens: Vec<String>,
}

/// Fans a message out to device tokens one at a time. A failing token is
/// recorded and skipped; nothing is retried.
#[derive(Clone)]
pub struct NotificationDispatcher {
    transport: Arc<dyn PushTransport>,
}

impl NotificationDispatcher {
    pub fn new(transport: Arc<dyn PushTransport>) -> Self {
        Self { transport }
    }

    pub async fn dispatch(
        &self,
        tokens: &[String],
        title: &str,
        body: &str,
    ) -> Result<DispatchReport, TrackError> {
        if tokens.is_empty() {
            return Err(TrackError::NoTokens);
        }
        let title = if title.is_empty() { DEFAULT_TITLE } else { title };
        let body = if body.is_empty() { DEFAULT_BODY } else { body };

        let mut report = DispatchReport {
            success_count: 0,
            failure_count: 0,
            failed_tokens: Vec::new(),
        };
        for token in tokens {
            match self.transport.send(token, title, body).await {
                Ok(()) => report.success_count += 1,
                Err(e) => {
                    warn!(token = %token, error = %e, "push delivery failed");
                    report.failure_count += 1;
                    report.failed_tokens.push(token.clone());
                }
            }
        }
        info!(
            sent = report.success_count,
            failed = report.failure_count,
            "notifications dispatched"
        );
        Ok(report)
    }
}
