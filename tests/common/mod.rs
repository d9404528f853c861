#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use bustrack::db::TrackStorage;
use bustrack::service::ids::OtpGenerator;
use bustrack::service::mail::MailTransport;
use bustrack::service::media::MediaIngest;
use bustrack::service::push::PushTransport;
use bustrack::{TrackError, TrackState, track_router};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tower::ServiceExt;

pub const TEST_BODY_LIMIT: usize = 256 * 1024;

/// Captures every delivered OTP email instead of sending it. While `failing`
/// is set every send errors and nothing is recorded.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<(String, String)>>,
    pub failing: AtomicBool,
}

impl RecordingMailer {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl MailTransport for RecordingMailer {
    async fn send_otp(&self, address: &str, code: &str) -> Result<(), TrackError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(TrackError::MailDeliveryFailed(
                "smtp relay unavailable".to_string(),
            ));
        }
        self.sent
            .lock()
            .unwrap()
            .push((address.to_string(), code.to_string()));
        Ok(())
    }
}

/// Records pushes; tokens starting with `dead` fail.
#[derive(Default)]
pub struct RecordingPush {
    pub sent: Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl PushTransport for RecordingPush {
    async fn send(&self, token: &str, title: &str, body: &str) -> Result<(), TrackError> {
        self.sent
            .lock()
            .unwrap()
            .push((token.to_string(), title.to_string(), body.to_string()));
        if token.starts_with("dead") {
            return Err(TrackError::Push("unregistered token".to_string()));
        }
        Ok(())
    }
}

/// Hands out a fixed sequence of codes, then repeats the last one.
pub struct ScriptedOtp {
    codes: Mutex<VecDeque<String>>,
    last: Mutex<String>,
}

impl ScriptedOtp {
    pub fn new(codes: &[&str]) -> Self {
        Self {
            codes: Mutex::new(codes.iter().map(|c| c.to_string()).collect()),
            last: Mutex::new("000000".to_string()),
        }
    }
}

impl OtpGenerator for ScriptedOtp {
    fn generate(&self) -> String {
        let mut last = self.last.lock().unwrap();
        if let Some(next) = self.codes.lock().unwrap().pop_front() {
            *last = next;
        }
        last.clone()
    }
}

pub struct TestApp {
    pub app: Router,
    pub storage: TrackStorage,
    pub mailer: Arc<RecordingMailer>,
    pub push: Arc<RecordingPush>,
    pub state: TrackState,
    pub dir: TempDir,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with_otps(&["111111", "222222", "333333"]).await
}

pub async fn spawn_app_with_otps(codes: &[&str]) -> TestApp {
    let dir = tempfile::tempdir().expect("create temp dir");
    let database_url = format!("sqlite:{}", dir.path().join("track.db").display());
    let storage = TrackStorage::connect(&database_url)
        .await
        .expect("open test database");

    let media = MediaIngest::new(dir.path().join("uploads"));
    media.ensure_dirs().expect("create upload dirs");

    let mailer = Arc::new(RecordingMailer::default());
    let push = Arc::new(RecordingPush::default());
    let state = TrackState::new(
        storage.clone(),
        mailer.clone(),
        push.clone(),
        media,
        Arc::new(ScriptedOtp::new(codes)),
    );
    let app = track_router(state.clone(), TEST_BODY_LIMIT);

    TestApp {
        app,
        storage,
        mailer,
        push,
        state,
        dir,
    }
}

impl TestApp {
    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self
            .app
            .clone()
            .oneshot(req)
            .await
            .expect("request failed");
        let status = resp.status();
        let body = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&body).into_owned())
            })
        };
        (status, json)
    }

    pub async fn json(&self, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .expect("failed to build request"),
        )
        .await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.json("POST", uri, body).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
    }

    pub async fn multipart(&self, uri: &str, form: Multipart) -> (StatusCode, Value) {
        let (content_type, body) = form.finish();
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", content_type)
                .body(Body::from(body))
                .expect("failed to build request"),
        )
        .await
    }

    pub fn codes_sent_to(&self, address: &str) -> Vec<String> {
        self.mailer
            .sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(to, _)| to == address)
            .map(|(_, code)| code.clone())
            .collect()
    }
}

const BOUNDARY: &str = "bustrack-test-boundary";

/// Minimal `multipart/form-data` body builder.
#[derive(Default)]
pub struct Multipart {
    body: Vec<u8>,
}

impl Multipart {
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        (format!("multipart/form-data; boundary={BOUNDARY}"), self.body)
    }
}

/// A small solid-colour PNG.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 40, 40]));
    let mut buf = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png)
        .expect("encode png");
    buf.into_inner()
}
