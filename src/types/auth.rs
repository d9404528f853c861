use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::db::Parent;
use crate::service::registration::{RegistrationOutcome, VerifiedIdentity};

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub email_phone: Option<String>,
    pub verified: Option<bool>,
    pub role: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpBody {
    pub email_phone: Option<String>,
    pub otp: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ParentCheckBody {
    pub email_mobile: Option<String>,
}

/// Body shared by the register / verify responses; absent fields are omitted.
#[derive(Debug, Serialize, Default)]
pub struct AuthResponse {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub userid: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl IntoResponse for RegistrationOutcome {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            RegistrationOutcome::MobileVerified {
                userid,
                mobile,
                role,
            } => (
                StatusCode::OK,
                AuthResponse {
                    status: "mobile_verified",
                    message: "Mobile already verified".to_string(),
                    userid: Some(userid),
                    mobile: Some(mobile),
                    role: Some(role),
                },
            ),
            RegistrationOutcome::MobileUnverified => (
                StatusCode::FORBIDDEN,
                AuthResponse {
                    status: "mobile_unverified",
                    message: "Phone number not verified. Please contact support.".to_string(),
                    ..Default::default()
                },
            ),
            RegistrationOutcome::OtpResent { userid, address } => (
                StatusCode::OK,
                AuthResponse {
                    status: "otp_resent",
                    message: format!("OTP sent to {address}"),
                    userid: Some(userid),
                    ..Default::default()
                },
            ),
            RegistrationOutcome::OtpSentNew { userid, address } => (
                StatusCode::OK,
                AuthResponse {
                    status: "otp_sent_new",
                    message: format!("OTP sent to {address}"),
                    userid: Some(userid),
                    ..Default::default()
                },
            ),
            RegistrationOutcome::UserInserted { userid } => (
                StatusCode::OK,
                AuthResponse {
                    status: "user_inserted",
                    message: "New user added".to_string(),
                    userid: Some(userid),
                    ..Default::default()
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

impl From<VerifiedIdentity> for AuthResponse {
    fn from(v: VerifiedIdentity) -> Self {
        AuthResponse {
            status: "verified",
            message: "OTP verified successfully".to_string(),
            userid: Some(v.userid),
            mobile: Some(v.identity),
            role: Some(v.role),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ParentCheckResponse {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Parent>,
    pub message: &'static str,
}
