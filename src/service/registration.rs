use crate::db::TrackStorage;
use crate::error::TrackError;
use crate::service::ids::OtpGenerator;
use crate::service::mail::MailTransport;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::{info, warn};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10,15}$").expect("phone pattern compiles"));

/// How an identity string was recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityKind {
    Email,
    Phone,
}

impl IdentityKind {
    pub fn classify(identity: &str) -> Option<Self> {
        if EMAIL_RE.is_match(identity) {
            Some(Self::Email)
        } else if PHONE_RE.is_match(identity) {
            Some(Self::Phone)
        } else {
            None
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone number",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterRequest {
    pub identity: String,
    pub verified: bool,
    pub role: String,
    pub token: String,
}

/// Successful (or terminal) results of `register`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    MobileVerified {
        userid: i64,
        mobile: String,
        role: String,
    },
    /// Terminal: phones have no self-service verification path.
    MobileUnverified,
    OtpResent {
        userid: i64,
        address: String,
    },
    OtpSentNew {
        userid: i64,
        address: String,
    },
    UserInserted {
        userid: i64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub userid: i64,
    pub identity: String,
    pub role: String,
}

/// Identity registration and OTP verification.
#[derive(Clone)]
pub struct RegistrationFlow {
    storage: TrackStorage,
    mailer: Arc<dyn MailTransport>,
    otp: Arc<dyn OtpGenerator>,
}

impl RegistrationFlow {
    pub fn new(
        storage: TrackStorage,
        mailer: Arc<dyn MailTransport>,
        otp: Arc<dyn OtpGenerator>,
    ) -> Self {
        Self {
            storage,
            mailer,
            otp,
        }
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<RegistrationOutcome, TrackError> {
        if req.identity.is_empty() || req.role.is_empty() || req.token.is_empty() {
            return Err(TrackError::invalid("Missing or invalid fields"));
        }
        let kind = IdentityKind::classify(&req.identity)
            .ok_or_else(|| TrackError::invalid("Invalid email or phone number format"))?;

        let Some(existing) = self.storage.find_identity(&req.identity).await? else {
            return self.register_new(req, kind).await;
        };

        // role check precedes every mutation
        if !existing.role.is_empty() && existing.role != req.role {
            warn!(identity = %req.identity, stored = %existing.role, requested = %req.role, "role conflict");
            return Err(TrackError::RoleConflict(format!(
                "User with this {} already exists with a different role.",
                kind.label()
            )));
        }

        match kind {
            IdentityKind::Phone if existing.verified => {
                self.storage.refresh_token(&req.identity, &req.token).await?;
                Ok(RegistrationOutcome::MobileVerified {
                    userid: existing.userid,
                    mobile: existing.email_phone,
                    role: existing.role,
                })
            }
            IdentityKind::Phone => Ok(RegistrationOutcome::MobileUnverified),
            IdentityKind::Email => {
                let otp = self.otp.generate();
                self.storage
                    .store_otp(&req.identity, &otp, &req.token)
                    .await?;
                // the OTP stays persisted even if delivery fails; calling again resends
                self.mailer.send_otp(&req.identity, &otp).await?;
                info!(identity = %req.identity, "OTP resent");
                Ok(RegistrationOutcome::OtpResent {
                    userid: existing.userid,
                    address: req.identity,
                })
            }
        }
    }

    async fn register_new(
        &self,
        req: RegisterRequest,
        kind: IdentityKind,
    ) -> Result<RegistrationOutcome, TrackError> {
        let needs_otp = kind == IdentityKind::Email && !req.verified;
        let otp = needs_otp.then(|| self.otp.generate());

        let userid = self
            .storage
            .insert_identity(
                &req.identity,
                otp.as_deref(),
                req.verified,
                &req.role,
                &req.token,
            )
            .await?;

        match otp {
            Some(code) => {
                self.mailer.send_otp(&req.identity, &code).await?;
                info!(identity = %req.identity, userid, "new identity, OTP sent");
                Ok(RegistrationOutcome::OtpSentNew {
                    userid,
                    address: req.identity,
                })
            }
            None => {
                info!(identity = %req.identity, userid, "new identity inserted");
                Ok(RegistrationOutcome::UserInserted { userid })
            }
        }
    }

    /// Plain string comparison; there is no expiry or attempt limit, and a
    /// matching code stays valid until the next `register` replaces it.
    pub async fn verify_otp(
        &self,
        identity: &str,
        submitted: &str,
    ) -> Result<VerifiedIdentity, TrackError> {
        if identity.is_empty() || submitted.is_empty() {
            return Err(TrackError::invalid("Email/Phone and OTP are required"));
        }
        let user = self
            .storage
            .find_identity(identity)
            .await?
            .ok_or_else(|| TrackError::not_found("No user found"))?;

        if user.otp.as_deref() != Some(submitted) {
            return Err(TrackError::InvalidOtp);
        }

        self.storage.mark_verified(identity).await?;
        info!(identity, userid = user.userid, "OTP verified");
        Ok(VerifiedIdentity {
            userid: user.userid,
            identity: user.email_phone,
            role: user.role,
        })
    }
}
