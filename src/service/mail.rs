use crate::error::TrackError;
use async_trait::async_trait;
use lettre::address::AddressError;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

pub const OTP_SUBJECT: &str = "Your OTP Code from SchoolBusTrack";

/// Delivers one-time codes by email. A single attempt per call; any transport
/// error surfaces as `MailDeliveryFailed`.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send_otp(&self, address: &str, code: &str) -> Result<(), TrackError>;
}

/// SMTP relay with login credentials.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpMailer {
    pub fn new(host: &str, user: &str, pass: &str) -> Result<Self, TrackError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|e| TrackError::MailDeliveryFailed(e.to_string()))?
            .credentials(Credentials::new(user.to_string(), pass.to_string()))
            .build();
        Ok(Self {
            transport,
            from: user.to_string(),
        })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send_otp(&self, address: &str, code: &str) -> Result<(), TrackError> {
        let email = build_otp_message(&self.from, address, code)?;
        self.transport
            .send(email)
            .await
            .map_err(|e| TrackError::MailDeliveryFailed(e.to_string()))?;
        info!(to = %address, "OTP email sent");
        Ok(())
    }
}

/// Used when no mail credentials are configured; every send fails.
pub struct DisabledMailer;

#[async_trait]
impl MailTransport for DisabledMailer {
    async fn send_otp(&self, _address: &str, _code: &str) -> Result<(), TrackError> {
        Err(TrackError::MailDeliveryFailed(
            "mail transport is not configured".to_string(),
        ))
    }
}

fn build_otp_message(from: &str, to: &str, code: &str) -> Result<Message, TrackError> {
    let from: Mailbox = from
        .parse()
        .map_err(|e: AddressError| TrackError::MailDeliveryFailed(e.to_string()))?;
    let to: Mailbox = to
        .parse()
        .map_err(|e: AddressError| TrackError::MailDeliveryFailed(e.to_string()))?;
    Message::builder()
        .from(from)
        .to(to)
        .subject(OTP_SUBJECT)
        .header(ContentType::TEXT_HTML)
        .body(render_otp_email(code))
        .map_err(|e| TrackError::MailDeliveryFailed(e.to_string()))
}

/// HTML body of the OTP email.
pub fn render_otp_email(code: &str) -> String {
    format!(
        r#"<html>
  <head>
    <style>
      body {{ font-family: Arial, sans-serif; background-color: #f3f4f6; color: #333; padding: 20px; }}
      .container {{ background-color: #ffffff; padding: 20px; border-radius: 8px; box-shadow: 0 4px 10px rgba(0, 0, 0, 0.1); }}
      .header {{ text-align: center; font-size: 24px; color: #4CAF50; margin-bottom: 20px; }}
      .otp {{ display: inline-block; font-size: 32px; font-weight: bold; padding: 10px 20px; background-color: #4CAF50; color: white; border-radius: 8px; margin: 10px 0; }}
      .footer {{ margin-top: 20px; text-align: center; font-size: 12px; color: #888; }}
    </style>
  </head>
  <body>
    <div class="container">
      <div class="header">SchoolBusTrack</div>
      <div>
        <p>Hi there,</p>
        <p>We've received a request to send you an OTP to verify your email address.</p>
        <p>Your OTP code is:</p>
        <div class="otp">{code}</div>
        <p>Please use this code to complete your verification.</p>
      </div>
      <div class="footer">
        <p>If you did not request this, please ignore this email.</p>
      </div>
    </div>
  </body>
</html>"#
    )
}
