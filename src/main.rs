use std::sync::Arc;

use bustrack::config::Config;
use bustrack::db::TrackStorage;
use bustrack::fcm::push_transport;
use bustrack::service::ids::RandomOtp;
use bustrack::service::mail::{DisabledMailer, MailTransport, SmtpMailer};
use bustrack::service::media::MediaIngest;
use bustrack::{TrackState, track_router};
use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.database_url,
        upload_dir = %cfg.upload_dir.display(),
        port = cfg.port,
        loglevel = %cfg.loglevel,
    );

    let storage = match TrackStorage::connect(&cfg.database_url).await {
        Ok(storage) => storage,
        Err(e) => {
            error!(error = %e, "database unreachable at startup");
            return Err(e.into());
        }
    };

    let mailer: Arc<dyn MailTransport> = match cfg.mail_credentials() {
        Some((user, pass)) => Arc::new(SmtpMailer::new(&cfg.smtp_host, user, pass)?),
        None => {
            warn!("EMAIL_USER/EMAIL_PASS not set; OTP emails will fail");
            Arc::new(DisabledMailer)
        }
    };

    let push = push_transport(
        cfg.firebase_credentials.as_deref(),
        cfg.fcm_endpoint.clone(),
        reqwest::Client::new(),
    );

    let media = MediaIngest::new(cfg.upload_dir.clone());
    media.ensure_dirs()?;

    let state = TrackState::new(storage, mailer, push, media, Arc::new(RandomOtp));
    let app = track_router(state, cfg.max_body_bytes);

    let addr = format!("0.0.0.0:{}", cfg.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => warn!(error = %e, "failed to install SIGTERM handler"),
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
