use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::db::TrackStorage;
use crate::handlers::{auth, buses, drivers, schools, students};
use crate::service::ids::OtpGenerator;
use crate::service::mail::MailTransport;
use crate::service::media::MediaIngest;
use crate::service::push::{NotificationDispatcher, PushTransport};
use crate::service::registration::RegistrationFlow;
use crate::service::trip::TripService;

/// Everything a handler may touch, constructed once in `main` (or a test).
#[derive(Clone)]
pub struct TrackState {
    pub storage: TrackStorage,
    pub registration: RegistrationFlow,
    pub trips: TripService,
    pub media: MediaIngest,
}

impl TrackState {
    pub fn new(
        storage: TrackStorage,
        mailer: Arc<dyn MailTransport>,
        push: Arc<dyn PushTransport>,
        media: MediaIngest,
        otp: Arc<dyn OtpGenerator>,
    ) -> Self {
        let registration = RegistrationFlow::new(storage.clone(), mailer, otp);
        let trips = TripService::new(storage.clone(), NotificationDispatcher::new(push));
        Self {
            storage,
            registration,
            trips,
            media,
        }
    }
}

pub fn track_router(state: TrackState, max_body_bytes: usize) -> Router {
    let uploads = ServeDir::new(state.media.root().to_path_buf());

    Router::new()
        .route("/", get(|| async { "Welcome to the API!" }))
        .route("/auth/register", post(auth::register))
        .route("/auth/verify-otp", post(auth::verify_otp))
        .route("/parent/check", post(auth::parent_check))
        .route("/school/register", post(schools::register))
        .route("/school/check", post(schools::check))
        .route("/schools", get(schools::list))
        .route("/buses/add", post(buses::add))
        .route("/buses/by-school", post(buses::by_school))
        .route(
            "/buses/{id}",
            get(buses::list_for_school)
                .put(buses::update)
                .delete(buses::remove),
        )
        .route("/students/add", post(students::add))
        .route("/students/all", post(students::pending))
        .route("/students/unverified", post(students::flagged))
        .route("/students/unverify", post(students::unverify))
        .route("/students/update-bus", post(students::update_bus))
        .route("/students/{email_mobile}", get(students::by_parent))
        .route("/students/{student_id}/{parentid}", delete(students::remove))
        .route("/drivers/register", post(drivers::register))
        .route("/drivers/check", post(drivers::check))
        .route("/drivers/unverified/{school_id}", get(drivers::unverified))
        .route("/drivers/update-bus", post(drivers::update_bus))
        .route("/drivers/update-location", post(drivers::update_location))
        .route("/drivers/end-trip", post(drivers::end_trip))
        .route(
            "/drivers/students-morning-bus",
            post(drivers::students_morning_bus),
        )
        .route(
            "/drivers/students-evening-bus",
            post(drivers::students_evening_bus),
        )
        .nest_service("/uploads", uploads)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
