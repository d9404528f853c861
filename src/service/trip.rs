use crate::db::{Leg, TrackStorage};
use crate::error::TrackError;
use crate::service::push::{DispatchReport, NotificationDispatcher};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

pub const TRIP_ENDED_TITLE: &str = "Trip Ended";
pub const TRIP_ENDED_BODY: &str = "Your child's bus trip has ended.";

/// Why the notification phase stopped without dispatching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FanOutSkip {
    DriverMissing,
    NoMorningBus,
    NoStudents,
    NoTokens,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FanOutResult {
    Dispatched(DispatchReport),
    Skipped(FanOutSkip),
}

/// Ends trips and notifies the parents of the riders.
#[derive(Clone)]
pub struct TripService {
    storage: TrackStorage,
    notifier: NotificationDispatcher,
}

impl TripService {
    pub fn new(storage: TrackStorage, notifier: NotificationDispatcher) -> Self {
        Self { storage, notifier }
    }

    /// Phase 1 clears `is_on_road`; phase 2 runs detached after this returns.
    /// The handle is only useful to callers that want to observe phase 2.
    pub async fn end_trip(
        &self,
        driver_id: &str,
    ) -> Result<JoinHandle<Option<FanOutResult>>, TrackError> {
        if driver_id.is_empty() {
            return Err(TrackError::invalid("driver_id is required"));
        }
        let affected = self.storage.set_driver_off_road(driver_id).await?;
        if affected == 0 {
            return Err(TrackError::not_found("Driver not found"));
        }
        info!(driver_id, "trip ended");

        let this = self.clone();
        let driver_id = driver_id.to_string();
        Ok(tokio::spawn(async move {
            match this.notify_trip_end(&driver_id).await {
                Ok(result) => {
                    debug!(driver_id = %driver_id, ?result, "trip-end fan-out finished");
                    Some(result)
                }
                Err(e) => {
                    error!(driver_id = %driver_id, error = %e, "trip-end fan-out aborted");
                    None
                }
            }
        }))
    }

    /// Notify parents of the students on the driver's morning bus.
    pub async fn notify_trip_end(&self, driver_id: &str) -> Result<FanOutResult, TrackError> {
        let bus = match self.storage.driver_bus(driver_id, Leg::Morning).await? {
            None => return Ok(FanOutResult::Skipped(FanOutSkip::DriverMissing)),
            Some(None) => return Ok(FanOutResult::Skipped(FanOutSkip::NoMorningBus)),
            Some(Some(bus)) => bus,
        };

        let parents = self.storage.parents_on_morning_bus(&bus).await?;
        if parents.is_empty() {
            return Ok(FanOutResult::Skipped(FanOutSkip::NoStudents));
        }

        let tokens = self.storage.tokens_for(&parents).await?;
        if tokens.is_empty() {
            return Ok(FanOutResult::Skipped(FanOutSkip::NoTokens));
        }

        let report = self
            .notifier
            .dispatch(&tokens, TRIP_ENDED_TITLE, TRIP_ENDED_BODY)
            .await?;
        Ok(FanOutResult::Dispatched(report))
    }
}
