use crate::db::models::{Driver, Leg, NewDriver};
use crate::db::sqlite::TrackStorage;
use crate::error::TrackError;

const DRIVER_COLUMNS: &str = "driver_id, name, date_of_birth, dl_number, dl_photo, email_phone, \
    is_on_road, morning_bus, evening_bus, current_location, is_verified, school_id";

impl TrackStorage {
    /// New drivers start off-road, unverified, with no buses and no location.
    pub async fn insert_driver(&self, d: &NewDriver) -> Result<(), TrackError> {
        sqlx::query(
            r#"INSERT INTO drivers (
                driver_id, name, date_of_birth, dl_number, dl_photo, email_phone,
                is_on_road, morning_bus, evening_bus, current_location, is_verified, school_id
            ) VALUES (?, ?, ?, ?, ?, ?, 0, NULL, NULL, NULL, 0, ?)"#,
        )
        .bind(&d.driver_id)
        .bind(&d.name)
        .bind(&d.date_of_birth)
        .bind(&d.dl_number)
        .bind(&d.dl_photo)
        .bind(&d.email_phone)
        .bind(&d.school_id)
        .execute(self.pool())
        .await
        .map_err(|e| TrackError::from_insert(e, "Driver already registered"))?;
        Ok(())
    }

    pub async fn find_driver(&self, driver_id: &str) -> Result<Option<Driver>, TrackError> {
        let row = sqlx::query_as::<_, Driver>(&format!(
            "SELECT {DRIVER_COLUMNS} FROM drivers WHERE driver_id = ? LIMIT 1"
        ))
        .bind(driver_id)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    pub async fn find_driver_by_contact(
        &self,
        email_phone: &str,
    ) -> Result<Option<Driver>, TrackError> {
        let row = sqlx::query_as::<_, Driver>(&format!(
            "SELECT {DRIVER_COLUMNS} FROM drivers WHERE email_phone = ? LIMIT 1"
        ))
        .bind(email_phone)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    pub async fn unverified_drivers(&self, school_id: &str) -> Result<Vec<Driver>, TrackError> {
        let rows = sqlx::query_as::<_, Driver>(&format!(
            "SELECT {DRIVER_COLUMNS} FROM drivers WHERE school_id = ? AND is_verified = 0 ORDER BY id"
        ))
        .bind(school_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    /// Assign both legs (absent legs are cleared) and mark the driver verified.
    pub async fn assign_driver_buses(
        &self,
        driver_id: &str,
        morning_bus: Option<&str>,
        evening_bus: Option<&str>,
    ) -> Result<u64, TrackError> {
        let result = sqlx::query(
            "UPDATE drivers SET morning_bus = ?, evening_bus = ?, is_verified = 1 WHERE driver_id = ?",
        )
        .bind(morning_bus)
        .bind(evening_bus)
        .bind(driver_id)
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected())
    }

    /// Record a location report; a reporting driver is on the road.
    pub async fn update_driver_location(
        &self,
        driver_id: &str,
        current_location: &str,
    ) -> Result<u64, TrackError> {
        let result = sqlx::query(
            "UPDATE drivers SET current_location = ?, is_on_road = 1 WHERE driver_id = ?",
        )
        .bind(current_location)
        .bind(driver_id)
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn set_driver_off_road(&self, driver_id: &str) -> Result<u64, TrackError> {
        let result = sqlx::query("UPDATE drivers SET is_on_road = 0 WHERE driver_id = ?")
            .bind(driver_id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected())
    }

    /// Bus assigned to the driver for `leg`. Outer `None`: no such driver.
    pub async fn driver_bus(
        &self,
        driver_id: &str,
        leg: Leg,
    ) -> Result<Option<Option<String>>, TrackError> {
        let column = match leg {
            Leg::Morning => "morning_bus",
            Leg::Evening => "evening_bus",
        };
        let row: Option<(Option<String>,)> = sqlx::query_as(&format!(
            "SELECT {column} FROM drivers WHERE driver_id = ? LIMIT 1"
        ))
        .bind(driver_id)
        .fetch_optional(self.pool())
        .await?;
        Ok(row.map(|(bus,)| bus.filter(|b| !b.is_empty())))
    }
}

#[cfg(test)]
mod tests {
    use crate::db::models::{Leg, NewDriver};
    use crate::db::sqlite::test_support::memory_storage;

    fn driver() -> NewDriver {
        NewDriver {
            driver_id: "driver_1".to_string(),
            name: "Ravi".to_string(),
            date_of_birth: "1985-02-11".to_string(),
            dl_number: "DL-42".to_string(),
            dl_photo: "/uploads/drivers/dl.jpg".to_string(),
            email_phone: "9876543210".to_string(),
            school_id: "SCH1".to_string(),
        }
    }

    #[tokio::test]
    async fn location_and_trip_toggle_on_road() {
        let storage = memory_storage().await;
        storage.insert_driver(&driver()).await.unwrap();

        storage.update_driver_location("driver_1", "12.9,77.6").await.unwrap();
        let d = storage.find_driver("driver_1").await.unwrap().unwrap();
        assert!(d.is_on_road);
        assert_eq!(d.current_location.as_deref(), Some("12.9,77.6"));

        assert_eq!(storage.set_driver_off_road("driver_1").await.unwrap(), 1);
        assert!(!storage.find_driver("driver_1").await.unwrap().unwrap().is_on_road);
        assert_eq!(storage.set_driver_off_road("ghost").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn bus_assignment_verifies_driver() {
        let storage = memory_storage().await;
        storage.insert_driver(&driver()).await.unwrap();
        assert_eq!(storage.unverified_drivers("SCH1").await.unwrap().len(), 1);
        assert_eq!(
            storage.driver_bus("driver_1", Leg::Morning).await.unwrap(),
            Some(None)
        );

        storage
            .assign_driver_buses("driver_1", Some("BUS1"), None)
            .await
            .unwrap();
        assert!(storage.unverified_drivers("SCH1").await.unwrap().is_empty());
        assert_eq!(
            storage.driver_bus("driver_1", Leg::Morning).await.unwrap(),
            Some(Some("BUS1".to_string()))
        );
        assert_eq!(storage.driver_bus("ghost", Leg::Evening).await.unwrap(), None);
    }
}
