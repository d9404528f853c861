use crate::db::models::{Bus, BusPatch, NewBus};
use crate::db::sqlite::TrackStorage;
use crate::error::TrackError;

impl TrackStorage {
    pub async fn insert_bus(&self, bus: &NewBus) -> Result<(), TrackError> {
        sqlx::query(
            "INSERT INTO buses (busid, busno, schoolid, capacity, busdescription) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&bus.busid)
        .bind(&bus.busno)
        .bind(&bus.schoolid)
        .bind(bus.capacity)
        .bind(&bus.busdescription)
        .execute(self.pool())
        .await
        .map_err(|e| TrackError::from_insert(e, "Bus id already exists"))?;
        Ok(())
    }

    pub async fn buses_by_school(&self, schoolid: &str) -> Result<Vec<Bus>, TrackError> {
        let rows = sqlx::query_as::<_, Bus>(
            "SELECT busid, busno, schoolid, capacity, busdescription FROM buses WHERE schoolid = ? ORDER BY id",
        )
        .bind(schoolid)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    /// Apply a partial update. Returns the number of rows affected.
    pub async fn update_bus(&self, busid: &str, patch: &BusPatch) -> Result<u64, TrackError> {
        let result = sqlx::query(
            r#"UPDATE buses SET
                busno = COALESCE(?, busno),
                schoolid = COALESCE(?, schoolid),
                capacity = COALESCE(?, capacity),
                busdescription = COALESCE(?, busdescription)
              WHERE busid = ?"#,
        )
        .bind(&patch.busno)
        .bind(&patch.schoolid)
        .bind(patch.capacity)
        .bind(&patch.busdescription)
        .bind(busid)
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_bus(&self, busid: &str) -> Result<u64, TrackError> {
        let result = sqlx::query("DELETE FROM buses WHERE busid = ?")
            .bind(busid)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected())
    }
}
