use crate::db::models::{Leg, NewStudent, Student};
use crate::db::sqlite::TrackStorage;
use crate::error::TrackError;

const STUDENT_COLUMNS: &str = "student_id, parentid, name, date_of_birth, address, \
    home_coordinates, school_id, school_name, morning_pick, morning_drop, evening_pick, \
    evening_drop, morningbus, eveningbus, photo, verified";

impl TrackStorage {
    pub async fn insert_student(&self, s: &NewStudent) -> Result<(), TrackError> {
        sqlx::query(
            r#"INSERT INTO students (
                student_id, parentid, name, date_of_birth, address, home_coordinates,
                school_id, school_name, morning_pick, morning_drop, evening_pick, evening_drop,
                photo, verified
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&s.student_id)
        .bind(&s.parentid)
        .bind(&s.name)
        .bind(&s.date_of_birth)
        .bind(&s.address)
        .bind(&s.home_coordinates)
        .bind(&s.school_id)
        .bind(&s.school_name)
        .bind(&s.morning_pick)
        .bind(&s.morning_drop)
        .bind(&s.evening_pick)
        .bind(&s.evening_drop)
        .bind(&s.photo)
        .bind(s.verified)
        .execute(self.pool())
        .await
        .map_err(|e| TrackError::from_insert(e, "Student id already exists"))?;
        Ok(())
    }

    pub async fn students_by_parent(&self, parentid: &str) -> Result<Vec<Student>, TrackError> {
        let rows = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE parentid = ? ORDER BY id"
        ))
        .bind(parentid)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    /// Students of a school filtered on the raw `verified` column value.
    pub async fn students_by_school(
        &self,
        school_id: &str,
        verified: bool,
    ) -> Result<Vec<Student>, TrackError> {
        let rows = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE school_id = ? AND verified = ? ORDER BY id"
        ))
        .bind(school_id)
        .bind(verified)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    pub async fn students_on_bus(&self, leg: Leg, busid: &str) -> Result<Vec<Student>, TrackError> {
        let column = match leg {
            Leg::Morning => "morningbus",
            Leg::Evening => "eveningbus",
        };
        let rows = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE {column} = ? ORDER BY id"
        ))
        .bind(busid)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    /// Distinct parent identities of the students riding `busid` in the morning.
    pub async fn parents_on_morning_bus(&self, busid: &str) -> Result<Vec<String>, TrackError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT parentid FROM students WHERE morningbus = ? AND parentid IS NOT NULL",
        )
        .bind(busid)
        .fetch_all(self.pool())
        .await?;
        Ok(rows.into_iter().map(|(p,)| p).collect())
    }

    pub async fn delete_student(&self, student_id: &str, parentid: &str) -> Result<u64, TrackError> {
        let result = sqlx::query("DELETE FROM students WHERE student_id = ? AND parentid = ?")
            .bind(student_id)
            .bind(parentid)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn set_student_verified(
        &self,
        student_id: &str,
        verified: bool,
    ) -> Result<u64, TrackError> {
        let result = sqlx::query("UPDATE students SET verified = ? WHERE student_id = ?")
            .bind(verified)
            .bind(student_id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected())
    }

    /// Assign both legs (absent legs are cleared) and reset `verified` to 0.
    pub async fn assign_student_buses(
        &self,
        student_id: &str,
        morningbus: Option<&str>,
        eveningbus: Option<&str>,
    ) -> Result<u64, TrackError> {
        let result = sqlx::query(
            "UPDATE students SET verified = 0, morningbus = ?, eveningbus = ? WHERE student_id = ?",
        )
        .bind(morningbus)
        .bind(eveningbus)
        .bind(student_id)
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected())
    }
}
