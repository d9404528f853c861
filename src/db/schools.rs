use crate::db::models::{NewSchool, School};
use crate::db::sqlite::TrackStorage;
use crate::error::TrackError;

const SCHOOL_COLUMNS: &str =
    "schoolid, name, email_mobile, website, address, location, created_at";

impl TrackStorage {
    pub async fn insert_school(&self, school: &NewSchool) -> Result<(), TrackError> {
        sqlx::query(
            r#"INSERT INTO schools (schoolid, name, email_mobile, website, address, location)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&school.schoolid)
        .bind(&school.name)
        .bind(&school.email_mobile)
        .bind(&school.website)
        .bind(&school.address)
        .bind(&school.location)
        .execute(self.pool())
        .await
        .map_err(|e| TrackError::from_insert(e, "Email or mobile already registered"))?;
        Ok(())
    }

    pub async fn find_school_by_contact(
        &self,
        email_mobile: &str,
    ) -> Result<Option<School>, TrackError> {
        let row = sqlx::query_as::<_, School>(&format!(
            "SELECT {SCHOOL_COLUMNS} FROM schools WHERE email_mobile = ? LIMIT 1"
        ))
        .bind(email_mobile)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    pub async fn list_schools(&self) -> Result<Vec<School>, TrackError> {
        let rows = sqlx::query_as::<_, School>(&format!(
            "SELECT {SCHOOL_COLUMNS} FROM schools ORDER BY id"
        ))
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }
}
