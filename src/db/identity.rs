use crate::db::models::{Identity, Parent};
use crate::db::sqlite::TrackStorage;
use crate::error::TrackError;
use sqlx::{QueryBuilder, Sqlite};

const IDENTITY_COLUMNS: &str =
    "userid, email_phone, otp, verified, role, token, updated_at";

impl TrackStorage {
    pub async fn find_identity(&self, email_phone: &str) -> Result<Option<Identity>, TrackError> {
        let row = sqlx::query_as::<_, Identity>(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM auth WHERE email_phone = ? LIMIT 1"
        ))
        .bind(email_phone)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    /// Insert a new identity. Returns the generated `userid`.
    pub async fn insert_identity(
        &self,
        email_phone: &str,
        otp: Option<&str>,
        verified: bool,
        role: &str,
        token: &str,
    ) -> Result<i64, TrackError> {
        let result = sqlx::query(
            "INSERT INTO auth (email_phone, otp, verified, role, token) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(email_phone)
        .bind(otp)
        .bind(verified)
        .bind(role)
        .bind(token)
        .execute(self.pool())
        .await
        .map_err(|e| TrackError::from_insert(e, "Identity already registered"))?;
        Ok(result.last_insert_rowid())
    }

    /// Replace the stored OTP and device token, bumping the timestamp.
    pub async fn store_otp(
        &self,
        email_phone: &str,
        otp: &str,
        token: &str,
    ) -> Result<(), TrackError> {
        sqlx::query(
            "UPDATE auth SET otp = ?, token = ?, updated_at = CURRENT_TIMESTAMP WHERE email_phone = ?",
        )
        .bind(otp)
        .bind(token)
        .bind(email_phone)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    pub async fn refresh_token(&self, email_phone: &str, token: &str) -> Result<(), TrackError> {
        sqlx::query(
            "UPDATE auth SET token = ?, updated_at = CURRENT_TIMESTAMP WHERE email_phone = ?",
        )
        .bind(token)
        .bind(email_phone)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    pub async fn mark_verified(&self, email_phone: &str) -> Result<(), TrackError> {
        sqlx::query(
            "UPDATE auth SET verified = 1, updated_at = CURRENT_TIMESTAMP WHERE email_phone = ?",
        )
        .bind(email_phone)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Non-null device tokens of the given identities.
    pub async fn tokens_for(&self, identities: &[String]) -> Result<Vec<String>, TrackError> {
        if identities.is_empty() {
            return Ok(Vec::new());
        }
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT token FROM auth WHERE token IS NOT NULL AND email_phone IN (");
        let mut separated = qb.separated(", ");
        for id in identities {
            separated.push_bind(id);
        }
        separated.push_unseparated(")");

        let tokens: Vec<(String,)> = qb.build_query_as().fetch_all(self.pool()).await?;
        Ok(tokens
            .into_iter()
            .map(|(t,)| t)
            .filter(|t| !t.is_empty())
            .collect())
    }

    pub async fn find_parent(&self, email_mobile: &str) -> Result<Option<Parent>, TrackError> {
        let row = sqlx::query_as::<_, Parent>(
            "SELECT id, name, email_mobile, address, created_at FROM parents WHERE email_mobile = ? LIMIT 1",
        )
        .bind(email_mobile)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }
}
