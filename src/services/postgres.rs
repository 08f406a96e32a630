use serde_json::Value;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

use crate::models::RawProfile;
use crate::services::sessions::{session_user_ids, NewSession};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
}

/// PostgreSQL client for the profile and session tables
///
/// Loads the raw profile pool before a matching run and persists the
/// resulting sessions afterwards. The matching engine never touches it.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Load every stored profile in a stable order
    ///
    /// Order matters: the matching engine breaks ties by input position.
    pub async fn load_profiles(&self) -> Result<Vec<RawProfile>, PostgresError> {
        let query = r#"
            SELECT id, first_name, last_name, nickname, age, gender, gender_preference,
                   year, year_preference, age_preference, opento, approved, ismatched,
                   interests
            FROM profiles
            ORDER BY created_at ASC, id ASC
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;

        let profiles = rows
            .iter()
            .map(profile_from_row)
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        tracing::debug!("Loaded {} profiles", profiles.len());

        Ok(profiles)
    }

    /// Insert sessions and mark their users matched, atomically
    ///
    /// Returns the number of profiles flipped to matched.
    pub async fn persist_matches(&self, sessions: &[NewSession]) -> Result<u64, PostgresError> {
        if sessions.is_empty() {
            return Ok(0);
        }

        let insert = r#"
            INSERT INTO sessions (id, user_a, user_b, nickname_a, nickname_b,
                                  message_count, status, start_time, end_time)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#;

        let update = r#"
            UPDATE profiles
            SET ismatched = TRUE, onboarding_step = 'matched'
            WHERE id = ANY($1)
        "#;

        let mut tx = self.pool.begin().await?;

        for session in sessions {
            sqlx::query(insert)
                .bind(session.id)
                .bind(&session.user_a)
                .bind(&session.user_b)
                .bind(&session.nickname_a)
                .bind(&session.nickname_b)
                .bind(session.message_count)
                .bind(&session.status)
                .bind(session.start_time)
                .bind(session.end_time)
                .execute(&mut *tx)
                .await?;
        }

        let user_ids = session_user_ids(sessions);
        let updated = sqlx::query(update)
            .bind(&user_ids)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        tracing::info!(
            "Persisted {} sessions, marked {} profiles matched",
            sessions.len(),
            updated
        );

        Ok(updated)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

fn profile_from_row(row: &PgRow) -> Result<RawProfile, sqlx::Error> {
    Ok(RawProfile {
        id: row.try_get("id")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        nickname: row.try_get("nickname")?,
        age: row.try_get("age")?,
        gender: row.try_get("gender")?,
        gender_preference: row.try_get("gender_preference")?,
        year: row.try_get("year")?,
        year_preference: row.try_get("year_preference")?,
        age_preference: row.try_get("age_preference")?,
        opento: row.try_get("opento")?,
        approved: row.try_get("approved")?,
        ismatched: row.try_get("ismatched")?,
        interests: row
            .try_get::<Option<Value>, _>("interests")?
            .unwrap_or(Value::Null),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PostgresError::from(sqlx::Error::RowNotFound);
        assert!(err.to_string().starts_with("SQLx error"));
    }
}
