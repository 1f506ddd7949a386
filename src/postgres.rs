//! Postgres backend for the `teams` and `matches` tables.

use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::error::StoreError;
use crate::model::{MatchRecord, TeamRecord};
use crate::store::MatchStore;

const CREATE_TEAMS: &str = r#"
CREATE TABLE IF NOT EXISTS teams (
    id          BIGINT PRIMARY KEY,
    name        TEXT NOT NULL,
    short_name  TEXT NOT NULL,
    logo_url    TEXT NOT NULL
)
"#;

const CREATE_MATCHES: &str = r#"
CREATE TABLE IF NOT EXISTS matches (
    id            BIGINT PRIMARY KEY,
    home_team_id  BIGINT NOT NULL REFERENCES teams (id),
    away_team_id  BIGINT NOT NULL REFERENCES teams (id),
    start_time    TIMESTAMPTZ,
    home_score    INTEGER NOT NULL DEFAULT 0 CHECK (home_score >= 0),
    away_score    INTEGER NOT NULL DEFAULT 0 CHECK (away_score >= 0),
    status        TEXT NOT NULL
                  CHECK (status IN ('scheduled', 'live', 'finished', 'cancelled')),
    round_name    TEXT NOT NULL DEFAULT ''
)
"#;

pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn connect(url: &str) -> Result<Self> {
        let db = Self::connect_with_retry(url, 5).await?;
        Ok(Self::new(db))
    }

    async fn connect_with_retry(url: &str, max_retries: u32) -> Result<PgPool> {
        let mut attempt = 0;
        loop {
            match PgPoolOptions::new()
                .max_connections(2)
                .acquire_timeout(Duration::from_secs(10))
                .connect(url)
                .await
            {
                Ok(pool) => {
                    info!("Connected to PostgreSQL");
                    return Ok(pool);
                }
                Err(e) => {
                    attempt += 1;
                    if attempt >= max_retries {
                        return Err(anyhow!(
                            "Failed to connect to database after {} attempts: {}",
                            max_retries,
                            e
                        ));
                    }
                    warn!("Database connection attempt {} failed: {}. Retrying...", attempt, e);
                    tokio::time::sleep(Duration::from_secs(2u64.pow(attempt))).await;
                }
            }
        }
    }

    /// Create `teams` and `matches` if they do not exist yet
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TEAMS).execute(&self.db).await?;
        sqlx::query(CREATE_MATCHES).execute(&self.db).await?;
        info!("Schema ready (teams, matches)");
        Ok(())
    }
}

#[async_trait]
impl MatchStore for PgStore {
    async fn upsert_team(&self, team: &TeamRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO teams (id, name, short_name, logo_url)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                short_name = EXCLUDED.short_name,
                logo_url = EXCLUDED.logo_url
            "#,
        )
        .bind(team.id)
        .bind(&team.name)
        .bind(&team.short_name)
        .bind(&team.logo_url)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn upsert_match(&self, record: &MatchRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO matches (
                id, home_team_id, away_team_id, start_time,
                home_score, away_score, status, round_name
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                home_team_id = EXCLUDED.home_team_id,
                away_team_id = EXCLUDED.away_team_id,
                start_time = EXCLUDED.start_time,
                home_score = EXCLUDED.home_score,
                away_score = EXCLUDED.away_score,
                status = EXCLUDED.status,
                round_name = EXCLUDED.round_name
            "#,
        )
        .bind(record.id)
        .bind(record.home_team_id)
        .bind(record.away_team_id)
        .bind(start_time_column(record))
        .bind(record.home_score)
        .bind(record.away_score)
        .bind(record.status.as_str())
        .bind(&record.round_name)
        .execute(&self.db)
        .await?;

        Ok(())
    }
}

/// The provider time is passed through as text; Postgres needs a real
/// timestamp, so parse it here and store NULL if it is not RFC 3339.
fn start_time_column(record: &MatchRecord) -> Option<DateTime<Utc>> {
    let raw = record.start_time.as_deref()?;
    match parse_start_time(raw) {
        Some(t) => Some(t),
        None => {
            warn!("Match {}: unparseable start time '{}', storing NULL", record.id, raw);
            None
        }
    }
}

fn parse_start_time(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn start_time_accepts_utc_and_offset_forms() {
        let expected = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_start_time("2025-01-01T00:00:00Z"), Some(expected));
        assert_eq!(parse_start_time("2025-01-01T00:00:00.000Z"), Some(expected));
        assert_eq!(parse_start_time("2024-12-31T18:00:00-06:00"), Some(expected));
    }

    #[test]
    fn start_time_rejects_local_formats() {
        assert_eq!(parse_start_time("31.12.2024 18:00"), None);
        assert_eq!(parse_start_time(""), None);
    }
}
