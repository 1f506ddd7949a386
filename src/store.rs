//! Destination store seam and the in-memory backend used for dry runs.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::model::{MatchRecord, TeamRecord};

/// Upsert-capable `teams` and `matches` tables.
///
/// Both writes are insert-or-replace by primary key and must be idempotent.
#[async_trait]
pub trait MatchStore {
    async fn upsert_team(&self, team: &TeamRecord) -> Result<(), StoreError>;
    async fn upsert_match(&self, record: &MatchRecord) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: MatchStore + Send + Sync + ?Sized> MatchStore for &S {
    async fn upsert_team(&self, team: &TeamRecord) -> Result<(), StoreError> {
        (**self).upsert_team(team).await
    }

    async fn upsert_match(&self, record: &MatchRecord) -> Result<(), StoreError> {
        (**self).upsert_match(record).await
    }
}

#[derive(Debug, Default)]
struct Tables {
    teams: BTreeMap<i64, TeamRecord>,
    matches: BTreeMap<i64, MatchRecord>,
}

/// In-memory tables with the same key and foreign-key rules as Postgres
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn teams(&self) -> Vec<TeamRecord> {
        self.lock().teams.values().cloned().collect()
    }

    pub fn matches(&self) -> Vec<MatchRecord> {
        self.lock().matches.values().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        // A poisoned lock still holds consistent maps; every write is a single insert
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl MatchStore for MemoryStore {
    async fn upsert_team(&self, team: &TeamRecord) -> Result<(), StoreError> {
        self.lock().teams.insert(team.id, team.clone());
        Ok(())
    }

    async fn upsert_match(&self, record: &MatchRecord) -> Result<(), StoreError> {
        let mut tables = self.lock();
        for team_id in [record.home_team_id, record.away_team_id] {
            if !tables.teams.contains_key(&team_id) {
                return Err(StoreError::Rejected(format!(
                    "match {} references unknown team {}",
                    record.id, team_id
                )));
            }
        }
        tables.matches.insert(record.id, record.clone());
        Ok(())
    }
}
