//! Sync orchestration: fetch, locate, normalize, upsert.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::dedup::WrittenTeams;
use crate::error::SyncError;
use crate::locator::locate_matches;
use crate::model::TeamRecord;
use crate::normalize::normalize_match;
use crate::provider::MatchFeed;
use crate::store::MatchStore;

/// Lifecycle of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Idle,
    Fetching,
    Locating,
    Processing,
    Completed,
    Failed,
}

/// Outcome of a completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    /// Records found in the payload
    pub located: usize,
    pub matches_written: usize,
    /// Distinct teams written
    pub teams_written: usize,
    /// Records dropped by the normalizer
    pub skipped: usize,
}

/// One sync run against a feed and a store
pub struct SyncRun<F, S> {
    feed: F,
    store: S,
    stage: RunStage,
}

impl<F: MatchFeed, S: MatchStore> SyncRun<F, S> {
    pub fn new(feed: F, store: S) -> Self {
        Self {
            feed,
            store,
            stage: RunStage::Idle,
        }
    }

    pub fn stage(&self) -> RunStage {
        self.stage
    }

    /// Execute the run. Any fetch or store failure leaves the stage at `Failed`.
    pub async fn run(&mut self) -> Result<SyncSummary, SyncError> {
        let start = Instant::now();
        let result = self.sync().await;

        match &result {
            Ok(summary) => {
                self.enter(RunStage::Completed);
                info!(
                    "Sync completed: {} matches, {} teams written ({} skipped) in {:?}",
                    summary.matches_written,
                    summary.teams_written,
                    summary.skipped,
                    start.elapsed()
                );
            }
            Err(_) => self.enter(RunStage::Failed),
        }

        result
    }

    async fn sync(&mut self) -> Result<SyncSummary, SyncError> {
        self.enter(RunStage::Fetching);
        let doc = self.feed.fetch().await?;

        self.enter(RunStage::Locating);
        let records = locate_matches(&doc);
        let mut summary = SyncSummary {
            located: records.len(),
            ..SyncSummary::default()
        };
        if records.is_empty() {
            info!("No matches found in the provider payload; nothing to sync");
            return Ok(summary);
        }

        self.enter(RunStage::Processing);
        let mut written = WrittenTeams::new();

        for (index, value) in records.iter().enumerate() {
            let normalized = match normalize_match(value) {
                Ok(n) => n,
                Err(reason) => {
                    warn!("Skipping match record #{}: {}", index, reason);
                    summary.skipped += 1;
                    continue;
                }
            };

            // Both teams must exist before the match that references them
            self.write_team(&normalized.home, &mut written).await?;
            self.write_team(&normalized.away, &mut written).await?;

            let record = &normalized.record;
            self.store
                .upsert_match(record)
                .await
                .map_err(|source| SyncError::Store {
                    entity: "match",
                    id: record.id,
                    source,
                })?;
            summary.matches_written += 1;

            info!(
                "Synced: {} vs {} [{}, {}-{}]",
                normalized.home.name,
                normalized.away.name,
                record.status,
                record.home_score,
                record.away_score
            );
        }

        summary.teams_written = written.len();
        Ok(summary)
    }

    async fn write_team(
        &self,
        team: &TeamRecord,
        written: &mut WrittenTeams,
    ) -> Result<(), SyncError> {
        if !written.should_write(team.id) {
            return Ok(());
        }

        self.store
            .upsert_team(team)
            .await
            .map_err(|source| SyncError::Store {
                entity: "team",
                id: team.id,
                source,
            })?;
        written.mark_written(team.id);
        Ok(())
    }

    fn enter(&mut self, stage: RunStage) {
        debug!("Run stage {:?} -> {:?}", self.stage, stage);
        self.stage = stage;
    }
}
