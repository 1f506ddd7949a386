use std::collections::HashSet;

/// Team ids already upserted during the current run.
///
/// Owned by a single run and dropped with it. Upserts are idempotent, so this
/// only saves round trips for teams that appear in many matches.
#[derive(Debug, Default)]
pub struct WrittenTeams {
    ids: HashSet<i64>,
}

impl WrittenTeams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn should_write(&self, team_id: i64) -> bool {
        !self.ids.contains(&team_id)
    }

    pub fn mark_written(&mut self, team_id: i64) {
        self.ids.insert(team_id);
    }

    /// Distinct teams written so far
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
