//! Internal records mirrored into the `teams` and `matches` tables.

use serde::{Deserialize, Serialize};

/// Team crest location; FotMob serves every crest under the team id.
pub const TEAM_LOGO_URL_TEMPLATE: &str =
    "https://images.fotmob.com/image_resources/logo/teamlogo/{id}.png";

/// Row of the `teams` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub id: i64,
    pub name: String,
    pub short_name: String,
    pub logo_url: String,
}

impl TeamRecord {
    /// Build a team, defaulting `short_name` to `name` and deriving the logo from `id`.
    pub fn new(id: i64, name: String, short_name: Option<String>) -> Self {
        let short_name = short_name.unwrap_or_else(|| name.clone());
        Self {
            id,
            name,
            short_name,
            logo_url: team_logo_url(id),
        }
    }
}

pub fn team_logo_url(team_id: i64) -> String {
    TEAM_LOGO_URL_TEMPLATE.replace("{id}", &team_id.to_string())
}

/// Normalized match state. Stored as its lowercase name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Live,
    Finished,
    Cancelled,
}

impl MatchStatus {
    /// Derive the status from the provider's raw flags.
    /// Cancellation overrides everything, then finished, then started.
    pub fn from_flags(cancelled: bool, finished: bool, started: bool) -> Self {
        if cancelled {
            MatchStatus::Cancelled
        } else if finished {
            MatchStatus::Finished
        } else if started {
            MatchStatus::Live
        } else {
            MatchStatus::Scheduled
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::Live => "live",
            MatchStatus::Finished => "finished",
            MatchStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row of the `matches` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: i64,
    pub home_team_id: i64,
    pub away_team_id: i64,
    /// Provider UTC timestamp, passed through untouched
    pub start_time: Option<String>,
    pub home_score: i32,
    pub away_score: i32,
    pub status: MatchStatus,
    pub round_name: String,
}
