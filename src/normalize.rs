//! Provider record normalization.
//!
//! FotMob field types drift between match states (ids as numbers or numeric
//! strings, scores absent before kickoff, flags as bools or strings), so all
//! shape assumptions live in [`RawMatch::parse`]. [`normalize_match`] only
//! applies defaults and derives the status.

use serde_json::Value;

use crate::model::{MatchRecord, MatchStatus, TeamRecord};

/// One side of a provider match, with every field optional
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTeam {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub score: Option<i32>,
}

/// Provider match record after defensive field extraction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMatch {
    pub id: Option<i64>,
    pub home: RawTeam,
    pub away: RawTeam,
    pub cancelled: Option<bool>,
    pub finished: Option<bool>,
    pub started: Option<bool>,
    pub utc_time: Option<String>,
    /// Combined "H - A" score string, used when neither side has a score
    pub score_str: Option<String>,
    pub round_name: Option<String>,
}

impl RawMatch {
    pub fn parse(value: &Value) -> Self {
        let status = value.get("status");
        let status_field = |key: &str| status.and_then(|s| s.get(key));

        Self {
            id: value.get("id").and_then(parse_i64_value),
            home: value.get("home").map(RawTeam::parse).unwrap_or_default(),
            away: value.get("away").map(RawTeam::parse).unwrap_or_default(),
            cancelled: status_field("cancelled").and_then(parse_flag),
            finished: status_field("finished").and_then(parse_flag),
            started: status_field("started").and_then(parse_flag),
            utc_time: status_field("utcTime")
                .or_else(|| value.get("utcTime"))
                .and_then(non_empty_str),
            score_str: status_field("scoreStr").and_then(non_empty_str),
            round_name: value
                .get("roundName")
                .and_then(value_to_string)
                .or_else(|| value.get("round").and_then(value_to_string)),
        }
    }
}

impl RawTeam {
    pub fn parse(value: &Value) -> Self {
        Self {
            id: value.get("id").and_then(parse_i64_value),
            name: value.get("name").and_then(non_empty_str),
            short_name: value.get("shortName").and_then(non_empty_str),
            score: value.get("score").and_then(parse_score),
        }
    }

    fn into_team(self, id: i64) -> TeamRecord {
        let name = self.name.unwrap_or_else(|| id.to_string());
        TeamRecord::new(id, name, self.short_name)
    }
}

/// Why a record could not be turned into rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingMatchId,
    MissingHomeTeamId,
    MissingAwayTeamId,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            SkipReason::MissingMatchId => "missing match id",
            SkipReason::MissingHomeTeamId => "missing home team id",
            SkipReason::MissingAwayTeamId => "missing away team id",
        };
        f.write_str(reason)
    }
}

/// Rows produced from one provider match
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedMatch {
    pub home: TeamRecord,
    pub away: TeamRecord,
    pub record: MatchRecord,
}

pub fn normalize_match(value: &Value) -> Result<NormalizedMatch, SkipReason> {
    let raw = RawMatch::parse(value);

    // Without both team ids the match row would violate its foreign keys
    let home_id = raw.home.id.ok_or(SkipReason::MissingHomeTeamId)?;
    let away_id = raw.away.id.ok_or(SkipReason::MissingAwayTeamId)?;
    let id = raw.id.ok_or(SkipReason::MissingMatchId)?;

    let (home_score, away_score) = match (raw.home.score, raw.away.score) {
        (None, None) => raw
            .score_str
            .as_deref()
            .and_then(parse_score_str)
            .unwrap_or((0, 0)),
        (home, away) => (home.unwrap_or(0), away.unwrap_or(0)),
    };

    let status = MatchStatus::from_flags(
        raw.cancelled.unwrap_or(false),
        raw.finished.unwrap_or(false),
        raw.started.unwrap_or(false),
    );

    Ok(NormalizedMatch {
        home: raw.home.into_team(home_id),
        away: raw.away.into_team(away_id),
        record: MatchRecord {
            id,
            home_team_id: home_id,
            away_team_id: away_id,
            start_time: raw.utc_time,
            home_score,
            away_score,
            status,
            round_name: raw.round_name.unwrap_or_default(),
        },
    })
}

fn parse_i64_value(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        Some(n)
    } else if let Some(s) = value.as_str() {
        s.trim().parse().ok()
    } else {
        None
    }
}

/// Coerce a score to a non-negative integer; anything else is `None`.
pub fn parse_score(value: &Value) -> Option<i32> {
    let n = if let Some(n) = value.as_i64() {
        n
    } else if let Some(f) = value.as_f64() {
        if f.fract() != 0.0 {
            return None;
        }
        f as i64
    } else if let Some(s) = value.as_str() {
        s.trim().parse::<i64>().ok()?
    } else {
        return None;
    };

    Some(i32::try_from(n.max(0)).unwrap_or(i32::MAX))
}

/// Parse FotMob's "2 - 1" combined score.
fn parse_score_str(s: &str) -> Option<(i32, i32)> {
    let (home, away) = s.split_once('-')?;
    let home = parse_score(&Value::String(home.to_string()))?;
    let away = parse_score(&Value::String(away.to_string()))?;
    Some((home, away))
}

fn parse_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn non_empty_str(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn value_to_string(value: &Value) -> Option<String> {
    if let Some(n) = value.as_i64() {
        Some(n.to_string())
    } else {
        non_empty_str(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn with_status(status: Value) -> Value {
        json!({
            "id": 1,
            "home": { "id": 10, "name": "A" },
            "away": { "id": 20, "name": "B" },
            "status": status,
        })
    }

    #[test]
    fn status_truth_table() {
        let cases = [
            (json!({ "cancelled": true }), MatchStatus::Cancelled),
            (json!({ "cancelled": true, "finished": true, "started": true }), MatchStatus::Cancelled),
            (json!({ "finished": true, "started": true }), MatchStatus::Finished),
            (json!({ "started": true }), MatchStatus::Live),
            (json!({ "started": false, "finished": false }), MatchStatus::Scheduled),
            (json!({}), MatchStatus::Scheduled),
        ];

        for (status, expected) in cases {
            let normalized = normalize_match(&with_status(status.clone())).unwrap();
            assert_eq!(normalized.record.status, expected, "status flags: {}", status);
        }
    }

    #[test]
    fn missing_status_object_is_scheduled() {
        let value = json!({ "id": 1, "home": { "id": 10 }, "away": { "id": 20 } });
        assert_eq!(normalize_match(&value).unwrap().record.status, MatchStatus::Scheduled);
    }

    #[test]
    fn string_flags_are_accepted() {
        let value = with_status(json!({ "started": "true", "finished": "FALSE", "cancelled": 0 }));
        assert_eq!(normalize_match(&value).unwrap().record.status, MatchStatus::Live);
    }

    #[test]
    fn score_coercion() {
        assert_eq!(parse_score(&json!("2")), Some(2));
        assert_eq!(parse_score(&json!(3)), Some(3));
        assert_eq!(parse_score(&json!(" 4 ")), Some(4));
        assert_eq!(parse_score(&json!(1.0)), Some(1));
        assert_eq!(parse_score(&json!("N/A")), None);
        assert_eq!(parse_score(&json!(null)), None);
        assert_eq!(parse_score(&json!(-1)), Some(0));
    }

    #[test]
    fn unparseable_scores_default_to_zero() {
        let value = json!({
            "id": 1,
            "home": { "id": 10, "score": "N/A" },
            "away": { "id": 20, "score": null },
        });
        let record = normalize_match(&value).unwrap().record;
        assert_eq!((record.home_score, record.away_score), (0, 0));

        let value = json!({
            "id": 1,
            "home": { "id": 10, "score": "2" },
            "away": { "id": 20, "score": 3 },
        });
        let record = normalize_match(&value).unwrap().record;
        assert_eq!((record.home_score, record.away_score), (2, 3));
    }

    #[test]
    fn combined_score_string_is_a_fallback() {
        let value = with_status(json!({ "finished": true, "scoreStr": "2 - 1" }));
        let record = normalize_match(&value).unwrap().record;
        assert_eq!((record.home_score, record.away_score), (2, 1));

        let value = with_status(json!({ "scoreStr": "vs" }));
        let record = normalize_match(&value).unwrap().record;
        assert_eq!((record.home_score, record.away_score), (0, 0));
    }

    #[test]
    fn missing_team_ids_skip_the_record() {
        let no_home = json!({ "id": 1, "home": { "name": "A" }, "away": { "id": 20 } });
        assert_eq!(normalize_match(&no_home), Err(SkipReason::MissingHomeTeamId));

        let no_away = json!({ "id": 1, "home": { "id": 10 } });
        assert_eq!(normalize_match(&no_away), Err(SkipReason::MissingAwayTeamId));

        let bad_id = json!({ "id": 1, "home": { "id": "abc" }, "away": { "id": 20 } });
        assert_eq!(normalize_match(&bad_id), Err(SkipReason::MissingHomeTeamId));
    }

    #[test]
    fn missing_match_id_skips_the_record() {
        let value = json!({ "home": { "id": 10 }, "away": { "id": 20 } });
        assert_eq!(normalize_match(&value), Err(SkipReason::MissingMatchId));
    }

    #[test]
    fn string_ids_and_team_fields() {
        let value = json!({
            "id": "4506263",
            "home": { "id": "6576", "name": "Club América", "shortName": "América" },
            "away": { "id": 7807 },
            "roundName": 3,
            "status": { "utcTime": "2025-01-11T01:00:00Z" },
        });
        let normalized = normalize_match(&value).unwrap();

        assert_eq!(normalized.record.id, 4506263);
        assert_eq!(normalized.home.id, 6576);
        assert_eq!(normalized.home.short_name, "América");
        assert_eq!(
            normalized.home.logo_url,
            "https://images.fotmob.com/image_resources/logo/teamlogo/6576.png"
        );
        assert_eq!(normalized.away.name, "7807");
        assert_eq!(normalized.away.short_name, "7807");
        assert_eq!(normalized.record.round_name, "3");
        assert_eq!(normalized.record.start_time.as_deref(), Some("2025-01-11T01:00:00Z"));
    }

    #[test]
    fn optional_fields_default() {
        let value = json!({ "id": 9, "home": { "id": 10 }, "away": { "id": 20 }, "round": "Jornada 2" });
        let record = normalize_match(&value).unwrap().record;
        assert_eq!(record.start_time, None);
        assert_eq!(record.round_name, "Jornada 2");

        let value = json!({ "id": 9, "home": { "id": 10 }, "away": { "id": 20 }, "utcTime": "2025-02-01T02:00:00Z" });
        let record = normalize_match(&value).unwrap().record;
        assert_eq!(record.start_time.as_deref(), Some("2025-02-01T02:00:00Z"));
        assert_eq!(record.round_name, "");
    }

    #[test]
    fn raw_parse_tolerates_non_object_input() {
        assert_eq!(RawMatch::parse(&json!("garbage")), RawMatch::default());
        assert_eq!(normalize_match(&json!(null)), Err(SkipReason::MissingHomeTeamId));
    }
}
