//! Finds the match list inside a FotMob league payload.
//!
//! The same fixtures show up under different keys depending on the query
//! parameters and response mode, so the known locations are tried in order.

use serde_json::Value;
use tracing::debug;

/// Known match-list locations, highest priority first.
/// Append new fallbacks here; nothing else needs to change.
pub const MATCH_LIST_PATHS: &[(&str, &str)] = &[
    ("fixtures.allMatches", "/fixtures/allMatches"),
    ("matches.allMatches", "/matches/allMatches"),
    ("overview.leagueOverviewMatches", "/overview/leagueOverviewMatches"),
];

/// Return the first non-empty match list found, or an empty slice.
///
/// An empty result is a valid outcome ("nothing to sync"), not an error.
pub fn locate_matches(doc: &Value) -> &[Value] {
    for (name, pointer) in MATCH_LIST_PATHS {
        let Some(list) = doc.pointer(pointer).and_then(|v| v.as_array()) else {
            continue;
        };
        if !list.is_empty() {
            debug!("Located {} match records at {}", list.len(), name);
            return list;
        }
    }

    debug!("No match list found at any known path");
    &[]
}
