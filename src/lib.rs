//! Liga MX fixture sync.
//!
//! Pulls the league payload from FotMob, normalizes every match into
//! `teams`/`matches` rows, and upserts them so the tables mirror the
//! provider. Teams are always written before the matches that reference them.

pub mod config;
pub mod dedup;
pub mod error;
pub mod locator;
pub mod model;
pub mod normalize;
pub mod postgres;
pub mod provider;
pub mod store;
pub mod sync;

pub use config::Config;
pub use error::{FetchError, StoreError, SyncError};
pub use model::{MatchRecord, MatchStatus, TeamRecord};
pub use postgres::PgStore;
pub use provider::{FotmobClient, MatchFeed};
pub use store::{MatchStore, MemoryStore};
pub use sync::{RunStage, SyncRun, SyncSummary};
