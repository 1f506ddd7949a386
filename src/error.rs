//! Errors that can end a sync run.
//!
//! Record-level defects never show up here; the normalizer absorbs them as
//! defaults or skips.

use thiserror::Error;

/// Failure acquiring the provider payload
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("provider response is not valid JSON")]
    Decode(#[from] serde_json::Error),
}

/// Failure writing to the destination store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error")]
    Database(#[from] sqlx::Error),

    #[error("write rejected: {0}")]
    Rejected(String),
}

/// A fatal run failure; surfaces at the process boundary as a non-zero exit
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to fetch matches")]
    Fetch(#[from] FetchError),

    #[error("failed to upsert {entity} {id}")]
    Store {
        entity: &'static str,
        id: i64,
        #[source]
        source: StoreError,
    },
}
