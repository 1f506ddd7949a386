//! FotMob league feed.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::config::Config;
use crate::error::FetchError;

/// Source of the raw league payload, fetched once per run
#[async_trait]
pub trait MatchFeed {
    async fn fetch(&self) -> Result<Value, FetchError>;
}

/// HTTP client for the FotMob league endpoint
pub struct FotmobClient {
    http_client: reqwest::Client,
    base_url: String,
    league_id: u32,
    timezone: String,
}

impl FotmobClient {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("fixture-sync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| FetchError::Transport {
                url: config.fotmob_base_url.clone(),
                source,
            })?;

        Ok(Self {
            http_client,
            base_url: config.fotmob_base_url.trim_end_matches('/').to_string(),
            league_id: config.league_id,
            timezone: config.league_timezone.clone(),
        })
    }

    fn league_url(&self) -> String {
        format!("{}/api/leagues", self.base_url)
    }
}

#[async_trait]
impl MatchFeed for FotmobClient {
    /// Fetch the league document. Any transport failure, non-2xx status, or
    /// non-JSON body is fatal for the run.
    async fn fetch(&self) -> Result<Value, FetchError> {
        let url = self.league_url();
        let transport = |source| FetchError::Transport {
            url: url.clone(),
            source,
        };

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("id", self.league_id.to_string()),
                ("type", "league".to_string()),
                ("timezone", self.timezone.clone()),
            ])
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let doc: Value = serde_json::from_str(&body)?;
        info!(
            "Fetched league {} payload from FotMob ({} bytes)",
            self.league_id,
            body.len()
        );
        Ok(doc)
    }
}
