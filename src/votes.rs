//! # Vote Store
//!
//! Client for the hosted vote table.
//!
//! Every decision is forwarded best-effort as one row of
//! `votes(scenario_id, decision, session_uuid)`; aggregate tallies come
//! back as exact row counts. The table is reached over its REST API with
//! an API key that allows anonymous insert and anonymous aggregate select.
//!
//! The store is optional. Without `VOTE_STORE_URL`/`VOTE_STORE_KEY` every
//! call returns [`VoteStoreError::Disabled`] and the quiz keeps recording
//! decisions locally. Callers must never surface these errors to the user.
use async_trait::async_trait;
use reqwest::{Client, StatusCode, header::CONTENT_RANGE};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::config::VoteStoreConfig;

/// One forwarded decision. Written to the external table, never read back
/// individually.
#[derive(Debug, Serialize)]
pub struct VoteRecord {
    pub scenario_id: u32,
    pub decision: bool,
    pub session_uuid: Uuid,
}

/// Aggregate yes/no counts for one scenario across all sessions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoteTally {
    pub yes_count: u64,
    pub no_count: u64,
}

#[derive(Error, Debug)]
pub enum VoteStoreError {
    #[error("vote store is not configured")]
    Disabled,

    #[error("vote store returned status {0}")]
    HttpStatus(StatusCode),

    #[error("vote store response missing row count")]
    MissingCount,

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// The external collaborator seam: insert one vote, count votes for one
/// scenario and answer.
#[async_trait]
pub trait VoteSink: Send + Sync {
    async fn insert_vote(&self, record: &VoteRecord) -> Result<(), VoteStoreError>;

    async fn count_votes(&self, scenario_id: u32, decision: bool) -> Result<u64, VoteStoreError>;
}

pub struct RemoteVoteStore {
    client: Client,
    config: Option<VoteStoreConfig>,
}

impl RemoteVoteStore {
    pub fn new(config: Option<VoteStoreConfig>) -> Self {
        let mut builder = Client::builder();

        if let Some(config) = &config {
            builder = builder.timeout(config.timeout);
        }

        Self {
            client: builder.build().expect("HTTP client misconfigured!"),
            config,
        }
    }

    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    fn table_url(config: &VoteStoreConfig) -> String {
        format!(
            "{}/rest/v1/{}",
            config.base_url.trim_end_matches('/'),
            config.table
        )
    }
}

#[async_trait]
impl VoteSink for RemoteVoteStore {
    async fn insert_vote(&self, record: &VoteRecord) -> Result<(), VoteStoreError> {
        let config = self.config.as_ref().ok_or(VoteStoreError::Disabled)?;

        let response = self
            .client
            .post(Self::table_url(config))
            .header("apikey", &config.api_key)
            .bearer_auth(&config.api_key)
            .json(record)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(VoteStoreError::HttpStatus(response.status()));
        }

        Ok(())
    }

    async fn count_votes(
        &self,
        scenario_id: u32,
        decision: bool,
    ) -> Result<u64, VoteStoreError> {
        let config = self.config.as_ref().ok_or(VoteStoreError::Disabled)?;

        // Exact row count via the content-range header, no rows transferred.
        let response = self
            .client
            .get(Self::table_url(config))
            .query(&[
                ("scenario_id", format!("eq.{scenario_id}")),
                ("decision", format!("eq.{decision}")),
                ("select", "session_uuid".to_string()),
            ])
            .header("apikey", &config.api_key)
            .bearer_auth(&config.api_key)
            .header("Prefer", "count=exact")
            .header("Range", "0-0")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(VoteStoreError::HttpStatus(response.status()));
        }

        #[cfg(feature = "verbose")]
        tracing::info!("Tally response headers: {:?}", response.headers());

        response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_content_range)
            .ok_or(VoteStoreError::MissingCount)
    }
}

/// Fetches both counts for one scenario, degrading each to 0 on failure.
pub async fn tally<S: VoteSink + ?Sized>(sink: &S, scenario_id: u32) -> VoteTally {
    VoteTally {
        yes_count: count_or_zero(sink, scenario_id, true).await,
        no_count: count_or_zero(sink, scenario_id, false).await,
    }
}

async fn count_or_zero<S: VoteSink + ?Sized>(sink: &S, scenario_id: u32, decision: bool) -> u64 {
    sink.count_votes(scenario_id, decision)
        .await
        .unwrap_or_else(|e| {
            warn!("Tally fetch failed for scenario {scenario_id}: {e}");
            0
        })
}

/// Extracts the total after the slash of a `content-range` value such as
/// `0-0/42` or `*/0`.
fn parse_content_range(value: &str) -> Option<u64> {
    value.rsplit('/').next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingSink;

    #[async_trait]
    impl VoteSink for FailingSink {
        async fn insert_vote(&self, _record: &VoteRecord) -> Result<(), VoteStoreError> {
            Err(VoteStoreError::HttpStatus(StatusCode::SERVICE_UNAVAILABLE))
        }

        async fn count_votes(
            &self,
            _scenario_id: u32,
            _decision: bool,
        ) -> Result<u64, VoteStoreError> {
            Err(VoteStoreError::HttpStatus(StatusCode::SERVICE_UNAVAILABLE))
        }
    }

    #[test]
    fn test_parse_content_range() {
        assert_eq!(parse_content_range("0-0/42"), Some(42));
        assert_eq!(parse_content_range("*/0"), Some(0));
        assert_eq!(parse_content_range("0-24/3573"), Some(3573));
        assert_eq!(parse_content_range("garbage"), None);
        assert_eq!(parse_content_range("0-0/many"), None);
    }

    #[tokio::test]
    async fn test_unconfigured_store_disabled() {
        let store = RemoteVoteStore::new(None);

        assert!(!store.enabled());
        assert!(matches!(
            store
                .insert_vote(&VoteRecord {
                    scenario_id: 1,
                    decision: true,
                    session_uuid: Uuid::new_v4(),
                })
                .await,
            Err(VoteStoreError::Disabled)
        ));
        assert!(matches!(
            store.count_votes(1, true).await,
            Err(VoteStoreError::Disabled)
        ));
    }

    #[tokio::test]
    async fn test_tally_degrades_to_zero() {
        assert_eq!(tally(&FailingSink, 1).await, VoteTally::default());
    }
}
