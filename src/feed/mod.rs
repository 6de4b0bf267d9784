//! Channel feed ingestion: fetch the page, extract messages, fold them.

pub mod accumulate;
pub mod date;
pub mod extract;
pub mod message;

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use svitlo_core::{Schedule, SvitloError, SvitloResult};

use accumulate::fold_messages;
use extract::extract_messages;

pub use extract::Message;

/// Public channel page the schedule announcements are published on.
pub const FEED_URL: &str = "https://t.me/s/cek_info";

/// Upper bound on one feed fetch, covering connect and body download.
const FEED_TIMEOUT: Duration = Duration::from_secs(60);

/// Fetches the announcement feed and folds it into a schedule.
///
/// One instance can serve many reconciliation runs; each run buffers the
/// whole page, rebuilds the schedule from scratch and shares nothing with
/// other runs.
pub struct ChannelFeed {
    http: reqwest::Client,
    url: String,
}

impl Default for ChannelFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelFeed {
    pub fn new() -> Self {
        Self::with_url(FEED_URL)
    }

    /// Point the feed at a different channel page (tests, other regions).
    pub fn with_url(url: impl Into<String>) -> Self {
        ChannelFeed {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// Fetch the feed and rebuild the schedule by chronological replay.
    pub async fn fetch_schedule(&self, now: DateTime<Utc>) -> SvitloResult<Schedule> {
        let body = self.fetch_raw().await?;
        let mut messages = extract_messages(&body);
        debug!(count = messages.len(), "extracted feed messages");

        // The feed renders newest first; replay oldest to newest.
        messages.reverse();
        Ok(fold_messages(messages, now))
    }

    async fn fetch_raw(&self) -> SvitloResult<String> {
        let response = self
            .http
            .get(&self.url)
            .timeout(FEED_TIMEOUT)
            .send()
            .await
            .map_err(|e| SvitloError::FeedUnavailable(e.to_string()))?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(SvitloError::FeedUnavailable(format!(
                "unexpected status {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| SvitloError::FeedUnavailable(e.to_string()))
    }
}
