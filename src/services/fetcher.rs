//! Best-effort source fetching
//!
//! Each source is retrieved independently with a bounded timeout; a
//! failure (network error, timeout, non-2xx) is logged and skipped so the
//! remaining sources still contribute to the cycle. There is no retry,
//! backoff, or circuit breaking. Sources are walked in descriptor order,
//! which makes last-write-wins merging deterministic.

use log::{info, warn};
use std::collections::HashMap;
use std::time::Duration;

use crate::services::Aggregator;
use crate::sources::{extract_gmp_records, SourceDescriptor, SourceKind};
use crate::types::{GmpRecord, Result, TrackerError};

/// Per-request timeout in seconds
const FETCH_TIMEOUT_SECS: u64 = 8;

/// Some aggregator sites reject non-browser clients
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

pub struct SourceFetcher {
    client: reqwest::Client,
}

impl SourceFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TrackerError::Fetch(format!("HTTP client error: {e}")))?;
        Ok(Self { client })
    }

    /// Fetch and normalize all GMP sources into one merged mapping.
    ///
    /// Sources are processed in order; for identifiers present in more
    /// than one source the last processed source wins.
    pub async fn fetch_gmp(&self, sources: &[SourceDescriptor]) -> HashMap<String, GmpRecord> {
        let mut per_source = Vec::new();

        for source in sources {
            if source.kind != SourceKind::HtmlTable {
                continue;
            }
            info!("fetching GMP from {}", source.url);
            match self.fetch_text(&source.url).await {
                Ok(page) => {
                    let records = extract_gmp_records(&page, &source.url);
                    info!("{}: {} rows normalized", source.url, records.len());
                    per_source.push(records);
                }
                Err(e) => warn!("skipping {}: {}", source.url, e),
            }
        }

        Aggregator::merge(per_source)
    }

    /// Fetch a JSON API source, passing the decoded payload through
    /// unchanged. `None` is the "unavailable" sentinel for any failure.
    pub async fn fetch_json(&self, url: &str) -> Option<serde_json::Value> {
        match self.fetch_json_inner(url).await {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("json source {} unavailable: {}", url, e);
                None
            }
        }
    }

    async fn fetch_json_inner(&self, url: &str) -> Result<serde_json::Value> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TrackerError::Fetch(format!("request failed: {e}")))?
            .error_for_status()
            .map_err(|e| TrackerError::Fetch(format!("bad status: {e}")))?;
        response
            .json()
            .await
            .map_err(|e| TrackerError::Parse(format!("invalid json payload: {e}")))
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TrackerError::Fetch(format!("request failed: {e}")))?
            .error_for_status()
            .map_err(|e| TrackerError::Fetch(format!("bad status: {e}")))?;
        response
            .text()
            .await
            .map_err(|e| TrackerError::Fetch(format!("body read failed: {e}")))
    }
}
