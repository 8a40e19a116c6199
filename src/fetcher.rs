use crate::traits::FetchFeed;
use crate::types::{AggregatorError, RawItem, Result};
use async_trait::async_trait;
use backoff::{backoff::Backoff, exponential::ExponentialBackoff};
use feed_rs::parser;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_delay_seconds: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Story-Aggregator/1.0".to_string(),
            timeout_seconds: 10,
            max_retries: 2,
            retry_delay_seconds: 1,
        }
    }
}

/// Production feed fetcher: HTTP GET with bounded retries, then RSS/Atom
/// parsing. Every failure mode surfaces as a recoverable error the ingestion
/// loop can log and skip.
pub struct HttpFeedFetcher {
    client: Client,
    config: FetchConfig,
}

impl HttpFeedFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .build()?;

        Ok(Self { client, config })
    }

    async fn fetch_content(&self, url: &str) -> Result<String> {
        let mut backoff: ExponentialBackoff<backoff::SystemClock> = ExponentialBackoff {
            current_interval: Duration::from_secs(self.config.retry_delay_seconds),
            initial_interval: Duration::from_secs(self.config.retry_delay_seconds),
            max_interval: Duration::from_secs(self.config.retry_delay_seconds * 8),
            multiplier: 2.0,
            max_elapsed_time: Some(Duration::from_secs(self.config.retry_delay_seconds * 30)),
            ..Default::default()
        };

        let mut last_error = AggregatorError::Fetch("no fetch attempted".to_string());

        for attempt in 0..=self.config.max_retries {
            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response.text().await?);
                    }
                    last_error = AggregatorError::Fetch(format!(
                        "HTTP {}: {}",
                        status,
                        status.canonical_reason().unwrap_or("Unknown")
                    ));
                }
                Err(e) => {
                    // TLS and transport errors land here; they are per-feed
                    // recoverable once retries are exhausted.
                    last_error = AggregatorError::Http(e);
                }
            }

            if attempt < self.config.max_retries {
                if let Some(delay) = backoff.next_backoff() {
                    warn!("Attempt {} failed for {}, retrying in {:?}", attempt + 1, url, delay);
                    tokio::time::sleep(delay).await;
                }
            }
        }

        Err(last_error)
    }

    fn parse_items(&self, content: &str) -> Result<Vec<RawItem>> {
        let feed = parser::parse(content.as_bytes())
            .map_err(|e| AggregatorError::Parse(format!("Failed to parse feed: {}", e)))?;

        let items = feed
            .entries
            .into_iter()
            .map(|entry| RawItem {
                title: entry
                    .title
                    .map(|t| t.content)
                    .unwrap_or_else(|| "Untitled".to_string()),
                description: entry.summary.map(|s| s.content).unwrap_or_default(),
                // Downstream parsing expects RFC 2822; a missing date becomes
                // an empty string and fails the per-item date parse there.
                pub_date: entry
                    .published
                    .map(|dt| dt.to_rfc2822())
                    .unwrap_or_default(),
            })
            .collect();

        Ok(items)
    }
}

#[async_trait]
impl FetchFeed for HttpFeedFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<RawItem>> {
        Url::parse(url)?;

        debug!("Fetching feed: {}", url);
        let content = self.fetch_content(url).await?;
        let items = self.parse_items(&content)?;
        debug!("Parsed {} items from {}", items.len(), url);

        Ok(items)
    }
}
