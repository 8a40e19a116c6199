use crate::aggregator::StoryAggregator;
use crate::keywords::{total_weight, KeywordExtractor};
use crate::traits::FetchFeed;
use crate::types::{FeedGroup, RawItem, Result};
use chrono::{DateTime, NaiveDate};
use tracing::{debug, info, warn};

/// Items whose total term weight is not strictly above this are discarded as
/// too short or too generic to be useful signal.
const MIN_TOTAL_WEIGHT: u32 = 2;

/// Drives extraction across all configured feeds, one (group, feed) unit per
/// `step` call, feeding surviving items into the story aggregator.
pub struct FeedIngestionLoop {
    groups: Vec<FeedGroup>,
    reject_date: NaiveDate,
    group_index: usize,
    feed_index: usize,
    extractor: KeywordExtractor,
    aggregator: StoryAggregator,
}

impl FeedIngestionLoop {
    pub fn new(groups: Vec<FeedGroup>, reject_date: NaiveDate, merge_threshold: f64) -> Self {
        let mut ingestion = Self {
            groups,
            reject_date,
            group_index: 0,
            feed_index: 0,
            extractor: KeywordExtractor::new(),
            aggregator: StoryAggregator::new(merge_threshold),
        };
        ingestion.normalize_cursor();
        ingestion
    }

    /// True once every (group, feed) pair has been processed. Also true from
    /// the start when the group list is empty or contains only empty groups.
    pub fn is_done(&self) -> bool {
        self.group_index >= self.groups.len()
    }

    /// Process exactly one feed: fetch, filter, extract, aggregate. A fetch
    /// failure skips the feed and is reported, never propagated; the cursor
    /// advances either way.
    pub async fn step(&mut self, fetcher: &dyn FetchFeed) -> Result<()> {
        let Some((group_name, feed_url)) = self.current_feed() else {
            return Ok(());
        };

        info!("Fetching and extracting keywords from: {}", feed_url);

        match fetcher.fetch(&feed_url).await {
            Ok(items) => {
                for item in items {
                    self.process_item(&item, &feed_url);
                }
            }
            Err(e) => {
                warn!("Skipping feed {} in group {}: {}", feed_url, group_name, e);
            }
        }

        self.advance_cursor();
        Ok(())
    }

    fn process_item(&mut self, item: &RawItem, feed_url: &str) {
        // Date filter: keep only items strictly newer than the reject date.
        // An unparseable date invalidates that item alone.
        let published = match DateTime::parse_from_rfc2822(&item.pub_date) {
            Ok(dt) => dt.date_naive(),
            Err(e) => {
                debug!("Skipping item with bad date {:?}: {}", item.pub_date, e);
                return;
            }
        };
        if published <= self.reject_date {
            return;
        }

        let text = format!("{}\n{}", item.title, item.description);
        let terms = self.extractor.extract(&text);

        if total_weight(&terms) <= MIN_TOTAL_WEIGHT {
            return;
        }

        info!("Extracted terms for {:?}: {:?}", item.title, terms);

        let story = self.aggregator.ingest(&item.title, terms, feed_url);
        debug!(
            "Item contributed to story {} ({} sources)",
            story.id,
            story.sources.len()
        );
    }

    fn current_feed(&self) -> Option<(String, String)> {
        let group = self.groups.get(self.group_index)?;
        let feed = group.feeds.get(self.feed_index)?;
        Some((group.name.clone(), feed.clone()))
    }

    fn advance_cursor(&mut self) {
        self.feed_index += 1;
        self.normalize_cursor();
    }

    // Skips past exhausted and empty groups so the cursor either points at a
    // real feed or runs off the end.
    fn normalize_cursor(&mut self) {
        while self.group_index < self.groups.len()
            && self.feed_index >= self.groups[self.group_index].feeds.len()
        {
            self.group_index += 1;
            self.feed_index = 0;
        }
    }

    pub fn aggregator(&self) -> &StoryAggregator {
        &self.aggregator
    }

    pub fn into_aggregator(self) -> StoryAggregator {
        self.aggregator
    }
}
