use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping from normalized term to its integer weight, produced once per
/// item by the keyword extractor and never mutated afterwards.
pub type TermSet = BTreeMap<String, u32>;

/// A named set of feed addresses, processed together in their given order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedGroup {
    pub name: String,
    pub feeds: Vec<String>,
}

/// One unprocessed entry fetched from a feed. The publish date is kept as
/// the raw string; parsing it is a per-item concern of the ingestion loop.
#[derive(Debug, Clone)]
pub struct RawItem {
    pub title: String,
    pub description: String,
    pub pub_date: String,
}

/// A deduplicated story, possibly backed by items from multiple feeds.
///
/// `title` and `terms` always belong to the founding item; a merge only
/// appends to `sources`.
#[derive(Debug, Clone, Serialize)]
pub struct Story {
    pub id: u64,
    pub title: String,
    pub terms: TermSet,
    pub sources: Vec<String>,
}

/// A command delivered by the external command source.
#[derive(Debug, Clone)]
pub enum ControlCommand {
    Start {
        groups: Vec<FeedGroup>,
        reject_date: NaiveDate,
    },
    /// Anything that is not a well-formed start command. Inert at this level.
    Other,
}

#[derive(Debug, thiserror::Error)]
pub enum AggregatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Command source error: {0}")]
    CommandSource(String),

    #[error("General error: {0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, AggregatorError>;
