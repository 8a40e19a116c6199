pub mod aggregator;
pub mod control;
pub mod fetcher;
pub mod ingestion;
pub mod keywords;
pub mod similarity;
pub mod traits;
pub mod types;

pub use aggregator::{StoryAggregator, DEFAULT_MERGE_THRESHOLD};
pub use control::{ChannelCommandSource, ControlStateMachine, RunState};
pub use fetcher::{FetchConfig, HttpFeedFetcher};
pub use ingestion::FeedIngestionLoop;
pub use keywords::KeywordExtractor;
pub use similarity::SimilarityEngine;
pub use traits::{CommandSource, FetchFeed};
pub use types::*;
