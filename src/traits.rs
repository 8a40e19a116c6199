use crate::types::{ControlCommand, RawItem, Result};
use async_trait::async_trait;

/// Trait for fetching raw items from a feed address (RSS/Atom over HTTP in
/// production, scripted fixtures in tests).
#[async_trait]
pub trait FetchFeed: Send + Sync {
    /// Fetch the current list of items for a feed address, in feed order.
    ///
    /// Errors are per-feed recoverable: the ingestion loop reports them and
    /// moves on to the next feed.
    async fn fetch(&self, url: &str) -> Result<Vec<RawItem>>;
}

/// Trait for the external command channel that drives a run.
#[async_trait]
pub trait CommandSource: Send {
    /// Wait for the next command. Used while idle.
    ///
    /// An error here means the underlying channel is gone and is fatal to
    /// the run.
    async fn next_command(&mut self) -> Result<ControlCommand>;

    /// Check for a pending command without blocking. Used mid-extraction.
    fn poll_command(&mut self) -> Result<Option<ControlCommand>>;
}
