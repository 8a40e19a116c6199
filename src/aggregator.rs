use crate::similarity::SimilarityEngine;
use crate::types::{Story, TermSet};
use tracing::{debug, info};

/// Default merge threshold. The upstream system never wired a value, so the
/// choice is ours; 0.5 requires the majority of combined terms to overlap.
pub const DEFAULT_MERGE_THRESHOLD: f64 = 0.5;

/// Owns the growing collection of stories and decides, per incoming item,
/// whether it merges into an existing story or founds a new one.
///
/// The id counter lives here, not in any shared global, so id assignment is
/// serialized by whatever serializes calls to `ingest`.
pub struct StoryAggregator {
    stories: Vec<Story>,
    next_id: u64,
    merge_threshold: f64,
}

impl StoryAggregator {
    pub fn new(merge_threshold: f64) -> Self {
        Self {
            stories: Vec::new(),
            next_id: 0,
            merge_threshold,
        }
    }

    /// Ingest one filtered item. Returns the story that now contains this
    /// contribution, merged-into or newly created.
    ///
    /// Among stories at or above the merge threshold the highest score wins;
    /// equal scores go to the earliest-created story. Stories are stored in
    /// id order, so a strict improvement test gives that tie-break for free.
    pub fn ingest(&mut self, title: &str, terms: TermSet, source_feed: &str) -> &Story {
        let mut best: Option<(usize, f64)> = None;

        for (index, story) in self.stories.iter().enumerate() {
            let score = SimilarityEngine::similarity(&terms, &story.terms);

            if score < self.merge_threshold {
                continue;
            }

            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((index, score));
            }
        }

        match best {
            Some((index, score)) => {
                let story = &mut self.stories[index];
                story.sources.push(source_feed.to_string());
                debug!(
                    "Merged item from {} into story {} (score {:.2})",
                    source_feed, story.id, score
                );
                &self.stories[index]
            }
            None => {
                let story = Story {
                    id: self.next_id,
                    title: title.to_string(),
                    terms,
                    sources: vec![source_feed.to_string()],
                };
                self.next_id += 1;

                info!("New story {}: {}", story.id, story.title);
                self.stories.push(story);
                self.stories.last().unwrap()
            }
        }
    }

    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    pub fn into_stories(self) -> Vec<Story> {
        self.stories
    }
}
