use story_aggregator::{KeywordExtractor, SimilarityEngine, StoryAggregator, TermSet};

fn term_set(pairs: &[(&str, u32)]) -> TermSet {
    pairs
        .iter()
        .map(|(term, weight)| (term.to_string(), *weight))
        .collect()
}

#[test]
fn extraction_is_total_and_deterministic() {
    let extractor = KeywordExtractor::new();

    assert!(extractor.extract("").is_empty());
    assert!(extractor.extract("   \n\t  ").is_empty());

    let text = "Volcano erupts near capital, thousands evacuated";
    assert_eq!(extractor.extract(text), extractor.extract(text));
}

#[test]
fn extraction_weights_are_occurrence_counts() {
    let extractor = KeywordExtractor::new();
    let terms = extractor.extract("mars rover lands, mars mission continues");

    assert_eq!(terms.get("mars"), Some(&2));
    assert_eq!(terms.get("rover"), Some(&1));
    assert_eq!(terms.get("mission"), Some(&1));
}

#[test]
fn extraction_drops_stop_words_and_short_tokens() {
    let extractor = KeywordExtractor::new();
    let terms = extractor.extract("The rover is on Mars and it will be there");

    assert!(terms.contains_key("rover"));
    assert!(terms.contains_key("mars"));
    assert!(!terms.contains_key("the"));
    assert!(!terms.contains_key("and"));
    assert!(!terms.contains_key("is"));
    assert!(!terms.contains_key("it"));
}

#[test]
fn extraction_normalizes_case_and_punctuation() {
    let extractor = KeywordExtractor::new();
    let terms = extractor.extract("Mars, Rover! \"mars\" (rover)");

    assert_eq!(terms.get("mars"), Some(&2));
    assert_eq!(terms.get("rover"), Some(&2));
    assert_eq!(terms.len(), 2);
}

#[test]
fn similarity_of_a_set_with_itself_is_one() {
    let a = term_set(&[("mars", 1), ("rover", 2)]);
    assert_eq!(SimilarityEngine::similarity(&a, &a), 1.0);
}

#[test]
fn similarity_of_two_empty_sets_is_zero() {
    let empty = TermSet::new();
    assert_eq!(SimilarityEngine::similarity(&empty, &empty), 0.0);
}

#[test]
fn similarity_is_symmetric() {
    let a = term_set(&[("mars", 1), ("rover", 1), ("landing", 1)]);
    let b = term_set(&[("rover", 1), ("landing", 1), ("delay", 1)]);

    assert_eq!(
        SimilarityEngine::similarity(&a, &b),
        SimilarityEngine::similarity(&b, &a)
    );
}

#[test]
fn similarity_counts_keys_not_weights() {
    // Overlap {rover, landing} over union {mars, rover, landing, delay}.
    let a = term_set(&[("mars", 5), ("rover", 1), ("landing", 1)]);
    let b = term_set(&[("rover", 9), ("landing", 2), ("delay", 1)]);

    assert_eq!(SimilarityEngine::similarity(&a, &b), 0.5);
}

#[test]
fn similarity_of_disjoint_sets_is_zero() {
    let a = term_set(&[("mars", 1)]);
    let b = term_set(&[("election", 1)]);

    assert_eq!(SimilarityEngine::similarity(&a, &b), 0.0);
}

#[test]
fn aggregator_assigns_unique_increasing_ids() {
    let mut aggregator = StoryAggregator::new(0.5);

    aggregator.ingest("a", term_set(&[("alpha", 1)]), "feed-1");
    aggregator.ingest("b", term_set(&[("beta", 1)]), "feed-1");
    aggregator.ingest("c", term_set(&[("gamma", 1)]), "feed-1");

    let ids: Vec<u64> = aggregator.stories().iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![0, 1, 2]);
}

#[test]
fn aggregator_merges_identical_term_sets() {
    let mut aggregator = StoryAggregator::new(0.5);
    let terms = term_set(&[("volcano", 1), ("eruption", 1)]);

    aggregator.ingest("Volcano erupts", terms.clone(), "feed-1");
    let story = aggregator.ingest("Volcano erupts", terms, "feed-2");

    assert_eq!(story.id, 0);
    assert_eq!(story.sources, vec!["feed-1", "feed-2"]);
    assert_eq!(aggregator.stories().len(), 1);
}

#[test]
fn aggregator_creates_below_threshold() {
    let mut aggregator = StoryAggregator::new(0.5);

    aggregator.ingest("a", term_set(&[("mars", 1), ("rover", 1)]), "feed-1");
    // One shared key out of three: 1/3 < 0.5.
    let story = aggregator.ingest("b", term_set(&[("mars", 1), ("election", 1)]), "feed-2");

    assert_eq!(story.id, 1);
    assert_eq!(aggregator.stories().len(), 2);
}

#[test]
fn aggregator_breaks_score_ties_toward_earliest_story() {
    let mut aggregator = StoryAggregator::new(0.5);

    aggregator.ingest("first", term_set(&[("alpha", 1), ("beta", 1)]), "feed-1");
    aggregator.ingest("second", term_set(&[("alpha", 1), ("gamma", 1)]), "feed-2");
    assert_eq!(aggregator.stories().len(), 2);

    // Scores 2/3 against both existing stories; the earlier id must win.
    let story = aggregator.ingest(
        "third",
        term_set(&[("alpha", 1), ("beta", 1), ("gamma", 1)]),
        "feed-3",
    );

    assert_eq!(story.id, 0);
    assert_eq!(story.sources, vec!["feed-1", "feed-3"]);
}

#[test]
fn merge_keeps_founder_title_and_terms() {
    let mut aggregator = StoryAggregator::new(0.5);
    let founder_terms = term_set(&[("volcano", 2), ("eruption", 1)]);

    aggregator.ingest("Founder headline", founder_terms.clone(), "feed-1");
    let story = aggregator.ingest(
        "Later headline",
        term_set(&[("volcano", 1), ("eruption", 5)]),
        "feed-2",
    );

    assert_eq!(story.title, "Founder headline");
    assert_eq!(story.terms, founder_terms);
}
