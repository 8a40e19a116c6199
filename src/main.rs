use anyhow::Context;
use clap::Parser;
use story_aggregator::{
    ChannelCommandSource, ControlStateMachine, FetchConfig, HttpFeedFetcher,
    DEFAULT_MERGE_THRESHOLD,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(about = "Group news feed items into deduplicated stories")]
struct Args {
    /// Wall-clock deadline for the whole run, in seconds
    #[arg(long, default_value_t = 20)]
    timeout_secs: u64,

    /// Jaccard similarity at or above which two items are the same story
    #[arg(long, default_value_t = DEFAULT_MERGE_THRESHOLD)]
    merge_threshold: f64,

    /// Per-request HTTP timeout for feed fetches, in seconds
    #[arg(long, default_value_t = 10)]
    fetch_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    info!("Starting story aggregator (deadline {}s)", args.timeout_secs);

    // Commands arrive as JSON lines on stdin; the reader task owns stdin and
    // drops it (closing the channel) when input ends.
    let (line_sender, line_receiver) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if line_sender.send(line).is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    error!("Failed to read command input: {}", e);
                    break;
                }
            }
        }
    });

    let fetcher = HttpFeedFetcher::new(FetchConfig {
        timeout_seconds: args.fetch_timeout_secs,
        ..FetchConfig::default()
    })
    .context("failed to build feed fetcher")?;

    let deadline = Instant::now() + Duration::from_secs(args.timeout_secs);
    let commands = ChannelCommandSource::new(line_receiver);
    let mut machine = ControlStateMachine::new(commands, deadline, args.merge_threshold);

    machine
        .run(&fetcher)
        .await
        .context("ingestion run failed")?;

    let stories = machine.into_stories();
    info!("Run finished with {} stories", stories.len());
    for story in &stories {
        info!(
            "Story {}: {:?} ({} sources)",
            story.id,
            story.title,
            story.sources.len()
        );
    }

    println!("{}", serde_json::to_string_pretty(&stories)?);
    Ok(())
}
