use crate::ingestion::FeedIngestionLoop;
use crate::traits::{CommandSource, FetchFeed};
use crate::types::{AggregatorError, ControlCommand, FeedGroup, Result, Story};
use chrono::NaiveDate;
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Wire shape of a command line. Anything that fails to deserialize, or that
/// is not a complete start command, maps to `ControlCommand::Other`.
#[derive(Debug, Deserialize)]
struct CommandMessage {
    command: String,
    #[serde(default)]
    groups: Vec<FeedGroup>,
    reject_date: Option<NaiveDate>,
}

impl ControlCommand {
    pub fn parse(line: &str) -> ControlCommand {
        let message: CommandMessage = match serde_json::from_str(line) {
            Ok(m) => m,
            Err(e) => {
                debug!("Ignoring malformed command line: {}", e);
                return ControlCommand::Other;
            }
        };

        match (message.command.as_str(), message.reject_date) {
            ("start", Some(reject_date)) => ControlCommand::Start {
                groups: message.groups,
                reject_date,
            },
            _ => ControlCommand::Other,
        }
    }
}

/// Command source backed by a channel of text lines, one command per line.
///
/// The sending half typically lives in a stdin reader task; tests feed it
/// directly. A closed channel means the underlying resource is gone, which
/// is the one fatal failure of a run.
pub struct ChannelCommandSource {
    receiver: mpsc::UnboundedReceiver<String>,
}

impl ChannelCommandSource {
    pub fn new(receiver: mpsc::UnboundedReceiver<String>) -> Self {
        Self { receiver }
    }
}

#[async_trait::async_trait]
impl CommandSource for ChannelCommandSource {
    async fn next_command(&mut self) -> Result<ControlCommand> {
        match self.receiver.recv().await {
            Some(line) => Ok(ControlCommand::parse(&line)),
            None => Err(AggregatorError::CommandSource(
                "command channel closed while waiting for a command".to_string(),
            )),
        }
    }

    fn poll_command(&mut self) -> Result<Option<ControlCommand>> {
        match self.receiver.try_recv() {
            Ok(line) => Ok(Some(ControlCommand::parse(&line))),
            Err(mpsc::error::TryRecvError::Empty) => Ok(None),
            // A cleanly closed channel mid-run (stdin reached EOF after the
            // start command) just means no further commands are coming.
            Err(mpsc::error::TryRecvError::Disconnected) => {
                debug!("Command channel closed, no further commands");
                Ok(None)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Extracting,
    Terminal,
}

/// Top-level driver: waits for a start command, runs the ingestion loop one
/// feed at a time, then settles in the terminal state.
pub struct ControlStateMachine<C: CommandSource> {
    state: RunState,
    commands: C,
    deadline: Instant,
    merge_threshold: f64,
    ingestion: Option<FeedIngestionLoop>,
}

impl<C: CommandSource> ControlStateMachine<C> {
    pub fn new(commands: C, deadline: Instant, merge_threshold: f64) -> Self {
        Self {
            state: RunState::Idle,
            commands,
            deadline,
            merge_threshold,
            ingestion: None,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Drive the run to completion. The deadline is checked at the top of
    /// every iteration, so one in-flight fetch may overrun it by at most its
    /// own duration.
    pub async fn run(&mut self, fetcher: &dyn FetchFeed) -> Result<()> {
        loop {
            if Instant::now() >= self.deadline {
                warn!("Run deadline reached in state {:?}, halting", self.state);
                return Ok(());
            }

            match self.state {
                RunState::Idle => match self.commands.next_command().await? {
                    ControlCommand::Start {
                        groups,
                        reject_date,
                    } => {
                        info!(
                            "Start command received ({} groups, reject date {}), fetching feeds",
                            groups.len(),
                            reject_date
                        );
                        self.ingestion = Some(FeedIngestionLoop::new(
                            groups,
                            reject_date,
                            self.merge_threshold,
                        ));
                        self.state = RunState::Extracting;
                    }
                    ControlCommand::Other => {
                        debug!("Ignoring non-start command while idle");
                    }
                },

                RunState::Extracting => {
                    // Later commands are drained but not acted upon; cancel
                    // and reconfigure semantics are reserved for the future.
                    if let Some(command) = self.commands.poll_command()? {
                        debug!("Command received mid-extraction, ignored: {:?}", command);
                    }

                    let ingestion = self
                        .ingestion
                        .as_mut()
                        .expect("extracting state always has an ingestion loop");

                    if ingestion.is_done() {
                        info!("All feeds processed, extraction complete");
                        self.state = RunState::Terminal;
                    } else {
                        ingestion.step(fetcher).await?;
                    }
                }

                RunState::Terminal => return Ok(()),
            }
        }
    }

    /// Stories discovered so far; empty before a start command arrives.
    pub fn stories(&self) -> &[Story] {
        self.ingestion
            .as_ref()
            .map(|i| i.aggregator().stories())
            .unwrap_or(&[])
    }

    pub fn into_stories(self) -> Vec<Story> {
        self.ingestion
            .map(|i| i.into_aggregator().into_stories())
            .unwrap_or_default()
    }
}
