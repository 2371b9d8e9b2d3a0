//! Console driver.
//!
//! Reads chat lines from any async reader (stdin in the binary) and feeds
//! them to the dispatcher as the configured console identity. Lines are said
//! in the console channel; `/msg <text>` sends one privately and `/quit`
//! stops the loop.

use crate::config::ConsoleConfig;
use crate::handlers::{DispatchOutcome, Dispatcher, ResponseMiddleware};
use crate::message::{ChatMessage, Reply, Sender};
use crate::telemetry::spans;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{Instrument, debug, info};

/// What one console line means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleLine<'a> {
    Channel(&'a str),
    Private(&'a str),
    Quit,
    Empty,
}

impl<'a> ConsoleLine<'a> {
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            Self::Empty
        } else if line.trim() == "/quit" {
            Self::Quit
        } else if let Some(text) = line.strip_prefix("/msg ") {
            Self::Private(text)
        } else {
            Self::Channel(line)
        }
    }
}

/// Count of lines processed by [`run`], by outcome.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleSummary {
    pub dispatched: usize,
    pub rejected: usize,
    pub ignored: usize,
}

/// Run the console loop until end of input or `/quit`.
pub async fn run<R>(
    dispatcher: &Dispatcher,
    console: &ConsoleConfig,
    input: R,
    replies: &mpsc::Sender<Reply>,
) -> std::io::Result<ConsoleSummary>
where
    R: AsyncBufRead + Unpin,
{
    let mut sender = Sender::new(console.nickname.clone())
        .with_capabilities(console.capabilities.clone());
    sender.account = console.account.clone();

    let span = spans::console(&console.nickname);
    async move {
        let mut summary = ConsoleSummary::default();
        let mut lines = input.lines();

        while let Some(line) = lines.next_line().await? {
            let message = match ConsoleLine::parse(&line) {
                ConsoleLine::Empty => continue,
                ConsoleLine::Quit => break,
                ConsoleLine::Channel(text) => {
                    ChatMessage::channel(sender.clone(), console.channel.clone(), text)
                }
                ConsoleLine::Private(text) => ChatMessage::private(sender.clone(), text),
            };

            match dispatcher
                .dispatch(&message, ResponseMiddleware::Direct(replies))
                .await
            {
                DispatchOutcome::Dispatched { .. }
                | DispatchOutcome::Failed { .. }
                | DispatchOutcome::Help { .. } => summary.dispatched += 1,
                DispatchOutcome::Rejected(_) => summary.rejected += 1,
                DispatchOutcome::Ignored(reason) => {
                    debug!(reason = reason.code(), "Console line was not a command");
                    summary.ignored += 1;
                }
            }
        }

        info!(?summary, "Console input closed");
        Ok(summary)
    }
    .instrument(span)
    .await
}
