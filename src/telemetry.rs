//! Handler timing and the tracing spans used by the dispatcher.

use std::time::{Duration, Instant};

/// Times one handler run and records it on drop, labeled with the
/// outcome. A timer dropped without [`CommandTimer::failed`] counts as
/// `ok`.
pub struct CommandTimer {
    command: String,
    outcome: &'static str,
    start: Instant,
}

impl CommandTimer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            outcome: "ok",
            start: Instant::now(),
        }
    }

    /// Mark the handler run as failed.
    pub fn failed(&mut self) {
        self.outcome = "error";
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for CommandTimer {
    fn drop(&mut self) {
        crate::metrics::record_command(
            &self.command,
            self.outcome,
            self.start.elapsed().as_secs_f64(),
        );
    }
}

/// Standardized span constructors.
pub mod spans {
    use tracing::{Span, info_span};

    /// Span wrapping one chat line through the dispatch pipeline.
    ///
    /// `command` and `invocation` are recorded once the line has been
    /// recognised as a command.
    pub fn command(nickname: &str, destination: &str) -> Span {
        info_span!(
            "bot.command",
            nickname = %nickname,
            destination = %destination,
            command = tracing::field::Empty,
            invocation = tracing::field::Empty,
        )
    }

    /// Span for a console session.
    pub fn console(nickname: &str) -> Span {
        info_span!("console", nickname = %nickname)
    }
}
