//! Telemetry utilities for command timing and tracing spans.

use std::time::Instant;

/// Guard for timing command execution and recording metrics.
///
/// Records command latency when dropped.
pub struct CommandTimer {
    command: String,
    start: Instant,
}

impl CommandTimer {
    /// Start timing a command.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            start: Instant::now(),
        }
    }
}

impl Drop for CommandTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        crate::metrics::record_command(&self.command, duration);
    }
}

/// Standardized span constructors.
pub mod spans {
    use crate::session::Message;
    use tracing::{Span, debug_span};

    /// Span for one command execution.
    pub fn command(name: &str, message: &Message) -> Span {
        debug_span!(
            "bot.command",
            command = %name,
            author = %message.author.name,
            author_id = %message.author.id,
            channel_id = %message.channel_id,
            channel = %message.channel_name,
            message_id = %message.id,
        )
    }
}
