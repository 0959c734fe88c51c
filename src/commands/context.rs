//! Per-dispatch execution context handed to commands.

use super::Command;
use super::args::usage;
use super::router::Router;
use crate::dispatch::CommandStats;
use crate::session::{Message, Session};
use crate::store::Store;
use crate::widgets::{PaginationOptions, Widgets};
use std::sync::Arc;

/// Everything a command may touch while it runs.
///
/// The store handle is threaded through here rather than living in a
/// global, so every test can run against its own in-memory store.
pub struct Context<'a> {
    pub session: &'a Arc<dyn Session>,
    pub store: &'a Store,
    pub message: &'a Message,
    pub router: &'a Router,
    pub stats: &'a CommandStats,
    pub widgets: &'a Widgets,
    pub pagination: &'a PaginationOptions,
    /// Configured command prefix, e.g. `!`.
    pub prefix: &'a str,
}

impl Context<'_> {
    /// Channel the triggering message was sent in.
    #[inline]
    pub fn channel_id(&self) -> &str {
        &self.message.channel_id
    }

    /// Usage text for any command, using this context's prefix.
    pub fn usage(&self, command: &dyn Command) -> String {
        usage(self.prefix, command)
    }
}
