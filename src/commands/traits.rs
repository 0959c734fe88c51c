//! The capability contract every command implements.

use super::args::{ArgSpec, Args};
use super::context::Context;
use crate::error::HandlerResult;
use crate::session::Reply;
use async_trait::async_trait;
use std::sync::Arc;

/// Result of executing a command: an optional reply to send back.
pub type CommandResult = HandlerResult<Option<Reply>>;

/// A chat command.
///
/// Instances are registered once at startup and shared by every dispatch,
/// so implementations hold no per-invocation state. Arguments arrive as a
/// freshly bound [`Args`] value instead.
///
/// # Example
///
/// ```ignore
/// pub struct Ping;
///
/// #[async_trait]
/// impl Command for Ping {
///     fn aliases(&self) -> &[&'static str] {
///         &["ping"]
///     }
///
///     fn description(&self) -> &str {
///         "Replies with pong."
///     }
///
///     async fn execute(&self, _ctx: &Context<'_>, _args: &Args) -> CommandResult {
///         Ok(Some(Reply::text("pong")))
///     }
/// }
/// ```
#[async_trait]
pub trait Command: Send + Sync {
    /// Alias paths, each one or more space-separated tokens (`"quote add"`).
    /// The first alias is used in usage text and listings.
    fn aliases(&self) -> &[&'static str];

    fn description(&self) -> &str;

    /// Role names allowed to run this command. Empty means everyone.
    fn roles(&self) -> &[&'static str] {
        &[]
    }

    /// Channel names this command may be run in. Empty means anywhere.
    fn channels(&self) -> &[&'static str] {
        &[]
    }

    /// Declared argument shape, in positional order.
    fn args(&self) -> &'static [ArgSpec] {
        &[]
    }

    /// Sub-commands, each registered under its own alias paths.
    fn subcommands(&self) -> Vec<Arc<dyn Command>> {
        Vec::new()
    }

    async fn execute(&self, ctx: &Context<'_>, args: &Args) -> CommandResult;
}
