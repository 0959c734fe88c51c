//! Built-in commands and message observers.
//!
//! - [`help`]: command listing and per-command usage
//! - [`misc`]: `ping`, `echo`
//! - [`stats`]: per-command usage counters
//! - [`quote`]: quote submission, moderation, listing and search
//! - [`emoji`]: custom emoji usage counter

pub mod emoji;
pub mod help;
pub mod misc;
pub mod quote;
pub mod stats;

use crate::commands::{RouteError, Router};
use crate::dispatch::MessageObserver;
use std::sync::Arc;

/// Build the router with every built-in command registered.
///
/// Registration order is the order `help` lists commands in.
pub fn router() -> Result<Router, RouteError> {
    let mut router = Router::new();
    router.add_command(Arc::new(help::Help))?;
    router.add_command(Arc::new(misc::Ping))?;
    router.add_command(Arc::new(misc::Echo))?;
    router.add_command(Arc::new(stats::Stats))?;
    router.add_command(Arc::new(quote::Quote))?;
    router.add_command(Arc::new(emoji::Emoji))?;
    Ok(router)
}

/// Observers fed every inbound message.
pub fn observers() -> Vec<Arc<dyn MessageObserver>> {
    vec![Arc::new(emoji::EmojiCounter)]
}
