//! Integration test common infrastructure.
//!
//! Provides a dispatcher wired to the built-in commands over an in-memory
//! store and session, plus builders for inbound messages.

pub mod bot;

#[allow(unused_imports)]
pub use bot::{TestBot, eventually, moderator, user};
