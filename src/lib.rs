//! parley - a chat-bot command dispatcher.
//!
//! Text messages such as `!quote add hello world` are routed through a
//! multi-token alias trie to a [`commands::Command`], whose declared
//! arguments are bound from the remaining tokens before it runs. Commands
//! persist state through a shared [`store::Store`].
//!
//! The chat platform itself sits behind [`session::Session`]; the bundled
//! binary drives the bot from the console.

pub mod commands;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod handlers;
pub mod http;
pub mod metrics;
pub mod session;
pub mod store;
pub mod telemetry;
pub mod widgets;
