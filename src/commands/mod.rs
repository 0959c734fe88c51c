//! Command infrastructure.
//!
//! - [`Command`]: the contract every handler implements
//! - [`Router`]: alias trie resolving token prefixes to commands
//! - [`Args`]: declarative argument binding and usage rendering
//! - [`Context`]: what a command can reach while it runs
//!
//! Concrete commands live in [`crate::handlers`].

pub mod args;
pub mod context;
pub mod router;
pub mod traits;

pub use args::{ArgKind, ArgSpec, ArgValue, Args, BindError, usage};
pub use context::Context;
pub use router::{RouteError, Router, primary_alias};
pub use traits::{Command, CommandResult};
