//! Small utility commands.

use crate::commands::{ArgSpec, Args, Command, CommandResult, Context};
use crate::error::HandlerError;
use crate::format::unmention;
use crate::session::Reply;
use async_trait::async_trait;

/// `ping`: liveness check.
pub struct Ping;

#[async_trait]
impl Command for Ping {
    fn aliases(&self) -> &[&'static str] {
        &["ping"]
    }

    fn description(&self) -> &str {
        "Replies with pong."
    }

    async fn execute(&self, _ctx: &Context<'_>, _args: &Args) -> CommandResult {
        Ok(Some(Reply::text("pong")))
    }
}

/// `echo <text...>`: repeat the text back with mentions defused.
pub struct Echo;

#[async_trait]
impl Command for Echo {
    fn aliases(&self) -> &[&'static str] {
        &["echo"]
    }

    fn description(&self) -> &str {
        "Echoes the given text."
    }

    fn args(&self) -> &'static [ArgSpec] {
        const ARGS: &[ArgSpec] = &[ArgSpec::strings("text")];
        ARGS
    }

    async fn execute(&self, _ctx: &Context<'_>, args: &Args) -> CommandResult {
        let text = args.strings("text")?.join(" ");
        if text.is_empty() {
            return Err(HandlerError::user("nothing to echo"));
        }
        Ok(Some(Reply::text(unmention(&text))))
    }
}
