//! `help [command...]`: list commands or describe one.

use crate::commands::{ArgSpec, Args, Command, CommandResult, Context, primary_alias};
use crate::error::HandlerError;
use crate::format::{code, underline};
use crate::session::Reply;
use crate::widgets::PageView;
use async_trait::async_trait;
use std::sync::Arc;

pub struct Help;

#[async_trait]
impl Command for Help {
    fn aliases(&self) -> &[&'static str] {
        &["help", "h"]
    }

    fn description(&self) -> &str {
        "Lists every command, or shows usage for the named command."
    }

    fn args(&self) -> &'static [ArgSpec] {
        const ARGS: &[ArgSpec] = &[ArgSpec::strings("command")];
        ARGS
    }

    async fn execute(&self, ctx: &Context<'_>, args: &Args) -> CommandResult {
        let query = args.strings("command")?;
        if query.is_empty() {
            list_commands(ctx).await?;
            return Ok(None);
        }

        // Accept both `help quote add` and `help !quote add`
        let mut tokens: Vec<&str> = query.iter().map(String::as_str).collect();
        if let Some(stripped) = tokens.first().and_then(|first| first.strip_prefix(ctx.prefix)) {
            tokens[0] = stripped;
        }

        match ctx.router.route(&tokens) {
            Some((command, consumed)) if consumed == tokens.len() => {
                Ok(Some(Reply::text(describe(ctx, command.as_ref()))))
            }
            _ => Err(HandlerError::user(format!(
                "no command named {}",
                code(&query.join(" "))
            ))),
        }
    }
}

async fn list_commands(ctx: &Context<'_>) -> Result<(), HandlerError> {
    let lines = ctx
        .router
        .commands()
        .map(|command| {
            let name = format!("{}{}", ctx.prefix, primary_alias(command.as_ref()));
            format!("{} - {}", code(&name), command.description())
        })
        .collect();
    let view = PageView::new(underline("Commands"), lines, ctx.pagination.lines_per_page);
    ctx.widgets
        .spawn_paginated(Arc::clone(ctx.session), ctx.channel_id(), view, ctx.pagination)
        .await?;
    Ok(())
}

fn describe(ctx: &Context<'_>, command: &dyn Command) -> String {
    let mut out = format!(
        "Usage: {}\n{}",
        code(&ctx.usage(command)),
        command.description()
    );

    let aliases = command.aliases();
    if aliases.len() > 1 {
        let all: Vec<String> = aliases.iter().map(|alias| code(alias)).collect();
        out.push_str(&format!("\nAliases: {}", all.join(", ")));
    }
    if !command.roles().is_empty() {
        let roles: Vec<String> = command.roles().iter().map(|role| code(role)).collect();
        out.push_str(&format!("\nRoles: {}", roles.join(", ")));
    }
    if !command.channels().is_empty() {
        let channels: Vec<String> = command.channels().iter().map(|channel| code(channel)).collect();
        out.push_str(&format!("\nChannels: {}", channels.join(", ")));
    }
    out
}
