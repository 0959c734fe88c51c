//! `stats`: command usage since startup.

use crate::commands::{Args, Command, CommandResult, Context};
use crate::format::code;
use crate::session::{Embed, Reply};
use async_trait::async_trait;

const STATS_COLOR: u32 = 0x5865F2;

pub struct Stats;

#[async_trait]
impl Command for Stats {
    fn aliases(&self) -> &[&'static str] {
        &["stats"]
    }

    fn description(&self) -> &str {
        "Shows how often each command was used since startup."
    }

    async fn execute(&self, ctx: &Context<'_>, _args: &Args) -> CommandResult {
        let snapshot = ctx.stats.snapshot();
        let description = if snapshot.is_empty() {
            "No commands used yet.".to_string()
        } else {
            snapshot
                .iter()
                .map(|(alias, count)| format!("{}: {count}", code(&format!("{}{alias}", ctx.prefix))))
                .collect::<Vec<_>>()
                .join("\n")
        };

        let embed = Embed::new("Command usage", description)
            .field("Total", ctx.stats.total().to_string(), true)
            .field("Widgets", ctx.widgets.active().to_string(), true)
            .color(STATS_COLOR);
        Ok(Some(Reply::embed(embed)))
    }
}
