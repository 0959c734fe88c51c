//! Quote commands.
//!
//! Anyone can submit a quote with `quote add`; it lands on the pending
//! list until a moderator approves or rejects it. Every read-modify-write
//! holds the store lock for its whole duration.

mod approved;
mod pending;
mod storage;

pub use approved::{QuoteClean, QuoteList, QuoteRemove, QuoteSearch};
pub use pending::{QuoteAdd, QuoteApprove, QuotePending, QuoteReject};
pub use storage::{ERR_EMPTY, ERR_INDEX, PendingQuotes, Quotes};

use crate::commands::{ArgSpec, Args, Command, CommandResult, Context};
use crate::error::HandlerError;
use crate::format::unmention;
use crate::session::Reply;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use std::sync::Arc;

/// Role allowed to moderate quotes.
pub const MOD_ROLE: &str = "mod";

/// `quote [index]`: an approved quote, random when no index is given.
pub struct Quote;

#[async_trait]
impl Command for Quote {
    fn aliases(&self) -> &[&'static str] {
        &["quote"]
    }

    fn description(&self) -> &str {
        "Get a quote at given index. No args gives a random quote."
    }

    fn args(&self) -> &'static [ArgSpec] {
        const ARGS: &[ArgSpec] = &[ArgSpec::ints("index")];
        ARGS
    }

    fn subcommands(&self) -> Vec<Arc<dyn Command>> {
        vec![
            Arc::new(QuoteAdd),
            Arc::new(QuoteApprove),
            Arc::new(QuoteList),
            Arc::new(QuotePending),
            Arc::new(QuoteRemove),
            Arc::new(QuoteReject),
            Arc::new(QuoteSearch),
            Arc::new(QuoteClean),
        ]
    }

    async fn execute(&self, ctx: &Context<'_>, args: &Args) -> CommandResult {
        let quotes: Quotes = storage::load_existing(ctx.store)?;

        let quote = match args.ints("index")? {
            [] => {
                let live: Vec<&str> = quotes.live().map(|(_, quote)| quote).collect();
                live.choose(&mut rand::thread_rng())
                    .copied()
                    .ok_or_else(|| HandlerError::user(ERR_EMPTY))?
            }
            [index, ..] => {
                let index = storage::check_index(*index, quotes.list.len())?;
                match quotes.list[index].as_str() {
                    "" => return Err(HandlerError::user(ERR_INDEX)),
                    quote => quote,
                }
            }
        };
        Ok(Some(Reply::text(unmention(quote))))
    }
}
