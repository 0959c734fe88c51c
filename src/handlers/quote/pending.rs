//! Submission and moderation of pending quotes.

use super::MOD_ROLE;
use super::storage::{self, PendingQuotes, Quotes};
use crate::commands::{ArgSpec, Args, Command, CommandResult, Context};
use crate::error::HandlerError;
use crate::format::{block, bold, underline};
use crate::session::Reply;
use async_trait::async_trait;
use tracing::info;

const ERR_NO_QUOTE: &str = "no quote entered, please enter a quote";

/// `quote add <quote...>`
pub struct QuoteAdd;

#[async_trait]
impl Command for QuoteAdd {
    fn aliases(&self) -> &[&'static str] {
        &["quote add"]
    }

    fn description(&self) -> &str {
        "Adds a quote to the pending list."
    }

    fn args(&self) -> &'static [ArgSpec] {
        const ARGS: &[ArgSpec] = &[ArgSpec::strings("quote")];
        ARGS
    }

    async fn execute(&self, ctx: &Context<'_>, args: &Args) -> CommandResult {
        let joined = args.strings("quote")?.join(" ");
        if joined.trim().is_empty() {
            return Err(HandlerError::user(ERR_NO_QUOTE));
        }
        // Literal `\n` sequences become real line breaks
        let quote = joined.replace("\\n", "\n");

        let _guard = ctx.store.lock().await;
        let mut pending: PendingQuotes = ctx.store.load_or_default()?;
        pending.list.push(quote.clone());
        ctx.store.save(&pending)?;

        let index = pending.list.len() - 1;
        info!(index, author = %ctx.message.author.name, "Quote submitted");
        Ok(Some(Reply::text(format!(
            "Added {} to the Pending list at index {}",
            block(&quote),
            bold(&format!("#{index}"))
        ))))
    }
}

/// `quote pending [index]`
pub struct QuotePending;

#[async_trait]
impl Command for QuotePending {
    fn aliases(&self) -> &[&'static str] {
        &["quote pending", "quote pd"]
    }

    fn description(&self) -> &str {
        "Lists all pending quotes, or shows the one at the given index."
    }

    fn args(&self) -> &'static [ArgSpec] {
        const ARGS: &[ArgSpec] = &[ArgSpec::ints("index")];
        ARGS
    }

    async fn execute(&self, ctx: &Context<'_>, args: &Args) -> CommandResult {
        let pending: PendingQuotes = storage::load_existing(ctx.store)?;
        if pending.list.is_empty() {
            return Ok(Some(Reply::text("Pending list is empty.")));
        }

        let out = match args.ints("index")? {
            [] => {
                let mut out = underline("Pending quotes:");
                for (index, quote) in pending.list.iter().enumerate() {
                    out.push_str(&format!("\n{} {quote}", bold(&format!("#{index}:"))));
                }
                out
            }
            [index, ..] => {
                let index = storage::check_index(*index, pending.list.len())?;
                format!(
                    "Pending quote at index {}:\n{}",
                    bold(&index.to_string()),
                    pending.list[index]
                )
            }
        };
        Ok(Some(Reply::text(out)))
    }
}

/// `quote approve <index>`: move a pending quote into the approved list.
pub struct QuoteApprove;

#[async_trait]
impl Command for QuoteApprove {
    fn aliases(&self) -> &[&'static str] {
        &["quote approve", "quote ap"]
    }

    fn description(&self) -> &str {
        "Approves a pending quote."
    }

    fn roles(&self) -> &[&'static str] {
        &[MOD_ROLE]
    }

    fn args(&self) -> &'static [ArgSpec] {
        const ARGS: &[ArgSpec] = &[ArgSpec::int("index")];
        ARGS
    }

    async fn execute(&self, ctx: &Context<'_>, args: &Args) -> CommandResult {
        let _guard = ctx.store.lock().await;
        let mut pending: PendingQuotes = storage::load_existing(ctx.store)?;
        let index = storage::check_index(args.int("index")?, pending.list.len())?;

        let mut quotes: Quotes = ctx.store.load_or_default()?;
        let quote = pending.list.remove(index);
        let slot = quotes.insert(quote.clone());

        storage::save_move(ctx.store, &quotes, &pending)?;

        info!(pending = index, slot, "Quote approved");
        Ok(Some(Reply::text(format!(
            "Approved quote {} now at index {}",
            block(&quote),
            bold(&format!("#{slot}"))
        ))))
    }
}

/// `quote reject <index>`: drop a pending quote.
pub struct QuoteReject;

#[async_trait]
impl Command for QuoteReject {
    fn aliases(&self) -> &[&'static str] {
        &["quote reject", "quote rj"]
    }

    fn description(&self) -> &str {
        "Rejects a quote from the pending list."
    }

    fn roles(&self) -> &[&'static str] {
        &[MOD_ROLE]
    }

    fn args(&self) -> &'static [ArgSpec] {
        const ARGS: &[ArgSpec] = &[ArgSpec::int("index")];
        ARGS
    }

    async fn execute(&self, ctx: &Context<'_>, args: &Args) -> CommandResult {
        let _guard = ctx.store.lock().await;
        let mut pending: PendingQuotes = storage::load_existing(ctx.store)?;
        let index = storage::check_index(args.int("index")?, pending.list.len())?;

        let rejected = pending.list.remove(index);
        ctx.store.save(&pending)?;

        info!(index, "Quote rejected");
        Ok(Some(Reply::text(format!("Rejected quote\n{}", block(&rejected)))))
    }
}
