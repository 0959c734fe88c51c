//! Commands over the approved quote list.

use super::MOD_ROLE;
use super::storage::{self, Quotes};
use crate::commands::{ArgSpec, Args, Command, CommandResult, Context};
use crate::error::HandlerError;
use crate::format::{block, bold, underline, unmention};
use crate::session::Reply;
use crate::widgets::PageView;
use async_trait::async_trait;
use regex::RegexBuilder;
use std::sync::Arc;
use tracing::info;

/// Maximum number of search results shown.
pub const SEARCH_LIMIT: usize = 5;

/// Characters allowed between query terms in a search.
const TERM_SEPARATOR: &str = r"[ \._-]*";

const ERR_NO_QUERY: &str = "no search terms entered";

/// `quote remove <index>`: blank a slot without shifting later quotes.
pub struct QuoteRemove;

#[async_trait]
impl Command for QuoteRemove {
    fn aliases(&self) -> &[&'static str] {
        &["quote remove", "quote rm"]
    }

    fn description(&self) -> &str {
        "Removes an approved quote."
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
        let mut quotes: Quotes = storage::load_existing(ctx.store)?;
        let index = storage::check_index(args.int("index")?, quotes.list.len())?;
        if quotes.list[index].is_empty() {
            return Err(HandlerError::user(storage::ERR_INDEX));
        }

        let removed = std::mem::take(&mut quotes.list[index]);
        ctx.store.save(&quotes)?;

        info!(index, "Quote removed");
        Ok(Some(Reply::text(format!("Removed quote\n{}", block(&removed)))))
    }
}

/// `quote list`: every approved quote, paginated.
pub struct QuoteList;

#[async_trait]
impl Command for QuoteList {
    fn aliases(&self) -> &[&'static str] {
        &["quote list", "quote ls"]
    }

    fn description(&self) -> &str {
        "Lists all approved quotes."
    }

    async fn execute(&self, ctx: &Context<'_>, _args: &Args) -> CommandResult {
        let quotes: Quotes = storage::load_existing(ctx.store)?;

        // Blank slots stay as empty lines so pages keep their index ranges
        let lines = quotes
            .list
            .iter()
            .enumerate()
            .map(|(index, quote)| match quote.as_str() {
                "" => String::new(),
                quote => format!("{} {}", bold(&format!("#{index}:")), unmention(quote)),
            })
            .collect();
        let view = PageView::new(underline("Quotes"), lines, ctx.pagination.lines_per_page);

        ctx.widgets
            .spawn_paginated(Arc::clone(ctx.session), ctx.channel_id(), view, ctx.pagination)
            .await?;
        Ok(None)
    }
}

/// `quote search <query...>`
pub struct QuoteSearch;

#[async_trait]
impl Command for QuoteSearch {
    fn aliases(&self) -> &[&'static str] {
        &["quote search", "quote se"]
    }

    fn description(&self) -> &str {
        "Searches the approved quotes, returns the top 5 results."
    }

    fn args(&self) -> &'static [ArgSpec] {
        const ARGS: &[ArgSpec] = &[ArgSpec::strings("query")];
        ARGS
    }

    async fn execute(&self, ctx: &Context<'_>, args: &Args) -> CommandResult {
        let pattern = search_pattern(args.strings("query")?)
            .ok_or_else(|| HandlerError::user(ERR_NO_QUERY))?;
        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| HandlerError::Internal(format!("search pattern `{pattern}`: {e}")))?;

        let quotes: Quotes = storage::load_existing(ctx.store)?;
        let matches: Vec<(usize, &str)> = quotes
            .live()
            .filter(|(_, quote)| regex.is_match(quote))
            .take(SEARCH_LIMIT)
            .collect();

        if matches.is_empty() {
            return Ok(Some(Reply::text("No matches found.")));
        }

        let mut out = String::from("Search Results:");
        for (index, quote) in matches {
            out.push_str(&format!("\n{} {}", bold(&format!("#{index}:")), unmention(quote)));
        }
        Ok(Some(Reply::text(out)))
    }
}

/// Reduce each term to ASCII alphanumerics and join the survivors so they
/// may be separated by spaces, dots, underscores or dashes.
fn search_pattern(terms: &[String]) -> Option<String> {
    let terms: Vec<String> = terms
        .iter()
        .map(|term| term.chars().filter(char::is_ascii_alphanumeric).collect::<String>())
        .filter(|term| !term.is_empty())
        .collect();
    if terms.is_empty() {
        None
    } else {
        Some(terms.join(TERM_SEPARATOR))
    }
}

/// `quote clean`: turn literal `\n` sequences into line breaks.
pub struct QuoteClean;

#[async_trait]
impl Command for QuoteClean {
    fn aliases(&self) -> &[&'static str] {
        &["quote clean", "quote cl"]
    }

    fn description(&self) -> &str {
        "Replaces `\\n` characters with newlines."
    }

    async fn execute(&self, ctx: &Context<'_>, _args: &Args) -> CommandResult {
        let _guard = ctx.store.lock().await;
        let mut quotes: Quotes = storage::load_existing(ctx.store)?;
        for quote in &mut quotes.list {
            *quote = quote.replace("\\n", "\n");
        }
        ctx.store.save(&quotes)?;
        Ok(Some(Reply::text("All Clean! ✨")))
    }
}
