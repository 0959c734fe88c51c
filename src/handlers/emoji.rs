//! Custom emoji usage counter.
//!
//! [`EmojiCounter`] watches every message for custom emoji markup
//! (`<:name:id>` or `<a:name:id>`) and counts each distinct emoji once per
//! message. The counts live in the store under [`EmojiCounts::INDEX`].

use crate::commands::{ArgSpec, Args, Command, CommandResult, Context};
use crate::dispatch::MessageObserver;
use crate::error::HandlerError;
use crate::session::{Message, Reply};
use crate::store::{Store, StoreError, Storer};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::seq::IteratorRandom;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, LazyLock};
use tracing::debug;

const ERR_NOT_INIT: &str = "emoji counter not initialised";

static CUSTOM_EMOJI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<a?:\w+:\d+>").expect("custom emoji pattern is valid"));

/// Emoji usage since `start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmojiCounts {
    pub counter: BTreeMap<String, u64>,
    pub start: DateTime<Utc>,
}

impl Storer for EmojiCounts {
    const INDEX: &'static str = "emoji";
}

impl EmojiCounts {
    pub fn starting_now() -> Self {
        Self {
            counter: BTreeMap::new(),
            start: Utc::now(),
        }
    }

    /// Counts, most used first.
    pub fn ranked(&self) -> Vec<(&str, u64)> {
        let mut ranked: Vec<_> = self
            .counter
            .iter()
            .map(|(emoji, count)| (emoji.as_str(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        ranked
    }
}

/// Distinct custom emoji in `content`, in sorted order.
pub fn custom_emoji(content: &str) -> BTreeSet<&str> {
    CUSTOM_EMOJI.find_iter(content).map(|m| m.as_str()).collect()
}

fn load_counts(store: &Store) -> Result<EmojiCounts, HandlerError> {
    match store.load::<EmojiCounts>() {
        Err(StoreError::NotFound(_)) => Err(HandlerError::user(ERR_NOT_INIT)),
        other => Ok(other?),
    }
}

/// Observer bumping [`EmojiCounts`] for every message using custom emoji.
pub struct EmojiCounter;

#[async_trait]
impl MessageObserver for EmojiCounter {
    fn name(&self) -> &'static str {
        "emoji_counter"
    }

    async fn observe(&self, store: &Store, message: &Message) -> Result<(), HandlerError> {
        let found = custom_emoji(&message.content);
        if found.is_empty() {
            return Ok(());
        }

        let _guard = store.lock().await;
        let mut counts = match store.load::<EmojiCounts>() {
            Err(StoreError::NotFound(_)) => EmojiCounts::starting_now(),
            other => other?,
        };
        for emoji in &found {
            *counts.counter.entry((*emoji).to_string()).or_default() += 1;
        }
        store.save(&counts)?;

        debug!(count = found.len(), "Counted custom emoji");
        Ok(())
    }
}

/// `emoji`: a random emoji from the ones counted so far.
pub struct Emoji;

#[async_trait]
impl Command for Emoji {
    fn aliases(&self) -> &[&'static str] {
        &["emoji", "🤔"]
    }

    fn description(&self) -> &str {
        "Prints a random custom server emoji."
    }

    fn subcommands(&self) -> Vec<Arc<dyn Command>> {
        vec![Arc::new(EmojiCount), Arc::new(EmojiRegional)]
    }

    async fn execute(&self, ctx: &Context<'_>, _args: &Args) -> CommandResult {
        let counts = load_counts(ctx.store)?;
        let picked = counts
            .counter
            .keys()
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| HandlerError::user(ERR_NOT_INIT))?;
        Ok(Some(Reply::text(picked)))
    }
}

/// `emoji count`: usage summary.
pub struct EmojiCount;

#[async_trait]
impl Command for EmojiCount {
    fn aliases(&self) -> &[&'static str] {
        &["emoji count", "emoji co", "emoji stats", "emoji st"]
    }

    fn description(&self) -> &str {
        "Prints a summary of the usage of custom server emojis."
    }

    async fn execute(&self, ctx: &Context<'_>, _args: &Args) -> CommandResult {
        let counts = load_counts(ctx.store)?;
        let mut out = format!(
            "Emoji stats (from {}):",
            counts.start.format("%H:%M:%S %Z %Y-%m-%d")
        );
        for (emoji, count) in counts.ranked() {
            out.push_str(&format!("\n{emoji} : {count}"));
        }
        Ok(Some(Reply::text(out)))
    }
}

/// `emoji regional <message...>`: spell a message in regional indicators.
pub struct EmojiRegional;

#[async_trait]
impl Command for EmojiRegional {
    fn aliases(&self) -> &[&'static str] {
        &["emoji regional", "regional"]
    }

    fn description(&self) -> &str {
        "Returns alphanumeric messages as emoji."
    }

    fn args(&self) -> &'static [ArgSpec] {
        const ARGS: &[ArgSpec] = &[ArgSpec::strings("message")];
        ARGS
    }

    async fn execute(&self, _ctx: &Context<'_>, args: &Args) -> CommandResult {
        let text = regional(&args.strings("message")?.join(" "));
        if text.is_empty() {
            return Err(HandlerError::user("nothing to spell"));
        }
        Ok(Some(Reply::text(text)))
    }
}

/// Map ASCII letters and digits to emoji, dropping everything else.
pub fn regional(text: &str) -> String {
    const DIGITS: [&str; 10] = [
        "0️⃣", "1️⃣", "2️⃣", "3️⃣", "4️⃣", "5️⃣", "6️⃣", "7️⃣", "8️⃣", "9️⃣",
    ];

    let mut parts = Vec::new();
    for c in text.chars() {
        let c = c.to_ascii_lowercase();
        match c {
            'a'..='z' => {
                // Regional indicator symbols start at U+1F1E6 for `a`
                if let Some(symbol) = char::from_u32(0x1F1E6 + (c as u32 - 'a' as u32)) {
                    parts.push(symbol.to_string());
                }
            }
            '0'..='9' => parts.push(DIGITS[(c as u8 - b'0') as usize].to_string()),
            ' ' => parts.push("  ".to_string()),
            _ => {}
        }
    }
    parts.join(" ").trim().to_string()
}
