//! In-memory session that records all outbound traffic.

use super::{ReactionEvent, Reply, SentMessage, Session, SessionError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;

/// Capacity of the reaction broadcast channel.
const REACTION_CHANNEL_SIZE: usize = 64;

/// A message recorded by [`MemorySession::send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentRecord {
    pub id: String,
    pub channel_id: String,
    pub reply: Reply,
}

#[derive(Debug, Default)]
struct Recorded {
    sent: Vec<SentRecord>,
    edits: Vec<(String, String)>,
    reactions: Vec<(String, String)>,
    removed_reactions: Vec<(String, String, String)>,
    cleared: Vec<String>,
    typing: usize,
}

/// Session double that keeps every request in memory.
///
/// Reactions can be injected with [`MemorySession::react`]; emoji listed
/// via [`MemorySession::reject_emoji`] are refused by `add_reaction`.
pub struct MemorySession {
    bot_id: String,
    next_id: AtomicU64,
    recorded: Mutex<Recorded>,
    rejected_emoji: Mutex<HashSet<String>>,
    reactions: broadcast::Sender<ReactionEvent>,
}

impl MemorySession {
    pub fn new(bot_id: impl Into<String>) -> Self {
        let (reactions, _) = broadcast::channel(REACTION_CHANNEL_SIZE);
        Self {
            bot_id: bot_id.into(),
            next_id: AtomicU64::new(1),
            recorded: Mutex::new(Recorded::default()),
            rejected_emoji: Mutex::new(HashSet::new()),
            reactions,
        }
    }

    /// Refuse `add_reaction` calls for this emoji.
    pub fn reject_emoji(&self, emoji: impl Into<String>) {
        self.rejected_emoji.lock().insert(emoji.into());
    }

    /// Simulate a user adding a reaction. Returns the number of listeners.
    pub fn react(&self, channel_id: &str, message_id: &str, user_id: &str, emoji: &str) -> usize {
        self.reactions
            .send(ReactionEvent {
                channel_id: channel_id.to_string(),
                message_id: message_id.to_string(),
                user_id: user_id.to_string(),
                emoji: emoji.to_string(),
            })
            .unwrap_or(0)
    }

    /// Number of live reaction listeners.
    pub fn listener_count(&self) -> usize {
        self.reactions.receiver_count()
    }

    pub fn sent(&self) -> Vec<SentRecord> {
        self.recorded.lock().sent.clone()
    }

    /// Plain text of every sent reply, in order.
    pub fn sent_texts(&self) -> Vec<String> {
        self.recorded
            .lock()
            .sent
            .iter()
            .map(|record| record.reply.to_plain_text())
            .collect()
    }

    /// `(message_id, content)` for every edit, in order.
    pub fn edits(&self) -> Vec<(String, String)> {
        self.recorded.lock().edits.clone()
    }

    /// `(message_id, emoji)` for every reaction the bot added.
    pub fn reactions(&self) -> Vec<(String, String)> {
        self.recorded.lock().reactions.clone()
    }

    /// `(message_id, emoji, user_id)` for every removed user reaction.
    pub fn removed_reactions(&self) -> Vec<(String, String, String)> {
        self.recorded.lock().removed_reactions.clone()
    }

    /// Message IDs whose reactions were cleared.
    pub fn cleared(&self) -> Vec<String> {
        self.recorded.lock().cleared.clone()
    }

    pub fn typing_count(&self) -> usize {
        self.recorded.lock().typing
    }
}

#[async_trait]
impl Session for MemorySession {
    fn bot_id(&self) -> &str {
        &self.bot_id
    }

    async fn send(&self, channel_id: &str, reply: Reply) -> Result<SentMessage, SessionError> {
        let id = format!("m{}", self.next_id.fetch_add(1, Ordering::Relaxed));
        self.recorded.lock().sent.push(SentRecord {
            id: id.clone(),
            channel_id: channel_id.to_string(),
            reply,
        });
        Ok(SentMessage {
            id,
            channel_id: channel_id.to_string(),
        })
    }

    async fn edit(&self, _channel_id: &str, message_id: &str, content: &str) -> Result<(), SessionError> {
        self.recorded
            .lock()
            .edits
            .push((message_id.to_string(), content.to_string()));
        Ok(())
    }

    async fn add_reaction(&self, _channel_id: &str, message_id: &str, emoji: &str) -> Result<(), SessionError> {
        if self.rejected_emoji.lock().contains(emoji) {
            return Err(SessionError::Rejected(format!("unknown emoji {emoji}")));
        }
        self.recorded
            .lock()
            .reactions
            .push((message_id.to_string(), emoji.to_string()));
        Ok(())
    }

    async fn remove_reaction(
        &self,
        _channel_id: &str,
        message_id: &str,
        emoji: &str,
        user_id: &str,
    ) -> Result<(), SessionError> {
        self.recorded.lock().removed_reactions.push((
            message_id.to_string(),
            emoji.to_string(),
            user_id.to_string(),
        ));
        Ok(())
    }

    async fn clear_reactions(&self, _channel_id: &str, message_id: &str) -> Result<(), SessionError> {
        self.recorded.lock().cleared.push(message_id.to_string());
        Ok(())
    }

    async fn typing(&self, _channel_id: &str) -> Result<(), SessionError> {
        self.recorded.lock().typing += 1;
        Ok(())
    }

    fn subscribe_reactions(&self) -> broadcast::Receiver<ReactionEvent> {
        self.reactions.subscribe()
    }
}
