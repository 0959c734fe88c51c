//! Boundary to the chat platform.
//!
//! The dispatcher never talks to a concrete platform. Inbound events are
//! [`Message`] and [`ReactionEvent`] values; outbound traffic goes through
//! the [`Session`] trait. Two implementations ship with the crate:
//!
//! - [`ConsoleSession`]: stdin/stdout, used by the `parley` binary.
//! - [`MemorySession`]: records everything, used by tests.

mod console;
mod memory;

pub use console::ConsoleSession;
pub use memory::MemorySession;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::broadcast;

/// Errors reported by a session implementation.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The platform refused the request (unknown emoji, missing permission...).
    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("session closed")]
    Closed,
}

/// Author of an inbound message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Author {
    pub id: String,
    pub name: String,
    pub bot: bool,
    /// Role names held in the guild the message was sent from.
    pub roles: Vec<String>,
}

/// File attached to an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub url: String,
}

/// One inbound message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    pub author: Author,
    pub channel_id: String,
    /// Human-readable channel name, matched against channel restrictions.
    pub channel_name: String,
    pub guild_id: Option<String>,
    pub content: String,
    pub attachments: Vec<Attachment>,
}

/// A reaction added by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionEvent {
    pub channel_id: String,
    pub message_id: String,
    pub user_id: String,
    pub emoji: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedAuthor {
    pub name: String,
    pub icon_url: Option<String>,
}

/// Structured rich reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub fields: Vec<EmbedField>,
    pub color: u32,
    pub author: Option<EmbedAuthor>,
}

impl Embed {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    pub fn color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    /// Plain-text rendering for sessions without rich replies.
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        if let Some(author) = &self.author {
            out.push_str(&author.name);
            out.push('\n');
        }
        out.push_str(&self.title);
        if !self.description.is_empty() {
            out.push('\n');
            out.push_str(&self.description);
        }
        for field in &self.fields {
            out.push_str(&format!("\n{}: {}", field.name, field.value));
        }
        out
    }
}

/// File sent along with a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub name: String,
    pub data: Vec<u8>,
}

/// Outbound payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub content: Option<String>,
    pub embed: Option<Embed>,
    pub files: Vec<FileUpload>,
}

impl Reply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn embed(embed: Embed) -> Self {
        Self {
            embed: Some(embed),
            ..Self::default()
        }
    }

    pub fn with_file(mut self, name: impl Into<String>, data: Vec<u8>) -> Self {
        self.files.push(FileUpload {
            name: name.into(),
            data,
        });
        self
    }

    /// Everything readable in this reply, for logs and plain-text sessions.
    pub fn to_plain_text(&self) -> String {
        let mut parts = Vec::new();
        if let Some(content) = &self.content {
            parts.push(content.clone());
        }
        if let Some(embed) = &self.embed {
            parts.push(embed.to_plain_text());
        }
        for file in &self.files {
            parts.push(format!("[file: {} ({} bytes)]", file.name, file.data.len()));
        }
        parts.join("\n")
    }
}

/// Reference to a message the bot sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub id: String,
    pub channel_id: String,
}

/// Outbound side of a chat platform connection.
#[async_trait]
pub trait Session: Send + Sync {
    /// User ID of the bot itself.
    fn bot_id(&self) -> &str;

    async fn send(&self, channel_id: &str, reply: Reply) -> Result<SentMessage, SessionError>;

    async fn edit(&self, channel_id: &str, message_id: &str, content: &str) -> Result<(), SessionError>;

    async fn add_reaction(&self, channel_id: &str, message_id: &str, emoji: &str) -> Result<(), SessionError>;

    async fn remove_reaction(
        &self,
        channel_id: &str,
        message_id: &str,
        emoji: &str,
        user_id: &str,
    ) -> Result<(), SessionError>;

    async fn clear_reactions(&self, channel_id: &str, message_id: &str) -> Result<(), SessionError>;

    /// Show a typing indicator. Purely cosmetic.
    async fn typing(&self, _channel_id: &str) -> Result<(), SessionError> {
        Ok(())
    }

    /// Register a reaction listener. Dropping the receiver deregisters it.
    fn subscribe_reactions(&self) -> broadcast::Receiver<ReactionEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_plain_text_includes_embed_and_files() {
        let reply = Reply::embed(Embed::new("Commands", "!ping").field("Total", "1", true))
            .with_file("dump.txt", vec![0; 4]);
        let text = reply.to_plain_text();
        assert!(text.contains("Commands\n!ping"));
        assert!(text.contains("Total: 1"));
        assert!(text.contains("[file: dump.txt (4 bytes)]"));
    }
}
