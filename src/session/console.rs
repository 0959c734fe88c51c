//! Interactive stdin/stdout session.
//!
//! Every input line becomes one inbound [`Message`] from the configured
//! console user. A line of the form `/react <message-id> <emoji>` instead
//! injects a reaction, which is enough to drive pagination widgets by hand.

use super::{Author, Message, ReactionEvent, Reply, SentMessage, Session, SessionError};
use crate::config::ConsoleConfig;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};
use tokio::sync::{Mutex, broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

const REACTION_CHANNEL_SIZE: usize = 64;

/// Session reading commands from stdin and printing replies to stdout.
pub struct ConsoleSession {
    bot_id: String,
    author: Author,
    channel_id: String,
    channel_name: String,
    guild_id: Option<String>,
    next_id: AtomicU64,
    stdout: Mutex<Stdout>,
    reactions: broadcast::Sender<ReactionEvent>,
}

impl ConsoleSession {
    pub fn new(bot_name: &str, config: &ConsoleConfig) -> Self {
        let (reactions, _) = broadcast::channel(REACTION_CHANNEL_SIZE);
        Self {
            bot_id: bot_name.to_string(),
            author: Author {
                id: config.user_id.clone(),
                name: config.user_name.clone(),
                bot: false,
                roles: config.roles.clone(),
            },
            channel_id: config.channel.clone(),
            channel_name: config.channel.clone(),
            guild_id: config.guild_id.clone(),
            next_id: AtomicU64::new(1),
            stdout: Mutex::new(tokio::io::stdout()),
            reactions,
        }
    }

    fn next_id(&self) -> String {
        self.next_id.fetch_add(1, Ordering::Relaxed).to_string()
    }

    async fn print(&self, text: &str) -> Result<(), SessionError> {
        let mut stdout = self.stdout.lock().await;
        stdout.write_all(text.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
        Ok(())
    }

    /// Turn one input line into a message, or inject it as a reaction.
    fn handle_line(&self, line: &str) -> Option<Message> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        if let Some(rest) = line.strip_prefix("/react ") {
            let mut parts = rest.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some(message_id), Some(emoji)) => {
                    let _ = self.reactions.send(ReactionEvent {
                        channel_id: self.channel_id.clone(),
                        message_id: message_id.to_string(),
                        user_id: self.author.id.clone(),
                        emoji: emoji.to_string(),
                    });
                }
                _ => warn!(line, "Usage: /react <message-id> <emoji>"),
            }
            return None;
        }

        Some(Message {
            id: self.next_id(),
            author: self.author.clone(),
            channel_id: self.channel_id.clone(),
            channel_name: self.channel_name.clone(),
            guild_id: self.guild_id.clone(),
            content: line.to_string(),
            attachments: Vec::new(),
        })
    }

    /// Spawn the stdin reader. The task ends at end of input or when the
    /// inbound channel closes.
    pub fn spawn_reader(self: Arc<Self>, inbound: mpsc::Sender<Message>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if let Some(message) = self.handle_line(&line)
                            && inbound.send(message).await.is_err()
                        {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        warn!(error = %e, "Failed to read console input");
                        break;
                    }
                }
            }
            debug!("Console reader finished");
        })
    }
}

#[async_trait]
impl Session for ConsoleSession {
    fn bot_id(&self) -> &str {
        &self.bot_id
    }

    async fn send(&self, channel_id: &str, reply: Reply) -> Result<SentMessage, SessionError> {
        let id = self.next_id();
        self.print(&format!("[{id}] {}", reply.to_plain_text())).await?;
        Ok(SentMessage {
            id,
            channel_id: channel_id.to_string(),
        })
    }

    async fn edit(&self, _channel_id: &str, message_id: &str, content: &str) -> Result<(), SessionError> {
        self.print(&format!("[{message_id} edited] {content}")).await
    }

    async fn add_reaction(&self, _channel_id: &str, message_id: &str, emoji: &str) -> Result<(), SessionError> {
        self.print(&format!("[{message_id} +{emoji}]")).await
    }

    async fn remove_reaction(
        &self,
        _channel_id: &str,
        _message_id: &str,
        _emoji: &str,
        _user_id: &str,
    ) -> Result<(), SessionError> {
        Ok(())
    }

    async fn clear_reactions(&self, _channel_id: &str, message_id: &str) -> Result<(), SessionError> {
        self.print(&format!("[{message_id} reactions cleared]")).await
    }

    fn subscribe_reactions(&self) -> broadcast::Receiver<ReactionEvent> {
        self.reactions.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn console() -> ConsoleSession {
        let config = ConsoleConfig {
            roles: vec!["mod".to_string()],
            ..ConsoleConfig::default()
        };
        ConsoleSession::new("parley", &config)
    }

    #[test]
    fn test_lines_become_messages() {
        let session = console();
        let msg = session.handle_line("  !quote add hi  ").unwrap();
        assert_eq!(msg.content, "!quote add hi");
        assert_eq!(msg.author.roles, vec!["mod".to_string()]);
        assert!(session.handle_line("   ").is_none());
    }

    #[test]
    fn test_react_lines_inject_reactions() {
        let session = console();
        let mut rx = session.subscribe_reactions();
        assert!(session.handle_line("/react 7 ➡️").is_none());

        let event = rx.try_recv().unwrap();
        assert_eq!(event.message_id, "7");
        assert_eq!(event.emoji, "➡️");
    }
}
