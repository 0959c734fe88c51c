//! Test bot harness.

use parley::dispatch::{DispatchOutcome, Dispatcher};
use parley::handlers;
use parley::session::{Author, MemorySession, Message, Session};
use parley::store::Store;
use parley::widgets::PaginationOptions;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

pub const BOT_ID: &str = "bot";
pub const CHANNEL_ID: &str = "c1";
pub const CHANNEL_NAME: &str = "general";
pub const PREFIX: &str = "!";

/// A dispatcher over the built-in commands with a recording session.
#[allow(dead_code)]
pub struct TestBot {
    pub dispatcher: Arc<Dispatcher>,
    pub memory: Arc<MemorySession>,
    pub session: Arc<dyn Session>,
    next_id: AtomicU64,
}

#[allow(dead_code)]
impl TestBot {
    /// Bot with short pagination pages and timeout.
    pub fn new() -> Self {
        Self::with_pagination(PaginationOptions {
            lines_per_page: 5,
            timeout: Duration::from_secs(10),
            ..PaginationOptions::default()
        })
    }

    pub fn with_pagination(options: PaginationOptions) -> Self {
        let store = Store::memory().expect("Failed to open memory store");
        let router = handlers::router().expect("Failed to register built-in commands");

        let mut dispatcher = Dispatcher::new(router, store, PREFIX).with_pagination(options);
        for observer in handlers::observers() {
            dispatcher = dispatcher.with_observer(observer);
        }

        let memory = Arc::new(MemorySession::new(BOT_ID));
        let session: Arc<dyn Session> = memory.clone();
        Self {
            dispatcher: Arc::new(dispatcher),
            memory,
            session,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn store(&self) -> &Store {
        self.dispatcher.store()
    }

    /// Build a message from `author` in the default channel.
    pub fn message(&self, author: &Author, content: &str) -> Message {
        Message {
            id: format!("in{}", self.next_id.fetch_add(1, Ordering::Relaxed)),
            author: author.clone(),
            channel_id: CHANNEL_ID.to_string(),
            channel_name: CHANNEL_NAME.to_string(),
            guild_id: Some("g1".to_string()),
            content: content.to_string(),
            attachments: Vec::new(),
        }
    }

    /// Dispatch `content` as sent by `author`.
    pub async fn send(&self, author: &Author, content: &str) -> DispatchOutcome {
        let message = self.message(author, content);
        self.dispatcher.dispatch(&self.session, &message).await
    }

    /// Plain text of the most recent reply.
    pub fn last_reply(&self) -> String {
        self.memory
            .sent_texts()
            .pop()
            .expect("Expected at least one reply")
    }
}

/// A regular user with no roles.
pub fn user(name: &str) -> Author {
    Author {
        id: format!("u-{name}"),
        name: name.to_string(),
        bot: false,
        roles: Vec::new(),
    }
}

/// A user holding the `mod` role.
#[allow(dead_code)]
pub fn moderator(name: &str) -> Author {
    Author {
        roles: vec!["Mod".to_string()],
        ..user(name)
    }
}

/// Poll `condition` until it holds or two seconds pass.
#[allow(dead_code)]
pub async fn eventually(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
