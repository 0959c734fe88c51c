//! Message dispatch.
//!
//! [`Dispatcher::dispatch`] takes one inbound message through the whole
//! pipeline:
//!
//! 1. drop messages from bots (including ourselves)
//! 2. feed every [`MessageObserver`]
//! 3. strip the prefix and split the rest on whitespace
//! 4. route, or reuse the author's last command for `!! args`
//! 5. check channel then role restrictions
//! 6. remember the command for `!!`, then bind arguments
//! 7. execute and send the reply
//!
//! Observers run to completion before routing, so a command always sees
//! what observers recorded for the message that triggered it. The cost is
//! that observer store writes delay that message's reply; observers are
//! expected to skip the store for messages they have nothing to record.
//!
//! Every step that stops the pipeline early is reported as a
//! [`DispatchOutcome`], and every user-visible failure is sent back to the
//! originating channel. [`run`] drives a dispatcher from a message stream.

mod access;
mod observer;
mod runner;
mod stats;

pub use access::AccessDenied;
pub use observer::MessageObserver;
pub use runner::run;
pub use stats::CommandStats;

use crate::commands::{Args, BindError, Command, Context, Router, primary_alias, usage};
use crate::error::HandlerError;
use crate::format::italics;
use crate::session::{Message, Reply, Session};
use crate::store::Store;
use crate::telemetry::{CommandTimer, spans};
use crate::widgets::{PaginationOptions, Widgets};
use dashmap::DashMap;
use futures_util::future::join_all;
use std::sync::Arc;
use tracing::{Instrument, debug, info, warn};

/// Where the pipeline stopped for one message.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// Not a command: bot author, missing prefix, or no matching alias.
    Ignored,
    /// Channel or role check failed; the denial was sent.
    Denied(AccessDenied),
    /// Arguments did not bind; usage was sent.
    Usage(BindError),
    /// The command returned an error; the error text was sent.
    Failed(HandlerError),
    Completed,
}

impl DispatchOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Routes messages to commands and runs them.
pub struct Dispatcher {
    router: Router,
    store: Store,
    prefix: String,
    pagination: PaginationOptions,
    widgets: Widgets,
    stats: CommandStats,
    /// Most recently routed command per author ID, for `!!`.
    last_command: DashMap<String, Arc<dyn Command>>,
    observers: Vec<Arc<dyn MessageObserver>>,
}

impl Dispatcher {
    pub fn new(router: Router, store: Store, prefix: impl Into<String>) -> Self {
        let stats = CommandStats::new(&router);
        Self {
            router,
            store,
            prefix: prefix.into(),
            pagination: PaginationOptions::default(),
            widgets: Widgets::new(),
            stats,
            last_command: DashMap::new(),
            observers: Vec::new(),
        }
    }

    pub fn with_pagination(mut self, options: PaginationOptions) -> Self {
        self.pagination = options;
        self
    }

    pub fn with_widgets(mut self, widgets: Widgets) -> Self {
        self.widgets = widgets;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn MessageObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn stats(&self) -> &CommandStats {
        &self.stats
    }

    pub fn widgets(&self) -> &Widgets {
        &self.widgets
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Run one inbound message through the pipeline.
    pub async fn dispatch(&self, session: &Arc<dyn Session>, message: &Message) -> DispatchOutcome {
        if message.author.bot || message.author.id == session.bot_id() {
            return DispatchOutcome::Ignored;
        }

        self.observe(message).await;

        let Some(rest) = self.strip_prefix(&message.content) else {
            return DispatchOutcome::Ignored;
        };
        let tokens: Vec<&str> = rest.split_whitespace().collect();
        let Some((command, consumed)) = self.resolve(&message.author.id, &tokens) else {
            return DispatchOutcome::Ignored;
        };

        let span = spans::command(primary_alias(command.as_ref()), message);
        self.run_command(session, message, command, &tokens[consumed..])
            .instrument(span)
            .await
    }

    async fn observe(&self, message: &Message) {
        let results = join_all(
            self.observers
                .iter()
                .map(|observer| observer.observe(&self.store, message)),
        )
        .await;
        for (observer, result) in self.observers.iter().zip(results) {
            if let Err(e) = result {
                warn!(observer = observer.name(), error = %e, "Observer failed");
            }
        }
    }

    /// Content after the prefix, or `None` if this is not a command.
    fn strip_prefix<'m>(&self, content: &'m str) -> Option<&'m str> {
        content
            .trim()
            .strip_prefix(self.prefix.as_str())
            .filter(|rest| !rest.is_empty())
    }

    /// Pick the command and the number of tokens naming it.
    fn resolve(&self, author_id: &str, tokens: &[&str]) -> Option<(Arc<dyn Command>, usize)> {
        if tokens.first() == Some(&self.prefix.as_str()) {
            return self
                .last_command
                .get(author_id)
                .map(|command| (Arc::clone(command.value()), 1));
        }
        self.router
            .route(tokens)
            .map(|(command, consumed)| (Arc::clone(command), consumed))
    }

    async fn run_command(
        &self,
        session: &Arc<dyn Session>,
        message: &Message,
        command: Arc<dyn Command>,
        tokens: &[&str],
    ) -> DispatchOutcome {
        let alias = primary_alias(command.as_ref());
        let channel_id = message.channel_id.as_str();

        if let Err(denied) = access::check(command.as_ref(), message) {
            crate::metrics::record_access_denied(alias, denied.reason());
            info!(reason = denied.reason(), "Access denied");
            self.reply(session, channel_id, Reply::text(denied.reply_text())).await;
            return DispatchOutcome::Denied(denied);
        }

        self.last_command
            .insert(message.author.id.clone(), Arc::clone(&command));

        // Fresh per dispatch; dropped on every path below
        let args = match Args::bind(command.args(), tokens) {
            Ok(args) => args,
            Err(e) => {
                warn!(error = %e, ?tokens, "Usage error");
                let text = format!("Usage: {}", usage(&self.prefix, command.as_ref()));
                self.reply(session, channel_id, Reply::text(text)).await;
                return DispatchOutcome::Usage(e);
            }
        };

        self.stats.record(alias);
        if let Err(e) = session.typing(channel_id).await {
            debug!(error = %e, "Typing indicator failed");
        }

        let ctx = Context {
            session,
            store: &self.store,
            message,
            router: &self.router,
            stats: &self.stats,
            widgets: &self.widgets,
            pagination: &self.pagination,
            prefix: &self.prefix,
        };

        debug!("Calling command handler");
        let result = {
            let _timer = CommandTimer::new(alias);
            command.execute(&ctx, &args).await
        };

        match result {
            Ok(Some(reply)) => {
                self.reply(session, channel_id, reply).await;
                DispatchOutcome::Completed
            }
            Ok(None) => DispatchOutcome::Completed,
            Err(e) => {
                crate::metrics::record_command_error(alias, e.error_code());
                warn!(error = %e, ?args, "Command failed");
                let text = italics(&format!("Error: {}", e.user_message()));
                self.reply(session, channel_id, Reply::text(text)).await;
                DispatchOutcome::Failed(e)
            }
        }
    }

    async fn reply(&self, session: &Arc<dyn Session>, channel_id: &str, reply: Reply) {
        if let Err(e) = session.send(channel_id, reply).await {
            warn!(error = %e, "Send error");
        }
    }
}
