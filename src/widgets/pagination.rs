//! Reaction-driven pagination.
//!
//! The listing is sent once, then the bot adds a left and a right control
//! reaction. Users flip pages by reacting; the bot removes their reaction
//! and edits the message in place. Pages wrap around at both ends and are
//! numbered from 0 in the footer.
//!
//! The listener stops on timeout or cancellation. On every exit path the
//! control reactions are cleared and the reaction receiver is dropped,
//! which deregisters it from the session.

use crate::session::{ReactionEvent, Reply, Session, SessionError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Substituted when the platform refuses the primary control emoji.
pub const FALLBACK_LEFT: &str = "◀️";
pub const FALLBACK_RIGHT: &str = "▶️";

/// Settings shared by every paginated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationOptions {
    pub lines_per_page: usize,
    /// How long a listing reacts to page flips.
    pub timeout: Duration,
    pub emoji_left: String,
    pub emoji_right: String,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            lines_per_page: 15,
            timeout: Duration::from_secs(120),
            emoji_left: "⬅️".to_string(),
            emoji_right: "➡️".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flip {
    Left,
    Right,
}

impl PaginationOptions {
    fn flip_for(&self, emoji: &str) -> Option<Flip> {
        if emoji == self.emoji_left || emoji == FALLBACK_LEFT {
            Some(Flip::Left)
        } else if emoji == self.emoji_right || emoji == FALLBACK_RIGHT {
            Some(Flip::Right)
        } else {
            None
        }
    }
}

/// A titled list of lines split into fixed-size pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    title: String,
    lines: Vec<String>,
    per_page: usize,
    page: usize,
}

impl PageView {
    pub fn new(title: impl Into<String>, lines: Vec<String>, per_page: usize) -> Self {
        Self {
            title: title.into(),
            lines,
            per_page: per_page.max(1),
            page: 0,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Index of the last page. A listing that fits on one page has 0.
    pub fn last_page(&self) -> usize {
        if self.lines.len() <= self.per_page {
            0
        } else {
            self.lines.len().div_ceil(self.per_page) - 1
        }
    }

    pub fn is_single_page(&self) -> bool {
        self.last_page() == 0
    }

    /// Move one page forward, wrapping to the first page.
    pub fn next(&mut self) {
        self.page = if self.page >= self.last_page() { 0 } else { self.page + 1 };
    }

    /// Move one page back, wrapping to the last page.
    pub fn prev(&mut self) {
        self.page = if self.page == 0 { self.last_page() } else { self.page - 1 };
    }

    /// Title, the current page's non-empty lines, then the page footer.
    pub fn render(&self) -> String {
        let start = (self.page * self.per_page).min(self.lines.len());
        let end = (start + self.per_page).min(self.lines.len());

        let mut out = self.title.clone();
        for line in self.lines[start..end].iter().filter(|line| !line.is_empty()) {
            out.push('\n');
            out.push_str(line);
        }
        out.push_str(&format!("\n`Page {}/{}`", self.page, self.last_page()));
        out
    }

    fn flip(&mut self, flip: Flip) {
        match flip {
            Flip::Left => self.prev(),
            Flip::Right => self.next(),
        }
    }
}

/// A listing that has been sent and needs a listener.
pub(super) struct Paginated {
    session: Arc<dyn Session>,
    channel_id: String,
    message_id: String,
    view: PageView,
    options: PaginationOptions,
    reactions: broadcast::Receiver<ReactionEvent>,
    token: CancellationToken,
}

/// Send the first page and set up the control reactions.
///
/// Returns `None` for single-page listings, which need no listener, and
/// when no control reaction can be added.
pub(super) async fn start(
    session: Arc<dyn Session>,
    channel_id: &str,
    view: PageView,
    options: &PaginationOptions,
    token: CancellationToken,
) -> Result<Option<Paginated>, SessionError> {
    let sent = session.send(channel_id, Reply::text(view.render())).await?;
    if view.is_single_page() {
        return Ok(None);
    }

    // Subscribe before adding reactions so no early flip is missed
    let reactions = session.subscribe_reactions();
    let controls = [
        (options.emoji_left.as_str(), FALLBACK_LEFT),
        (options.emoji_right.as_str(), FALLBACK_RIGHT),
    ];
    for (emoji, fallback) in controls {
        if let Err(e) = session.add_reaction(channel_id, &sent.id, emoji).await {
            debug!(emoji, error = %e, "Control emoji rejected, using fallback");
            if let Err(e) = session.add_reaction(channel_id, &sent.id, fallback).await {
                // The first page is already out; leave it as a static listing
                warn!(emoji = fallback, error = %e, "Fallback emoji rejected, pagination disabled");
                if let Err(e) = session.clear_reactions(channel_id, &sent.id).await {
                    warn!(error = %e, "Failed to clear page reactions");
                }
                return Ok(None);
            }
        }
    }

    Ok(Some(Paginated {
        session,
        channel_id: channel_id.to_string(),
        message_id: sent.id,
        view,
        options: options.clone(),
        reactions,
        token,
    }))
}

impl Paginated {
    /// Listen for page flips until timeout or cancellation.
    pub(super) async fn run(mut self) {
        let deadline = tokio::time::sleep(self.options.timeout);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                _ = self.token.cancelled() => {
                    debug!(message_id = %self.message_id, "Pagination cancelled");
                    break;
                }
                _ = &mut deadline => {
                    debug!(message_id = %self.message_id, "Pagination timed out");
                    break;
                }
                event = self.reactions.recv() => match event {
                    Ok(event) => self.on_reaction(event).await,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Pagination listener lagged");
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }

        self.finish().await;
    }

    async fn on_reaction(&mut self, event: ReactionEvent) {
        if event.message_id != self.message_id || event.user_id == self.session.bot_id() {
            return;
        }
        let Some(flip) = self.options.flip_for(&event.emoji) else {
            return;
        };

        if let Err(e) = self
            .session
            .remove_reaction(&event.channel_id, &event.message_id, &event.emoji, &event.user_id)
            .await
        {
            warn!(error = %e, "Failed to remove page reaction");
            return;
        }

        self.view.flip(flip);
        if let Err(e) = self
            .session
            .edit(&self.channel_id, &self.message_id, &self.view.render())
            .await
        {
            warn!(error = %e, "Failed to edit paginated message");
        }
    }

    async fn finish(self) {
        let Self {
            session,
            channel_id,
            message_id,
            reactions,
            ..
        } = self;
        drop(reactions);
        if let Err(e) = session.clear_reactions(&channel_id, &message_id).await {
            warn!(error = %e, "Failed to clear page reactions");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("line {i}")).collect()
    }

    #[test]
    fn test_last_page() {
        assert_eq!(PageView::new("t", numbered(0), 15).last_page(), 0);
        assert_eq!(PageView::new("t", numbered(15), 15).last_page(), 0);
        assert_eq!(PageView::new("t", numbered(16), 15).last_page(), 1);
        assert_eq!(PageView::new("t", numbered(30), 15).last_page(), 1);
        assert_eq!(PageView::new("t", numbered(31), 15).last_page(), 2);
    }

    #[test]
    fn test_wraparound() {
        let mut view = PageView::new("t", numbered(31), 15);
        view.prev();
        assert_eq!(view.page(), 2);
        view.next();
        assert_eq!(view.page(), 0);
        view.next();
        view.next();
        view.next();
        assert_eq!(view.page(), 0);
    }

    #[test]
    fn test_render_skips_empty_lines_and_adds_footer() {
        let lines = vec!["a".to_string(), String::new(), "c".to_string(), "d".to_string()];
        let mut view = PageView::new("Quotes", lines, 3);
        assert_eq!(view.render(), "Quotes\na\nc\n`Page 0/1`");
        view.next();
        assert_eq!(view.render(), "Quotes\nd\n`Page 1/1`");
    }

    #[test]
    fn test_flip_recognizes_fallback_emoji() {
        let options = PaginationOptions::default();
        assert_eq!(options.flip_for("⬅️"), Some(Flip::Left));
        assert_eq!(options.flip_for(FALLBACK_LEFT), Some(Flip::Left));
        assert_eq!(options.flip_for(FALLBACK_RIGHT), Some(Flip::Right));
        assert_eq!(options.flip_for("👍"), None);
    }
}
