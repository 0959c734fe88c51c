//! Long-lived interactive replies.
//!
//! A widget is a background task that outlives the dispatch which created
//! it, such as a paginated listing driven by reactions. Every widget owns a
//! child of the [`Widgets`] cancellation token and is tracked so shutdown
//! can wait for listeners to be torn down.

mod pagination;

pub use pagination::{FALLBACK_LEFT, FALLBACK_RIGHT, PageView, PaginationOptions};

use crate::session::{Session, SessionError};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{info, warn};

/// Handle to one running widget.
pub struct WidgetHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl WidgetHandle {
    /// Ask the widget to stop. Its listener is released as it exits.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the widget task to exit.
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            warn!(error = %e, "Widget task failed");
        }
    }
}

/// Supervisor for all widgets of a process.
#[derive(Clone, Default)]
pub struct Widgets {
    token: CancellationToken,
    tracker: TaskTracker,
}

impl Widgets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of widgets still running.
    pub fn active(&self) -> usize {
        self.tracker.len()
    }

    /// Send a paginated listing and keep it interactive in the background.
    ///
    /// Returns `None` when everything fits on one page or the platform
    /// refuses the control reactions. No listener is registered then and
    /// the first page stays as a static listing.
    pub async fn spawn_paginated(
        &self,
        session: Arc<dyn Session>,
        channel_id: &str,
        view: PageView,
        options: &PaginationOptions,
    ) -> Result<Option<WidgetHandle>, SessionError> {
        let token = self.token.child_token();
        let Some(widget) = pagination::start(session, channel_id, view, options, token.clone()).await? else {
            return Ok(None);
        };
        let task = self.tracker.spawn(widget.run());
        Ok(Some(WidgetHandle { token, task }))
    }

    /// Cancel every widget and wait up to `grace` for them to clean up.
    pub async fn shutdown(&self, grace: Duration) {
        self.token.cancel();
        self.tracker.close();
        if tokio::time::timeout(grace, self.tracker.wait()).await.is_err() {
            warn!(remaining = self.tracker.len(), "Widgets did not stop in time");
        } else {
            info!("All widgets stopped");
        }
    }
}
