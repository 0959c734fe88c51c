//! Inbound message loop.

use super::Dispatcher;
use crate::session::{Message, Session};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Dispatch messages from `inbound` until it closes or `shutdown` fires.
///
/// Each message runs on its own task, so a slow or panicking command never
/// holds up the rest. In-flight dispatches are awaited before returning.
pub async fn run(
    dispatcher: Arc<Dispatcher>,
    session: Arc<dyn Session>,
    mut inbound: mpsc::Receiver<Message>,
    shutdown: CancellationToken,
) {
    let mut tasks = JoinSet::new();

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("Dispatch loop stopping");
                break;
            }
            received = inbound.recv() => {
                let Some(message) = received else {
                    info!("Inbound stream closed");
                    break;
                };
                let dispatcher = Arc::clone(&dispatcher);
                let session = Arc::clone(&session);
                tasks.spawn(async move {
                    dispatcher.dispatch(&session, &message).await;
                });
            }
            Some(joined) = tasks.join_next(), if !tasks.is_empty() => log_join(joined),
        }
    }

    while let Some(joined) = tasks.join_next().await {
        log_join(joined);
    }
}

fn log_join(joined: Result<(), JoinError>) {
    if let Err(e) = joined
        && e.is_panic()
    {
        error!(error = %e, "Caught panic in command task");
    }
}
