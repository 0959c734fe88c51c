//! Passive message observers.

use crate::error::HandlerError;
use crate::session::Message;
use crate::store::Store;
use async_trait::async_trait;

/// Sees every inbound non-bot message before routing, command or not.
///
/// Observers must not reply; failures are logged and never reach the user.
#[async_trait]
pub trait MessageObserver: Send + Sync {
    fn name(&self) -> &'static str;

    async fn observe(&self, store: &Store, message: &Message) -> Result<(), HandlerError>;
}
