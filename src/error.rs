//! Unified error handling for command execution.
//!
//! Routing misses, access denials and binding failures are handled by the
//! dispatcher itself (see [`crate::dispatch`]). This module holds the error
//! type handlers return, with metric labels and the text shown to users.

use crate::session::SessionError;
use crate::store::StoreError;
use thiserror::Error;

/// Reply text for failures whose details are only logged.
pub const GENERIC_FAILURE: &str = "something went wrong, please try again later";

/// Errors that can occur while a command executes.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Business-logic failure, reported verbatim.
    #[error("{0}")]
    User(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("session error: {0}")]
    Session(#[from] SessionError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Build a user-facing error.
    pub fn user(message: impl Into<String>) -> Self {
        Self::User(message.into())
    }

    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::User(_) => "user",
            Self::Store(_) => "store",
            Self::Session(_) => "session",
            Self::Internal(_) => "internal",
        }
    }

    /// Text shown to the user after the `Error: ` prefix.
    ///
    /// Only business-logic errors are shown as-is; everything else degrades
    /// to [`GENERIC_FAILURE`] and is logged with full detail by the caller.
    pub fn user_message(&self) -> &str {
        match self {
            Self::User(message) => message,
            Self::Store(_) | Self::Session(_) | Self::Internal(_) => GENERIC_FAILURE,
        }
    }
}

/// Result type for command handlers.
pub type HandlerResult<T = ()> = Result<T, HandlerError>;
