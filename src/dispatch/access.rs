//! Channel and role restrictions.

use crate::commands::Command;
use crate::format::{italics, or_list};
use crate::session::Message;

/// Why a command was refused. Channels are checked before roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDenied {
    Channel(Vec<&'static str>),
    Role(Vec<&'static str>),
}

impl AccessDenied {
    /// Short label for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Channel(_) => "channel",
            Self::Role(_) => "role",
        }
    }

    /// Italicized reply naming every accepted channel or role.
    pub fn reply_text(&self) -> String {
        let text = match self {
            Self::Channel(channels) => format!(
                "Error: You must be in {} to use this command",
                or_list(channels, "")
            ),
            Self::Role(roles) => format!(
                "Error: You must be {} to use this command",
                or_list(roles, "a ")
            ),
        };
        italics(&text)
    }
}

/// Check `message` against the command's channel and role lists.
pub fn check(command: &dyn Command, message: &Message) -> Result<(), AccessDenied> {
    let channels = command.channels();
    if !channels.is_empty() && !channels.contains(&message.channel_name.as_str()) {
        return Err(AccessDenied::Channel(channels.to_vec()));
    }

    let roles = command.roles();
    let has_role = roles.iter().any(|role| {
        message
            .author
            .roles
            .iter()
            .any(|held| held.eq_ignore_ascii_case(role))
    });
    if !roles.is_empty() && !has_role {
        return Err(AccessDenied::Role(roles.to_vec()));
    }
    Ok(())
}
