//! Default value functions for configuration.

use crate::store::StoreMode;

// =============================================================================
// Bot Defaults
// =============================================================================

pub fn default_bot_name() -> String {
    "parley".to_string()
}

pub fn default_prefix() -> String {
    "!".to_string()
}

// =============================================================================
// Store Defaults
// =============================================================================

pub fn default_store_path() -> String {
    StoreMode::MEMORY_MARKER.to_string()
}

// =============================================================================
// Pagination Defaults
// =============================================================================

pub fn default_lines_per_page() -> usize {
    15
}

pub fn default_page_timeout_secs() -> u64 {
    120
}

pub fn default_emoji_left() -> String {
    "⬅️".to_string()
}

pub fn default_emoji_right() -> String {
    "➡️".to_string()
}

// =============================================================================
// Console Defaults
// =============================================================================

pub fn default_console_user_id() -> String {
    "console".to_string()
}

pub fn default_console_user_name() -> String {
    "operator".to_string()
}

pub fn default_console_channel() -> String {
    "console".to_string()
}
