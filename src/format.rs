//! Markdown helpers for chat replies.

/// Zero-width space, used to defuse mentions.
const ZERO_WIDTH_SPACE: char = '\u{200B}';

pub fn bold(text: &str) -> String {
    format!("**{text}**")
}

pub fn italics(text: &str) -> String {
    format!("*{text}*")
}

pub fn underline(text: &str) -> String {
    format!("__{text}__")
}

/// Inline code span.
pub fn code(text: &str) -> String {
    format!("`{text}`")
}

/// Fenced code block.
pub fn block(text: &str) -> String {
    format!("```{text}```")
}

/// Break user, role and mass mentions so quoting text never pings anyone.
pub fn unmention(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        out.push(c);
        match c {
            '@' => out.push(ZERO_WIDTH_SPACE),
            '<' if matches!(chars.peek(), Some('@') | Some('#')) => out.push(ZERO_WIDTH_SPACE),
            _ => {}
        }
    }
    out
}

/// Join items as "`a` or `b` or `c`", with `article` before each item.
pub fn or_list(items: &[&str], article: &str) -> String {
    items
        .iter()
        .map(|item| format!("{article}{}", code(item)))
        .collect::<Vec<_>>()
        .join(" or ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrappers() {
        assert_eq!(bold("#0"), "**#0**");
        assert_eq!(italics("Error: x"), "*Error: x*");
        assert_eq!(block("hi"), "```hi```");
    }

    #[test]
    fn test_unmention_breaks_pings() {
        let out = unmention("hey @everyone and <@123>");
        assert!(!out.contains("@everyone"));
        assert!(!out.contains("<@123>"));
        assert_eq!(out.replace(ZERO_WIDTH_SPACE, ""), "hey @everyone and <@123>");
    }

    #[test]
    fn test_or_list() {
        assert_eq!(or_list(&["mod"], "a "), "a `mod`");
        assert_eq!(or_list(&["mods", "admins"], ""), "`mods` or `admins`");
    }
}
