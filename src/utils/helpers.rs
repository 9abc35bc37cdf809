//! Helper functions for building reply text
//!
//! Replies are sent with Telegram's HTML parse mode, so any user-supplied
//! text must be escaped before it is embedded.

/// Escape the characters that are significant in Telegram HTML
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Wrap escaped text in a bold tag
pub fn bold(text: &str) -> String {
    format!("<b>{}</b>", escape_html(text))
}

/// Normalize a word typed by the user
///
/// Surrounding whitespace is dropped. Empty words and words spanning several
/// lines are rejected because the action token format is newline-delimited.
pub fn normalize_word(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.contains('\n') || trimmed.contains('\r') {
        None
    } else {
        Some(trimmed.to_string())
    }
}
