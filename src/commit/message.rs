//! Clean-up of generated commit messages.

use std::sync::LazyLock;

use regex_lite::Regex;

static OPENING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\A```[a-z]*\n?").expect("Invalid regex"));

static CLOSING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\n?```\z").expect("Invalid regex"));

/// Remove a markdown code fence wrapped around the whole message.
///
/// Models sometimes answer with the message inside ```` ```text ... ``` ````.
/// Only a fence at the very start and one at the very end are removed;
/// backticks inside the message are left alone.
pub fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    let without_open = OPENING_FENCE.replace(trimmed, "");
    let without_close = CLOSING_FENCE.replace(&without_open, "");
    without_close.trim().to_string()
}
