//! Prompt construction: instruction template plus the collected changes.

pub mod template;

pub use template::{COMMIT_MAX_TOKENS, PromptKind, REVIEW_MAX_TOKENS, load_template};

use crate::git::ChangeSet;

/// Build the request body for the model.
///
/// Pure concatenation: identical inputs always give identical output.
/// Status and diff text are interpolated byte-for-byte; a diff is replaced
/// by its placeholder only when it is empty.
pub fn compose(template: &str, changes: &ChangeSet) -> String {
    format!(
        "{template}\n\n\
         Git Status:\n{status}\n\n\
         Staged Changes:\n{staged}\n\n\
         Unstaged Changes:\n{unstaged}\n",
        template = template.trim_end(),
        status = changes.status,
        staged = or_placeholder(&changes.staged_diff, "(no staged changes)"),
        unstaged = or_placeholder(&changes.unstaged_diff, "(no unstaged changes)"),
    )
}

fn or_placeholder<'a>(text: &'a str, placeholder: &'a str) -> &'a str {
    if text.is_empty() { placeholder } else { text }
}
