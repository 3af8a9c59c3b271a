//! Collection of pending changes from the working tree.

use tracing::debug;

use crate::error::RepositoryError;

use super::vcs::Vcs;

/// Status and diff text for one run, exactly as `git` reported it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub status: String,
    pub staged_diff: String,
    pub unstaged_diff: String,
}

impl ChangeSet {
    /// The change set as seen after `git add -A`: everything is staged.
    pub fn after_staging(&self, staged_diff: String) -> Self {
        Self {
            status: self.status.clone(),
            staged_diff,
            unstaged_diff: String::new(),
        }
    }
}

/// Collect status and diffs, or `None` when the working tree is clean.
///
/// A clean tree is not an error: callers report it and exit successfully.
pub fn collect_changes<V: Vcs + ?Sized>(vcs: &V) -> Result<Option<ChangeSet>, RepositoryError> {
    if !vcs.has_changes()? {
        debug!("Working tree is clean");
        return Ok(None);
    }

    let changes = ChangeSet {
        status: vcs.status()?,
        staged_diff: vcs.staged_diff()?,
        unstaged_diff: vcs.unstaged_diff()?,
    };

    debug!(
        "Collected changes: {} status bytes, {} staged bytes, {} unstaged bytes",
        changes.status.len(),
        changes.staged_diff.len(),
        changes.unstaged_diff.len()
    );

    Ok(Some(changes))
}
