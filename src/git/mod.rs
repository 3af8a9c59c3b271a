//! Git operations: repository discovery, change collection, staging and committing.

pub mod changes;
pub mod vcs;

pub use changes::{ChangeSet, collect_changes};
pub use vcs::{GitCli, Vcs};
