//! best-commits - LLM-written commit messages and pre-commit code reviews.
//!
//! # Overview
//!
//! Two command-line tools share this library:
//!
//! - `commit` stages every pending change, asks a language model for a
//!   commit message describing the diff, and creates the commit.
//! - `review` sends the pending diff (minus lock files and other noise) for
//!   a code review, renders it in the terminal, and on confirmation runs the
//!   commit workflow in the same process.
//!
//! The model is chosen with `BETTER_COMMIT_MODEL` and authenticated with
//! the provider's usual API key variable.

pub mod cli;
pub mod commit;
pub mod config;
pub mod error;
pub mod git;
pub mod llm;
pub mod output;
pub mod prompt;
pub mod review;

// Re-export commonly used types
pub use commit::{CommitOutcome, run_commit};
pub use config::{Config, ReviewChainDiff};
pub use error::{CommitError, ModelError, RepositoryError, TemplateError, WorkflowError};
pub use git::{ChangeSet, GitCli, Vcs};
pub use llm::{HttpModelClient, ModelClient, Provider};
pub use review::{DecisionProvider, FixedDecision, ReviewOutcome, TerminalDecision, run_review};
