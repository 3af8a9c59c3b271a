//! Version-control operations.
//!
//! All operations use `std::process::Command` to shell out to the system `git`
//! binary, inheriting the user's existing git config, hooks and signing setup.

use std::path::{Path, PathBuf};
use std::process::Command;

use git2::Repository;
use tracing::debug;

use crate::error::{CommitError, RepositoryError};

/// Trait for the `git` queries and mutations the workflows need.
///
/// This abstraction allows mocking the repository in tests.
#[cfg_attr(test, mockall::automock)]
pub trait Vcs {
    /// Whether `git status --porcelain` reports anything at all.
    fn has_changes(&self) -> Result<bool, RepositoryError>;

    /// `git status --short` output.
    fn status(&self) -> Result<String, RepositoryError>;

    /// Working tree vs. index, with `a/`/`b/` path prefixes whatever the user's diff config.
    fn unstaged_diff(&self) -> Result<String, RepositoryError>;

    /// Index vs. HEAD.
    fn staged_diff(&self) -> Result<String, RepositoryError>;

    /// Stage every change, including untracked and deleted files.
    fn stage_all(&self) -> Result<(), RepositoryError>;

    /// Create a commit from the index with `message`.
    fn commit(&self, message: &str) -> Result<(), CommitError>;
}

/// [`Vcs`] implementation driving the `git` command-line tool.
#[derive(Debug, Clone)]
pub struct GitCli {
    workdir: PathBuf,
}

impl GitCli {
    /// Find the repository enclosing `path` and bind to its working tree.
    pub fn discover(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        if which::which("git").is_err() {
            return Err(RepositoryError::GitNotInstalled);
        }

        let repo = Repository::discover(path.as_ref()).map_err(RepositoryError::NotARepository)?;
        let workdir = repo
            .workdir()
            .ok_or(RepositoryError::BareRepository)?
            .to_path_buf();

        debug!("Using repository at {}", workdir.display());
        Ok(Self { workdir })
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Run git with `args` in the working tree and return stdout.
    fn run(&self, args: &[&str]) -> Result<String, RepositoryError> {
        let command = format!("git {}", args.join(" "));
        debug!("Running {}", command);

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|source| RepositoryError::SpawnFailed {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(RepositoryError::CommandFailed {
                command,
                code: output.status.code(),
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl Vcs for GitCli {
    fn has_changes(&self) -> Result<bool, RepositoryError> {
        let porcelain = self.run(&["status", "--porcelain"])?;
        Ok(!porcelain.trim().is_empty())
    }

    fn status(&self) -> Result<String, RepositoryError> {
        self.run(&["status", "--short"])
    }

    fn unstaged_diff(&self) -> Result<String, RepositoryError> {
        self.run(&["diff", "--no-color", "--no-ext-diff", "--src-prefix=a/", "--dst-prefix=b/"])
    }

    fn staged_diff(&self) -> Result<String, RepositoryError> {
        self.run(&[
            "diff",
            "--staged",
            "--no-color",
            "--no-ext-diff",
            "--src-prefix=a/",
            "--dst-prefix=b/",
        ])
    }

    fn stage_all(&self) -> Result<(), RepositoryError> {
        self.run(&["add", "-A"]).map(|_| ())
    }

    fn commit(&self, message: &str) -> Result<(), CommitError> {
        match self.run(&["commit", "-m", message]) {
            Ok(_) => Ok(()),
            Err(RepositoryError::CommandFailed { stderr, .. }) => Err(classify_commit_failure(stderr)),
            Err(other) => Err(CommitError::Failed {
                stderr: other.to_string(),
            }),
        }
    }
}

/// Distinguish a missing `user.name`/`user.email` from other commit failures.
fn classify_commit_failure(stderr: String) -> CommitError {
    let lowered = stderr.to_lowercase();
    let identity_markers = [
        "please tell me who you are",
        "user.email",
        "user.name",
        "unable to auto-detect email address",
    ];

    if identity_markers.iter().any(|m| lowered.contains(m)) {
        CommitError::MissingIdentity { stderr }
    } else {
        CommitError::Failed { stderr }
    }
}
