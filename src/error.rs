//! Error types for best-commits modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

use crate::llm::Provider;

/// Errors from locating the repository or running `git`.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("git executable not found on PATH")]
    GitNotInstalled,

    #[error("Not a git repository: {}", .0.message())]
    NotARepository(#[source] git2::Error),

    #[error("Bare repositories are not supported (no working tree)")]
    BareRepository,

    #[error("Failed to run `{command}`: {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed with {}: {stderr}",
        code.map_or("unknown status".to_string(), |c| format!("exit code {c}")))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

/// Errors from loading an instruction template.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Prompt template not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("Failed to read prompt template {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from resolving or calling the language model.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("No API credential found for {provider}: {env_var} is not set")]
    MissingCredential {
        provider: Provider,
        env_var: &'static str,
        legacy: Option<&'static str>,
    },

    #[error("Request to model provider failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("{provider} API returned HTTP {status}: {message}")]
    Api {
        provider: Provider,
        status: u16,
        message: String,
    },

    #[error("{provider} returned a malformed response: {detail}")]
    MalformedResponse { provider: Provider, detail: String },

    #[error("{provider} returned no content")]
    EmptyResponse { provider: Provider },
}

/// Errors from staging or creating the commit.
#[derive(Error, Debug)]
pub enum CommitError {
    #[error("Failed to stage changes: {0}")]
    Staging(#[source] RepositoryError),

    #[error("Git identity is not configured: {stderr}")]
    MissingIdentity { stderr: String },

    #[error("git commit failed: {stderr}")]
    Failed { stderr: String },
}

/// Any failure that ends a `commit` or `review` run.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Commit(#[from] CommitError),
}

impl WorkflowError {
    /// One-line remediation shown under the error, if there is an obvious one.
    pub fn hint(&self) -> Option<String> {
        match self {
            WorkflowError::Repository(RepositoryError::GitNotInstalled) => {
                Some("Install git and make sure it is on your PATH.".to_string())
            }
            WorkflowError::Repository(RepositoryError::NotARepository(_)) => {
                Some("Run this command from inside a git repository.".to_string())
            }
            WorkflowError::Repository(_) => None,
            WorkflowError::Template(TemplateError::Missing { .. }) => Some(
                "Check BETTER_COMMIT_PROMPT_DIR or unset it to use the built-in template."
                    .to_string(),
            ),
            WorkflowError::Template(TemplateError::ReadFailed { .. }) => None,
            WorkflowError::Model(ModelError::MissingCredential {
                env_var, legacy, ..
            }) => Some(match legacy {
                Some(legacy) => format!("Set {env_var} (or the legacy {legacy})."),
                None => format!("Set {env_var}."),
            }),
            WorkflowError::Model(ModelError::Api {
                provider, status, ..
            }) if *status == 401 || *status == 403 => Some(format!(
                "Make sure {} holds a valid key for {provider}.",
                provider.credential_var()
            )),
            WorkflowError::Model(_) => None,
            WorkflowError::Commit(CommitError::MissingIdentity { .. }) => Some(
                "Run `git config user.name \"Your Name\"` and `git config user.email you@example.com`."
                    .to_string(),
            ),
            WorkflowError::Commit(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_a_repository_display_omits_git2_class_and_code() {
        let err = RepositoryError::NotARepository(git2::Error::new(
            git2::ErrorCode::NotFound,
            git2::ErrorClass::Repository,
            "could not find repository at '/tmp/plain'",
        ));
        assert_eq!(
            err.to_string(),
            "Not a git repository: could not find repository at '/tmp/plain'"
        );
        assert!(!err.to_string().contains("class="));
    }

    #[test]
    fn test_command_failed_display_includes_code_and_stderr() {
        let err = RepositoryError::CommandFailed {
            command: "git status --porcelain".to_string(),
            code: Some(128),
            stderr: "fatal: not a git repository".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("git status --porcelain"));
        assert!(msg.contains("exit code 128"));
        assert!(msg.contains("fatal: not a git repository"));
    }

    #[test]
    fn test_command_failed_display_without_code() {
        let err = RepositoryError::CommandFailed {
            command: "git diff".to_string(),
            code: None,
            stderr: String::new(),
        };
        assert!(err.to_string().contains("unknown status"));
    }

    #[test]
    fn test_missing_credential_hint_mentions_legacy_for_default_provider() {
        let err = WorkflowError::from(ModelError::MissingCredential {
            provider: Provider::Anthropic,
            env_var: "ANTHROPIC_API_KEY",
            legacy: Some("GIT_API_KEY"),
        });
        let hint = err.hint().unwrap();
        assert!(hint.contains("ANTHROPIC_API_KEY"));
        assert!(hint.contains("GIT_API_KEY"));
    }

    #[test]
    fn test_missing_credential_hint_without_legacy() {
        let err = WorkflowError::from(ModelError::MissingCredential {
            provider: Provider::OpenAi,
            env_var: "OPENAI_API_KEY",
            legacy: None,
        });
        assert_eq!(err.hint().unwrap(), "Set OPENAI_API_KEY.");
    }

    #[test]
    fn test_auth_failure_hint_names_credential_var() {
        let err = WorkflowError::from(ModelError::Api {
            provider: Provider::Groq,
            status: 401,
            message: "invalid api key".to_string(),
        });
        assert!(err.hint().unwrap().contains("GROQ_API_KEY"));

        let server_error = WorkflowError::from(ModelError::Api {
            provider: Provider::Groq,
            status: 500,
            message: "boom".to_string(),
        });
        assert!(server_error.hint().is_none());
    }

    #[test]
    fn test_workflow_error_is_transparent() {
        let err = WorkflowError::from(CommitError::Failed {
            stderr: "hook rejected".to_string(),
        });
        assert_eq!(err.to_string(), "git commit failed: hook rejected");
    }
}
