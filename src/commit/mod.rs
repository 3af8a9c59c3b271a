//! The `commit` workflow: stage everything, ask the model for a message,
//! and create the commit.

pub mod message;

pub use message::strip_code_fences;

use crossterm::style::Color;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{CommitError, ModelError, WorkflowError};
use crate::git::{ChangeSet, Vcs, collect_changes};
use crate::llm::ModelClient;
use crate::output;
use crate::prompt::{PromptKind, compose, load_template};

/// How a `commit` run ended without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The working tree was clean; nothing was staged or sent.
    NoChanges,
    Committed { message: String },
}

/// Run the commit workflow against `vcs`.
///
/// `connect` builds the model client. It is called only once there is
/// something to commit, and before anything is staged, so a missing
/// credential leaves the index untouched.
pub async fn run_commit<V, C, F>(
    vcs: &V,
    config: &Config,
    connect: F,
) -> Result<CommitOutcome, WorkflowError>
where
    V: Vcs + ?Sized,
    C: ModelClient,
    F: FnOnce() -> Result<C, ModelError>,
{
    output::step("🔍 Checking for uncommitted changes...");
    let Some(changes) = collect_changes(vcs)? else {
        output::notice("No uncommitted changes found. Nothing to commit.");
        return Ok(CommitOutcome::NoChanges);
    };

    output::panel("Git Status", &changes.status, Color::Cyan);

    let template = load_template(config, PromptKind::Commit)?;
    let client = connect()?;

    let staged = stage_all(vcs, &changes)?;
    let message = generate_and_commit(vcs, &client, &template, &staged).await?;

    Ok(CommitOutcome::Committed { message })
}

/// Stage every change and return the change set as the index now sees it.
pub fn stage_all<V: Vcs + ?Sized>(vcs: &V, changes: &ChangeSet) -> Result<ChangeSet, CommitError> {
    output::step("📦 Staging all changes...");
    vcs.stage_all().map_err(CommitError::Staging)?;
    let staged_diff = vcs.staged_diff().map_err(CommitError::Staging)?;
    Ok(changes.after_staging(staged_diff))
}

/// Ask the model for a message describing `changes` and commit the index with it.
///
/// Returns the message that was committed.
pub async fn generate_and_commit<V, C>(
    vcs: &V,
    client: &C,
    template: &str,
    changes: &ChangeSet,
) -> Result<String, WorkflowError>
where
    V: Vcs + ?Sized,
    C: ModelClient + ?Sized,
{
    output::step(&format!(
        "🤖 Generating commit message with {}...",
        client.model_name()
    ));

    let prompt = compose(template, changes);
    debug!("Commit prompt is {} bytes", prompt.len());

    let raw = client
        .complete(&prompt, PromptKind::Commit.max_tokens())
        .await?;
    let message = strip_code_fences(&raw);

    output::panel("📝 Commit Message", &message, Color::Green);

    output::step("💾 Creating commit...");
    vcs.commit(&message)?;
    info!("Created commit: {}", message.lines().next().unwrap_or_default());
    output::success("✓ Commit created successfully!");

    Ok(message)
}
