//! The `review` workflow: send the filtered changes for a code review, show
//! it, and commit on request.

pub mod decision;
pub mod filter;
pub mod render;

pub use decision::{DecisionProvider, FixedDecision, TerminalDecision, is_affirmative};
pub use filter::{filter_changes, filter_diff};
pub use render::render_markdown;

use crossterm::style::Color;
use tracing::{debug, info};

use crate::commit::{generate_and_commit, stage_all};
use crate::config::{Config, ReviewChainDiff};
use crate::error::{ModelError, WorkflowError};
use crate::git::{Vcs, collect_changes};
use crate::llm::ModelClient;
use crate::output;
use crate::prompt::{PromptKind, compose, load_template};

/// Question asked once the review has been shown.
pub const PROCEED_PROMPT: &str = "Proceed with commit? (y/n)";

/// How a `review` run ended without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOutcome {
    NoChanges,
    /// The review was shown and the user chose not to commit.
    Declined,
    Committed { message: String },
}

/// Run the review workflow, chaining into a commit when `decider` agrees.
///
/// The commit reuses the same client. Which diff it sees is chosen by
/// [`Config::chain_diff`].
pub async fn run_review<V, C, F, D>(
    vcs: &V,
    config: &Config,
    connect: F,
    decider: &D,
) -> Result<ReviewOutcome, WorkflowError>
where
    V: Vcs + ?Sized,
    C: ModelClient,
    F: FnOnce() -> Result<C, ModelError>,
    D: DecisionProvider + ?Sized,
{
    output::step("🔍 Checking for uncommitted changes...");
    let Some(changes) = collect_changes(vcs)? else {
        output::notice("No uncommitted changes found. Nothing to review.");
        return Ok(ReviewOutcome::NoChanges);
    };

    output::panel("Git Status", &changes.status, Color::Cyan);

    let filtered = filter_changes(&changes);
    let template = load_template(config, PromptKind::Review)?;
    let client = connect()?;

    output::step(&format!(
        "🤖 Analyzing changes with {}...",
        client.model_name()
    ));
    let prompt = compose(&template, &filtered);
    debug!("Review prompt is {} bytes", prompt.len());

    let review = client
        .complete(&prompt, PromptKind::Review.max_tokens())
        .await?;
    let styled = output::stdout_styled();
    output::panel("📋 Code Review", &render_markdown(&review, styled), Color::Blue);

    if !decider.confirm(PROCEED_PROMPT) {
        output::notice("Commit cancelled. Review your changes and run again when ready.");
        return Ok(ReviewOutcome::Declined);
    }

    info!("Review accepted, committing");
    output::step("🚀 Committing reviewed changes...");
    let commit_template = load_template(config, PromptKind::Commit)?;
    let staged = stage_all(vcs, &changes)?;
    let commit_changes = match config.chain_diff {
        ReviewChainDiff::Unfiltered => staged,
        ReviewChainDiff::Filtered => filter_changes(&staged),
    };
    let message = generate_and_commit(vcs, &client, &commit_template, &commit_changes).await?;

    Ok(ReviewOutcome::Committed { message })
}
