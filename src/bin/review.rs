//! `review` - AI code review of pending changes, optionally followed by a commit.

use std::process::ExitCode;

use clap::Parser;

use best_commits::cli;
use best_commits::{
    Config, GitCli, HttpModelClient, ReviewOutcome, TerminalDecision, WorkflowError, run_review,
};

/// Review uncommitted changes with AI, then optionally commit them.
#[derive(Parser, Debug)]
#[command(name = "review")]
#[command(about = "Review uncommitted changes with AI, then optionally commit them")]
#[command(version)]
struct Cli {}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let _cli = Cli::parse();
    cli::init_tracing();

    let config = Config::from_env();
    cli::finish(run(&config).await)
}

async fn run(config: &Config) -> Result<ReviewOutcome, WorkflowError> {
    let vcs = GitCli::discover(".")?;
    run_review(
        &vcs,
        config,
        || HttpModelClient::from_config(config),
        &TerminalDecision,
    )
    .await
}
