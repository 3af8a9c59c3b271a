//! `commit` - stage all changes and commit them with a generated message.

use std::process::ExitCode;

use clap::Parser;

use best_commits::cli;
use best_commits::{CommitOutcome, Config, GitCli, HttpModelClient, WorkflowError, run_commit};

/// Stage all changes and commit them with an AI-generated message.
#[derive(Parser, Debug)]
#[command(name = "commit")]
#[command(about = "Stage all changes and commit them with an AI-generated message")]
#[command(version)]
struct Cli {}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let _cli = Cli::parse();
    cli::init_tracing();

    let config = Config::from_env();
    cli::finish(run(&config).await)
}

async fn run(config: &Config) -> Result<CommitOutcome, WorkflowError> {
    let vcs = GitCli::discover(".")?;
    run_commit(&vcs, config, || HttpModelClient::from_config(config)).await
}
