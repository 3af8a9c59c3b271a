//! Shared setup and exit handling for the `commit` and `review` binaries.

use std::process::ExitCode;

use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::error::WorkflowError;
use crate::output;

/// Filter directives for diagnostic logging, e.g. `best_commits=debug`.
pub const LOG_ENV_VAR: &str = "BETTER_COMMIT_LOG";

const DEFAULT_LOG_FILTER: &str = "warn";

/// Install the stderr log subscriber. Safe to call more than once.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Map a workflow result to the process exit code, reporting any error.
///
/// Every successful outcome (including "nothing to do" and a declined
/// review) exits 0.
pub fn finish<T>(result: Result<T, WorkflowError>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

/// Print the error line and, when there is one, a remediation hint.
pub fn report(err: &WorkflowError) {
    debug!("{:?}", err);
    output::error(&err.to_string());
    if let Some(hint) = err.hint() {
        output::hint(&hint);
    }
}
