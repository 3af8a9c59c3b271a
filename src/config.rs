//! Process-wide configuration, read from the environment once at startup.
//!
//! Every component receives a `&Config` instead of reading environment
//! variables itself, so tests can build one from a plain lookup function.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use tracing::warn;

use crate::llm::provider::{DEFAULT_MODEL, LEGACY_CREDENTIAL_VAR, Provider};

/// Model identifier override.
pub const MODEL_ENV_VAR: &str = "BETTER_COMMIT_MODEL";

/// Base URL override applied to whichever provider is selected.
pub const API_BASE_ENV_VAR: &str = "BETTER_COMMIT_API_BASE";

/// Directory holding `commit.txt` / `review.txt` templates.
pub const PROMPT_DIR_ENV_VAR: &str = "BETTER_COMMIT_PROMPT_DIR";

/// Which change set `review` hands to the commit step.
pub const CHAIN_DIFF_ENV_VAR: &str = "BETTER_COMMIT_CHAIN_DIFF";

/// Which diff the review step passes on when the user chooses to commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewChainDiff {
    /// The change set exactly as collected, lock files included.
    #[default]
    Unfiltered,
    /// The noise-filtered change set that was shown to the reviewer model.
    Filtered,
}

impl ReviewChainDiff {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "unfiltered" | "full" => Some(ReviewChainDiff::Unfiltered),
            "filtered" => Some(ReviewChainDiff::Filtered),
            _ => None,
        }
    }
}

/// Immutable configuration snapshot.
#[derive(Clone)]
pub struct Config {
    pub model: String,
    pub api_base: Option<String>,
    pub prompt_dir: Option<PathBuf>,
    pub chain_diff: ReviewChainDiff,
    credentials: HashMap<Provider, String>,
    legacy_credential: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut providers: Vec<&str> = self.credentials.keys().map(|p| p.as_str()).collect();
        providers.sort_unstable();
        f.debug_struct("Config")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("prompt_dir", &self.prompt_dir)
            .field("chain_diff", &self.chain_diff)
            .field("credentials_for", &providers)
            .field("legacy_credential", &self.legacy_credential.is_some())
            .finish()
    }
}

impl Config {
    /// Snapshot the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a snapshot from an arbitrary variable source.
    ///
    /// Empty values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let credentials = Provider::ALL
            .iter()
            .filter_map(|p| get(p.credential_var()).map(|key| (*p, key)))
            .collect();

        let chain_diff = match get(CHAIN_DIFF_ENV_VAR) {
            Some(v) => ReviewChainDiff::parse(&v).unwrap_or_else(|| {
                warn!(
                    "Invalid {} value '{}', using default (unfiltered)",
                    CHAIN_DIFF_ENV_VAR, v
                );
                ReviewChainDiff::default()
            }),
            None => ReviewChainDiff::default(),
        };

        Self {
            model: get(MODEL_ENV_VAR)
                .map(|m| m.trim().to_string())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base: get(API_BASE_ENV_VAR).map(|b| b.trim_end_matches('/').to_string()),
            prompt_dir: get(PROMPT_DIR_ENV_VAR).map(PathBuf::from),
            chain_diff,
            credentials,
            legacy_credential: get(LEGACY_CREDENTIAL_VAR),
        }
    }

    /// API key from the provider's own variable, if set.
    pub fn credential(&self, provider: Provider) -> Option<&str> {
        self.credentials.get(&provider).map(String::as_str)
    }

    /// Value of the legacy `GIT_API_KEY` variable, if set.
    pub fn legacy_credential(&self) -> Option<&str> {
        self.legacy_credential.as_deref()
    }
}
