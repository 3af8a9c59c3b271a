//! Instruction template lookup.
//!
//! Resolution order:
//! 1. `$BETTER_COMMIT_PROMPT_DIR/<kind>.txt` (must exist when the variable is set)
//! 2. `<directory of the executable>/prompts/<kind>.txt`
//! 3. The copy of `prompts/<kind>.txt` compiled into the binary

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Config;
use crate::error::TemplateError;

/// Output ceiling for commit messages.
pub const COMMIT_MAX_TOKENS: u32 = 1024;

/// Output ceiling for review text.
pub const REVIEW_MAX_TOKENS: u32 = 2048;

const EMBEDDED_COMMIT: &str = include_str!("../../prompts/commit.txt");
const EMBEDDED_REVIEW: &str = include_str!("../../prompts/review.txt");

/// Which tool a prompt is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Commit,
    Review,
}

impl PromptKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            PromptKind::Commit => "commit.txt",
            PromptKind::Review => "review.txt",
        }
    }

    pub fn max_tokens(&self) -> u32 {
        match self {
            PromptKind::Commit => COMMIT_MAX_TOKENS,
            PromptKind::Review => REVIEW_MAX_TOKENS,
        }
    }

    fn embedded(&self) -> &'static str {
        match self {
            PromptKind::Commit => EMBEDDED_COMMIT,
            PromptKind::Review => EMBEDDED_REVIEW,
        }
    }
}

/// Load the template for `kind` using the configured lookup order.
pub fn load_template(config: &Config, kind: PromptKind) -> Result<String, TemplateError> {
    let exe_dir = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    load_template_from(config.prompt_dir.as_deref(), exe_dir.as_deref(), kind)
}

fn load_template_from(
    override_dir: Option<&Path>,
    exe_dir: Option<&Path>,
    kind: PromptKind,
) -> Result<String, TemplateError> {
    if let Some(dir) = override_dir {
        let path = dir.join(kind.file_name());
        if !path.is_file() {
            return Err(TemplateError::Missing { path });
        }
        return read(path);
    }

    if let Some(path) = exe_dir
        .map(|dir| dir.join("prompts").join(kind.file_name()))
        .filter(|p| p.is_file())
    {
        return read(path);
    }

    debug!("Using built-in {} template", kind.file_name());
    Ok(kind.embedded().to_string())
}

fn read(path: PathBuf) -> Result<String, TemplateError> {
    debug!("Loading prompt template from {}", path.display());
    fs::read_to_string(&path).map_err(|source| TemplateError::ReadFailed { path, source })
}
