//! Removal of non-substantive files (lock files, generated and binary artifacts)
//! from unified diffs before they are sent for review.

use tracing::debug;

use crate::git::ChangeSet;

/// Prefix of the per-file header line in `git diff` output.
const FILE_HEADER: &str = "diff --git ";

/// Per-file header prefixes of combined diffs (unmerged paths during a merge).
const COMBINED_HEADERS: [&str; 2] = ["diff --cc ", "diff --combined "];

/// A basename pattern that marks a file as noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterRule {
    /// Basename equals this exactly.
    Exact(&'static str),
    /// Basename ends with this (ASCII case-insensitive).
    Suffix(&'static str),
}

impl FilterRule {
    pub fn matches(&self, basename: &str) -> bool {
        match self {
            FilterRule::Exact(name) => basename == *name,
            FilterRule::Suffix(suffix) => {
                basename.len() >= suffix.len()
                    && basename.is_char_boundary(basename.len() - suffix.len())
                    && basename[basename.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
            }
        }
    }
}

/// Files excluded from review.
pub const DENY_LIST: &[FilterRule] = &[
    // Dependency lock files
    FilterRule::Exact("package-lock.json"),
    FilterRule::Exact("npm-shrinkwrap.json"),
    FilterRule::Exact("yarn.lock"),
    FilterRule::Exact("pnpm-lock.yaml"),
    FilterRule::Exact("bun.lockb"),
    FilterRule::Exact("poetry.lock"),
    FilterRule::Exact("Pipfile.lock"),
    FilterRule::Exact("uv.lock"),
    FilterRule::Exact("Cargo.lock"),
    FilterRule::Exact("Gemfile.lock"),
    FilterRule::Exact("composer.lock"),
    FilterRule::Exact("go.sum"),
    FilterRule::Exact("flake.lock"),
    FilterRule::Suffix(".lock"),
    // Minified and generated output
    FilterRule::Suffix(".min.js"),
    FilterRule::Suffix(".min.css"),
    FilterRule::Suffix(".map"),
    FilterRule::Suffix(".pb.go"),
    FilterRule::Suffix("_pb2.py"),
    FilterRule::Suffix(".snap"),
    // Binary assets
    FilterRule::Suffix(".png"),
    FilterRule::Suffix(".jpg"),
    FilterRule::Suffix(".jpeg"),
    FilterRule::Suffix(".gif"),
    FilterRule::Suffix(".ico"),
    FilterRule::Suffix(".webp"),
    FilterRule::Suffix(".pdf"),
    FilterRule::Suffix(".zip"),
    FilterRule::Suffix(".gz"),
    FilterRule::Suffix(".tar"),
    FilterRule::Suffix(".woff"),
    FilterRule::Suffix(".woff2"),
    FilterRule::Suffix(".ttf"),
    FilterRule::Suffix(".otf"),
    FilterRule::Suffix(".exe"),
    FilterRule::Suffix(".dll"),
    FilterRule::Suffix(".so"),
    FilterRule::Suffix(".dylib"),
    FilterRule::Suffix(".wasm"),
];

/// Whether a repository path is noise according to [`DENY_LIST`].
pub fn is_noise(path: &str) -> bool {
    let basename = path.rsplit('/').next().unwrap_or(path);
    DENY_LIST.iter().any(|rule| rule.matches(basename))
}

/// Drop every per-file section whose path is noise.
///
/// Kept sections (and any text before the first header) are copied
/// byte-for-byte in their original order. A diff made only of noise
/// becomes an empty string.
pub fn filter_diff(diff: &str) -> String {
    let mut kept = String::with_capacity(diff.len());
    let mut skipping = false;
    let mut dropped = 0usize;

    for line in diff.split_inclusive('\n') {
        if let Some(path) = section_header(line.trim_end_matches(['\n', '\r'])) {
            skipping = path.as_deref().is_some_and(is_noise);
            if skipping {
                dropped += 1;
                debug!("Filtered noise file from diff: {}", path.unwrap_or_default());
            }
        }

        if !skipping {
            kept.push_str(line);
        }
    }

    if dropped > 0 {
        debug!("Dropped {} noise file(s) from diff", dropped);
    }

    kept
}

/// Filter both diffs of a change set; status text is left untouched.
pub fn filter_changes(changes: &ChangeSet) -> ChangeSet {
    ChangeSet {
        status: changes.status.clone(),
        staged_diff: filter_diff(&changes.staged_diff),
        unstaged_diff: filter_diff(&changes.unstaged_diff),
    }
}

/// Path named by a line that starts a per-file section.
///
/// `None` when the line is not a section header; `Some(None)` when it is
/// one but the path cannot be recovered, in which case the section is kept.
fn section_header(line: &str) -> Option<Option<String>> {
    if let Some(header) = line.strip_prefix(FILE_HEADER) {
        return Some(header_path(header));
    }
    let path = COMBINED_HEADERS
        .iter()
        .find_map(|prefix| line.strip_prefix(prefix))?;
    match path.strip_prefix('"').and_then(|p| p.strip_suffix('"')) {
        Some(quoted) => Some(Some(unescape_quoted(quoted))),
        None => Some(Some(path.to_string())),
    }
}

/// Extract the post-image path from the text after `diff --git `.
///
/// Handles quoted paths (`"a/x y" "b/x y"`) and unquoted paths containing
/// spaces, where the `a/` and `b/` halves are the same for non-renames.
fn header_path(header: &str) -> Option<String> {
    if header.ends_with('"') {
        let start = header[..header.len() - 1].rfind(" \"")? + 2;
        let quoted = &header[start..header.len() - 1];
        let path = unescape_quoted(quoted);
        return path.strip_prefix("b/").map(str::to_string);
    }

    // "a/P b/P": equal halves split on the middle space.
    let len = header.len();
    if len % 2 == 1 {
        let mid = len / 2;
        if header.is_char_boundary(mid) && header.as_bytes()[mid] == b' ' {
            let (old, new) = (&header[..mid], &header[mid + 1..]);
            if let (Some(old), Some(new)) = (old.strip_prefix("a/"), new.strip_prefix("b/"))
                && old == new
            {
                return Some(new.to_string());
            }
        }
    }

    // Renames: fall back to the last " b/" separator.
    let idx = header.rfind(" b/")?;
    Some(header[idx + 3..].to_string())
}

/// Undo git's C-style quoting for the common escapes.
fn unescape_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
