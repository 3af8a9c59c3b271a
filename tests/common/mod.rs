//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::Path;

use best_commits::Config;
use git2::{Oid, Repository, Signature, StatusOptions};
use serde_json::{Value, json};

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory.
    ///
    /// Identity and signing are configured locally so `git commit` works
    /// regardless of the machine's global config.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        {
            let mut config = repo.config().expect("Failed to open repo config");
            config.set_str("user.name", "Test User").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
            config.set_bool("commit.gpgsign", false).unwrap();
        }
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn write_file(&self, relative: &str, content: &str) {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&path, content).expect("Failed to write test file");
    }

    /// Stage the given paths and commit them. Returns the commit OID.
    pub fn commit_files(&self, paths: &[&str], message: &str) -> Oid {
        let sig = Signature::now("Test User", "test@example.com").expect("Failed to create signature");

        let mut index = self.repo.index().expect("Failed to get index");
        for path in paths {
            index.add_path(Path::new(path)).expect("Failed to add file");
        }
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Number of commits reachable from HEAD (0 for an unborn branch).
    pub fn commit_count(&self) -> usize {
        let Ok(mut walk) = self.repo.revwalk() else {
            return 0;
        };
        if walk.push_head().is_err() {
            return 0;
        }
        walk.count()
    }

    /// Full message of the HEAD commit.
    pub fn head_message(&self) -> String {
        let commit = self
            .repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .expect("HEAD has no commit");
        commit.message().unwrap_or_default().to_string()
    }

    /// Whether the working tree and index match HEAD (untracked included).
    pub fn is_clean(&self) -> bool {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true).recurse_untracked_dirs(true);
        self.repo
            .statuses(Some(&mut opts))
            .expect("Failed to read status")
            .is_empty()
    }

    /// Number of index entries that differ from HEAD.
    pub fn staged_count(&self) -> usize {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true);
        self.repo
            .statuses(Some(&mut opts))
            .expect("Failed to read status")
            .iter()
            .filter(|entry| {
                let status = entry.status();
                status.is_index_new()
                    || status.is_index_modified()
                    || status.is_index_deleted()
                    || status.is_index_renamed()
            })
            .count()
    }
}

/// Configuration pointing at a mock server with an Anthropic key set.
pub fn mock_config(base_url: &str) -> Config {
    config_from(&[
        ("ANTHROPIC_API_KEY", "sk-ant-test"),
        ("BETTER_COMMIT_API_BASE", base_url),
    ])
}

/// Configuration built from explicit key/value pairs only.
pub fn config_from(vars: &[(&str, &str)]) -> Config {
    let vars: Vec<(String, String)> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(move |key| {
        vars.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    })
}

/// Anthropic Messages API success body.
pub fn anthropic_reply(text: &str) -> Value {
    json!({
        "id": "msg_test",
        "type": "message",
        "role": "assistant",
        "model": "claude-haiku-4-5-20251001",
        "content": [{ "type": "text", "text": text }],
        "stop_reason": "end_turn",
        "usage": { "input_tokens": 10, "output_tokens": 5 }
    })
}

/// OpenAI-compatible chat completion success body.
pub fn chat_reply(text: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": text },
            "finish_reason": "stop"
        }]
    })
}
