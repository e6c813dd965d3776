//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use git2::{Oid, Repository, Signature};

use changes::release::StrategyConfig;

/// Create a temporary directory for test output.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Write a fragment file into `logs_dir`, creating the directory if needed.
pub fn write_fragment(logs_dir: &Path, name: &str, content: &str) -> PathBuf {
    std::fs::create_dir_all(logs_dir).expect("Failed to create logs dir");
    let path = logs_dir.join(name);
    std::fs::write(&path, content).expect("Failed to write fragment");
    path
}

/// Strategy config with the given change types and a date-free release template.
pub fn strategy_config(change_types: &[&str]) -> StrategyConfig {
    StrategyConfig {
        change_types: change_types.iter().map(|s| s.to_string()).collect(),
        release_template: "## {{ releaseNumber }}\n{% for group in entryGroups %}### {{ group.label | capitalize }}\n{% for item in group.items %}- {{ item }}\n{% endfor %}{% endfor %}".to_string(),
        ..Default::default()
    }
}

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Get the test signature for commits.
    fn signature(&self) -> Signature<'_> {
        Signature::now("Test User", "test@example.com").expect("Failed to create signature")
    }

    /// Commit `file` with `content`. Returns the commit OID.
    pub fn commit_file(&self, file: &str, content: &str, message: &str) -> Oid {
        let sig = self.signature();

        std::fs::write(self.dir.path().join(file), content).expect("Failed to write test file");

        let mut index = self.repo.index().expect("Failed to get index");
        index.add_path(Path::new(file)).expect("Failed to add file");
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Create a branch at `oid` and point HEAD at it.
    pub fn checkout_new_branch(&self, name: &str, oid: Oid) {
        let commit = self.repo.find_commit(oid).expect("Failed to find commit");
        self.repo
            .branch(name, &commit, false)
            .expect("Failed to create branch");
        self.repo
            .set_head(&format!("refs/heads/{name}"))
            .expect("Failed to set HEAD");
    }

    /// Short name of the branch HEAD points at.
    pub fn head_branch(&self) -> String {
        self.repo
            .head()
            .expect("Failed to read HEAD")
            .shorthand()
            .expect("HEAD has no name")
            .to_string()
    }
}
