//! Test support utilities for dotsync integration tests.
//!
//! Every test gets a project dir, a home dir and a file-backed vault inside
//! the home dir. Child processes point at that vault through
//! `DOTSYNC_SERVER=file://...`, so nothing touches a real server.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::path::PathBuf;

use tempfile::TempDir;

/// Test environment with isolated temp directories.
///
/// No process-global state is mutated. Child processes use `.current_dir()`
/// so tests can safely run in parallel.
pub struct Test {
    /// Temporary directory for the test project
    pub dir: TempDir,
    /// Temporary home directory, also holding the vault file
    pub home: TempDir,
}

impl Test {
    /// Create a new empty test environment.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let home = TempDir::new().expect("failed to create temp home");

        Self { dir, home }
    }

    /// Create a test environment with an initialized project.
    pub fn init(folder: &str, kind: &str) -> Self {
        let t = Self::new();
        let output = t.init_cmd(folder, kind);
        assert!(
            output.status.success(),
            "Failed to initialize project: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        t
    }

    /// Path of the vault file.
    pub fn vault_path(&self) -> PathBuf {
        self.home.path().join("vault.json")
    }

    /// Server URL selecting the vault file.
    pub fn server(&self) -> String {
        format!("file://{}", self.vault_path().display())
    }

    /// Path inside the project dir.
    pub fn project_path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}
