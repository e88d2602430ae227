//! Common test utilities for graphbook integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't touch the
//! user's `~/.config/graphbook/` directory or a real working project.

#![allow(dead_code)]

use assert_cmd::Command;
use serde_json::Value;
pub use tempfile::TempDir;

/// A test environment with isolated storage.
///
/// Each `TestEnv` creates two temporary directories:
/// - `work_dir`: Current directory of every command; holds `project.gbz`
/// - `config_dir`: Holds config.kdl (via `GB_CONFIG_DIR` env var)
///
/// The `gb()` method sets both per-invocation, making tests parallel-safe.
pub struct TestEnv {
    pub work_dir: TempDir,
    pub config_dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with isolated directories.
    pub fn new() -> Self {
        Self {
            work_dir: TempDir::new().unwrap(),
            config_dir: TempDir::new().unwrap(),
        }
    }

    /// Create a new test environment with an empty project.
    pub fn init() -> Self {
        let env = Self::new();
        env.gb().args(["new", "--name", "Test Project"]).assert().success();
        env
    }

    /// Get a Command for the gb binary with isolated directories.
    pub fn gb(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_gb"));
        cmd.current_dir(self.work_dir.path());
        cmd.env("GB_CONFIG_DIR", self.config_dir.path());
        cmd.env_remove("GB_PROJECT");
        cmd.env_remove("GB_LOG");
        cmd
    }

    /// Run `gb` with `args`, assert success, and parse stdout as JSON.
    pub fn json(&self, args: &[&str]) -> Value {
        let output = self.gb().args(args).assert().success().get_output().stdout.clone();
        serde_json::from_slice(&output).unwrap()
    }

    /// Create a category and return its ID.
    pub fn add_category(&self, name: &str) -> String {
        let v = self.json(&["category", "add", name]);
        v["category"]["id"].as_str().unwrap().to_string()
    }

    /// Create a node with `title` in `category` and return its ID.
    pub fn add_node(&self, category: &str, title: &str) -> String {
        let v = self.json(&["node", "add", category, "--title", title]);
        v["node"]["id"].as_str().unwrap().to_string()
    }

    /// Get the path to the working directory.
    pub fn path(&self) -> &std::path::Path {
        self.work_dir.path()
    }

    /// Path of the default working project file.
    pub fn project_file(&self) -> std::path::PathBuf {
        self.work_dir.path().join("project.gbz")
    }

    /// Get the path to the config directory.
    pub fn config_path(&self) -> &std::path::Path {
        self.config_dir.path()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
