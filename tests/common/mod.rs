//! Common test utilities for aix integration tests
//!
//! Every test runs the compiled binary against a private temporary tree:
//!
//! ```text
//! <temp>/home/.claude              (Claude Code detected)
//! <temp>/home/.config/opencode     (OpenCode detected)
//! <temp>/home/.config/aix/config.toml
//! <temp>/project                   (working directory and --project)
//! ```

// Not every helper is used by every test module
#![allow(dead_code)]

use anyhow::{Context, Result};
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test project with an isolated home directory
pub struct TestProject {
    _temp_dir: TempDir, // Keep alive for RAII cleanup
    home_dir: PathBuf,
    project_dir: PathBuf,
    config_path: PathBuf,
}

impl TestProject {
    /// Both platforms installed
    pub fn new() -> Result<Self> {
        let project = Self::bare()?;
        fs::create_dir_all(project.home_dir.join(".claude"))?;
        fs::create_dir_all(project.home_dir.join(".config").join("opencode"))?;
        Ok(project)
    }

    /// Only Claude Code installed
    pub fn claude_only() -> Result<Self> {
        let project = Self::bare()?;
        fs::create_dir_all(project.home_dir.join(".claude"))?;
        Ok(project)
    }

    /// No platform installed
    pub fn bare() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let home_dir = temp_dir.path().join("home");
        let project_dir = temp_dir.path().join("project");
        let config_path = home_dir.join(".config").join("aix").join("config.toml");
        fs::create_dir_all(&home_dir)?;
        fs::create_dir_all(&project_dir)?;

        Ok(Self {
            _temp_dir: temp_dir,
            home_dir,
            project_dir,
            config_path,
        })
    }

    /// The fake home directory
    pub fn home_path(&self) -> &Path {
        &self.home_dir
    }

    /// The project directory
    pub fn project_path(&self) -> &Path {
        &self.project_dir
    }

    /// The aix config file
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Where aix keeps clones and backups by default
    pub fn aix_dir(&self) -> PathBuf {
        self.home_dir.join(".config").join("aix")
    }

    /// Write a file relative to the project directory
    pub fn write(&self, path: &str, content: &str) -> Result<PathBuf> {
        let full = self.project_dir.join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&full, content).with_context(|| format!("Failed to write {}", full.display()))?;
        Ok(full)
    }

    /// Write the aix config file
    pub fn write_config(&self, content: &str) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.config_path, content)?;
        Ok(())
    }

    /// An aix invocation isolated to this project
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("aix").expect("aix binary is built");
        cmd.current_dir(&self.project_dir)
            .env("HOME", &self.home_dir)
            .env("USERPROFILE", &self.home_dir)
            .env("AIX_CONFIG", &self.config_path)
            .env("AIX_NO_PROGRESS", "1")
            .env("NO_COLOR", "1")
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .env_remove("RUST_LOG")
            .env_remove("EDITOR")
            .env_remove("VISUAL")
            .arg("--project")
            .arg(&self.project_dir);
        cmd
    }

    /// Run aix and capture the result
    pub fn run(&self, args: &[&str]) -> CommandOutput {
        let output = self.cmd().args(args).output().expect("failed to run aix");
        CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Captured output of one aix run
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

impl CommandOutput {
    /// Assert the command succeeded
    pub fn assert_success(&self) -> &Self {
        assert!(
            self.success,
            "Command failed with code {:?}\nStdout: {}\nStderr: {}",
            self.code, self.stdout, self.stderr
        );
        self
    }

    /// Assert the command failed
    pub fn assert_failure(&self) -> &Self {
        assert!(!self.success, "Command unexpectedly succeeded\nStdout: {}", self.stdout);
        self
    }

    /// Assert stdout contains the given text
    pub fn assert_stdout_contains(&self, text: &str) -> &Self {
        assert!(
            self.stdout.contains(text),
            "Expected stdout to contain '{}'\nActual stdout: {}\nStderr: {}",
            text,
            self.stdout,
            self.stderr
        );
        self
    }

    /// Assert stderr contains the given text
    pub fn assert_stderr_contains(&self, text: &str) -> &Self {
        assert!(
            self.stderr.contains(text),
            "Expected stderr to contain '{}'\nActual stderr: {}",
            text,
            self.stderr
        );
        self
    }
}

/// File assertion helpers
pub struct FileAssert;

impl FileAssert {
    /// Assert a file exists
    pub fn exists(path: impl AsRef<Path>) {
        let path = path.as_ref();
        assert!(path.exists(), "Expected file to exist: {}", path.display());
    }

    /// Assert a file does not exist
    pub fn not_exists(path: impl AsRef<Path>) {
        let path = path.as_ref();
        assert!(!path.exists(), "Expected file to not exist: {}", path.display());
    }

    /// Assert a file contains the expected text
    pub fn contains(path: impl AsRef<Path>, expected: &str) {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()));
        assert!(
            content.contains(expected),
            "Expected {} to contain '{}'\nActual: {}",
            path.display(),
            expected,
            content
        );
    }
}
