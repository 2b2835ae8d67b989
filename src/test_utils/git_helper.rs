//! Git helper for building test repositories.

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Runs git inside one repository directory.
pub struct TestGit {
    repo_path: PathBuf,
}

impl TestGit {
    fn run(&self, args: &[&str], action: &str) -> Result<std::process::Output> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_path)
            .output()
            .with_context(|| action.to_string())?;

        if !output.status.success() {
            bail!("{} failed: {}", action, String::from_utf8_lossy(&output.stderr));
        }
        Ok(output)
    }

    /// Wrap `repo_path`; nothing is run yet.
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
        }
    }

    /// Whether git can be run at all; tests that need it skip otherwise.
    pub fn available() -> bool {
        Command::new("git").arg("--version").output().is_ok_and(|o| o.status.success())
    }

    /// `git init` with a local identity.
    pub fn init(&self) -> Result<()> {
        std::fs::create_dir_all(&self.repo_path)?;
        self.run(&["init"], "Failed to initialize git repository")?;
        self.run(&["config", "user.email", "test@aix.example"], "Failed to configure git user email")?;
        self.run(&["config", "user.name", "Test User"], "Failed to configure git user name")?;
        Ok(())
    }

    /// Stage everything and commit.
    pub fn commit_all(&self, message: &str) -> Result<()> {
        self.run(&["add", "."], "Failed to add files to git")?;
        self.run(&["commit", "-m", message], "Failed to create git commit")?;
        Ok(())
    }

    /// Current commit hash
    pub fn head(&self) -> Result<String> {
        let output = self.run(&["rev-parse", "HEAD"], "Failed to get commit hash")?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Repository directory
    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    /// `file://` URL git can clone from.
    pub fn file_url(&self) -> String {
        let path = self.repo_path.display().to_string().replace('\\', "/");
        if path.starts_with('/') { format!("file://{path}") } else { format!("file:///{path}") }
    }
}
