//! Builder for `git` subprocesses.
//!
//! Every git invocation goes through [`GitCommand`] so that logging, the
//! timeout and error mapping are the same everywhere.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::core::AixError;
use crate::utils::platform::get_git_command;

/// Default limit for one git invocation
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Fluent builder for one git invocation.
///
/// ```rust,no_run
/// use aix::git::command_builder::GitCommand;
///
/// # async fn example() -> anyhow::Result<()> {
/// GitCommand::shallow_clone("https://github.com/example/prompts.git", "/tmp/prompts")
///     .execute_success()
///     .await?;
/// let head = GitCommand::current_commit()
///     .current_dir("/tmp/prompts")
///     .execute_stdout()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GitCommand {
    args: Vec<String>,
    current_dir: Option<PathBuf>,
    env_vars: Vec<(String, String)>,
    timeout_duration: Option<Duration>,
    context: Option<String>,
    clone_url: Option<String>,
}

impl Default for GitCommand {
    fn default() -> Self {
        Self {
            args: Vec::new(),
            current_dir: None,
            env_vars: Vec::new(),
            timeout_duration: Some(DEFAULT_TIMEOUT),
            context: None,
            clone_url: None,
        }
    }
}

/// Captured output of a successful git invocation
#[derive(Debug, Clone)]
pub struct GitCommandOutput {
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
}

impl GitCommand {
    /// An empty command with the default timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run inside `dir` (passed to git as `-C <dir>`).
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the git process.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.push((key.into(), value.into()));
        self
    }

    /// Label used in log lines.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// The git subcommand, ignoring `-C <dir>`.
    fn operation(&self) -> String {
        self.args.first().cloned().unwrap_or_else(|| "unknown".to_string())
    }

    /// Run git and capture its output.
    pub async fn execute(self) -> Result<GitCommandOutput> {
        let git = get_git_command();
        let mut full_args = Vec::new();
        if let Some(dir) = &self.current_dir {
            full_args.push("-C".to_string());
            full_args.push(dir.display().to_string());
        }
        full_args.extend(self.args.iter().cloned());

        let label = self.context.as_deref().map(|c| format!("({c}) ")).unwrap_or_default();
        tracing::debug!(target: "git", "{label}Executing command: {git} {}", full_args.join(" "));

        let mut cmd = Command::new(git);
        cmd.args(&full_args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Never block on a credential prompt.
            .env("GIT_TERMINAL_PROMPT", "0");
        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        let output = match self.timeout_duration {
            Some(duration) => match timeout(duration, cmd.output()).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(
                        target: "git",
                        "Command timed out after {} seconds: git {}",
                        duration.as_secs(),
                        full_args.join(" ")
                    );
                    return Err(AixError::GitCommandError {
                        operation: self.operation(),
                        stderr: format!(
                            "timed out after {} seconds; try running it manually: git {}",
                            duration.as_secs(),
                            full_args.join(" ")
                        ),
                    }
                    .into());
                }
            },
            None => cmd.output().await,
        };

        let output = match output {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AixError::GitNotFound.into());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to execute git {}", full_args.join(" ")));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            tracing::debug!(target: "git", "{label}Command failed with exit code {:?}: {}", output.status.code(), stderr.trim());
            let error = match self.clone_url {
                Some(url) => AixError::GitCloneFailed {
                    url,
                    reason: stderr.trim().to_string(),
                },
                None => AixError::GitCommandError {
                    operation: self.operation(),
                    stderr: if stderr.trim().is_empty() { stdout.trim().to_string() } else { stderr.trim().to_string() },
                },
            };
            return Err(error.into());
        }

        if !stdout.trim().is_empty() {
            tracing::trace!(target: "git", "{label}{}", stdout.trim());
        }
        Ok(GitCommandOutput { stdout, stderr })
    }

    /// Run git and return trimmed stdout.
    pub async fn execute_stdout(self) -> Result<String> {
        let output = self.execute().await?;
        Ok(output.stdout.trim().to_string())
    }

    /// Run git and only check that it succeeded.
    pub async fn execute_success(self) -> Result<()> {
        self.execute().await?;
        Ok(())
    }
}

// Convenience builders for the operations aix needs

impl GitCommand {
    /// `git clone --depth=1 <url> <target>`
    pub fn shallow_clone(url: &str, target: impl AsRef<Path>) -> Self {
        let mut cmd = Self::new().args([
            "clone".to_string(),
            "--depth=1".to_string(),
            url.to_string(),
            target.as_ref().display().to_string(),
        ]);
        cmd.clone_url = Some(url.to_string());
        cmd
    }

    /// `git pull --ff-only`
    pub fn pull_ff_only() -> Self {
        Self::new().args(["pull", "--ff-only"])
    }

    /// `git rev-parse HEAD`
    pub fn current_commit() -> Self {
        Self::new().args(["rev-parse", "HEAD"])
    }
}
