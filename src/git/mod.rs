//! Git access through the system `git` binary.
//!
//! aix needs shallow clones of install sources and repositories,
//! fast-forward pulls to update repositories, the checked-out commit for
//! logging, and a way to recognize a git URL. Everything runs through
//! [`command_builder::GitCommand`].

pub mod command_builder;

use crate::core::AixError;
use crate::utils::Spinner;
use anyhow::Result;
use command_builder::GitCommand;
use std::path::Path;
use tracing::info;

/// Whether `source` should be treated as a git remote.
///
/// Matches `git@host:path`, anything containing `://`, and anything ending
/// in `.git`.
#[must_use]
pub fn is_git_url(source: &str) -> bool {
    source.starts_with("git@") || source.contains("://") || source.ends_with(".git")
}

/// Derive a repository name from its URL.
///
/// `https://github.com/acme/ai-prompts.git` -> `ai-prompts`
#[must_use]
pub fn repo_name_from_url(url: &str) -> Option<String> {
    let trimmed = url.trim_end_matches('/');
    let last = trimmed.rsplit(['/', ':']).next()?;
    let name = last.strip_suffix(".git").unwrap_or(last);
    (!name.is_empty()).then(|| name.to_string())
}

/// Whether a git executable can be found.
#[must_use]
pub fn is_git_installed() -> bool {
    which::which(crate::utils::get_git_command()).is_ok()
}

fn ensure_git() -> Result<()> {
    if is_git_installed() {
        Ok(())
    } else {
        Err(AixError::GitNotFound.into())
    }
}

/// Shallow-clone `url` into `target`, showing a spinner on a terminal.
pub async fn clone_shallow(url: &str, target: &Path) -> Result<()> {
    ensure_git()?;
    let spinner = Spinner::start(format!("Cloning {url}"));
    let result = GitCommand::shallow_clone(url, target)
        .with_context("clone")
        .execute_success()
        .await;
    spinner.finish_and_clear();
    result?;
    match head_commit(target).await {
        Ok(head) => info!("Cloned {url} at {head} into {}", target.display()),
        Err(e) => info!("Cloned {url} into {} (HEAD unknown: {e})", target.display()),
    }
    Ok(())
}

/// Fast-forward the clone at `repo` to its upstream.
pub async fn pull(repo: &Path) -> Result<()> {
    ensure_git()?;
    let spinner = Spinner::start(format!("Updating {}", repo.display()));
    let result = GitCommand::pull_ff_only()
        .current_dir(repo)
        .with_context("pull")
        .execute_success()
        .await;
    spinner.finish_and_clear();
    result?;
    if let Ok(head) = head_commit(repo).await {
        info!("Updated {} to {head}", repo.display());
    }
    Ok(())
}

/// Commit hash checked out in `repo`.
pub async fn head_commit(repo: &Path) -> Result<String> {
    GitCommand::current_commit().current_dir(repo).with_context("rev-parse").execute_stdout().await
}
