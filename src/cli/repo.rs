//! `aix repo ...`: named git repositories that artifacts can be installed from
//! by name.
//!
//! A repository is a git checkout with any of these top-level directories:
//!
//! ```text
//! commands/<name>.md
//! skills/<name>/SKILL.md
//! agents/<name>.md
//! mcp/<name>.json
//! ```

use super::common::{CommandContext, print_json};
use crate::config::RepositoryConfig;
use crate::core::AixError;
use crate::git;
use crate::models::ArtifactKind;
use crate::repo::{RepoEntry, RepoIndex};
use crate::utils::{print_hint, print_success, print_warning};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// Manage artifact repositories.
#[derive(Debug, Parser)]
pub struct RepoCommand {
    #[command(subcommand)]
    subcommand: RepoSubcommand,
}

#[derive(Debug, Subcommand)]
enum RepoSubcommand {
    /// Clone a repository and register it
    Add {
        /// Git remote URL
        url: String,

        /// Name to register it under; defaults to the URL's last segment
        #[arg(short, long)]
        name: Option<String>,

        /// Use an existing local clone instead of cloning
        #[arg(long)]
        path: Option<String>,
    },

    /// List registered repositories
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Unregister a repository and delete its managed clone
    Remove {
        /// Repository name
        name: String,
    },

    /// Pull the latest changes (clones repositories that are missing)
    Update {
        /// Only update this repository
        name: Option<String>,
    },
}

#[derive(Serialize)]
struct RepoSummary<'a> {
    name: &'a str,
    url: &'a str,
    path: PathBuf,
    cloned: bool,
    commands: usize,
    skills: usize,
    agents: usize,
    mcp: usize,
}

impl RepoCommand {
    /// Run the subcommand.
    pub async fn execute(self, ctx: &mut CommandContext) -> Result<()> {
        match self.subcommand {
            RepoSubcommand::Add { url, name, path } => add(ctx, url, name, path).await,
            RepoSubcommand::List { json } => list(ctx, json),
            RepoSubcommand::Remove { name } => remove(ctx, &name).await,
            RepoSubcommand::Update { name } => update(ctx, name.as_deref()).await,
        }
    }
}

async fn add(ctx: &mut CommandContext, url: String, name: Option<String>, path: Option<String>) -> Result<()> {
    let name = match name.or_else(|| git::repo_name_from_url(&url)) {
        Some(name) => name,
        None => {
            return Err(AixError::Other {
                message: format!("Cannot derive a repository name from '{url}'; pass --name"),
            }
            .into());
        }
    };
    if ctx.config.config().repositories.contains_key(&name) {
        return Err(AixError::RepositoryExists { name }.into());
    }

    let dir = match &path {
        Some(path) => {
            let dir = crate::utils::resolve_path(path)?;
            if !dir.is_dir() {
                return Err(AixError::FileNotFound {
                    path: dir.display().to_string(),
                }
                .into());
            }
            dir
        }
        None => {
            let dir = ctx.config.default_repo_path(&name);
            if dir.exists() {
                return Err(AixError::Other {
                    message: format!("{} already exists; remove it or pass --path", dir.display()),
                }
                .into());
            }
            git::clone_shallow(&url, &dir).await?;
            dir
        }
    };

    ctx.config.config_mut().add_repository(&name, RepositoryConfig { url, path })?;
    ctx.config.save().await?;

    let count = RepoIndex::scan_repo(&name, &dir)?.len();
    print_success(format!("Added repository '{name}' ({count} artifact(s))"));
    Ok(())
}

fn list(ctx: &CommandContext, json: bool) -> Result<()> {
    let repos = ctx.config.repositories()?;
    let mut summaries = Vec::new();
    for (name, dir) in &repos {
        let url = ctx.config.config().repositories.get(name).map_or("", |r| r.url.as_str());
        let cloned = dir.is_dir();
        let entries = if cloned { RepoIndex::scan_repo(name, dir)? } else { Vec::new() };
        let count = |kind| entries.iter().filter(|e| e.kind == kind).count();
        summaries.push(RepoSummary {
            name,
            url,
            path: dir.clone(),
            cloned,
            commands: count(ArtifactKind::Command),
            skills: count(ArtifactKind::Skill),
            agents: count(ArtifactKind::Agent),
            mcp: count(ArtifactKind::Mcp),
        });
    }

    if json {
        return print_json(&summaries);
    }
    if summaries.is_empty() {
        println!("No repositories configured");
        print_hint("Add one with 'aix repo add <url>'");
        return Ok(());
    }
    for repo in &summaries {
        println!("{} {}", repo.name.bold(), repo.url.dimmed());
        if repo.cloned {
            println!(
                "  {} command(s), {} skill(s), {} agent(s), {} MCP server(s)",
                repo.commands, repo.skills, repo.agents, repo.mcp
            );
        } else {
            println!("  {} not cloned; run 'aix repo update {}'", "✗".red(), repo.name);
        }
    }
    Ok(())
}

async fn remove(ctx: &mut CommandContext, name: &str) -> Result<()> {
    let dir = ctx.config.repo_path(name)?;
    let entry = ctx.config.config_mut().remove_repository(name)?;
    ctx.config.save().await?;

    // Only clones aix created are deleted; a user-provided path is left alone.
    if entry.path.is_none() && dir.exists() {
        tokio::fs::remove_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to delete {}", dir.display()))?;
        info!("Deleted clone at {}", dir.display());
    }
    print_success(format!("Removed repository '{name}'"));
    Ok(())
}

async fn update(ctx: &CommandContext, only: Option<&str>) -> Result<()> {
    let repos = ctx.config.repositories()?;
    if let Some(name) = only
        && !repos.iter().any(|(n, _)| n == name)
    {
        return Err(AixError::RepositoryNotFound {
            name: name.to_string(),
        }
        .into());
    }
    if repos.is_empty() {
        print_hint("No repositories configured; add one with 'aix repo add <url>'");
        return Ok(());
    }

    let mut failed = 0;
    for (name, dir) in repos.iter().filter(|(n, _)| only.is_none_or(|o| o == n)) {
        let result = if dir.is_dir() {
            git::pull(dir).await
        } else {
            let url = ctx.config.config().repositories.get(name).map(|r| r.url.clone()).unwrap_or_default();
            git::clone_shallow(&url, dir).await
        };
        match result {
            Ok(()) => print_success(format!("Updated repository '{name}'")),
            Err(e) => {
                failed += 1;
                print_warning(format!("Failed to update '{name}': {e:#}"));
            }
        }
    }
    if failed > 0 {
        return Err(AixError::Other {
            message: format!("{failed} repository update(s) failed"),
        }
        .into());
    }
    Ok(())
}

/// `search` for every artifact group: matches in configured repositories.
pub fn search(ctx: &CommandContext, kind: Option<ArtifactKind>, query: &str, json: bool) -> Result<()> {
    let index = ctx.index()?;
    if !index.has_repositories() {
        print_hint("No repositories configured; add one with 'aix repo add <url>'");
        return if json { print_json(&Vec::<RepoEntry>::new()) } else { Ok(()) };
    }
    let results = index.search(kind, query);
    if json {
        return print_json(&results);
    }
    if results.is_empty() {
        let what = kind.map_or_else(|| "artifacts".to_string(), |k| format!("{k}s"));
        println!("No {what} matching '{query}'");
        return Ok(());
    }
    let width = results.iter().map(|e| e.name.len()).max().unwrap_or(0);
    for entry in &results {
        println!(
            "{}{}  {}  {}",
            entry.name.cyan(),
            " ".repeat(width - entry.name.len()),
            format!("({})", entry.repo).dimmed(),
            entry.description
        );
    }
    Ok(())
}
