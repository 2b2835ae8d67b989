//! `aix command|skill|agent ...`
//!
//! The three markdown artifact kinds share one set of subcommands. Each
//! handler is generic over [`PlatformArtifact`] and is instantiated once per
//! kind from [`super::Commands`].

use super::common::{CommandContext, TargetArgs, install_options, print_json, run_editor};
use crate::core::AixError;
use crate::installer::source::inferred_name;
use crate::installer::locate_markdown;
use crate::models::{Agent, ArtifactKind, Command, MarkdownArtifact, Skill};
use crate::platform::{Platform, PlatformArtifact, PlatformId};
use crate::utils::{atomic_write, print_hint, print_success, print_warning};
use crate::validation::{ValidationResult, sanitize_default_name, validate_name};
use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use serde::Serialize;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Subcommands shared by `command`, `skill` and `agent`.
#[derive(Debug, Subcommand)]
pub enum ArtifactSubcommand {
    /// Create a new artifact from a template
    Init {
        /// Name of the new artifact
        name: Option<String>,

        /// Directory to create it in
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// One-line description
        #[arg(long)]
        description: Option<String>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Install from a git URL, local path or repository name
    Install {
        /// Git URL, file, directory or repository entry name
        #[arg(required_unless_present = "all_from_repo")]
        source: Option<String>,

        #[command(flatten)]
        target: TargetArgs,

        /// Overwrite artifacts that already exist
        #[arg(short, long)]
        force: bool,

        /// Treat the source as a path or URL, never as a repository name
        #[arg(long)]
        file: bool,

        /// Install every artifact of this kind from the named repository
        #[arg(long, value_name = "REPO", conflicts_with = "source")]
        all_from_repo: Option<String>,
    },

    /// List installed artifacts per platform
    List {
        #[command(flatten)]
        target: TargetArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one installed artifact
    Show {
        /// Artifact name
        name: String,

        #[command(flatten)]
        target: TargetArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Open an installed artifact in the editor, then re-validate it
    Edit {
        /// Artifact name
        name: String,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Validate an artifact file or directory
    Validate {
        /// File or directory to check
        path: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove an artifact from every platform that has it
    Remove {
        /// Artifact name
        name: String,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Search configured repositories
    Search {
        /// Text matched against names and descriptions
        query: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Template for `init`.
pub trait Scaffold: PlatformArtifact {
    /// A fresh record named `name`
    fn scaffold(name: &str, description: Option<&str>) -> Self;

    /// File to create, relative to the output directory
    fn scaffold_path(name: &str) -> PathBuf {
        PathBuf::from(format!("{name}.md"))
    }
}

impl Scaffold for Command {
    fn scaffold(name: &str, description: Option<&str>) -> Self {
        Self::new(
            name,
            description.map_or_else(|| format!("Describe what /{name} does"), str::to_string),
            "Describe the task here.\n\nText typed after the command is available as $ARGUMENTS.\n",
        )
    }
}

impl Scaffold for Skill {
    fn scaffold(name: &str, description: Option<&str>) -> Self {
        Self::new(
            name,
            description.map_or_else(|| format!("Describe what the {name} skill does and when to use it"), str::to_string),
            format!("# {name}\n\n## Instructions\n\nStep-by-step guidance for the model.\n"),
        )
    }

    fn scaffold_path(name: &str) -> PathBuf {
        Path::new(name).join(Self::MARKER_FILE)
    }
}

impl Scaffold for Agent {
    fn scaffold(name: &str, description: Option<&str>) -> Self {
        Self::new(
            name,
            description.map_or_else(|| format!("Describe when to use the {name} agent"), str::to_string),
            "You are a specialist. Describe the agent's role, process and output format here.\n",
        )
    }
}

/// Name as users type it: `/review` for commands, the bare name otherwise.
fn display_name<A: MarkdownArtifact>(name: &str) -> String {
    match A::KIND {
        ArtifactKind::Command => format!("/{name}"),
        _ => name.to_string(),
    }
}

#[derive(Serialize)]
struct ListEntry<'a> {
    platform: PlatformId,
    scope: crate::core::Scope,
    name: &'a str,
    description: &'a str,
    path: PathBuf,
}

#[derive(Serialize)]
struct ShowOutput<'a, A: Serialize> {
    name: &'a str,
    kind: ArtifactKind,
    platforms: Vec<PlatformId>,
    path: &'a Path,
    metadata: &'a A,
    instructions: &'a str,
}

#[derive(Serialize)]
struct ValidateOutput<'a> {
    name: &'a str,
    valid: bool,
    #[serde(flatten)]
    result: &'a ValidationResult,
}

impl ArtifactSubcommand {
    /// Run the subcommand for artifact kind `A`.
    pub async fn execute<A: Scaffold>(self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Init {
                name,
                dir,
                description,
                force,
            } => init::<A>(name, &dir, description.as_deref(), force),
            Self::Install {
                source,
                target,
                force,
                file,
                all_from_repo,
            } => {
                let opts = install_options(&target, force, file);
                let mut installer = ctx.installer(&target)?;
                if let Some(repo) = all_from_repo {
                    let reports = installer.install_all_from_repo::<A>(&repo, &opts)?;
                    if reports.is_empty() {
                        print_warning(format!("Repository '{repo}' has no {}s", A::KIND));
                    }
                    reports.iter().for_each(|r| print_success(r.summary()));
                    return Ok(());
                }
                // clap enforces `source` when --all-from-repo is absent
                let source = source.unwrap_or_default();
                let report = installer.install::<A>(&source, &opts).await?;
                print_success(report.summary());
                Ok(())
            }
            Self::List { target, json } => list::<A>(ctx, &target, json),
            Self::Show { name, target, json } => show::<A>(ctx, &name, &target, json),
            Self::Edit { name, target } => edit::<A>(ctx, &name, &target).await,
            Self::Validate { path, json } => validate::<A>(&path, json),
            Self::Remove { name, target } => remove::<A>(ctx, &name, &target),
            Self::Search { query, json } => super::repo::search(ctx, Some(A::KIND), &query, json),
        }
    }
}

fn init<A: Scaffold>(name: Option<String>, dir: &Path, description: Option<&str>, force: bool) -> Result<()> {
    let name = match name {
        Some(name) => name,
        None if std::io::stdin().is_terminal() => inquire::Text::new(&format!("{} name:", A::KIND.label()))
            .prompt()
            .context("Prompt cancelled")?,
        None => {
            return Err(A::invalid("a name is required when not running interactively").into());
        }
    };
    let name = if validate_name(&name).is_ok() {
        name
    } else {
        let fixed = sanitize_default_name(&name);
        print_hint(format!("'{name}' is not a valid name; using '{fixed}'"));
        fixed
    };

    let path = dir.join(A::scaffold_path(&name));
    if path.exists() && !force {
        return Err(AixError::Other {
            message: format!("{} already exists (use --force to overwrite)", path.display()),
        }
        .into());
    }
    let record = A::scaffold(&name, description);
    atomic_write(&path, record.render()?.as_bytes())?;
    print_success(format!("Created {} '{}' at {}", A::KIND, display_name::<A>(&name), path.display()));
    Ok(())
}

fn list<A: PlatformArtifact>(ctx: &CommandContext, target: &TargetArgs, json: bool) -> Result<()> {
    let platforms = ctx.platforms(target)?;
    let mut groups = Vec::new();
    for platform in &platforms {
        let store = A::store(platform.as_ref())?;
        let records = store.list()?;
        groups.push((platform.as_ref(), store, records));
    }

    if json {
        let entries: Vec<ListEntry<'_>> = groups
            .iter()
            .flat_map(|(platform, store, records)| {
                records.iter().map(move |record| ListEntry {
                    platform: platform.id(),
                    scope: platform.scope(),
                    name: record.name(),
                    description: record.description(),
                    path: store.path_for(record.name()),
                })
            })
            .collect();
        return print_json(&entries);
    }

    for (platform, store, records) in &groups {
        println!(
            "{} {}",
            format!("{} ({})", platform.display_name(), platform.scope()).bold(),
            store.root().display().to_string().dimmed()
        );
        if records.is_empty() {
            println!("  {}", format!("No {}s installed", A::KIND).dimmed());
            continue;
        }
        let width = records.iter().map(|r| display_name::<A>(r.name()).len()).max().unwrap_or(0);
        for record in records {
            let shown = display_name::<A>(record.name());
            println!("  {}{}  {}", shown.cyan(), " ".repeat(width - shown.len()), record.description());
        }
    }
    Ok(())
}

/// The platforms among `platforms` where `name` is installed.
fn installed_on<'a, A: PlatformArtifact>(
    platforms: &'a [Box<dyn Platform>],
    name: &str,
) -> Result<Vec<&'a dyn Platform>> {
    let mut found = Vec::new();
    for platform in platforms {
        if A::store(platform.as_ref())?.exists(name) {
            found.push(platform.as_ref());
        }
    }
    Ok(found)
}

fn show<A: PlatformArtifact>(ctx: &CommandContext, name: &str, target: &TargetArgs, json: bool) -> Result<()> {
    let platforms = ctx.platforms(target)?;
    let found = installed_on::<A>(&platforms, name)?;
    let Some(first) = found.first() else {
        return Err(A::not_found(name).into());
    };
    let store = A::store(*first)?;
    let record = A::to_canonical(*first, store.get(name)?);
    let path = store.path_for(name);

    if json {
        return print_json(&ShowOutput {
            name,
            kind: A::KIND,
            platforms: found.iter().map(|p| p.id()).collect(),
            path: &path,
            metadata: &record,
            instructions: record.instructions(),
        });
    }

    let names: Vec<&str> = found.iter().map(|p| p.display_name()).collect();
    println!("{} {}", "Name:       ".bold(), display_name::<A>(name));
    if !record.description().is_empty() {
        println!("{} {}", "Description:".bold(), record.description());
    }
    println!("{} {}", "Platforms:  ".bold(), names.join(", "));
    println!("{} {}", "Path:       ".bold(), path.display());
    println!();
    print!("{}", record.render()?);
    Ok(())
}

async fn edit<A: PlatformArtifact>(ctx: &CommandContext, name: &str, target: &TargetArgs) -> Result<()> {
    let platforms = ctx.platforms(target)?;
    let found = installed_on::<A>(&platforms, name)?;
    let Some(first) = found.first() else {
        return Err(A::not_found(name).into());
    };
    let store = A::store(*first)?;
    let path = store.path_for(name);
    let editor = ctx.editor();
    debug!("Editing {} with '{editor}'", path.display());
    run_editor(&editor, &path).await?;

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut record = A::parse(&content, &path.display().to_string())?;
    if record.name().is_empty() {
        record.set_name(name.to_string());
    }
    let result = A::validate(&record, Some(&path));
    result.print();
    result.into_result(A::KIND, name)?;

    print_success(format!("Saved {} '{}' on {}", A::KIND, display_name::<A>(name), first.display_name()));
    for other in found.iter().skip(1) {
        print_hint(format!("{} also has '{name}'; it was not changed", other.display_name()));
    }
    Ok(())
}

fn validate<A: PlatformArtifact>(path: &Path, json: bool) -> Result<()> {
    let located = locate_markdown(path, A::KIND, A::MARKER_FILE)?;
    let content = std::fs::read_to_string(&located.file)
        .with_context(|| format!("Failed to read {}", located.file.display()))?;
    let mut record = A::parse(&content, &located.file.display().to_string())?;
    if record.name().is_empty() {
        record.set_name(inferred_name(&located.file, A::MARKER_FILE));
    }
    let result = A::validate(&record, Some(&located.file));
    let name = record.name();

    if json {
        print_json(&ValidateOutput {
            name,
            valid: !result.has_errors(),
            result: &result,
        })?;
    } else {
        result.print();
    }
    result.into_result(A::KIND, name)?;
    if !json {
        print_success(format!("{} '{}' is valid", A::KIND.label(), display_name::<A>(name)));
    }
    Ok(())
}

fn remove<A: PlatformArtifact>(ctx: &CommandContext, name: &str, target: &TargetArgs) -> Result<()> {
    let platforms = ctx.platforms(target)?;
    let found = installed_on::<A>(&platforms, name)?;
    if found.is_empty() {
        return Err(AixError::NotInstalled {
            kind: A::KIND.label().to_string(),
            name: name.to_string(),
        }
        .into());
    }

    let mut backups = ctx.backups()?;
    for platform in &found {
        backups.ensure(*platform)?;
        A::store(*platform)?.uninstall(name)?;
        debug!("Removed {} '{name}' from {}", A::KIND, platform.display_name());
    }
    print_success(format!(
        "Removed {} '{}' from {} platform(s)",
        A::KIND,
        display_name::<A>(name),
        found.len()
    ));
    Ok(())
}
