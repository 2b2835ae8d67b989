//! The install dispatcher.
//!
//! Turns one source string into installed artifacts on every target
//! platform:
//!
//! 1. [`source::classify`] decides whether the input is a git URL, a local
//!    path or a repository entry.
//! 2. Git sources are shallow-cloned and repository entries copied into a
//!    scratch directory; both then follow the local path.
//! 3. The artifact file is located, parsed and validated. Errors abort with
//!    the issue list printed, warnings are printed and ignored.
//! 4. Target platforms are resolved. Unless `--force` is given, an artifact of
//!    the same name on any target aborts the install before anything is
//!    written.
//! 5. Each target is backed up once, the record is translated for it and
//!    written. Installs run in platform order; a failure stops the remaining
//!    ones and does not roll back earlier writes.
//!
//! Scratch directories are [`TempDir`]s owned by the call, so they are removed
//! on every exit path.

pub mod source;

pub use source::{Located, Source, classify, locate_markdown, locate_mcp};

use crate::backup::BackupManager;
use crate::core::AixError;
use crate::models::{ArtifactKind, McpServer};
use crate::platform::registry::Registry;
use crate::platform::{Platform, PlatformArtifact, PlatformContext, PlatformId};
use crate::repo::{PromptSelector, RepoIndex, Selector};
use crate::utils::print_warning;
use crate::validation::validate_mcp_server;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

/// Flags shared by every install.
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// Limit to one platform (`--platform`)
    pub platform: Option<String>,
    /// Overwrite existing artifacts (`--force`)
    pub force: bool,
    /// Treat the source as a path or URL, never a repository name (`--file`)
    pub file: bool,
}

/// What an install did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    /// Artifact kind
    pub kind: ArtifactKind,
    /// Installed name
    pub name: String,
    /// Platforms written to, in order
    pub platforms: Vec<PlatformId>,
}

impl InstallReport {
    /// `Command 'review' installed to 2 platform(s)`
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} '{}' installed to {} platform(s)",
            self.kind.label(),
            self.name,
            self.platforms.len()
        )
    }
}

/// Installs artifacts from any supported source.
pub struct Installer<'a> {
    ctx: PlatformContext,
    registry: &'a Registry,
    index: RepoIndex,
    selector: Box<dyn Selector + 'a>,
    backups: BackupManager,
}

impl<'a> Installer<'a> {
    /// An installer prompting on the terminal for ambiguous repository names.
    pub fn new(ctx: PlatformContext, registry: &'a Registry, index: RepoIndex, backups: BackupManager) -> Self {
        Self {
            ctx,
            registry,
            index,
            selector: Box::new(PromptSelector),
            backups,
        }
    }

    /// Replace the ambiguity resolver.
    #[must_use]
    pub fn with_selector(mut self, selector: Box<dyn Selector + 'a>) -> Self {
        self.selector = selector;
        self
    }

    /// Install a command, skill or agent from `input`.
    pub async fn install<A: PlatformArtifact>(&mut self, input: &str, opts: &InstallOptions) -> Result<InstallReport> {
        let source = classify(input, A::KIND, opts.file, &self.index, self.selector.as_ref())?;
        debug!("Installing {} from {source:?}", A::KIND);
        let (_scratch, path) = self.fetch(source).await?;
        self.install_local::<A>(&path, opts)
    }

    /// Install an MCP server definition from `input`.
    pub async fn install_mcp(&mut self, input: &str, opts: &InstallOptions) -> Result<InstallReport> {
        let source = classify(input, ArtifactKind::Mcp, opts.file, &self.index, self.selector.as_ref())?;
        let (_scratch, path) = self.fetch(source).await?;
        let file = locate_mcp(&path)?;
        let server = crate::mcp::read_server_file(&file)?;

        let result = validate_mcp_server(&server);
        if !result.is_clean() {
            result.print();
        }
        result.into_result(ArtifactKind::Mcp, &server.name)?;
        self.add_mcp_server(&server, opts)
    }

    /// Install every artifact of kind `A` that repository `repo` offers, in
    /// name order, stopping at the first failure.
    pub fn install_all_from_repo<A: PlatformArtifact>(
        &mut self,
        repo: &str,
        opts: &InstallOptions,
    ) -> Result<Vec<InstallReport>> {
        if !self.index.has_repo(repo) {
            return Err(AixError::RepositoryNotFound {
                name: repo.to_string(),
            }
            .into());
        }
        let mut reports = Vec::new();
        for entry in self.index.by_repo(repo, A::KIND) {
            let (_scratch, path) = entry.materialize()?;
            let report = self
                .install_local::<A>(&path, opts)
                .with_context(|| format!("Failed to install {} '{}' from {repo}", A::KIND, entry.name))?;
            reports.push(report);
        }
        Ok(reports)
    }

    /// Bring a classified source onto the local disk.
    async fn fetch(&self, source: Source) -> Result<(Option<TempDir>, PathBuf)> {
        match source {
            Source::Local(path) => Ok((None, path)),
            Source::Git(url) => {
                let scratch = TempDir::with_prefix("aix-clone-").context("Failed to create scratch directory")?;
                let dir = scratch.path().join("src");
                crate::git::clone_shallow(&url, &dir).await?;
                Ok((Some(scratch), dir))
            }
            Source::Repo(entry) => {
                let (scratch, path) = entry.materialize()?;
                Ok((Some(scratch), path))
            }
        }
    }

    /// Locate, parse, validate and install the artifact at `path`.
    pub fn install_local<A: PlatformArtifact>(&mut self, path: &Path, opts: &InstallOptions) -> Result<InstallReport> {
        let located = locate_markdown(path, A::KIND, A::MARKER_FILE)?;
        let content = std::fs::read_to_string(&located.file)
            .with_context(|| format!("Failed to read file: {}", located.file.display()))?;
        let mut record = A::parse(&content, &located.file.display().to_string())?;
        if record.name().is_empty() {
            record.set_name(source::inferred_name(&located.file, A::MARKER_FILE));
        }

        let result = A::validate(&record, Some(&located.file));
        if !result.is_clean() {
            result.print();
        }
        result.into_result(A::KIND, record.name())?;

        self.install_record(&record, located.source_dir.as_deref(), opts)
    }

    /// Write an already validated record to every target platform.
    pub fn install_record<A: PlatformArtifact>(
        &mut self,
        record: &A,
        source_dir: Option<&Path>,
        opts: &InstallOptions,
    ) -> Result<InstallReport> {
        let name = record.name().to_string();
        let platforms = self.registry.resolve_platforms(opts.platform.as_deref(), &self.ctx)?;
        let stores = platforms
            .iter()
            .map(|p| A::store(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        if !opts.force {
            for (platform, store) in platforms.iter().zip(&stores) {
                if store.exists(&name) {
                    return Err(already_exists(A::KIND, &name, platform.as_ref()));
                }
            }
        }

        let mut report = InstallReport {
            kind: A::KIND,
            name: name.clone(),
            platforms: Vec::new(),
        };
        for (platform, store) in platforms.iter().zip(&stores) {
            self.backups.ensure(platform.as_ref())?;

            for var in platform.validate_variables(record.instructions()) {
                print_warning(format!("{} does not expand ${var} in '{name}'", platform.display_name()));
            }
            let translation = A::translate(platform.as_ref(), record);
            if !translation.dropped.is_empty() {
                print_warning(format!(
                    "{} does not support {}; dropped from {} '{name}'",
                    platform.display_name(),
                    translation.dropped.join(", "),
                    A::KIND
                ));
            }

            store.install_from(&translation.record, source_dir)?;
            debug!("Installed {} '{name}' to {}", A::KIND, store.path_for(&name).display());
            report.platforms.push(platform.id());
        }
        Ok(report)
    }

    /// Add `server` to every target platform's MCP configuration.
    ///
    /// Servers that list `platforms` only go to those platforms.
    pub fn add_mcp_server(&mut self, server: &McpServer, opts: &InstallOptions) -> Result<InstallReport> {
        let platforms: Vec<Box<dyn Platform>> = self
            .registry
            .resolve_platforms(opts.platform.as_deref(), &self.ctx)?
            .into_iter()
            .filter(|p| server.targets(p.name()))
            .collect();
        if platforms.is_empty() {
            return Err(AixError::Other {
                message: format!(
                    "MCP server '{}' is limited to {}, none of which were selected",
                    server.name,
                    server.platforms.join(", ")
                ),
            }
            .into());
        }

        let managers = platforms.iter().map(|p| p.mcp()).collect::<Result<Vec<_>>>()?;
        if !opts.force {
            for (platform, manager) in platforms.iter().zip(&managers) {
                if manager.exists(&server.name)? {
                    return Err(already_exists(ArtifactKind::Mcp, &server.name, platform.as_ref()));
                }
            }
        }

        let mut report = InstallReport {
            kind: ArtifactKind::Mcp,
            name: server.name.clone(),
            platforms: Vec::new(),
        };
        for (platform, manager) in platforms.iter().zip(&managers) {
            self.backups.ensure(platform.as_ref())?;
            let dropped = manager.translator().dropped_fields(server);
            if !dropped.is_empty() {
                print_warning(format!(
                    "{} does not support {}; dropped from MCP server '{}'",
                    platform.display_name(),
                    dropped.join(", "),
                    server.name
                ));
            }
            manager.add(server)?;
            debug!("Added MCP server '{}' to {}", server.name, manager.path().display());
            report.platforms.push(platform.id());
        }
        Ok(report)
    }
}

fn already_exists(kind: ArtifactKind, name: &str, platform: &dyn Platform) -> anyhow::Error {
    AixError::AlreadyExists {
        kind: kind.label().to_string(),
        name: name.to_string(),
        platform: platform.display_name().to_string(),
    }
    .into()
}
