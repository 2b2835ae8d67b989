//! Index over configured artifact repositories.
//!
//! A repository is a local clone laid out as
//!
//! ```text
//! commands/<name>.md
//! skills/<name>/SKILL.md
//! agents/<name>.md
//! mcp/<name>.json
//! ```
//!
//! [`RepoIndex::scan`] reads only frontmatter headers (and MCP JSON files) so
//! building the index stays cheap. Files that fail to parse are logged and
//! skipped rather than failing the whole scan.

use crate::core::AixError;
use crate::markdown::{is_markdown_file, list_markdown_files, parse_header};
use crate::models::ArtifactKind;
use crate::models::skill::SKILL_FILE;
use crate::utils::fs::copy_dir;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::{BufReader, IsTerminal};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, warn};

/// One artifact offered by a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoEntry {
    /// Repository name
    pub repo: String,
    /// Artifact kind
    pub kind: ArtifactKind,
    /// Artifact name
    pub name: String,
    /// Description from the frontmatter, empty when absent
    pub description: String,
    /// The artifact file (`SKILL.md` for skills)
    pub path: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
struct Header {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
}

impl RepoEntry {
    /// What has to be copied to install this entry: the skill directory for
    /// skills, the file otherwise.
    #[must_use]
    pub fn source_path(&self) -> &Path {
        match self.kind {
            ArtifactKind::Skill => self.path.parent().unwrap_or(&self.path),
            _ => &self.path,
        }
    }

    /// Copy the entry into a fresh scratch directory.
    ///
    /// Returns the directory guard and the copied path inside it; the copy
    /// disappears when the guard is dropped.
    pub fn materialize(&self) -> Result<(TempDir, PathBuf)> {
        let scratch = TempDir::with_prefix("aix-").context("Failed to create scratch directory")?;
        let source = self.source_path();
        let file_name = source.file_name().map_or_else(|| self.name.clone().into(), PathBuf::from);
        let dest = scratch.path().join(file_name);

        if source.is_dir() {
            copy_dir(source, &dest)?;
        } else {
            std::fs::copy(source, &dest).with_context(|| {
                format!("Failed to copy {} to {}", source.display(), dest.display())
            })?;
        }
        debug!("Materialized {} '{}' from {} at {}", self.kind, self.name, self.repo, dest.display());
        Ok((scratch, dest))
    }
}

/// Artifacts of every configured repository, sorted by `(name, repo)`.
#[derive(Debug, Clone, Default)]
pub struct RepoIndex {
    repos: Vec<String>,
    entries: Vec<RepoEntry>,
}

fn read_header(path: &Path) -> Result<Header> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    parse_header(BufReader::new(file), &path.display().to_string())
}

fn file_stem(path: &Path) -> String {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or_default().to_string()
}

fn markdown_entries(repo: &str, dir: &Path, kind: ArtifactKind) -> Result<Vec<RepoEntry>> {
    let mut entries = Vec::new();
    for path in list_markdown_files(dir)? {
        let name = file_stem(&path);
        if name.starts_with('_') {
            continue;
        }
        match read_header(&path) {
            Ok(header) => entries.push(RepoEntry {
                repo: repo.to_string(),
                kind,
                name,
                description: header.description,
                path,
            }),
            Err(e) => warn!("Skipping {}: {e:#}", path.display()),
        }
    }
    Ok(entries)
}

fn skill_entries(repo: &str, dir: &Path) -> Result<Vec<RepoEntry>> {
    let read = match std::fs::read_dir(dir) {
        Ok(read) => read,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e).with_context(|| format!("Failed to read {}", dir.display())),
    };

    let mut entries = Vec::new();
    for entry in read {
        let skill_dir = entry?.path();
        let file = skill_dir.join(SKILL_FILE);
        if !file.is_file() {
            continue;
        }
        let dir_name = skill_dir.file_name().and_then(|n| n.to_str()).unwrap_or_default().to_string();
        match read_header(&file) {
            Ok(header) => entries.push(RepoEntry {
                repo: repo.to_string(),
                kind: ArtifactKind::Skill,
                name: if header.name.is_empty() { dir_name } else { header.name },
                description: header.description,
                path: file,
            }),
            Err(e) => warn!("Skipping {}: {e:#}", file.display()),
        }
    }
    Ok(entries)
}

fn mcp_entries(repo: &str, dir: &Path) -> Result<Vec<RepoEntry>> {
    let read = match std::fs::read_dir(dir) {
        Ok(read) => read,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e).with_context(|| format!("Failed to read {}", dir.display())),
    };

    let mut entries = Vec::new();
    for entry in read {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") || !path.is_file() {
            continue;
        }
        match crate::mcp::read_server_file(&path) {
            Ok(server) => {
                let description = if server.transport.is_remote() {
                    server.url.clone()
                } else {
                    std::iter::once(server.command.as_str())
                        .chain(server.args.iter().map(String::as_str))
                        .collect::<Vec<_>>()
                        .join(" ")
                };
                entries.push(RepoEntry {
                    repo: repo.to_string(),
                    kind: ArtifactKind::Mcp,
                    name: server.name,
                    description,
                    path,
                });
            }
            Err(e) => warn!("Skipping {}: {e:#}", path.display()),
        }
    }
    Ok(entries)
}

impl RepoIndex {
    /// Scan every `(name, clone directory)` pair.
    ///
    /// Repositories whose clone is missing are skipped with a warning.
    pub fn scan(repos: &[(String, PathBuf)]) -> Result<Self> {
        let mut entries = Vec::new();
        for (name, dir) in repos {
            debug!("Indexing repository '{name}' at {}", dir.display());
            if !dir.is_dir() {
                warn!("Repository '{name}' has no clone at {}; run `aix repo update {name}`", dir.display());
                continue;
            }
            entries.extend(Self::scan_repo(name, dir)?);
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.repo.cmp(&b.repo)));
        Ok(Self {
            repos: repos.iter().map(|(name, _)| name.clone()).collect(),
            entries,
        })
    }

    /// Entries of a single repository, unsorted.
    pub fn scan_repo(name: &str, dir: &Path) -> Result<Vec<RepoEntry>> {
        let mut entries = markdown_entries(name, &dir.join(ArtifactKind::Command.repo_dir()), ArtifactKind::Command)?;
        entries.extend(skill_entries(name, &dir.join(ArtifactKind::Skill.repo_dir()))?);
        entries.extend(markdown_entries(name, &dir.join(ArtifactKind::Agent.repo_dir()), ArtifactKind::Agent)?);
        entries.extend(mcp_entries(name, &dir.join(ArtifactKind::Mcp.repo_dir()))?);
        Ok(entries)
    }

    /// Whether any repository is configured, cloned or not
    #[must_use]
    pub fn has_repositories(&self) -> bool {
        !self.repos.is_empty()
    }

    /// Whether `name` is a configured repository
    #[must_use]
    pub fn has_repo(&self, name: &str) -> bool {
        self.repos.iter().any(|r| r == name)
    }

    /// Every entry
    #[must_use]
    pub fn entries(&self) -> &[RepoEntry] {
        &self.entries
    }

    /// Entries of `kind` named exactly `name`, one per providing repository.
    #[must_use]
    pub fn find(&self, kind: ArtifactKind, name: &str) -> Vec<RepoEntry> {
        self.entries
            .iter()
            .filter(|e| e.kind == kind && e.name == name)
            .cloned()
            .collect()
    }

    /// Case-insensitive substring search over names and descriptions.
    #[must_use]
    pub fn search(&self, kind: Option<ArtifactKind>, query: &str) -> Vec<RepoEntry> {
        let query = query.to_lowercase();
        self.entries
            .iter()
            .filter(|e| kind.is_none_or(|k| e.kind == k))
            .filter(|e| {
                e.name.to_lowercase().contains(&query) || e.description.to_lowercase().contains(&query)
            })
            .cloned()
            .collect()
    }

    /// Entries of `kind` from one repository, in name order.
    #[must_use]
    pub fn by_repo(&self, repo: &str, kind: ArtifactKind) -> Vec<RepoEntry> {
        self.entries
            .iter()
            .filter(|e| e.repo == repo && e.kind == kind)
            .cloned()
            .collect()
    }
}

/// Picks one of several repository entries with the same name.
pub trait Selector {
    /// Index into `candidates` of the chosen entry.
    fn select(&self, name: &str, candidates: &[RepoEntry]) -> Result<usize>;
}

fn ambiguous(name: &str, candidates: &[RepoEntry]) -> anyhow::Error {
    let repos: Vec<&str> = candidates.iter().map(|c| c.repo.as_str()).collect();
    AixError::AmbiguousSource {
        name: name.to_string(),
        repos: repos.join(", "),
    }
    .into()
}

/// Asks on the terminal; fails with `AmbiguousSource` when stdin is not one.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptSelector;

impl Selector for PromptSelector {
    fn select(&self, name: &str, candidates: &[RepoEntry]) -> Result<usize> {
        if !std::io::stdin().is_terminal() {
            return Err(ambiguous(name, candidates));
        }
        let options: Vec<String> = candidates
            .iter()
            .map(|c| {
                if c.description.is_empty() {
                    c.repo.clone()
                } else {
                    format!("{} - {}", c.repo, c.description)
                }
            })
            .collect();
        let choice = inquire::Select::new(&format!("'{name}' is in several repositories. Install from:"), options.clone())
            .prompt()
            .context("Selection cancelled")?;
        options
            .iter()
            .position(|o| *o == choice)
            .ok_or_else(|| ambiguous(name, candidates))
    }
}

/// Never chooses; every ambiguity is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSelector;

impl Selector for NoSelector {
    fn select(&self, name: &str, candidates: &[RepoEntry]) -> Result<usize> {
        Err(ambiguous(name, candidates))
    }
}

/// Whether `path` is something the index would list as a markdown artifact.
#[must_use]
pub fn is_indexed_markdown(path: &Path) -> bool {
    is_markdown_file(path)
        && !path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('_'))
}
