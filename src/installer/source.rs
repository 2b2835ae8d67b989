//! Classifying an install source and locating the artifact file inside it.

use crate::core::AixError;
use crate::git::is_git_url;
use crate::models::ArtifactKind;
use crate::models::skill::SKILL_FILE;
use crate::repo::{RepoEntry, RepoIndex, Selector, is_indexed_markdown};
use crate::utils::print_hint;
use crate::validation::infer_name;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name that marks an MCP server definition inside a directory
pub const MCP_MARKER_FILE: &str = "server.json";

/// Where an artifact comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A git remote to clone
    Git(String),
    /// A file or directory on disk
    Local(PathBuf),
    /// An entry of a configured repository
    Repo(RepoEntry),
}

/// Whether `input` is written like a filesystem path rather than a name.
#[must_use]
pub fn looks_like_path(input: &str) -> bool {
    input == "."
        || input == ".."
        || input.starts_with("./")
        || input.starts_with("../")
        || input.starts_with('/')
        || input.contains('/')
        || input.contains(std::path::MAIN_SEPARATOR)
}

/// Decide how to treat `input`.
///
/// In order: `--file` forces git-or-path; git URLs; path-like input;
/// repository lookup (asking `selector` when several repositories match);
/// finally an existing path. Anything else is an error.
pub fn classify(
    input: &str,
    kind: ArtifactKind,
    force_file: bool,
    index: &RepoIndex,
    selector: &dyn Selector,
) -> Result<Source> {
    if force_file || is_git_url(input) {
        return Ok(if is_git_url(input) {
            Source::Git(input.to_string())
        } else {
            Source::Local(PathBuf::from(input))
        });
    }

    if looks_like_path(input) {
        return Ok(Source::Local(PathBuf::from(input)));
    }

    let path = Path::new(input);
    if !index.has_repositories() {
        if path.exists() {
            return Ok(Source::Local(path.to_path_buf()));
        }
        return Err(AixError::NoRepositories {
            name: input.to_string(),
        }
        .into());
    }

    let mut matches = index.find(kind, input);
    debug!("Repository lookup for {kind} '{input}': {} match(es)", matches.len());
    match matches.len() {
        0 => {}
        1 => return Ok(Source::Repo(matches.remove(0))),
        _ => {
            let choice = selector.select(input, &matches)?;
            return Ok(Source::Repo(matches.swap_remove(choice)));
        }
    }

    if (input.ends_with(".md") || input.contains('\\')) && path.exists() {
        print_hint(format!("'{input}' looks like a file; pass --file to skip the repository lookup"));
    }
    if path.exists() {
        return Ok(Source::Local(path.to_path_buf()));
    }

    Err(AixError::NotFoundInRepositories {
        kind: kind.label().to_string(),
        name: input.to_string(),
    }
    .into())
}

/// The artifact file found at a local path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    /// The file to parse
    pub file: PathBuf,
    /// Directory whose other files travel with the artifact (skills only)
    pub source_dir: Option<PathBuf>,
}

fn first_sorted(dir: &Path, accept: impl Fn(&Path) -> bool) -> Result<Option<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && accept(p))
        .collect();
    files.sort();
    Ok(files.into_iter().next())
}

fn no_artifact(kind: ArtifactKind, dir: &Path) -> anyhow::Error {
    AixError::NoArtifactFile {
        kind: kind.to_string(),
        path: dir.display().to_string(),
    }
    .into()
}

/// Find the file for a markdown artifact at `path`.
///
/// A directory resolves to `marker` when present, otherwise to the first
/// `.md` file in name order that does not start with `_`. Skills only accept
/// `SKILL.md` and carry their directory along.
pub fn locate_markdown(path: &Path, kind: ArtifactKind, marker: &str) -> Result<Located> {
    if !path.exists() {
        return Err(AixError::FileNotFound {
            path: path.display().to_string(),
        }
        .into());
    }

    if kind == ArtifactKind::Skill {
        let (file, dir) = if path.is_dir() {
            (path.join(SKILL_FILE), path.to_path_buf())
        } else {
            let dir = path.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf);
            (path.to_path_buf(), dir)
        };
        if !file.is_file() {
            return Err(no_artifact(kind, path));
        }
        // A loose markdown file is a skill without supporting files.
        let source_dir = (file.file_name().and_then(|n| n.to_str()) == Some(SKILL_FILE)).then_some(dir);
        return Ok(Located { file, source_dir });
    }

    if path.is_file() {
        return Ok(Located {
            file: path.to_path_buf(),
            source_dir: None,
        });
    }

    let preferred = path.join(marker);
    let file = if preferred.is_file() {
        preferred
    } else {
        first_sorted(path, is_indexed_markdown)?.ok_or_else(|| no_artifact(kind, path))?
    };
    Ok(Located {
        file,
        source_dir: None,
    })
}

/// Find the MCP server definition at `path`: the file itself, or
/// `server.json`, or the first `.json` file in name order.
pub fn locate_mcp(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Err(AixError::FileNotFound {
            path: path.display().to_string(),
        }
        .into());
    }
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    let preferred = path.join(MCP_MARKER_FILE);
    if preferred.is_file() {
        return Ok(preferred);
    }
    first_sorted(path, |p| p.extension().and_then(|e| e.to_str()) == Some("json"))?
        .ok_or_else(|| no_artifact(ArtifactKind::Mcp, path))
}

/// Name for an artifact whose record carries none.
///
/// Marker files (`command.md`, `agent.md`, `SKILL.md`) name their directory;
/// any other file names itself.
#[must_use]
pub fn inferred_name(file: &Path, marker: &str) -> String {
    let is_marker = file
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n == marker || n == SKILL_FILE);
    if is_marker
        && let Some(dir) = file.parent().and_then(|p| p.file_name()).and_then(|n| n.to_str())
    {
        return dir.to_string();
    }
    infer_name(file)
}
