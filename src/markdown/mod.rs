//! Markdown artifact files.
//!
//! Commands, skills and agents are stored as markdown documents with optional
//! YAML frontmatter. The codec lives in [`frontmatter`]; this module adds the
//! file-level helpers shared by the managers and the installer.

pub mod frontmatter;

pub use frontmatter::{Parsed, format, is_empty_metadata, must_parse, parse, parse_header, render};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Whether `path` names a markdown artifact file.
///
/// The extension check is case-sensitive: `notes.MD` is not an artifact file.
#[must_use]
pub fn is_markdown_file(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some("md")
}

/// List the markdown files directly inside `dir`, sorted by file name.
///
/// Sub-directories are skipped. A missing directory yields an empty list.
pub fn list_markdown_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read directory: {}", dir.display()));
        }
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("Failed to read directory: {}", dir.display()))?;
        if entry.file_type()?.is_dir() {
            continue;
        }
        let path = entry.path();
        if is_markdown_file(&path) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Read a markdown file and parse it with optional frontmatter.
pub fn read_file<T>(path: &Path) -> Result<Parsed<T>>
where
    T: serde::de::DeserializeOwned + Default,
{
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    parse(&content, &path.display().to_string())
}
