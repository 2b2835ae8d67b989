//! Atomic file writes.
//!
//! Content is written to a uniquely named temporary file next to the target
//! and renamed over it, so a concurrent reader sees either the previous file
//! or the new one in full. The temporary file is removed if anything fails
//! before the rename. Rename is only atomic within one filesystem, which is
//! why the temporary file lives in the target's own directory.

use super::dirs::ensure_dir;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Mode applied to written files on Unix.
#[cfg(unix)]
const FILE_MODE: u32 = 0o644;

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("aix");
    let temp_name = format!(".{file_name}.{}.tmp", uuid::Uuid::new_v4().simple());
    path.with_file_name(temp_name)
}

fn write_temp(temp_path: &Path, content: &[u8]) -> Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(FILE_MODE);
    }

    let mut file = options
        .open(temp_path)
        .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;
    file.write_all(content)
        .with_context(|| format!("Failed to write to temp file: {}", temp_path.display()))?;
    file.sync_all().with_context(|| "Failed to sync file to disk")?;
    Ok(())
}

/// Write `content` to `path` atomically, creating parent directories.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        ensure_dir(parent)?;
    }

    let temp_path = temp_path_for(path);
    let result = write_temp(&temp_path, content).and_then(|()| {
        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to rename temp file to: {}", path.display()))
    });

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

/// Serialize `value` as pretty JSON (two-space indent, trailing newline) and
/// write it atomically.
pub fn atomic_write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut json = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize JSON for {}", path.display()))?;
    json.push('\n');
    atomic_write(path, json.as_bytes())
}
