//! Directory helpers.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Create `path` and its parents (mode 0755 on Unix) if missing.
///
/// Fails if `path` exists and is not a directory.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    if path.exists() {
        return Err(anyhow::anyhow!("Path exists but is not a directory: {}", path.display()));
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder
        .create(path)
        .with_context(|| format!("Failed to create directory: {}", path.display()))
}

/// Recursively copy `src` into `dst`.
pub fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    copy_dir_filtered(src, dst, |_| true)
}

/// Recursively copy `src` into `dst`, skipping entries for which `keep`
/// returns false. A skipped directory is skipped with all its contents.
///
/// `keep` receives paths relative to `src`.
pub fn copy_dir_filtered<F>(src: &Path, dst: &Path, keep: F) -> Result<()>
where
    F: Fn(&Path) -> bool,
{
    ensure_dir(dst)?;

    let walker = WalkDir::new(src).min_depth(1).follow_links(false).into_iter();
    for entry in walker.filter_entry(|e| {
        e.path().strip_prefix(src).map(|rel| keep(rel)).unwrap_or(false)
    }) {
        let entry =
            entry.with_context(|| format!("Failed to read directory: {}", src.display()))?;
        let rel = entry.path().strip_prefix(src)?;
        let target = dst.join(rel);

        if entry.file_type().is_dir() {
            ensure_dir(&target)?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target).with_context(|| {
                format!("Failed to copy file from {} to {}", entry.path().display(), target.display())
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_dir() {
        let temp = tempdir().unwrap();
        let nested = temp.path().join("a/b/c");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
        ensure_dir(&nested).unwrap();

        let file = temp.path().join("file");
        fs::write(&file, "x").unwrap();
        assert!(ensure_dir(&file).is_err());
    }

    #[test]
    fn test_copy_dir_filtered() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(src.join("scripts")).unwrap();
        fs::create_dir_all(src.join(".git/objects")).unwrap();
        fs::write(src.join("SKILL.md"), "skill").unwrap();
        fs::write(src.join("scripts/run.sh"), "echo").unwrap();
        fs::write(src.join(".git/HEAD"), "ref").unwrap();

        let dst = temp.path().join("dst");
        copy_dir_filtered(&src, &dst, |rel| !rel.starts_with(".git")).unwrap();

        assert!(dst.join("SKILL.md").is_file());
        assert_eq!(fs::read_to_string(dst.join("scripts/run.sh")).unwrap(), "echo");
        assert!(!dst.join(".git").exists());
    }
}
