//! Snapshots of platform files taken before aix writes to them.
//!
//! Each platform names its backup set through
//! [`Platform::backup_paths`](crate::platform::Platform::backup_paths). The
//! first write to a platform in an invocation copies every existing path of
//! that set to
//!
//! ```text
//! <backup-dir>/<platform>/<YYYYmmdd-HHMMSS>/<path relative to the filesystem root>
//! ```
//!
//! Later writes to the same platform in the same invocation reuse that
//! snapshot.

use crate::platform::{Platform, PlatformId};
use crate::utils::fs::{copy_dir, ensure_dir};
use anyhow::{Context, Result};
use chrono::Local;
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// Timestamp format of snapshot directories
const STAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Takes at most one snapshot per platform.
#[derive(Debug)]
pub struct BackupManager {
    root: Option<PathBuf>,
    stamp: String,
    done: BTreeSet<PlatformId>,
}

impl BackupManager {
    /// Snapshots go under `root`.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self::with_stamp(Some(root), Local::now().format(STAMP_FORMAT).to_string())
    }

    /// A manager that never copies anything.
    #[must_use]
    pub fn disabled() -> Self {
        Self::with_stamp(None, String::new())
    }

    /// `root` of `None` disables backups.
    #[must_use]
    pub fn from_config(root: Option<PathBuf>) -> Self {
        root.map_or_else(Self::disabled, Self::new)
    }

    fn with_stamp(root: Option<PathBuf>, stamp: String) -> Self {
        Self {
            root,
            stamp,
            done: BTreeSet::new(),
        }
    }

    /// Snapshot `platform` unless that already happened in this invocation.
    ///
    /// Returns the snapshot directory when something was copied.
    pub fn ensure(&mut self, platform: &dyn Platform) -> Result<Option<PathBuf>> {
        let Some(root) = &self.root else {
            return Ok(None);
        };
        if !self.done.insert(platform.id()) {
            return Ok(None);
        }

        let snapshot = root.join(platform.name()).join(&self.stamp);
        let mut copied = 0usize;
        for path in platform.backup_paths() {
            if !path.exists() {
                continue;
            }
            let dest = snapshot.join(relative_to_root(&path));
            if path.is_dir() {
                copy_dir(&path, &dest)?;
            } else {
                if let Some(parent) = dest.parent() {
                    ensure_dir(parent)?;
                }
                std::fs::copy(&path, &dest).with_context(|| {
                    format!("Failed to back up {} to {}", path.display(), dest.display())
                })?;
            }
            debug!("Backed up {}", path.display());
            copied += 1;
        }

        if copied == 0 {
            return Ok(None);
        }
        info!("Backed up {} to {}", platform.display_name(), snapshot.display());
        Ok(Some(snapshot))
    }
}

/// `/home/u/.claude` -> `home/u/.claude`
fn relative_to_root(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Scope;
    use crate::platform::{PlatformContext, create_platform};
    use tempfile::TempDir;

    #[test]
    fn test_relative_to_root() {
        assert_eq!(relative_to_root(Path::new("/home/u/.claude")), PathBuf::from("home/u/.claude"));
    }

    #[test]
    fn test_snapshot_once_per_platform() {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("home");
        std::fs::create_dir_all(home.join(".claude/commands")).unwrap();
        std::fs::write(home.join(".claude/commands/review.md"), "Review.\n").unwrap();
        std::fs::write(home.join(".claude/.mcp.json"), "{}\n").unwrap();

        let ctx = PlatformContext::new(Some(home.clone()), None, Some(Scope::User).into());
        let claude = create_platform(PlatformId::Claude, &ctx);

        let mut backups =
            BackupManager::with_stamp(Some(temp.path().join("backups")), "20250101-120000".to_string());
        let snapshot = backups.ensure(claude.as_ref()).unwrap().unwrap();
        assert_eq!(snapshot, temp.path().join("backups/claude/20250101-120000"));

        let copied = snapshot.join(relative_to_root(&home)).join(".claude");
        assert_eq!(std::fs::read_to_string(copied.join("commands/review.md")).unwrap(), "Review.\n");
        assert_eq!(std::fs::read_to_string(copied.join(".mcp.json")).unwrap(), "{}\n");

        // Second call in the same run is a no-op.
        std::fs::write(home.join(".claude/commands/review.md"), "Changed.\n").unwrap();
        assert!(backups.ensure(claude.as_ref()).unwrap().is_none());
        assert_eq!(std::fs::read_to_string(copied.join("commands/review.md")).unwrap(), "Review.\n");
    }

    #[test]
    fn test_nothing_to_back_up() {
        let temp = TempDir::new().unwrap();
        let ctx = PlatformContext::new(Some(temp.path().join("home")), None, Default::default());
        let opencode = create_platform(PlatformId::OpenCode, &ctx);
        let mut backups = BackupManager::new(temp.path().join("backups"));
        assert!(backups.ensure(opencode.as_ref()).unwrap().is_none());
        assert!(!temp.path().join("backups").exists());
    }

    #[test]
    fn test_disabled() {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("home");
        std::fs::create_dir_all(home.join(".claude/commands")).unwrap();
        let ctx = PlatformContext::new(Some(home), None, Default::default());
        let claude = create_platform(PlatformId::Claude, &ctx);
        let mut backups = BackupManager::from_config(None);
        assert!(backups.ensure(claude.as_ref()).unwrap().is_none());
    }
}
