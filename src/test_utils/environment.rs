//! A temporary home and project for tests.

use crate::core::Scope;
use crate::platform::registry::Registry;
use crate::platform::{Platform, PlatformContext, PlatformId, create_platform};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated environment: `<temp>/home` with every platform's user directory
/// and an empty `<temp>/project`.
///
/// Everything is removed when the value is dropped.
pub struct TestEnvironment {
    temp_dir: TempDir,
    home: PathBuf,
    project: PathBuf,
}

impl TestEnvironment {
    /// Create the environment with all platforms detected.
    pub fn new() -> Result<Self> {
        let env = Self::bare()?;
        fs::create_dir_all(env.home.join(".claude"))?;
        fs::create_dir_all(env.home.join(".config").join("opencode"))?;
        Ok(env)
    }

    /// Create the environment with no platform directories.
    pub fn bare() -> Result<Self> {
        let temp_dir = TempDir::new().context("Failed to create temp dir")?;
        let home = temp_dir.path().join("home");
        let project = temp_dir.path().join("project");
        fs::create_dir_all(&home)?;
        fs::create_dir_all(&project)?;
        Ok(Self {
            temp_dir,
            home,
            project,
        })
    }

    /// Root of the temporary tree
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The fake home directory
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// The project root
    pub fn project(&self) -> &Path {
        &self.project
    }

    /// Platform context rooted in this environment.
    pub fn ctx(&self, scope: Option<Scope>) -> PlatformContext {
        PlatformContext::new(Some(self.home.clone()), Some(self.project.clone()), scope.into())
    }

    /// Adapter for `id` in this environment.
    pub fn platform(&self, id: PlatformId, scope: Option<Scope>) -> Box<dyn Platform> {
        create_platform(id, &self.ctx(scope))
    }

    /// A registry with every platform registered.
    pub fn registry(&self) -> Result<Registry> {
        let registry = Registry::new();
        for id in PlatformId::ALL {
            registry.register(id.as_str())?;
        }
        Ok(registry)
    }

    /// Write `content` to `path` relative to the root, creating parents.
    pub fn write(&self, path: impl AsRef<Path>, content: &str) -> Result<PathBuf> {
        let full = self.root().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&full, content).with_context(|| format!("Failed to write {}", full.display()))?;
        Ok(full)
    }

    /// Read a file relative to the root.
    pub fn read(&self, path: impl AsRef<Path>) -> Result<String> {
        let full = self.root().join(path);
        fs::read_to_string(&full).with_context(|| format!("Failed to read {}", full.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_layout() {
        let env = TestEnvironment::new().unwrap();
        assert!(env.platform(PlatformId::Claude, None).is_available());
        assert!(env.platform(PlatformId::OpenCode, None).is_available());

        let bare = TestEnvironment::bare().unwrap();
        assert!(!bare.platform(PlatformId::Claude, None).is_available());

        let path = env.write("a/b.md", "x").unwrap();
        assert!(path.starts_with(env.root()));
        assert_eq!(env.read("a/b.md").unwrap(), "x");
    }
}
