//! CRUD over directories of markdown artifacts.
//!
//! Every platform stores commands and agents as `<dir>/<name>.md` and skills
//! as `<dir>/<name>/SKILL.md`. The managers here own those layouts:
//!
//! - [`FlatManager`] for one-file-per-artifact kinds ([`CommandManager`],
//!   [`AgentManager`])
//! - [`SkillManager`] for skill directories
//!
//! Both implement [`ArtifactStore`], which is what the platform adapters hand
//! out and what the installer and CLI work against.
//!
//! # Guarantees
//!
//! - `list` returns records sorted by name and never reads bodies
//! - `install` writes through [`atomic_write`](crate::utils::fs::atomic_write),
//!   so a concurrent reader sees the old or the new file in full
//! - `uninstall` is idempotent
//! - the file name is authoritative for the record name on load

mod flat;
mod skills;

pub use flat::{AgentManager, CommandManager, FlatManager};
pub use skills::SkillManager;

use crate::models::MarkdownArtifact;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Storage operations for one artifact kind on one platform and scope.
pub trait ArtifactStore<A: MarkdownArtifact>: Send + Sync {
    /// Directory the artifacts live in
    fn root(&self) -> &Path;

    /// Path of the file holding `name`
    fn path_for(&self, name: &str) -> PathBuf;

    /// All installed artifacts, sorted by name, bodies not loaded
    fn list(&self) -> Result<Vec<A>>;

    /// Load one artifact with its body
    fn get(&self, name: &str) -> Result<A>;

    /// Write `record`, replacing any existing artifact of the same name
    fn install(&self, record: &A) -> Result<()>;

    /// Write `record` and copy supporting files from `source_dir`.
    ///
    /// Only skills carry supporting files; the default ignores `source_dir`.
    fn install_from(&self, record: &A, source_dir: Option<&Path>) -> Result<()> {
        let _ = source_dir;
        self.install(record)
    }

    /// Remove `name`; removing a missing artifact succeeds
    fn uninstall(&self, name: &str) -> Result<()>;

    /// Whether `name` is installed
    fn exists(&self, name: &str) -> bool;

    /// Installed names, sorted
    fn names(&self) -> Result<Vec<String>>;
}

/// Reject names that would escape the artifact directory.
pub(crate) fn check_path_safe<A: MarkdownArtifact>(name: &str) -> Result<()> {
    if name == "." || name == ".." || name.contains('/') || name.contains('\\') {
        return Err(A::invalid(format!("'{name}' is not a valid artifact name")).into());
    }
    Ok(())
}
