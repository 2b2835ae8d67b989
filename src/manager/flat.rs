use super::{ArtifactStore, check_path_safe};
use crate::markdown::{list_markdown_files, parse_header};
use crate::models::{Agent, Command, MarkdownArtifact};
use crate::utils::fs::atomic_write;
use crate::validation::infer_name;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Manager for artifacts stored one per `<name>.md` file.
#[derive(Debug, Clone)]
pub struct FlatManager<A> {
    dir: PathBuf,
    _kind: PhantomData<fn() -> A>,
}

/// Slash commands in a `commands/` directory.
pub type CommandManager = FlatManager<Command>;

/// Agents in an `agents/` (or `agent/`) directory.
pub type AgentManager = FlatManager<Agent>;

impl<A: MarkdownArtifact> FlatManager<A> {
    /// Manage the artifacts in `dir`. The directory is created on first install.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            _kind: PhantomData,
        }
    }

    fn require_name(name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(A::invalid("name is required").into());
        }
        check_path_safe::<A>(name)
    }
}

impl<A: MarkdownArtifact> ArtifactStore<A> for FlatManager<A> {
    fn root(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.md"))
    }

    fn list(&self) -> Result<Vec<A>> {
        let mut records = Vec::new();
        for path in list_markdown_files(&self.dir)? {
            let file = File::open(&path)
                .with_context(|| format!("Failed to open file: {}", path.display()))?;
            let mut record: A = parse_header(BufReader::new(file), &path.display().to_string())?;
            record.set_name(infer_name(&path));
            records.push(record);
        }
        records.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(records)
    }

    fn get(&self, name: &str) -> Result<A> {
        Self::require_name(name)?;

        let path = self.path_for(name);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(A::not_found(name).into());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read file: {}", path.display()));
            }
        };

        let mut record = A::parse(&content, &path.display().to_string())?;
        record.set_name(name.to_string());
        Ok(record)
    }

    fn install(&self, record: &A) -> Result<()> {
        Self::require_name(record.name())?;

        let path = self.path_for(record.name());
        let content = record.render()?;
        debug!("Writing {} to {}", A::KIND, path.display());
        atomic_write(&path, content.as_bytes())
    }

    fn uninstall(&self, name: &str) -> Result<()> {
        Self::require_name(name)?;

        let path = self.path_for(name);
        match std::fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove file: {}", path.display())),
        }
    }

    fn exists(&self, name: &str) -> bool {
        Self::require_name(name).is_ok() && self.path_for(name).is_file()
    }

    fn names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> =
            list_markdown_files(&self.dir)?.iter().map(|p| infer_name(p)).collect();
        names.sort();
        Ok(names)
    }
}
