use super::{ArtifactStore, check_path_safe};
use crate::markdown::parse_header;
use crate::models::skill::SKILL_FILE;
use crate::models::{MarkdownArtifact, Skill};
use crate::utils::fs::{atomic_write, copy_dir_filtered};
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Manager for skills stored as `<dir>/<name>/SKILL.md`.
///
/// Removing a skill removes its whole directory, supporting files included.
/// An empty name passed to [`uninstall`](ArtifactStore::uninstall) is a no-op.
#[derive(Debug, Clone)]
pub struct SkillManager {
    dir: PathBuf,
}

impl SkillManager {
    /// Manage the skills in `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
        }
    }

    /// Directory holding one skill.
    #[must_use]
    pub fn skill_dir(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn skill_dirs(&self) -> Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read directory: {}", self.dir.display()));
            }
        };

        let mut dirs = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_dir() && entry.path().join(SKILL_FILE).is_file() {
                dirs.push(entry.path());
            }
        }
        dirs.sort();
        Ok(dirs)
    }
}

fn dir_name(path: &Path) -> String {
    path.file_name().and_then(|n| n.to_str()).unwrap_or_default().to_string()
}

impl ArtifactStore<Skill> for SkillManager {
    fn root(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.skill_dir(name).join(SKILL_FILE)
    }

    fn list(&self) -> Result<Vec<Skill>> {
        let mut skills = Vec::new();
        for dir in self.skill_dirs()? {
            let path = dir.join(SKILL_FILE);
            let file = File::open(&path)
                .with_context(|| format!("Failed to open file: {}", path.display()))?;
            let mut skill: Skill = parse_header(BufReader::new(file), &path.display().to_string())?;
            skill.name = dir_name(&dir);
            skills.push(skill);
        }
        skills.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(skills)
    }

    fn get(&self, name: &str) -> Result<Skill> {
        if name.is_empty() {
            return Err(Skill::invalid("name is required").into());
        }
        check_path_safe::<Skill>(name)?;

        let path = self.path_for(name);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Skill::not_found(name).into());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read file: {}", path.display()));
            }
        };

        let mut skill = Skill::parse(&content, &path.display().to_string())?;
        skill.name = name.to_string();
        Ok(skill)
    }

    fn install(&self, record: &Skill) -> Result<()> {
        self.install_from(record, None)
    }

    fn install_from(&self, record: &Skill, source_dir: Option<&Path>) -> Result<()> {
        if record.name.is_empty() {
            return Err(Skill::invalid("name is required").into());
        }
        check_path_safe::<Skill>(&record.name)?;

        let target = self.skill_dir(&record.name);
        if let Some(source) = source_dir {
            debug!("Copying skill files from {} to {}", source.display(), target.display());
            copy_dir_filtered(source, &target, |rel| {
                !rel.starts_with(".git") && rel != Path::new(SKILL_FILE)
            })?;
        }

        let content = record.render()?;
        atomic_write(&target.join(SKILL_FILE), content.as_bytes())
    }

    fn uninstall(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Ok(());
        }
        check_path_safe::<Skill>(name)?;

        let dir = self.skill_dir(name);
        if !dir.exists() {
            return Ok(());
        }
        if !dir.join(SKILL_FILE).exists() {
            warn!("Removing {} which has no {SKILL_FILE}", dir.display());
        }
        fs::remove_dir_all(&dir)
            .with_context(|| format!("Failed to remove directory: {}", dir.display()))
    }

    fn exists(&self, name: &str) -> bool {
        !name.is_empty() && check_path_safe::<Skill>(name).is_ok() && self.path_for(name).is_file()
    }

    fn names(&self) -> Result<Vec<String>> {
        Ok(self.skill_dirs()?.iter().map(|d| dir_name(d)).collect())
    }
}
