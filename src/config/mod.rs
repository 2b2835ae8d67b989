//! User configuration for aix.
//!
//! Stored as TOML at `~/.config/aix/config.toml`. The location can be moved
//! with the `AIX_CONFIG` environment variable or the global `--config` flag.
//! A missing file is the default configuration.
//!
//! ```toml
//! editor = "code --wait"
//!
//! [repositories.community]
//! url = "https://github.com/example/ai-commands.git"
//!
//! [repositories.team]
//! url = "git@github.com:example/team-prompts.git"
//! path = "~/src/team-prompts"
//!
//! [backup]
//! enabled = true
//! dir = "~/.config/aix/backups"
//! ```
//!
//! Relative defaults (`repos/`, `backups/`) live next to the config file.

use crate::core::AixError;
use crate::utils::{atomic_write, resolve_path};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "AIX_CONFIG";

/// Contents of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AixConfig {
    /// Editor command for `edit`; takes precedence over `EDITOR`/`VISUAL`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,

    /// Named artifact repositories
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub repositories: BTreeMap<String, RepositoryConfig>,

    /// Backup settings
    #[serde(default, skip_serializing_if = "BackupConfig::is_default")]
    pub backup: BackupConfig,
}

/// One configured repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Git remote
    pub url: String,

    /// Local clone; defaults to `<config dir>/repos/<name>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// `[backup]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupConfig {
    /// Snapshot platform files before writing to them
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Where snapshots go; defaults to `<config dir>/backups`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

const fn default_true() -> bool {
    true
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: None,
        }
    }
}

impl BackupConfig {
    fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl AixConfig {
    /// Add a repository; an existing name is an error.
    pub fn add_repository(&mut self, name: &str, repo: RepositoryConfig) -> Result<()> {
        if self.repositories.contains_key(name) {
            return Err(AixError::RepositoryExists {
                name: name.to_string(),
            }
            .into());
        }
        self.repositories.insert(name.to_string(), repo);
        Ok(())
    }

    /// Remove a repository and return its entry.
    pub fn remove_repository(&mut self, name: &str) -> Result<RepositoryConfig> {
        self.repositories.remove(name).ok_or_else(|| {
            AixError::RepositoryNotFound {
                name: name.to_string(),
            }
            .into()
        })
    }
}

/// Default config file: `$AIX_CONFIG`, else `~/.config/aix/config.toml`.
pub fn default_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV)
        && !path.is_empty()
    {
        return Ok(PathBuf::from(path));
    }
    Ok(crate::utils::get_home_dir()?.join(".config").join("aix").join("config.toml"))
}

/// Parse a config file.
pub async fn load_from(path: &Path) -> Result<AixConfig> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config from {}", path.display()))?;

    toml::from_str(&content).map_err(|e| {
        AixError::ConfigError {
            message: format!("{}: {}", path.display(), e.message()),
        }
        .into()
    })
}

/// The loaded configuration together with where it came from.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
    config: AixConfig,
}

impl ConfigManager {
    /// Load from `path`, or the default location when `None`.
    ///
    /// A missing file yields the default configuration.
    pub async fn load(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => default_path()?,
        };
        let config = if fs::try_exists(&path).await.unwrap_or(false) {
            load_from(&path).await?
        } else {
            debug!("No config at {}, using defaults", path.display());
            AixConfig::default()
        };
        Ok(Self { path, config })
    }

    /// Wrap an in-memory configuration.
    #[must_use]
    pub const fn new(path: PathBuf, config: AixConfig) -> Self {
        Self { path, config }
    }

    /// The config file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The configuration
    #[must_use]
    pub const fn config(&self) -> &AixConfig {
        &self.config
    }

    /// Mutable access; call [`save`](Self::save) afterwards.
    pub const fn config_mut(&mut self) -> &mut AixConfig {
        &mut self.config
    }

    /// Write the configuration back atomically.
    pub async fn save(&self) -> Result<()> {
        let content = toml::to_string_pretty(&self.config).context("Failed to serialize config")?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || atomic_write(&path, content.as_bytes()))
            .await
            .context("Config writer task failed")??;
        debug!("Saved config to {}", self.path.display());
        Ok(())
    }

    /// Directory holding the config file
    #[must_use]
    pub fn base_dir(&self) -> PathBuf {
        self.path.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    }

    /// Where a repository named `name` is cloned by default.
    #[must_use]
    pub fn default_repo_path(&self, name: &str) -> PathBuf {
        self.base_dir().join("repos").join(name)
    }

    /// Local clone of a configured repository.
    pub fn repo_path(&self, name: &str) -> Result<PathBuf> {
        let repo = self.config.repositories.get(name).ok_or_else(|| AixError::RepositoryNotFound {
            name: name.to_string(),
        })?;
        match &repo.path {
            Some(path) => resolve_path(path),
            None => Ok(self.default_repo_path(name)),
        }
    }

    /// Every configured repository with its resolved clone directory.
    pub fn repositories(&self) -> Result<Vec<(String, PathBuf)>> {
        self.config
            .repositories
            .keys()
            .map(|name| Ok((name.clone(), self.repo_path(name)?)))
            .collect()
    }

    /// Backup directory, or `None` when backups are disabled.
    pub fn backup_dir(&self) -> Result<Option<PathBuf>> {
        let backup = &self.config.backup;
        if !backup.enabled {
            return Ok(None);
        }
        match &backup.dir {
            Some(dir) => Ok(Some(resolve_path(dir)?)),
            None => Ok(Some(self.base_dir().join("backups"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_is_default() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::load(Some(temp.path().join("config.toml"))).await.unwrap();
        assert_eq!(manager.config(), &AixConfig::default());
        assert!(manager.config().backup.enabled);
        assert_eq!(manager.backup_dir().unwrap(), Some(temp.path().join("backups")));
    }

    #[tokio::test]
    async fn test_parse_full_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
editor = "hx"

[repositories.community]
url = "https://github.com/example/ai-commands.git"

[repositories.team]
url = "git@github.com:example/team.git"
path = "/srv/team"

[backup]
enabled = false
"#,
        )
        .unwrap();

        let manager = ConfigManager::load(Some(path)).await.unwrap();
        let config = manager.config();
        assert_eq!(config.editor.as_deref(), Some("hx"));
        assert_eq!(config.repositories.len(), 2);
        assert_eq!(
            manager.repo_path("community").unwrap(),
            temp.path().join("repos").join("community")
        );
        assert_eq!(manager.repo_path("team").unwrap(), PathBuf::from("/srv/team"));
        assert_eq!(manager.backup_dir().unwrap(), None);

        let err = manager.repo_path("missing").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AixError>(),
            Some(AixError::RepositoryNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_invalid_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "repositories = [").unwrap();
        let err = ConfigManager::load(Some(path)).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<AixError>(), Some(AixError::ConfigError { .. })));
    }

    #[tokio::test]
    async fn test_save_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");
        let mut manager = ConfigManager::load(Some(path.clone())).await.unwrap();
        manager
            .config_mut()
            .add_repository(
                "community",
                RepositoryConfig {
                    url: "https://github.com/example/c.git".to_string(),
                    path: None,
                },
            )
            .unwrap();
        manager.save().await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[repositories.community]"));
        assert!(!content.contains("[backup]"));

        let reloaded = ConfigManager::load(Some(path)).await.unwrap();
        assert_eq!(reloaded.config(), manager.config());
    }

    #[test]
    fn test_repository_add_remove() {
        let mut config = AixConfig::default();
        let repo = RepositoryConfig {
            url: "u".to_string(),
            path: None,
        };
        config.add_repository("a", repo.clone()).unwrap();
        assert!(config.add_repository("a", repo.clone()).is_err());
        assert_eq!(config.remove_repository("a").unwrap(), repo);
        assert!(config.remove_repository("a").is_err());
    }
}
