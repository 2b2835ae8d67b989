//! CRUD over one MCP configuration file.
//!
//! The file is shared with the host: everything aix does not own is carried
//! through [`McpConfig::unknown_fields`] and written back unchanged. Two
//! layouts exist:
//!
//! - [`McpLayout::Flat`]: the server map is a top-level key of the file.
//! - [`McpLayout::ProjectNested`]: the file holds a `projects` object keyed by
//!   absolute project path and the real configuration is one of its entries
//!   (Claude Code's `~/.claude.json`). Saving re-reads the file and replaces
//!   only this project's entry, so sibling projects and every other top-level
//!   key stay as they are on disk.
//!
//! Load, modify and save are not transactional across processes; two
//! concurrent invocations may lose one update, but the file is always
//! replaced atomically.

use super::translate::McpTranslator;
use crate::core::AixError;
use crate::models::{McpConfig, McpServer};
use crate::utils::fs::atomic_write_json;
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Key of the per-project map in nested configuration files.
const PROJECTS_KEY: &str = "projects";

/// Where the configuration lives inside the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum McpLayout {
    /// The file itself is the configuration
    Flat,
    /// The configuration is `projects.<project>` inside the file
    ProjectNested {
        /// Absolute project path used as the key
        project: String,
    },
}

/// Manages the MCP servers of one (platform, scope) configuration file.
pub struct McpConfigManager {
    path: PathBuf,
    layout: McpLayout,
    translator: &'static dyn McpTranslator,
}

impl std::fmt::Debug for McpConfigManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpConfigManager")
            .field("path", &self.path)
            .field("layout", &self.layout)
            .field("platform", &self.translator.platform())
            .finish()
    }
}

fn read_root(path: &Path) -> Result<Option<Map<String, Value>>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read file: {}", path.display()));
        }
    };

    if content.trim().is_empty() {
        return Ok(Some(Map::new()));
    }

    let value: Value = serde_json::from_str(&content).map_err(|e| AixError::InvalidJson {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    match value {
        Value::Object(map) => Ok(Some(map)),
        _ => Err(AixError::InvalidJson {
            path: path.display().to_string(),
            reason: "top-level value must be an object".to_string(),
        }
        .into()),
    }
}

impl McpConfigManager {
    /// Manage the configuration at `path` using `translator` for the host schema.
    pub fn new(
        path: impl Into<PathBuf>,
        layout: McpLayout,
        translator: &'static dyn McpTranslator,
    ) -> Self {
        Self {
            path: path.into(),
            layout,
            translator,
        }
    }

    /// The configuration file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The file layout
    #[must_use]
    pub const fn layout(&self) -> &McpLayout {
        &self.layout
    }

    /// The translator in use
    #[must_use]
    pub fn translator(&self) -> &'static dyn McpTranslator {
        self.translator
    }

    /// Load the configuration; a missing file or project entry is empty.
    pub fn load(&self) -> Result<McpConfig> {
        let Some(mut root) = read_root(&self.path)? else {
            return Ok(McpConfig::default());
        };
        let source = self.path.display().to_string();

        let inner = match &self.layout {
            McpLayout::Flat => root,
            McpLayout::ProjectNested {
                project,
            } => match root.remove(PROJECTS_KEY) {
                Some(Value::Object(mut projects)) => match projects.remove(project) {
                    Some(Value::Object(inner)) => inner,
                    Some(Value::Null) | None => return Ok(McpConfig::default()),
                    Some(_) => {
                        return Err(AixError::InvalidJson {
                            path: source,
                            reason: format!("entry for project '{project}' must be an object"),
                        }
                        .into());
                    }
                },
                Some(Value::Null) | None => return Ok(McpConfig::default()),
                Some(_) => {
                    return Err(AixError::InvalidJson {
                        path: source,
                        reason: format!("'{PROJECTS_KEY}' must be an object"),
                    }
                    .into());
                }
            },
        };

        self.translator.config_from_platform(inner, &source)
    }

    /// Write `config` back to the file.
    pub fn save(&self, config: &McpConfig) -> Result<()> {
        let inner = self.translator.config_to_platform(config)?;

        let root = match &self.layout {
            McpLayout::Flat => inner,
            McpLayout::ProjectNested {
                project,
            } => {
                // Re-read so changes made to other projects since load survive.
                let mut root = read_root(&self.path)?.unwrap_or_default();
                let projects = root
                    .entry(PROJECTS_KEY)
                    .or_insert_with(|| Value::Object(Map::new()));
                if projects.is_null() {
                    *projects = Value::Object(Map::new());
                }
                let Value::Object(projects) = projects else {
                    return Err(AixError::InvalidJson {
                        path: self.path.display().to_string(),
                        reason: format!("'{PROJECTS_KEY}' must be an object"),
                    }
                    .into());
                };
                projects.insert(project.clone(), Value::Object(inner));
                root
            }
        };

        debug!("Writing MCP configuration to {}", self.path.display());
        atomic_write_json(&self.path, &Value::Object(root))
    }

    /// All servers, sorted by name.
    pub fn list(&self) -> Result<Vec<McpServer>> {
        Ok(self.load()?.servers.into_values().collect())
    }

    /// One server by name.
    pub fn get(&self, name: &str) -> Result<McpServer> {
        self.load()?.servers.remove(name).ok_or_else(|| {
            AixError::McpServerNotFound {
                name: name.to_string(),
            }
            .into()
        })
    }

    /// Whether a server with this name is configured.
    pub fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.load()?.servers.contains_key(name))
    }

    /// Add `server`, replacing any entry with the same name.
    pub fn add(&self, server: &McpServer) -> Result<()> {
        if server.name.is_empty() {
            return Err(AixError::InvalidMcpServer {
                reason: "name is required".to_string(),
            }
            .into());
        }

        let mut config = self.load()?;
        config.servers.insert(server.name.clone(), server.clone());
        self.save(&config)
    }

    /// Remove a server; removing a missing server succeeds without writing.
    pub fn remove(&self, name: &str) -> Result<()> {
        let mut config = self.load()?;
        if config.servers.remove(name).is_none() {
            return Ok(());
        }
        self.save(&config)
    }

    /// Clear the `disabled` flag of a server.
    pub fn enable(&self, name: &str) -> Result<()> {
        self.set_disabled(name, false)
    }

    /// Set the `disabled` flag of a server.
    pub fn disable(&self, name: &str) -> Result<()> {
        self.set_disabled(name, true)
    }

    fn set_disabled(&self, name: &str, disabled: bool) -> Result<()> {
        let mut config = self.load()?;
        let server = config.servers.get_mut(name).ok_or_else(|| AixError::McpServerNotFound {
            name: name.to_string(),
        })?;
        server.disabled = disabled;
        self.save(&config)
    }
}
