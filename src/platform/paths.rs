//! Filesystem layout of each platform.
//!
//! Paths derive from `(platform, scope, home, project root)`. Every helper
//! returns `None` when its inputs are insufficient, e.g. project scope with no
//! project root; callers treat `None` as "unresolvable".
//!
//! | | Claude Code | OpenCode |
//! |---|---|---|
//! | user base | `~/.claude` | `~/.config/opencode` |
//! | project base | `<root>/.claude` | `<root>/.opencode` |
//! | commands | `B/commands` | `B/commands` |
//! | skills | `B/skills` | `B/skill` |
//! | agents | `B/agents` | `B/agent` |
//! | MCP | `B/.mcp.json`, local: `~/.claude.json` | `B/opencode.json` |
//! | instructions | `CLAUDE.md` | `AGENTS.md` |

use super::PlatformId;
use crate::core::Scope;
use crate::mcp::McpLayout;
use std::path::{Path, PathBuf};

/// Resolved layout for one platform at one scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformPaths {
    platform: PlatformId,
    scope: Scope,
    home: Option<PathBuf>,
    project_root: Option<PathBuf>,
}

impl PlatformPaths {
    /// Derive the layout from its inputs.
    #[must_use]
    pub const fn new(
        platform: PlatformId,
        scope: Scope,
        home: Option<PathBuf>,
        project_root: Option<PathBuf>,
    ) -> Self {
        Self {
            platform,
            scope,
            home,
            project_root,
        }
    }

    /// The scope these paths were resolved for.
    #[must_use]
    pub const fn scope(&self) -> Scope {
        self.scope
    }

    /// The project root, if one was supplied.
    #[must_use]
    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    /// The user-level base directory, regardless of scope.
    #[must_use]
    pub fn user_base(&self) -> Option<PathBuf> {
        let home = self.home.as_ref()?;
        Some(match self.platform {
            PlatformId::Claude => home.join(".claude"),
            PlatformId::OpenCode => home.join(".config").join("opencode"),
        })
    }

    fn project_base(&self) -> Option<PathBuf> {
        let root = self.project_root.as_ref()?;
        Some(match self.platform {
            PlatformId::Claude => root.join(".claude"),
            PlatformId::OpenCode => root.join(".opencode"),
        })
    }

    /// Base directory `B` for this scope.
    ///
    /// Local scope only changes where Claude Code keeps MCP servers; every
    /// other artifact resolves like project scope.
    #[must_use]
    pub fn base_dir(&self) -> Option<PathBuf> {
        match self.scope {
            Scope::User => self.user_base(),
            Scope::Project | Scope::Local => self.project_base(),
        }
    }

    /// Directory of slash commands.
    #[must_use]
    pub fn commands_dir(&self) -> Option<PathBuf> {
        Some(self.base_dir()?.join("commands"))
    }

    /// Directory of skill directories.
    #[must_use]
    pub fn skills_dir(&self) -> Option<PathBuf> {
        let dir = match self.platform {
            PlatformId::Claude => "skills",
            PlatformId::OpenCode => "skill",
        };
        Some(self.base_dir()?.join(dir))
    }

    /// Directory of agents.
    #[must_use]
    pub fn agents_dir(&self) -> Option<PathBuf> {
        let dir = match self.platform {
            PlatformId::Claude => "agents",
            PlatformId::OpenCode => "agent",
        };
        Some(self.base_dir()?.join(dir))
    }

    /// MCP configuration file.
    #[must_use]
    pub fn mcp_config(&self) -> Option<PathBuf> {
        match (self.platform, self.scope) {
            (PlatformId::Claude, Scope::Local) => {
                // Needs the project root too, as the key inside the file.
                self.project_root.as_ref()?;
                Some(self.home.as_ref()?.join(".claude.json"))
            }
            (PlatformId::Claude, _) => Some(self.base_dir()?.join(".mcp.json")),
            (PlatformId::OpenCode, _) => Some(self.base_dir()?.join("opencode.json")),
        }
    }

    /// How servers are laid out inside [`mcp_config`](Self::mcp_config).
    #[must_use]
    pub fn mcp_layout(&self) -> Option<McpLayout> {
        match (self.platform, self.scope) {
            (PlatformId::Claude, Scope::Local) => Some(McpLayout::ProjectNested {
                project: self.project_root.as_ref()?.to_string_lossy().into_owned(),
            }),
            _ => Some(McpLayout::Flat),
        }
    }

    /// The host's instructions file (`CLAUDE.md` / `AGENTS.md`).
    #[must_use]
    pub fn instructions_file(&self) -> Option<PathBuf> {
        let file = match self.platform {
            PlatformId::Claude => "CLAUDE.md",
            PlatformId::OpenCode => "AGENTS.md",
        };
        match self.scope {
            Scope::User => Some(self.user_base()?.join(file)),
            Scope::Project | Scope::Local => Some(self.project_root.as_ref()?.join(file)),
        }
    }

    /// `<commands>/<name>.md`
    #[must_use]
    pub fn command_path(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() {
            return None;
        }
        Some(self.commands_dir()?.join(format!("{name}.md")))
    }

    /// `<skills>/<name>/SKILL.md`
    #[must_use]
    pub fn skill_path(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() {
            return None;
        }
        Some(self.skills_dir()?.join(name).join(crate::models::skill::SKILL_FILE))
    }

    /// `<agents>/<name>.md`
    #[must_use]
    pub fn agent_path(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() {
            return None;
        }
        Some(self.agents_dir()?.join(format!("{name}.md")))
    }
}
