//! Platform adapters.
//!
//! A platform is one AI host whose configuration aix manages. Each adapter
//! knows the host's directory layout ([`PlatformPaths`]), hands out storage
//! managers for every artifact kind, names the files to back up before a
//! write, and translates canonical records into what the host understands.
//!
//! The set of platforms is closed ([`PlatformId::ALL`]). Adapters are built
//! per invocation from a [`PlatformContext`] with [`create_platform`]; the
//! process-wide [`registry`] decides which of them take part.
//!
//! # Example
//!
//! ```rust,no_run
//! use aix::platform::{PlatformContext, PlatformId, create_platform};
//! use aix::manager::ArtifactStore;
//!
//! # fn main() -> anyhow::Result<()> {
//! let ctx = PlatformContext::from_env(None, None)?;
//! let claude = create_platform(PlatformId::Claude, &ctx);
//! for command in claude.commands()?.list()? {
//!     println!("{}", command.slash_name());
//! }
//! # Ok(())
//! # }
//! ```

pub mod claude;
pub mod opencode;
pub mod paths;
pub mod registry;
pub mod variables;

pub use claude::ClaudePlatform;
pub use opencode::OpenCodePlatform;
pub use paths::PlatformPaths;
pub use variables::VariableSyntax;

use crate::core::{AixError, Scope, ScopeArg};
use crate::manager::{AgentManager, ArtifactStore, CommandManager, SkillManager};
use crate::mcp::{McpConfigManager, McpTranslator, translator_for};
use crate::models::{Agent, Command, MarkdownArtifact, Skill};
use crate::validation::{self, ValidationResult};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Identifier of a supported platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformId {
    /// Claude Code
    Claude,
    /// OpenCode
    OpenCode,
}

impl PlatformId {
    /// Every supported platform, in display order.
    pub const ALL: [Self; 2] = [Self::Claude, Self::OpenCode];

    /// Identifier used on the command line and in config files
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Claude => "claude",
            Self::OpenCode => "opencode",
        }
    }

    /// Human readable name
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Claude => "Claude Code",
            Self::OpenCode => "OpenCode",
        }
    }

    /// Look a platform up by identifier, case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "claude" | "claude-code" | "claudecode" => Some(Self::Claude),
            "opencode" | "open-code" => Some(Self::OpenCode),
            _ => None,
        }
    }

    /// Scope used when the caller does not ask for one
    #[must_use]
    pub const fn default_scope(self) -> Scope {
        Scope::User
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runtime inputs every adapter is built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformContext {
    /// Home directory for user-level paths
    pub home: Option<PathBuf>,
    /// Project root for project and local scope
    pub project_root: Option<PathBuf>,
    /// Requested scope
    pub scope: ScopeArg,
}

impl PlatformContext {
    /// Build a context from explicit values.
    #[must_use]
    pub fn new(home: Option<PathBuf>, project_root: Option<PathBuf>, scope: ScopeArg) -> Self {
        Self {
            home,
            project_root,
            scope,
        }
    }

    /// Resolve the home directory from the environment.
    ///
    /// `project_root` defaults to the current directory and is made absolute,
    /// since it doubles as a key in nested MCP configs.
    pub fn from_env(project_root: Option<PathBuf>, scope: Option<Scope>) -> Result<Self> {
        let home = crate::utils::get_home_dir()?;
        let root = match project_root {
            Some(root) => crate::utils::platform::absolute(&root)?,
            None => std::env::current_dir()?,
        };
        Ok(Self::new(Some(home), Some(root), scope.into()))
    }

    /// The same context with another scope.
    #[must_use]
    pub fn with_scope(mut self, scope: Option<Scope>) -> Self {
        self.scope = scope.into();
        self
    }
}

/// A record converted for one platform, plus the fields that did not survive.
#[derive(Debug, Clone, PartialEq)]
pub struct Translation<T> {
    /// The platform-specific record
    pub record: T,
    /// Canonical fields that were set but the platform cannot store
    pub dropped: Vec<&'static str>,
}

impl<T> Translation<T> {
    /// A translation that lost nothing.
    pub const fn lossless(record: T) -> Self {
        Self {
            record,
            dropped: Vec::new(),
        }
    }
}

/// Uniform interface over one host platform at one scope.
///
/// Only [`id`](Self::id), [`paths`](Self::paths), the backup set and the
/// record translations differ between hosts; everything else is derived.
pub trait Platform: Send + Sync {
    /// Which platform this is
    fn id(&self) -> PlatformId;

    /// Resolved directory layout
    fn paths(&self) -> &PlatformPaths;

    /// Identifier (`claude`, `opencode`)
    fn name(&self) -> &'static str {
        self.id().as_str()
    }

    /// Human readable name
    fn display_name(&self) -> &'static str {
        self.id().display_name()
    }

    /// The scope this adapter operates on
    fn scope(&self) -> Scope {
        self.paths().scope()
    }

    /// Whether the host appears to be installed (its user directory exists).
    fn is_available(&self) -> bool {
        self.paths().user_base().is_some_and(|dir| dir.is_dir())
    }

    /// Slash command storage
    fn commands(&self) -> Result<CommandManager> {
        let dir = self.paths().commands_dir().ok_or_else(|| self.unresolvable("commands directory"))?;
        Ok(CommandManager::new(dir))
    }

    /// Skill storage
    fn skills(&self) -> Result<SkillManager> {
        let dir = self.paths().skills_dir().ok_or_else(|| self.unresolvable("skills directory"))?;
        Ok(SkillManager::new(dir))
    }

    /// Agent storage
    fn agents(&self) -> Result<AgentManager> {
        let dir = self.paths().agents_dir().ok_or_else(|| self.unresolvable("agents directory"))?;
        Ok(AgentManager::new(dir))
    }

    /// MCP configuration for this scope
    fn mcp(&self) -> Result<McpConfigManager> {
        let paths = self.paths();
        let file = paths.mcp_config().ok_or_else(|| self.unresolvable("MCP config file"))?;
        let layout = paths.mcp_layout().ok_or_else(|| self.unresolvable("MCP config file"))?;
        Ok(McpConfigManager::new(file, layout, self.mcp_translator()))
    }

    /// Canonical <-> host MCP server schema
    fn mcp_translator(&self) -> &'static dyn McpTranslator {
        translator_for(self.id())
    }

    /// Files and directories to snapshot before writing to this platform.
    ///
    /// Only paths that can be resolved for the current scope are returned;
    /// they need not exist.
    fn backup_paths(&self) -> Vec<PathBuf>;

    /// How this platform spells argument placeholders
    fn variable_syntax(&self) -> &'static VariableSyntax;

    /// Rewrite canonical placeholders in a body for this platform.
    fn translate_variables(&self, body: &str) -> String {
        variables::translate(body, self.variable_syntax())
    }

    /// Placeholders in `body` this platform will not expand.
    fn validate_variables(&self, body: &str) -> Vec<String> {
        variables::unsupported(body, self.variable_syntax())
    }

    /// Canonical command -> command as this platform stores it
    fn translate_command(&self, command: &Command) -> Translation<Command>;

    /// Canonical agent -> agent as this platform stores it
    fn translate_agent(&self, agent: &Agent) -> Translation<Agent>;

    /// Command read from this platform -> canonical command
    fn command_to_canonical(&self, command: Command) -> Command {
        command
    }

    /// Agent read from this platform -> canonical agent
    fn agent_to_canonical(&self, agent: Agent) -> Agent {
        agent
    }

    /// Error for a path that cannot be resolved in this scope.
    fn unresolvable(&self, what: &str) -> AixError {
        AixError::UnresolvablePath {
            what: format!("{what} ({} scope)", self.scope()),
            platform: self.display_name().to_string(),
        }
    }
}

impl fmt::Debug for dyn Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Platform")
            .field("id", &self.id())
            .field("scope", &self.scope())
            .finish()
    }
}

/// Build the adapter for `id`.
#[must_use]
pub fn create_platform(id: PlatformId, ctx: &PlatformContext) -> Box<dyn Platform> {
    let paths = PlatformPaths::new(
        id,
        ctx.scope.resolve(id.default_scope()),
        ctx.home.clone(),
        ctx.project_root.clone(),
    );
    match id {
        PlatformId::Claude => Box::new(ClaudePlatform::new(paths)),
        PlatformId::OpenCode => Box::new(OpenCodePlatform::new(paths)),
    }
}

/// Markdown artifact kinds that platforms store.
///
/// Lets the installer and CLI handle commands, skills and agents with one
/// generic code path.
pub trait PlatformArtifact: MarkdownArtifact + 'static {
    /// Storage for this kind on `platform`
    fn store(platform: &dyn Platform) -> Result<Box<dyn ArtifactStore<Self>>>;

    /// Canonical record -> platform record
    fn translate(platform: &dyn Platform, record: &Self) -> Translation<Self>;

    /// Platform record -> canonical record
    fn to_canonical(platform: &dyn Platform, record: Self) -> Self;

    /// Check a record; `path` is used to infer a missing name
    fn validate(record: &Self, path: Option<&Path>) -> ValidationResult;
}

impl PlatformArtifact for Command {
    fn store(platform: &dyn Platform) -> Result<Box<dyn ArtifactStore<Self>>> {
        Ok(Box::new(platform.commands()?))
    }

    fn translate(platform: &dyn Platform, record: &Self) -> Translation<Self> {
        platform.translate_command(record)
    }

    fn to_canonical(platform: &dyn Platform, record: Self) -> Self {
        platform.command_to_canonical(record)
    }

    fn validate(record: &Self, path: Option<&Path>) -> ValidationResult {
        validation::validate_command(record, path)
    }
}

impl PlatformArtifact for Skill {
    fn store(platform: &dyn Platform) -> Result<Box<dyn ArtifactStore<Self>>> {
        Ok(Box::new(platform.skills()?))
    }

    // SKILL.md is shared by every host.
    fn translate(_platform: &dyn Platform, record: &Self) -> Translation<Self> {
        Translation::lossless(record.clone())
    }

    fn to_canonical(_platform: &dyn Platform, record: Self) -> Self {
        record
    }

    fn validate(record: &Self, path: Option<&Path>) -> ValidationResult {
        validation::validate_skill(record, path)
    }
}

impl PlatformArtifact for Agent {
    fn store(platform: &dyn Platform) -> Result<Box<dyn ArtifactStore<Self>>> {
        Ok(Box::new(platform.agents()?))
    }

    fn translate(platform: &dyn Platform, record: &Self) -> Translation<Self> {
        platform.translate_agent(record)
    }

    fn to_canonical(platform: &dyn Platform, record: Self) -> Self {
        platform.agent_to_canonical(record)
    }

    fn validate(record: &Self, path: Option<&Path>) -> ValidationResult {
        validation::validate_agent(record, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn context(temp: &TempDir, scope: Option<Scope>) -> PlatformContext {
        PlatformContext::new(
            Some(temp.path().join("home")),
            Some(temp.path().join("project")),
            scope.into(),
        )
    }

    #[test]
    fn test_platform_id_names() {
        assert_eq!(PlatformId::from_name("claude"), Some(PlatformId::Claude));
        assert_eq!(PlatformId::from_name("Claude-Code"), Some(PlatformId::Claude));
        assert_eq!(PlatformId::from_name("OPENCODE"), Some(PlatformId::OpenCode));
        assert_eq!(PlatformId::from_name("gemini"), None);
        assert_eq!(PlatformId::OpenCode.to_string(), "opencode");
        assert_eq!(serde_json::to_string(&PlatformId::OpenCode).unwrap(), "\"opencode\"");
    }

    #[test]
    fn test_create_platform_default_scope() {
        let temp = TempDir::new().unwrap();
        for id in PlatformId::ALL {
            let platform = create_platform(id, &context(&temp, None));
            assert_eq!(platform.id(), id);
            assert_eq!(platform.scope(), Scope::User);
            assert!(platform.commands().unwrap().root().starts_with(temp.path().join("home")));
        }
    }

    #[test]
    fn test_availability_follows_user_dir() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp, Some(Scope::Project));
        let claude = create_platform(PlatformId::Claude, &ctx);
        assert!(!claude.is_available());

        std::fs::create_dir_all(temp.path().join("home/.claude")).unwrap();
        assert!(claude.is_available());
        assert!(!create_platform(PlatformId::OpenCode, &ctx).is_available());
    }

    #[test]
    fn test_unresolvable_project_scope() {
        let ctx = PlatformContext::new(Some(PathBuf::from("/home/u")), None, Some(Scope::Project).into());
        let platform = create_platform(PlatformId::OpenCode, &ctx);
        let err = platform.commands().unwrap_err();
        let err = err.downcast_ref::<AixError>().unwrap();
        assert!(matches!(err, AixError::UnresolvablePath { .. }));
        assert!(err.to_string().contains("OpenCode"));
        assert!(platform.mcp().is_err());
    }

    #[test]
    fn test_artifact_store_dispatch() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp, Some(Scope::Project));
        let opencode = create_platform(PlatformId::OpenCode, &ctx);

        let store = <Agent as PlatformArtifact>::store(opencode.as_ref()).unwrap();
        assert_eq!(store.root(), temp.path().join("project/.opencode/agent"));

        let store = <Skill as PlatformArtifact>::store(opencode.as_ref()).unwrap();
        assert_eq!(store.root(), temp.path().join("project/.opencode/skill"));
    }

    #[test]
    fn test_mcp_manager_for_local_scope() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp, Some(Scope::Local));
        let claude = create_platform(PlatformId::Claude, &ctx);
        let mcp = claude.mcp().unwrap();
        assert_eq!(mcp.path(), temp.path().join("home/.claude.json"));
        assert!(matches!(mcp.layout(), crate::mcp::McpLayout::ProjectNested { .. }));
    }
}
