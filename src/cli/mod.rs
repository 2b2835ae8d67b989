//! Command-line interface for aix.
//!
//! # Commands
//!
//! - `command`, `skill`, `agent`: `init`, `install`, `list`, `show`, `edit`,
//!   `validate`, `remove`, `search` for markdown artifacts
//! - `mcp`: `add`, `install`, `list`, `show`, `remove`, `enable`, `disable`,
//!   `validate`, `search` for MCP server entries
//! - `repo`: `add`, `list`, `remove`, `update` for artifact repositories
//! - `platforms`: supported hosts, availability and resolved paths
//!
//! # Global Options
//!
//! - `--verbose` / `-v`: debug logging
//! - `--quiet` / `-q`: errors only
//! - `--config <path>`: config file instead of `~/.config/aix/config.toml`
//! - `--project <dir>`: project root for project and local scope
//!
//! # Example
//!
//! ```bash
//! aix command validate ./review.md
//! aix command install ./review.md --platform claude --scope project
//! aix mcp add github --command npx --arg -y --arg @modelcontextprotocol/server-github
//! aix repo add https://github.com/example/ai-commands.git
//! aix skill install pdf
//! ```

pub mod artifact;
pub mod common;
mod mcp;
mod platforms;
mod repo;

use crate::models::{Agent, Command, Skill};
use crate::platform::registry;
use anyhow::Result;
use artifact::ArtifactSubcommand;
use clap::{Parser, Subcommand};
use common::CommandContext;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Settings derived from the global flags.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter directive; `None` defers to `RUST_LOG`
    pub log_level: Option<String>,

    /// Config file override
    pub config_path: Option<PathBuf>,

    /// Project root override
    pub project: Option<PathBuf>,
}

impl CliConfig {
    /// Install the stderr log subscriber.
    ///
    /// Calling this more than once is harmless; later calls are ignored.
    pub fn init_logging(&self) {
        let filter = match &self.log_level {
            Some(level) => EnvFilter::new(level),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        };
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .try_init();
    }
}

/// Manage AI assistant commands, skills, agents and MCP servers across
/// platforms.
#[derive(Parser)]
#[command(
    name = "aix",
    about = "Manage AI assistant commands, skills, agents and MCP servers across platforms",
    version,
    long_about = "aix installs slash commands, skills, agents and MCP server entries into \
                  every supported AI coding assistant (Claude Code, OpenCode) from local \
                  files, git URLs or named repositories."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the config file
    #[arg(long, global = true, env = "AIX_CONFIG")]
    config: Option<PathBuf>,

    /// Project root for project and local scope (defaults to the current directory)
    #[arg(long, global = true)]
    project: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage slash commands
    #[command(subcommand)]
    Command(ArtifactSubcommand),

    /// Manage skills
    #[command(subcommand)]
    Skill(ArtifactSubcommand),

    /// Manage agents
    #[command(subcommand)]
    Agent(ArtifactSubcommand),

    /// Manage MCP servers
    Mcp(mcp::McpCommand),

    /// Manage artifact repositories
    Repo(repo::RepoCommand),

    /// Show supported platforms
    Platforms(platforms::PlatformsCommand),
}

impl Cli {
    /// Run the parsed command line.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Translate the global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        };
        CliConfig {
            log_level,
            config_path: self.config.clone(),
            project: self.project.clone(),
        }
    }

    /// Run with an explicit configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();
        registry::init_builtin();
        let mut ctx = CommandContext::load(config.config_path, config.project).await?;

        match self.command {
            Commands::Command(cmd) => cmd.execute::<Command>(&ctx).await,
            Commands::Skill(cmd) => cmd.execute::<Skill>(&ctx).await,
            Commands::Agent(cmd) => cmd.execute::<Agent>(&ctx).await,
            Commands::Mcp(cmd) => cmd.execute(&ctx).await,
            Commands::Repo(cmd) => cmd.execute(&mut ctx).await,
            Commands::Platforms(cmd) => cmd.execute(&ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_build_config() {
        let cli = Cli::try_parse_from(["aix", "--verbose", "platforms"]).unwrap();
        assert_eq!(cli.build_config().log_level.as_deref(), Some("debug"));

        let cli = Cli::try_parse_from(["aix", "-q", "--project", "/tmp/p", "platforms"]).unwrap();
        let config = cli.build_config();
        assert_eq!(config.log_level.as_deref(), Some("error"));
        assert_eq!(config.project, Some(PathBuf::from("/tmp/p")));

        assert!(Cli::try_parse_from(["aix", "-v", "-q", "platforms"]).is_err());
    }

    #[test]
    fn test_install_requires_source_or_repo() {
        assert!(Cli::try_parse_from(["aix", "command", "install"]).is_err());
        assert!(Cli::try_parse_from(["aix", "command", "install", "--all-from-repo", "team"]).is_ok());
        assert!(Cli::try_parse_from(["aix", "command", "install", "x", "--all-from-repo", "team"]).is_err());
    }

    #[test]
    fn test_scope_flag_parses() {
        assert!(Cli::try_parse_from(["aix", "skill", "list", "--scope", "project"]).is_ok());
        assert!(Cli::try_parse_from(["aix", "skill", "list", "--scope", "galaxy"]).is_err());
    }
}
