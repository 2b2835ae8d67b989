//! State and flags shared by every subcommand.

use crate::backup::BackupManager;
use crate::config::ConfigManager;
use crate::core::Scope;
use crate::installer::{InstallOptions, Installer};
use crate::platform::registry::{self, Registry};
use crate::platform::{Platform, PlatformContext};
use crate::repo::RepoIndex;
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// `--platform` / `--scope`, accepted by every subcommand that touches
/// platform files.
#[derive(Debug, Clone, Default, Args)]
pub struct TargetArgs {
    /// Limit to one platform (claude, opencode)
    #[arg(short, long)]
    pub platform: Option<String>,

    /// Configuration scope: user, project or local
    #[arg(short, long)]
    pub scope: Option<Scope>,
}

/// Everything a subcommand needs at runtime.
#[derive(Debug)]
pub struct CommandContext {
    /// Loaded user configuration
    pub config: ConfigManager,
    /// Home and project root; the scope is filled in per subcommand
    pub platform_ctx: PlatformContext,
    /// Registered platforms
    pub registry: &'static Registry,
}

impl CommandContext {
    /// Load the configuration and resolve the home and project directories.
    pub async fn load(config_path: Option<PathBuf>, project: Option<PathBuf>) -> Result<Self> {
        let config = ConfigManager::load(config_path).await?;
        let platform_ctx = PlatformContext::from_env(project, None)?;
        Ok(Self {
            config,
            platform_ctx,
            registry: registry::global(),
        })
    }

    /// The platform context narrowed to the requested scope.
    #[must_use]
    pub fn scoped(&self, target: &TargetArgs) -> PlatformContext {
        self.platform_ctx.clone().with_scope(target.scope)
    }

    /// Platforms the subcommand acts on.
    pub fn platforms(&self, target: &TargetArgs) -> Result<Vec<Box<dyn Platform>>> {
        self.registry.resolve_platforms(target.platform.as_deref(), &self.scoped(target))
    }

    /// Backup manager honoring the `[backup]` settings.
    pub fn backups(&self) -> Result<BackupManager> {
        Ok(BackupManager::from_config(self.config.backup_dir()?))
    }

    /// Index of every configured repository.
    pub fn index(&self) -> Result<RepoIndex> {
        RepoIndex::scan(&self.config.repositories()?)
    }

    /// An installer for the requested scope.
    pub fn installer(&self, target: &TargetArgs) -> Result<Installer<'static>> {
        Ok(Installer::new(self.scoped(target), self.registry, self.index()?, self.backups()?))
    }

    /// Editor command for `edit`.
    #[must_use]
    pub fn editor(&self) -> String {
        crate::utils::find_editor(self.config.config().editor.as_deref())
    }
}

/// Install options from the flags of an `install` subcommand.
#[must_use]
pub fn install_options(target: &TargetArgs, force: bool, file: bool) -> InstallOptions {
    InstallOptions {
        platform: target.platform.clone(),
        force,
        file,
    }
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Parse `KEY=VALUE` for `--env` and `--header`.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{s}'")),
    }
}

/// Run the editor on `path` and wait for it to exit.
///
/// The editor string may carry arguments (`code --wait`).
pub async fn run_editor(editor: &str, path: &std::path::Path) -> Result<()> {
    let mut parts = editor.split_whitespace();
    let program = parts.next().unwrap_or("vi");
    let status = tokio::process::Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start editor '{program}': {e}"))?;
    if !status.success() {
        anyhow::bail!("Editor '{program}' exited with {status}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_val() {
        assert_eq!(parse_key_val("TOKEN=abc").unwrap(), ("TOKEN".to_string(), "abc".to_string()));
        assert_eq!(parse_key_val("A=b=c").unwrap(), ("A".to_string(), "b=c".to_string()));
        assert_eq!(parse_key_val("EMPTY=").unwrap(), ("EMPTY".to_string(), String::new()));
        assert!(parse_key_val("novalue").is_err());
        assert!(parse_key_val("=x").is_err());
    }

    #[test]
    fn test_install_options() {
        let target = TargetArgs {
            platform: Some("claude".to_string()),
            scope: None,
        };
        let opts = install_options(&target, true, false);
        assert_eq!(opts.platform.as_deref(), Some("claude"));
        assert!(opts.force);
        assert!(!opts.file);
    }
}
