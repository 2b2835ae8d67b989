//! Host environment helpers: home directory, git executable, path expansion
//! and editor discovery.

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Whether we are running on Windows.
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(windows)
}

/// Resolve the user's home directory.
///
/// `HOME` wins when set so tests and sandboxes can redirect every user-level
/// path; otherwise the platform default from `dirs` is used.
pub fn get_home_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os("HOME")
        && !home.is_empty()
    {
        return Ok(PathBuf::from(home));
    }
    dirs::home_dir().ok_or_else(|| {
        let platform_help = if is_windows() {
            "On Windows: Check that the USERPROFILE environment variable is set"
        } else {
            "On Unix/Linux: Check that the HOME environment variable is set"
        };
        anyhow::anyhow!("Could not determine home directory.\n\n{platform_help}")
    })
}

/// Name of the git executable for this platform.
#[must_use]
pub const fn get_git_command() -> &'static str {
    if is_windows() { "git.exe" } else { "git" }
}

/// Expand `~` and environment variables in a user-supplied path.
pub fn resolve_path(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(path)
        .map_err(|e| anyhow::anyhow!("Failed to expand path '{path}': {e}"))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Make `path` absolute relative to the current directory, without touching
/// the filesystem.
pub fn absolute(path: &Path) -> Result<PathBuf> {
    Ok(std::path::absolute(path)?)
}

/// Pick the editor command for `edit` subcommands.
///
/// Order: explicit configuration, `EDITOR`, `VISUAL`, `nano` if installed,
/// then `vi`.
#[must_use]
pub fn find_editor(configured: Option<&str>) -> String {
    let from_env = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());

    configured
        .map(str::to_string)
        .filter(|v| !v.trim().is_empty())
        .or_else(|| from_env("EDITOR"))
        .or_else(|| from_env("VISUAL"))
        .unwrap_or_else(|| {
            if which::which("nano").is_ok() { "nano".to_string() } else { "vi".to_string() }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_git_command() {
        if is_windows() {
            assert_eq!(get_git_command(), "git.exe");
        } else {
            assert_eq!(get_git_command(), "git");
        }
    }

    #[test]
    #[serial]
    fn test_resolve_path_expands_home() {
        let home = get_home_dir().unwrap();
        assert_eq!(resolve_path("~/repos/x").unwrap(), home.join("repos/x"));
        assert_eq!(resolve_path("/abs/path").unwrap(), PathBuf::from("/abs/path"));
    }

    #[test]
    fn test_configured_editor_wins() {
        assert_eq!(find_editor(Some("code --wait")), "code --wait");
    }
}
