//! MCP server configuration.
//!
//! aix does not speak the Model Context Protocol; it edits the host
//! configuration entries that name and describe MCP servers.
//!
//! - [`translate`]: canonical <-> host schema conversion
//! - [`manager`]: load/modify/save of one host configuration file

pub mod manager;
pub mod translate;

pub use manager::{McpConfigManager, McpLayout};
pub use translate::{ClaudeTranslator, McpTranslator, OpenCodeTranslator, translator_for};

use crate::models::McpServer;
use anyhow::{Context, Result};
use std::path::Path;

/// Read a canonical server definition from a JSON file.
///
/// The name comes from the file's `name` key, else from the file name
/// (`server.json` takes its parent directory's name instead).
pub fn read_server_file(path: &Path) -> Result<McpServer> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let mut server: McpServer =
        serde_json::from_str(&content).map_err(|e| crate::core::AixError::InvalidJson {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    if server.name.is_empty() {
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        server.name = if stem == "server" {
            path.parent()
                .and_then(|p| p.file_name())
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string()
        } else {
            stem.to_string()
        };
    }
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Transport;
    use tempfile::TempDir;

    #[test]
    fn test_read_server_file_names() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("github.json");
        std::fs::write(&file, r#"{"command": "npx", "args": ["-y", "pkg"]}"#).unwrap();
        let server = read_server_file(&file).unwrap();
        assert_eq!(server.name, "github");
        assert_eq!(server.transport, Transport::Stdio);

        let dir = temp.path().join("sentry");
        std::fs::create_dir(&dir).unwrap();
        std::fs::write(dir.join("server.json"), r#"{"url": "https://x/sse"}"#).unwrap();
        let server = read_server_file(&dir.join("server.json")).unwrap();
        assert_eq!(server.name, "sentry");
        assert_eq!(server.transport, crate::models::Transport::Sse);

        std::fs::write(&file, r#"{"name": "explicit", "command": "x"}"#).unwrap();
        assert_eq!(read_server_file(&file).unwrap().name, "explicit");
    }
}
