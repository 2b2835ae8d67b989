//! Canonical MCP server records.
//!
//! A server's name is the key of the map that holds it and is never part of
//! the serialized value. The canonical JSON form is what `aix mcp install`
//! reads from repository files and what `--json` output emits:
//!
//! ```json
//! {
//!   "transport": "stdio",
//!   "command": "npx",
//!   "args": ["-y", "@modelcontextprotocol/server-github"],
//!   "env": { "GITHUB_TOKEN": "..." }
//! }
//! ```
//!
//! When `transport` is absent it is inferred: a `url` without a `command`
//! means `sse`, anything else `stdio`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How the host talks to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Local process over stdin/stdout
    #[default]
    Stdio,
    /// Remote server over server-sent events
    Sse,
    /// Remote server over streamable HTTP
    Http,
}

impl Transport {
    /// Whether the transport reaches a server by URL.
    #[must_use]
    pub const fn is_remote(self) -> bool {
        matches!(self, Self::Sse | Self::Http)
    }

    /// Infer the transport from which of `command` / `url` is set.
    #[must_use]
    pub fn infer(command: &str, url: &str) -> Self {
        if command.is_empty() && !url.is_empty() { Self::Sse } else { Self::Stdio }
    }

    /// Lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stdio => "stdio",
            Self::Sse => "sse",
            Self::Http => "http",
        }
    }
}

/// A canonical MCP server entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "McpServerDef")]
pub struct McpServer {
    /// Server name; the key in the containing map
    #[serde(skip)]
    pub name: String,

    /// Connection transport
    pub transport: Transport,

    /// Executable for stdio servers
    #[serde(skip_serializing_if = "String::is_empty")]
    pub command: String,

    /// Arguments passed to `command`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    /// Endpoint for remote servers
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,

    /// HTTP headers for remote servers
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,

    /// Environment for stdio servers
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,

    /// Whether the host should skip this server
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,

    /// Platform ids this server is meant for; empty means all
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub platforms: Vec<String>,

    /// Host-specific keys aix does not model (Claude's `cwd`, OpenCode's
    /// `timeout`, ...), in file order. Only meaningful for the host the
    /// server was read from; written back there unchanged.
    #[serde(skip)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Deserialization shape with an optional transport.
#[derive(Deserialize)]
struct McpServerDef {
    #[serde(default)]
    name: String,
    #[serde(default)]
    transport: Option<Transport>,
    #[serde(default)]
    command: String,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default)]
    url: String,
    #[serde(default)]
    headers: BTreeMap<String, String>,
    #[serde(default)]
    env: BTreeMap<String, String>,
    #[serde(default)]
    disabled: bool,
    #[serde(default)]
    platforms: Vec<String>,
}

impl From<McpServerDef> for McpServer {
    fn from(def: McpServerDef) -> Self {
        let transport = def.transport.unwrap_or_else(|| Transport::infer(&def.command, &def.url));
        Self {
            name: def.name,
            transport,
            command: def.command,
            args: def.args,
            url: def.url,
            headers: def.headers,
            env: def.env,
            disabled: def.disabled,
            platforms: def.platforms,
            extra: serde_json::Map::new(),
        }
    }
}

impl McpServer {
    /// A local server started with `command args...`.
    pub fn stdio(name: impl Into<String>, command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            transport: Transport::Stdio,
            command: command.into(),
            args,
            ..Self::default()
        }
    }

    /// A remote server reached over server-sent events.
    pub fn sse(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transport: Transport::Sse,
            url: url.into(),
            ..Self::default()
        }
    }

    /// Whether the server is meant for `platform` (an empty list means all).
    #[must_use]
    pub fn targets(&self, platform: &str) -> bool {
        self.platforms.is_empty() || self.platforms.iter().any(|p| p == platform)
    }
}

/// All MCP servers of one configuration file plus the keys aix does not own.
///
/// `unknown_fields` is filled on load and written back untouched on save, so
/// settings that live next to the server map survive a read-modify-write.
/// `originals` keeps each server entry exactly as loaded; entries whose
/// server is unchanged on save are written from it verbatim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct McpConfig {
    /// Servers keyed by name
    pub servers: BTreeMap<String, McpServer>,
    /// Every other top-level key, in file order
    pub unknown_fields: serde_json::Map<String, serde_json::Value>,
    /// Host entries as they were loaded, keyed by server name
    pub originals: BTreeMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transport_inferred_when_absent() {
        let server: McpServer = serde_json::from_value(json!({"url": "https://x/sse"})).unwrap();
        assert_eq!(server.transport, Transport::Sse);

        let server: McpServer = serde_json::from_value(json!({"command": "npx"})).unwrap();
        assert_eq!(server.transport, Transport::Stdio);

        let server: McpServer =
            serde_json::from_value(json!({"transport": "http", "url": "https://x/mcp"})).unwrap();
        assert_eq!(server.transport, Transport::Http);
    }

    #[test]
    fn test_name_is_not_serialized() {
        let server = McpServer::stdio("github", "npx", vec!["-y".to_string()]);
        let value = serde_json::to_value(&server).unwrap();
        assert_eq!(value, json!({"transport": "stdio", "command": "npx", "args": ["-y"]}));
    }

    #[test]
    fn test_name_read_from_source_file() {
        let server: McpServer =
            serde_json::from_value(json!({"name": "github", "command": "npx"})).unwrap();
        assert_eq!(server.name, "github");
    }

    #[test]
    fn test_extra_keys_are_not_canonical() {
        let mut server = McpServer::stdio("db", "pg", vec![]);
        server.extra.insert("cwd".to_string(), json!("/srv"));
        let value = serde_json::to_value(&server).unwrap();
        assert!(value.get("cwd").is_none());
        assert!(value.get("extra").is_none());

        let server: McpServer =
            serde_json::from_value(json!({"command": "pg", "cwd": "/srv"})).unwrap();
        assert!(server.extra.is_empty());
    }

    #[test]
    fn test_targets() {
        let mut server = McpServer::sse("remote", "https://x");
        assert!(server.targets("opencode"));
        server.platforms = vec!["claude".to_string()];
        assert!(server.targets("claude"));
        assert!(!server.targets("opencode"));
    }
}
