//! Canonical MCP server <-> platform schema translation.
//!
//! Each host stores MCP servers under its own top-level key and with its own
//! field names. A [`McpTranslator`] converts single servers in both directions
//! and, through its provided methods, whole configuration objects while
//! passing unknown top-level keys through untouched.
//!
//! | canonical | Claude Code (`mcpServers`) | OpenCode (`mcp`) |
//! |---|---|---|
//! | `transport` | `type` (omitted for stdio) | `type`: `local` / `remote` |
//! | `command` + `args` | `command`, `args` | `command: [cmd, ...args]` |
//! | `env` | `env` | `environment` |
//! | `disabled` | `disabled` | `enabled` (written only when false) |
//! | `platforms` | `platforms` | dropped |
//!
//! Keys a host supports but aix does not model are kept in
//! [`McpServer::extra`] and written back after the modeled fields. A server
//! that is unchanged since load is written back from its original entry, so
//! its key order and spelling (an explicit `"type": "stdio"`, say) survive.

use crate::core::AixError;
use crate::models::{McpConfig, McpServer, Transport};
use crate::platform::PlatformId;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Converts MCP servers between the canonical record and one host's schema.
pub trait McpTranslator: Send + Sync {
    /// The host this translator targets
    fn platform(&self) -> PlatformId;

    /// Top-level key holding the server map
    fn servers_key(&self) -> &'static str;

    /// Canonical record to the host's JSON value (the name is not included).
    fn to_platform(&self, server: &McpServer) -> Result<Value>;

    /// Host JSON value to a canonical record named `name`.
    fn from_platform(&self, name: &str, value: Value) -> Result<McpServer>;

    /// Canonical fields this host cannot represent
    fn lossy_fields(&self) -> &'static [&'static str] {
        &[]
    }

    /// Which of [`lossy_fields`](Self::lossy_fields) `server` actually sets.
    fn dropped_fields(&self, server: &McpServer) -> Vec<&'static str> {
        let _ = server;
        Vec::new()
    }

    /// Split a host configuration object into servers and unknown keys.
    ///
    /// A missing or `null` server map yields no servers. `source` names the
    /// file in errors.
    fn config_from_platform(&self, mut root: Map<String, Value>, source: &str) -> Result<McpConfig> {
        let servers_value = root.remove(self.servers_key()).unwrap_or(Value::Null);

        let mut servers = BTreeMap::new();
        let mut originals = BTreeMap::new();
        match servers_value {
            Value::Null => {}
            Value::Object(entries) => {
                for (name, value) in entries {
                    let server = self
                        .from_platform(&name, value.clone())
                        .with_context(|| format!("Invalid MCP server '{name}' in {source}"))?;
                    originals.insert(name.clone(), value);
                    servers.insert(name, server);
                }
            }
            other => {
                return Err(AixError::InvalidJson {
                    path: source.to_string(),
                    reason: format!("'{}' must be an object, found {}", self.servers_key(), type_name(&other)),
                }
                .into());
            }
        }

        Ok(McpConfig {
            servers,
            unknown_fields: root,
            originals,
        })
    }

    /// Build the host configuration object: unknown keys first, then the
    /// server map sorted by name.
    fn config_to_platform(&self, config: &McpConfig) -> Result<Map<String, Value>> {
        let mut servers = Map::new();
        for (name, server) in &config.servers {
            let value = match config.originals.get(name) {
                Some(original)
                    if self.from_platform(name, original.clone()).is_ok_and(|loaded| loaded == *server) =>
                {
                    original.clone()
                }
                _ => self.to_platform(server)?,
            };
            servers.insert(name.clone(), value);
        }

        let mut root = config.unknown_fields.clone();
        root.insert(self.servers_key().to_string(), Value::Object(servers));
        Ok(root)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Claude Code server entry as stored in `.mcp.json` / `~/.claude.json`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ClaudeServer {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    command: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    args: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    env: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    url: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    disabled: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    platforms: Vec<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Translator for Claude Code. Field names match the canonical schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaudeTranslator;

impl McpTranslator for ClaudeTranslator {
    fn platform(&self) -> PlatformId {
        PlatformId::Claude
    }

    fn servers_key(&self) -> &'static str {
        "mcpServers"
    }

    fn to_platform(&self, server: &McpServer) -> Result<Value> {
        let kind = match server.transport {
            Transport::Stdio => None,
            remote => Some(remote.as_str().to_string()),
        };
        let wire = ClaudeServer {
            kind,
            command: server.command.clone(),
            args: server.args.clone(),
            env: server.env.clone(),
            url: server.url.clone(),
            headers: server.headers.clone(),
            disabled: server.disabled,
            platforms: server.platforms.clone(),
            extra: server.extra.clone(),
        };
        Ok(serde_json::to_value(wire)?)
    }

    fn from_platform(&self, name: &str, value: Value) -> Result<McpServer> {
        let wire: ClaudeServer = serde_json::from_value(value)?;
        let transport = match wire.kind.as_deref() {
            None => Transport::infer(&wire.command, &wire.url),
            Some("stdio") => Transport::Stdio,
            Some("sse") => Transport::Sse,
            Some("http" | "streamable-http") => Transport::Http,
            Some(other) => anyhow::bail!("unsupported transport type '{other}'"),
        };

        Ok(McpServer {
            name: name.to_string(),
            transport,
            command: wire.command,
            args: wire.args,
            url: wire.url,
            headers: wire.headers,
            env: wire.env,
            disabled: wire.disabled,
            platforms: wire.platforms,
            extra: wire.extra,
        })
    }
}

/// OpenCode server entry as stored under `mcp` in `opencode.json`.
///
/// Field order matters: it is the order keys appear in the written file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct OpenCodeServer {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    command: Vec<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    url: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    environment: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    enabled: Option<bool>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Translator for OpenCode.
///
/// `platforms` has no OpenCode equivalent and is dropped; callers report it via `dropped_fields`.
/// OpenCode does not distinguish SSE from streamable HTTP, so remote servers
/// always read back as `sse`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenCodeTranslator;

impl McpTranslator for OpenCodeTranslator {
    fn platform(&self) -> PlatformId {
        PlatformId::OpenCode
    }

    fn servers_key(&self) -> &'static str {
        "mcp"
    }

    fn lossy_fields(&self) -> &'static [&'static str] {
        &["platforms"]
    }

    fn dropped_fields(&self, server: &McpServer) -> Vec<&'static str> {
        if server.platforms.is_empty() { Vec::new() } else { vec!["platforms"] }
    }

    fn to_platform(&self, server: &McpServer) -> Result<Value> {
        if !server.platforms.is_empty() {
            debug!("OpenCode has no 'platforms' field; dropping it from MCP server '{}'", server.name);
        }

        let mut command = Vec::new();
        if !server.command.is_empty() {
            command.push(server.command.clone());
            command.extend(server.args.iter().cloned());
        }

        let kind = if server.transport.is_remote() { "remote" } else { "local" };
        let wire = OpenCodeServer {
            command,
            kind: Some(kind.to_string()),
            url: server.url.clone(),
            headers: server.headers.clone(),
            environment: server.env.clone(),
            enabled: server.disabled.then_some(false),
            extra: server.extra.clone(),
        };
        Ok(serde_json::to_value(wire)?)
    }

    fn from_platform(&self, name: &str, value: Value) -> Result<McpServer> {
        let wire: OpenCodeServer = serde_json::from_value(value)?;

        let mut parts = wire.command.into_iter();
        let command = parts.next().unwrap_or_default();
        let args: Vec<String> = parts.collect();

        let transport = match wire.kind.as_deref() {
            None => Transport::infer(&command, &wire.url),
            Some("local") => Transport::Stdio,
            Some("remote") => Transport::Sse,
            Some(other) => anyhow::bail!("unsupported server type '{other}'"),
        };

        Ok(McpServer {
            name: name.to_string(),
            transport,
            command,
            args,
            url: wire.url,
            headers: wire.headers,
            env: wire.environment,
            disabled: wire.enabled == Some(false),
            platforms: Vec::new(),
            extra: wire.extra,
        })
    }
}

static CLAUDE: ClaudeTranslator = ClaudeTranslator;
static OPENCODE: OpenCodeTranslator = OpenCodeTranslator;

/// The translator for a platform.
#[must_use]
pub fn translator_for(platform: PlatformId) -> &'static dyn McpTranslator {
    match platform {
        PlatformId::Claude => &CLAUDE,
        PlatformId::OpenCode => &OPENCODE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_stdio() -> McpServer {
        let mut server = McpServer::stdio(
            "github",
            "npx",
            vec!["-y".to_string(), "@modelcontextprotocol/server-github".to_string()],
        );
        server.env.insert("GITHUB_TOKEN".to_string(), "secret".to_string());
        server.disabled = true;
        server
    }

    fn full_sse() -> McpServer {
        let mut server = McpServer::sse("remote", "https://mcp.example.com/sse");
        server.headers.insert("Authorization".to_string(), "Bearer x".to_string());
        server
    }

    #[test]
    fn test_claude_stdio_shape() {
        let server = McpServer::stdio(
            "github",
            "npx",
            vec!["-y".to_string(), "@modelcontextprotocol/server-github".to_string()],
        );
        let value = ClaudeTranslator.to_platform(&server).unwrap();
        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            r#"{"command":"npx","args":["-y","@modelcontextprotocol/server-github"]}"#
        );
    }

    #[test]
    fn test_claude_round_trip_is_identity() {
        let mut stdio = full_stdio();
        stdio.platforms = vec!["claude".to_string()];
        for server in [stdio, full_sse()] {
            let value = ClaudeTranslator.to_platform(&server).unwrap();
            let back = ClaudeTranslator.from_platform(&server.name, value).unwrap();
            assert_eq!(back, server);
        }
    }

    #[test]
    fn test_claude_reads_type_field() {
        let server = ClaudeTranslator
            .from_platform("x", json!({"type": "http", "url": "https://x/mcp"}))
            .unwrap();
        assert_eq!(server.transport, Transport::Http);

        let server =
            ClaudeTranslator.from_platform("x", json!({"type": "stdio", "command": "node"})).unwrap();
        assert_eq!(server.transport, Transport::Stdio);

        assert!(ClaudeTranslator.from_platform("x", json!({"type": "carrier-pigeon"})).is_err());
    }

    #[test]
    fn test_opencode_shape() {
        let server = McpServer::stdio(
            "github",
            "npx",
            vec!["-y".to_string(), "@modelcontextprotocol/server-github".to_string()],
        );
        let value = OpenCodeTranslator.to_platform(&server).unwrap();
        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            r#"{"command":["npx","-y","@modelcontextprotocol/server-github"],"type":"local"}"#
        );
    }

    #[test]
    fn test_opencode_enabled_only_written_when_disabled() {
        let server = full_stdio();
        let value = OpenCodeTranslator.to_platform(&server).unwrap();
        assert_eq!(value["enabled"], json!(false));
        assert_eq!(value["environment"]["GITHUB_TOKEN"], json!("secret"));

        let mut enabled = server.clone();
        enabled.disabled = false;
        let value = OpenCodeTranslator.to_platform(&enabled).unwrap();
        assert!(value.get("enabled").is_none());
    }

    #[test]
    fn test_opencode_round_trip_drops_platforms() {
        for mut server in [full_stdio(), full_sse()] {
            server.platforms = vec!["claude".to_string(), "opencode".to_string()];
            assert_eq!(OpenCodeTranslator.dropped_fields(&server), vec!["platforms"]);

            let value = OpenCodeTranslator.to_platform(&server).unwrap();
            let back = OpenCodeTranslator.from_platform(&server.name, value).unwrap();

            assert!(back.platforms.is_empty());
            server.platforms.clear();
            assert_eq!(back, server);
        }
    }

    #[test]
    fn test_opencode_infers_type() {
        let server =
            OpenCodeTranslator.from_platform("x", json!({"url": "https://x/sse"})).unwrap();
        assert_eq!(server.transport, Transport::Sse);

        let server = OpenCodeTranslator
            .from_platform("x", json!({"command": ["uvx", "mcp-server-git"], "enabled": true}))
            .unwrap();
        assert_eq!(server.transport, Transport::Stdio);
        assert_eq!(server.command, "uvx");
        assert_eq!(server.args, vec!["mcp-server-git"]);
        assert!(!server.disabled);
    }

    #[test]
    fn test_config_from_platform_keeps_unknown_keys() {
        let root = json!({
            "$schema": "https://opencode.ai/config.json",
            "mcp": {"git": {"type": "local", "command": ["uvx", "mcp-server-git"]}},
            "futureField": "x"
        });
        let Value::Object(root) = root else { unreachable!() };

        let config = OpenCodeTranslator.config_from_platform(root, "opencode.json").unwrap();
        assert_eq!(config.servers["git"].name, "git");
        let keys: Vec<_> = config.unknown_fields.keys().cloned().collect();
        assert_eq!(keys, vec!["$schema", "futureField"]);

        let out = OpenCodeTranslator.config_to_platform(&config).unwrap();
        let keys: Vec<_> = out.keys().cloned().collect();
        assert_eq!(keys, vec!["$schema", "futureField", "mcp"]);
    }

    #[test]
    fn test_config_null_servers() {
        let Value::Object(root) = json!({"mcpServers": null}) else { unreachable!() };
        let config = ClaudeTranslator.config_from_platform(root, ".mcp.json").unwrap();
        assert!(config.servers.is_empty());
        assert!(config.unknown_fields.is_empty());

        let Value::Object(root) = json!({"mcpServers": []}) else { unreachable!() };
        let err = ClaudeTranslator.config_from_platform(root, ".mcp.json").unwrap_err();
        assert!(matches!(err.downcast_ref(), Some(AixError::InvalidJson { .. })));
    }

    #[test]
    fn test_unmodeled_keys_carried_through() {
        let server = ClaudeTranslator
            .from_platform("db", json!({"command": "pg", "cwd": "/srv", "timeout": 30}))
            .unwrap();
        assert_eq!(server.extra["cwd"], json!("/srv"));
        let value = ClaudeTranslator.to_platform(&server).unwrap();
        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            r#"{"command":"pg","cwd":"/srv","timeout":30}"#
        );

        let server = OpenCodeTranslator
            .from_platform(
                "remote",
                json!({"type": "remote", "url": "https://x/sse", "oauth": {"clientId": "abc"}}),
            )
            .unwrap();
        assert_eq!(server.extra["oauth"], json!({"clientId": "abc"}));
        let value = OpenCodeTranslator.to_platform(&server).unwrap();
        assert_eq!(value["oauth"], json!({"clientId": "abc"}));
        assert_eq!(value["type"], json!("remote"));
    }

    #[test]
    fn test_unchanged_entries_written_verbatim() {
        let Value::Object(root) =
            json!({"mcpServers": {"a": {"type": "stdio", "command": "x", "cwd": "/srv"}}})
        else {
            unreachable!()
        };
        let mut config = ClaudeTranslator.config_from_platform(root, ".mcp.json").unwrap();
        let out = ClaudeTranslator.config_to_platform(&config).unwrap();
        assert_eq!(
            serde_json::to_string(&out["mcpServers"]["a"]).unwrap(),
            r#"{"type":"stdio","command":"x","cwd":"/srv"}"#
        );

        // A changed entry is re-translated but keeps its unmodeled keys
        config.servers.get_mut("a").unwrap().disabled = true;
        let out = ClaudeTranslator.config_to_platform(&config).unwrap();
        assert_eq!(
            serde_json::to_string(&out["mcpServers"]["a"]).unwrap(),
            r#"{"command":"x","disabled":true,"cwd":"/srv"}"#
        );
    }

    #[test]
    fn test_translator_for() {
        for id in PlatformId::ALL {
            assert_eq!(translator_for(id).platform(), id);
        }
        assert!(translator_for(PlatformId::Claude).lossy_fields().is_empty());
        assert_eq!(translator_for(PlatformId::OpenCode).lossy_fields(), &["platforms"]);
    }
}
