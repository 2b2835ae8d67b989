//! `aix mcp ...`: MCP server entries in each platform's configuration.
//!
//! ```bash
//! aix mcp add github --command npx --arg -y --arg @modelcontextprotocol/server-github
//! aix mcp add docs --url https://example.com/sse --header Authorization=Bearer...
//! aix mcp disable github --platform opencode
//! aix mcp list --json
//! ```

use super::common::{CommandContext, TargetArgs, install_options, parse_key_val, print_json};
use crate::core::AixError;
use crate::installer::locate_mcp;
use crate::models::{ArtifactKind, McpServer, Transport};
use crate::platform::{Platform, PlatformId};
use crate::utils::print_success;
use crate::validation::validate_mcp_server;
use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

/// Manage MCP server configuration.
#[derive(Debug, Parser)]
pub struct McpCommand {
    #[command(subcommand)]
    subcommand: McpSubcommand,
}

#[derive(Debug, Subcommand)]
enum McpSubcommand {
    /// Add a server from flags
    Add {
        /// Server name
        name: String,

        /// Executable for a local (stdio) server
        #[arg(long, conflicts_with = "url")]
        command: Option<String>,

        /// Argument for the command; repeat for several
        #[arg(long = "arg", value_name = "ARG", allow_hyphen_values = true)]
        args: Vec<String>,

        /// Endpoint of a remote server
        #[arg(long)]
        url: Option<String>,

        /// Transport; inferred from --command / --url when omitted
        #[arg(long, value_parser = parse_transport)]
        transport: Option<Transport>,

        /// Environment variable for the server process
        #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_key_val)]
        env: Vec<(String, String)>,

        /// HTTP header for a remote server
        #[arg(long = "header", value_name = "KEY=VALUE", value_parser = parse_key_val)]
        headers: Vec<(String, String)>,

        /// Only configure these platforms (comma separated)
        #[arg(long, value_delimiter = ',')]
        platforms: Vec<String>,

        #[command(flatten)]
        target: TargetArgs,

        /// Replace an existing entry
        #[arg(short, long)]
        force: bool,
    },

    /// Install a server definition from a git URL, local path or repository
    Install {
        /// Git URL, JSON file, directory or repository entry name
        source: String,

        #[command(flatten)]
        target: TargetArgs,

        /// Replace an existing entry
        #[arg(short, long)]
        force: bool,

        /// Treat the source as a path or URL, never as a repository name
        #[arg(long)]
        file: bool,
    },

    /// List configured servers per platform
    List {
        #[command(flatten)]
        target: TargetArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one server
    Show {
        /// Server name
        name: String,

        #[command(flatten)]
        target: TargetArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove a server from every platform that has it
    Remove {
        /// Server name
        name: String,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Enable a disabled server
    Enable {
        /// Server name
        name: String,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Disable a server without removing it
    Disable {
        /// Server name
        name: String,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Validate a server definition file
    Validate {
        /// JSON file or directory holding one
        path: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search configured repositories
    Search {
        /// Text matched against names and descriptions
        query: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_transport(s: &str) -> Result<Transport, String> {
    match s.to_ascii_lowercase().as_str() {
        "stdio" => Ok(Transport::Stdio),
        "sse" => Ok(Transport::Sse),
        "http" => Ok(Transport::Http),
        other => Err(format!("unknown transport '{other}' (expected stdio, sse or http)")),
    }
}

#[derive(Serialize)]
struct ServerEntry<'a> {
    platform: PlatformId,
    name: &'a str,
    #[serde(flatten)]
    server: &'a McpServer,
}

impl McpCommand {
    /// Run the subcommand.
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        match self.subcommand {
            McpSubcommand::Add {
                name,
                command,
                args,
                url,
                transport,
                env,
                headers,
                platforms,
                target,
                force,
            } => {
                let command = command.unwrap_or_default();
                let url = url.unwrap_or_default();
                if command.is_empty() && url.is_empty() {
                    return Err(AixError::InvalidMcpServer {
                        reason: "either --command or --url is required".to_string(),
                    }
                    .into());
                }
                let server = McpServer {
                    name,
                    transport: transport.unwrap_or_else(|| Transport::infer(&command, &url)),
                    command,
                    args,
                    url,
                    headers: headers.into_iter().collect(),
                    env: env.into_iter().collect(),
                    disabled: false,
                    platforms,
                    extra: serde_json::Map::new(),
                };
                let result = validate_mcp_server(&server);
                result.print();
                result.into_result(ArtifactKind::Mcp, &server.name)?;

                let mut installer = ctx.installer(&target)?;
                let report = installer.add_mcp_server(&server, &install_options(&target, force, false))?;
                print_success(format!("Added MCP server '{}' to {} platform(s)", report.name, report.platforms.len()));
                Ok(())
            }
            McpSubcommand::Install {
                source,
                target,
                force,
                file,
            } => {
                let mut installer = ctx.installer(&target)?;
                let report = installer.install_mcp(&source, &install_options(&target, force, file)).await?;
                print_success(report.summary());
                Ok(())
            }
            McpSubcommand::List { target, json } => list(ctx, &target, json),
            McpSubcommand::Show { name, target, json } => show(ctx, &name, &target, json),
            McpSubcommand::Remove { name, target } => {
                let found = configured_on(ctx, &name, &target)?;
                let mut backups = ctx.backups()?;
                for platform in &found {
                    backups.ensure(platform.as_ref())?;
                    platform.mcp()?.remove(&name)?;
                    debug!("Removed MCP server '{name}' from {}", platform.display_name());
                }
                print_success(format!("Removed MCP server '{name}' from {} platform(s)", found.len()));
                Ok(())
            }
            McpSubcommand::Enable { name, target } => toggle(ctx, &name, &target, true),
            McpSubcommand::Disable { name, target } => toggle(ctx, &name, &target, false),
            McpSubcommand::Validate { path, json } => validate(&path, json),
            McpSubcommand::Search { query, json } => super::repo::search(ctx, Some(ArtifactKind::Mcp), &query, json),
        }
    }
}

/// Platforms whose configuration has server `name`; none is `NotInstalled`.
fn configured_on(ctx: &CommandContext, name: &str, target: &TargetArgs) -> Result<Vec<Box<dyn Platform>>> {
    let mut found = Vec::new();
    for platform in ctx.platforms(target)? {
        if platform.mcp()?.exists(name)? {
            found.push(platform);
        }
    }
    if found.is_empty() {
        return Err(AixError::NotInstalled {
            kind: ArtifactKind::Mcp.label().to_string(),
            name: name.to_string(),
        }
        .into());
    }
    Ok(found)
}

fn toggle(ctx: &CommandContext, name: &str, target: &TargetArgs, enable: bool) -> Result<()> {
    let found = configured_on(ctx, name, target)?;
    let mut backups = ctx.backups()?;
    for platform in &found {
        backups.ensure(platform.as_ref())?;
        let manager = platform.mcp()?;
        if enable {
            manager.enable(name)?;
        } else {
            manager.disable(name)?;
        }
    }
    let verb = if enable { "Enabled" } else { "Disabled" };
    print_success(format!("{verb} MCP server '{name}' on {} platform(s)", found.len()));
    Ok(())
}

fn describe(server: &McpServer) -> String {
    if server.transport.is_remote() {
        format!("{} {}", server.transport.as_str(), server.url)
    } else {
        std::iter::once(server.command.as_str())
            .chain(server.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn list(ctx: &CommandContext, target: &TargetArgs, json: bool) -> Result<()> {
    let mut groups = Vec::new();
    for platform in ctx.platforms(target)? {
        let manager = platform.mcp()?;
        let servers = manager.list()?;
        groups.push((platform, manager.path().to_path_buf(), servers));
    }

    if json {
        let entries: Vec<ServerEntry<'_>> = groups
            .iter()
            .flat_map(|(platform, _, servers)| {
                servers.iter().map(move |server| ServerEntry {
                    platform: platform.id(),
                    name: &server.name,
                    server,
                })
            })
            .collect();
        return print_json(&entries);
    }

    for (platform, path, servers) in &groups {
        println!(
            "{} {}",
            format!("{} ({})", platform.display_name(), platform.scope()).bold(),
            path.display().to_string().dimmed()
        );
        if servers.is_empty() {
            println!("  {}", "No MCP servers configured".dimmed());
            continue;
        }
        let width = servers.iter().map(|s| s.name.len()).max().unwrap_or(0);
        for server in servers {
            let state = if server.disabled { " (disabled)".yellow().to_string() } else { String::new() };
            println!(
                "  {}{}  {}{state}",
                server.name.cyan(),
                " ".repeat(width - server.name.len()),
                describe(server)
            );
        }
    }
    Ok(())
}

fn show(ctx: &CommandContext, name: &str, target: &TargetArgs, json: bool) -> Result<()> {
    let found = configured_on(ctx, name, target)?;
    let mut entries = Vec::new();
    for platform in &found {
        entries.push((platform.id(), platform.display_name(), platform.mcp()?.get(name)?));
    }

    if json {
        let out: Vec<ServerEntry<'_>> = entries
            .iter()
            .map(|(id, _, server)| ServerEntry {
                platform: *id,
                name,
                server,
            })
            .collect();
        return print_json(&out);
    }

    for (_, display, server) in &entries {
        println!("{}", format!("{name} on {display}").bold());
        println!("  Transport: {}", server.transport.as_str());
        if server.transport.is_remote() {
            println!("  URL:       {}", server.url);
            for (key, value) in &server.headers {
                println!("  Header:    {key}: {value}");
            }
        } else {
            println!("  Command:   {}", describe(server));
            for key in server.env.keys() {
                println!("  Env:       {key}");
            }
        }
        if server.disabled {
            println!("  Status:    {}", "disabled".yellow());
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct ValidateOutput<'a> {
    name: &'a str,
    valid: bool,
    #[serde(flatten)]
    result: &'a crate::validation::ValidationResult,
}

fn validate(path: &std::path::Path, json: bool) -> Result<()> {
    let file = locate_mcp(path)?;
    let server = crate::mcp::read_server_file(&file)?;
    let result = validate_mcp_server(&server);
    if json {
        print_json(&ValidateOutput {
            name: &server.name,
            valid: !result.has_errors(),
            result: &result,
        })?;
    } else {
        result.print();
    }
    result.into_result(ArtifactKind::Mcp, &server.name)?;
    if !json {
        print_success(format!("MCP server '{}' is valid", server.name));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_transport() {
        assert_eq!(parse_transport("SSE").unwrap(), Transport::Sse);
        assert_eq!(parse_transport("http").unwrap(), Transport::Http);
        assert!(parse_transport("websocket").is_err());
    }

    #[test]
    fn test_describe() {
        let server = McpServer::stdio("gh", "npx", vec!["-y".to_string(), "pkg".to_string()]);
        assert_eq!(describe(&server), "npx -y pkg");
        assert_eq!(describe(&McpServer::sse("docs", "https://x/sse")), "sse https://x/sse");
    }

    #[test]
    fn test_validate_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("github.json");
        std::fs::write(&path, r#"{"command": "npx", "args": ["-y", "pkg"]}"#).unwrap();
        validate(&path, false).unwrap();

        std::fs::write(&path, r#"{"transport": "sse"}"#).unwrap();
        assert!(validate(&path, false).is_err());
    }

    #[test]
    fn test_add_parses_hyphen_args() {
        let cmd = McpCommand::try_parse_from([
            "mcp",
            "add",
            "github",
            "--command=npx",
            "--arg=-y",
            "--arg",
            "@modelcontextprotocol/server-github",
            "--env",
            "GITHUB_TOKEN=abc",
            "--platforms",
            "claude,opencode",
        ])
        .unwrap();
        let McpSubcommand::Add {
            args, env, platforms, ..
        } = cmd.subcommand
        else {
            panic!("expected add");
        };
        assert_eq!(args, vec!["-y", "@modelcontextprotocol/server-github"]);
        assert_eq!(env, vec![("GITHUB_TOKEN".to_string(), "abc".to_string())]);
        assert_eq!(platforms, vec!["claude", "opencode"]);
    }
}
