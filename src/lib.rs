//! aix - one tool for the prompts, skills, agents and MCP servers of every AI
//! coding assistant.
//!
//! Each assistant keeps the same kinds of artifacts in its own layout and
//! dialect. aix reads a canonical form (markdown with YAML frontmatter for
//! commands, skills and agents; a JSON object for MCP servers), translates it
//! for each host and writes it where that host looks for it.
//!
//! # Architecture Overview
//!
//! - A [`platform::Platform`] adapter per host resolves paths for a
//!   [`core::Scope`] and translates canonical records into the host's schema.
//! - [`manager`] stores markdown artifacts in a platform directory;
//!   [`mcp::McpConfigManager`] edits the JSON file holding MCP servers while
//!   preserving every key it does not own.
//! - [`installer`] turns a git URL, local path or repository name into
//!   validated, translated installs on every target platform.
//! - [`repo`] indexes configured git repositories so artifacts can be
//!   installed by name.
//!
//! # Core Modules
//!
//! - [`cli`] - Command-line interface
//! - [`config`] - User configuration (`~/.config/aix/config.toml`)
//! - [`core`] - Error types and scopes
//! - [`models`] - Canonical command, skill, agent and MCP server records
//! - [`markdown`] - Frontmatter parsing and rendering
//! - [`validation`] - Name grammar and per-kind validation
//! - [`platform`] - Host adapters and the platform registry
//! - [`manager`] - Markdown artifact storage
//! - [`mcp`] - MCP configuration files and schema translation
//! - [`installer`] - Install dispatcher
//! - [`repo`] - Repository index
//! - [`backup`] - Snapshots of platform files before writes
//! - [`git`] - System git wrapper
//! - [`utils`] - Filesystem, terminal and platform helpers
//!
//! # Supported Platforms
//!
//! | Platform | User base | Project base | MCP file |
//! |----------|-----------|--------------|----------|
//! | Claude Code | `~/.claude` | `.claude` | `.mcp.json`, or `~/.claude.json` in local scope |
//! | OpenCode | `~/.config/opencode` | `.opencode` | `opencode.json` |

pub mod backup;
pub mod cli;
pub mod config;
pub mod core;
pub mod git;
pub mod installer;
pub mod manager;
pub mod markdown;
pub mod mcp;
pub mod models;
pub mod platform;
pub mod repo;
pub mod utils;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
