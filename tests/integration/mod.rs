//! Integration test suite for aix
//!
//! End-to-end tests that run the compiled `aix` binary against an isolated
//! home directory and project.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **command**: slash command validate, install, list, remove
//! - **skill**: skill directories and supporting files
//! - **agent**: agents and platform-specific frontmatter
//! - **mcp**: MCP server add, enable/disable, config preservation
//! - **repo**: repository add, search and install by name
//! - **platforms**: platform detection

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod agent;
mod command;
mod mcp;
mod platforms;
mod repo;
mod skill;
