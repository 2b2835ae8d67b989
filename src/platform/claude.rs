//! Claude Code adapter.
//!
//! Commands keep every canonical field. Agents keep their description; Claude
//! Code subagents have no `mode` or `temperature`, so those are dropped.

use super::{Platform, PlatformId, PlatformPaths, Translation, VariableSyntax};
use crate::models::{Agent, Command};
use std::path::PathBuf;
use tracing::debug;

/// Claude Code at one scope.
#[derive(Debug, Clone)]
pub struct ClaudePlatform {
    paths: PlatformPaths,
}

impl ClaudePlatform {
    /// Adapter over resolved paths
    #[must_use]
    pub const fn new(paths: PlatformPaths) -> Self {
        Self { paths }
    }
}

impl Platform for ClaudePlatform {
    fn id(&self) -> PlatformId {
        PlatformId::Claude
    }

    fn paths(&self) -> &PlatformPaths {
        &self.paths
    }

    fn backup_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = [
            self.paths.commands_dir(),
            self.paths.skills_dir(),
            self.paths.agents_dir(),
            self.paths.mcp_config(),
        ]
        .into_iter()
        .flatten()
        .collect();
        paths.dedup();
        paths
    }

    fn variable_syntax(&self) -> &'static VariableSyntax {
        &VariableSyntax::CANONICAL
    }

    fn translate_command(&self, command: &Command) -> Translation<Command> {
        let mut record = command.clone();
        record.instructions = self.translate_variables(&command.instructions);
        Translation::lossless(record)
    }

    fn translate_agent(&self, agent: &Agent) -> Translation<Agent> {
        let mut record = agent.clone();
        record.instructions = self.translate_variables(&agent.instructions);
        let mut dropped = Vec::new();
        if record.mode.take().is_some() {
            dropped.push("mode");
        }
        if record.temperature.take().is_some() {
            dropped.push("temperature");
        }
        if !dropped.is_empty() {
            debug!(
                "Claude Code agents do not support {}; dropping from '{}'",
                dropped.join(", "),
                agent.name
            );
        }
        Translation { record, dropped }
    }
}
