//! OpenCode adapter.
//!
//! OpenCode commands understand `description`, `model` and `agent`; the other
//! canonical command fields are dropped. Agents keep every canonical field.

use super::{Platform, PlatformId, PlatformPaths, Translation, VariableSyntax};
use crate::models::{Agent, Command};
use std::path::PathBuf;
use tracing::debug;

/// OpenCode at one scope.
#[derive(Debug, Clone)]
pub struct OpenCodePlatform {
    paths: PlatformPaths,
}

impl OpenCodePlatform {
    /// Adapter over resolved paths
    #[must_use]
    pub const fn new(paths: PlatformPaths) -> Self {
        Self { paths }
    }
}

/// Clear the command fields OpenCode cannot store and name them.
fn strip_command(command: &mut Command) -> Vec<&'static str> {
    let mut dropped = Vec::new();
    if command.argument_hint.take().is_some() {
        dropped.push("argument-hint");
    }
    if command.disable_model_invocation.take().is_some() {
        dropped.push("disable-model-invocation");
    }
    if command.user_invocable.take().is_some() {
        dropped.push("user-invocable");
    }
    if !std::mem::take(&mut command.allowed_tools).is_empty() {
        dropped.push("allowed-tools");
    }
    if command.context.take().is_some() {
        dropped.push("context");
    }
    if !std::mem::take(&mut command.hooks).is_empty() {
        dropped.push("hooks");
    }
    dropped
}

impl Platform for OpenCodePlatform {
    fn id(&self) -> PlatformId {
        PlatformId::OpenCode
    }

    fn paths(&self) -> &PlatformPaths {
        &self.paths
    }

    fn backup_paths(&self) -> Vec<PathBuf> {
        [
            self.paths.commands_dir(),
            self.paths.skills_dir(),
            self.paths.agents_dir(),
            self.paths.mcp_config(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn variable_syntax(&self) -> &'static VariableSyntax {
        &VariableSyntax::CANONICAL
    }

    fn translate_command(&self, command: &Command) -> Translation<Command> {
        let mut record = command.clone();
        record.instructions = self.translate_variables(&command.instructions);
        let dropped = strip_command(&mut record);
        if !dropped.is_empty() {
            debug!(
                "OpenCode commands do not support {}; dropping from '{}'",
                dropped.join(", "),
                command.name
            );
        }
        Translation { record, dropped }
    }

    fn translate_agent(&self, agent: &Agent) -> Translation<Agent> {
        let mut record = agent.clone();
        record.instructions = self.translate_variables(&agent.instructions);
        Translation::lossless(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Scope;

    fn platform() -> OpenCodePlatform {
        OpenCodePlatform::new(PlatformPaths::new(
            PlatformId::OpenCode,
            Scope::User,
            Some(PathBuf::from("/home/u")),
            None,
        ))
    }

    #[test]
    fn test_command_translation_drops_unsupported() {
        let mut command = Command::new("review", "Review code", "Review $ARGUMENTS");
        command.model = Some("anthropic/claude-sonnet-4".to_string());
        command.agent = Some("build".to_string());
        command.allowed_tools = vec!["Read".to_string(), "Grep".to_string()];
        command.argument_hint = Some("[file]".to_string());
        command.hooks = vec!["lint".to_string()];

        let translation = platform().translate_command(&command);
        assert_eq!(translation.dropped, vec!["argument-hint", "allowed-tools", "hooks"]);

        let record = translation.record;
        assert_eq!(record.description, "Review code");
        assert_eq!(record.model.as_deref(), Some("anthropic/claude-sonnet-4"));
        assert_eq!(record.agent.as_deref(), Some("build"));
        assert!(record.allowed_tools.is_empty());
        assert_eq!(record.instructions, "Review $ARGUMENTS");
    }

    #[test]
    fn test_plain_command_is_lossless() {
        let command = Command::new("review", "Review code", "Body");
        let translation = platform().translate_command(&command);
        assert!(translation.dropped.is_empty());
        assert_eq!(translation.record, command);
    }

    #[test]
    fn test_agent_keeps_mode() {
        let mut agent = Agent::new("plan", "Plans work", "Plan.");
        agent.mode = Some("primary".to_string());
        agent.temperature = Some(0.1);
        let translation = platform().translate_agent(&agent);
        assert!(translation.dropped.is_empty());
        assert_eq!(translation.record, agent);
    }

    #[test]
    fn test_backup_paths_use_singular_dirs() {
        let paths = platform().backup_paths();
        assert!(paths.contains(&PathBuf::from("/home/u/.config/opencode/skill")));
        assert!(paths.contains(&PathBuf::from("/home/u/.config/opencode/agent")));
        assert!(paths.contains(&PathBuf::from("/home/u/.config/opencode/opencode.json")));
    }
}
