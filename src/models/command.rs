//! Canonical slash command.

use super::{ArtifactKind, MarkdownArtifact, string_or_list};
use crate::core::AixError;
use serde::{Deserialize, Serialize};

/// A slash command: frontmatter metadata plus markdown instructions.
///
/// The name is taken from the file name when the command is loaded from a
/// platform directory and is never written into the frontmatter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Command {
    /// Command name (`review` for `/review`)
    #[serde(default, skip_serializing)]
    pub name: String,

    /// One-line description shown in the host's command picker
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Model override for this command
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Agent that should run the command
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,

    /// Placeholder text describing the expected arguments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argument_hint: Option<String>,

    /// Prevent the model from invoking the command on its own
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_model_invocation: Option<bool>,

    /// Whether users may invoke the command directly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_invocable: Option<bool>,

    /// Tools the command may use without asking
    #[serde(default, deserialize_with = "string_or_list", skip_serializing_if = "Vec::is_empty")]
    pub allowed_tools: Vec<String>,

    /// Execution context (e.g. `fork`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Hook names attached to the command
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hooks: Vec<String>,

    /// Markdown body
    #[serde(skip)]
    pub instructions: String,
}

impl Command {
    /// Create a command with a name, description and body.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        instructions: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            instructions: instructions.into(),
            ..Self::default()
        }
    }

    /// The invocation form shown to users, e.g. `/review`.
    #[must_use]
    pub fn slash_name(&self) -> String {
        format!("/{}", self.name)
    }
}

impl MarkdownArtifact for Command {
    const KIND: ArtifactKind = ArtifactKind::Command;
    const MARKER_FILE: &'static str = "command.md";

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn instructions(&self) -> &str {
        &self.instructions
    }

    fn set_instructions(&mut self, body: String) {
        self.instructions = body;
    }

    fn invalid(reason: impl Into<String>) -> AixError {
        AixError::InvalidCommand {
            reason: reason.into(),
        }
    }

    fn not_found(name: &str) -> AixError {
        AixError::CommandNotFound {
            name: name.to_string(),
        }
    }
}
