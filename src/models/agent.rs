//! Canonical agent definition.

use super::{ArtifactKind, MarkdownArtifact};
use crate::core::AixError;
use serde::{Deserialize, Serialize};

/// An agent: a named persona with its own instructions.
///
/// Agents are stored as `<agents-dir>/<name>.md`. The file name is
/// authoritative on load; the name is still written into the frontmatter
/// because some hosts require it there.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Agent name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// When the host should delegate to this agent
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// `primary`, `subagent` or `all`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    /// Sampling temperature, 0.0 to 2.0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Markdown body (the system prompt)
    #[serde(skip)]
    pub instructions: String,
}

/// Modes an agent may declare.
pub const AGENT_MODES: &[&str] = &["primary", "subagent", "all"];

impl Agent {
    /// Create an agent with a name, description and body.
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
}

impl MarkdownArtifact for Agent {
    const KIND: ArtifactKind = ArtifactKind::Agent;
    const MARKER_FILE: &'static str = "agent.md";

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
        AixError::InvalidAgent {
            reason: reason.into(),
        }
    }

    fn not_found(name: &str) -> AixError {
        AixError::AgentNotFound {
            name: name.to_string(),
        }
    }
}
