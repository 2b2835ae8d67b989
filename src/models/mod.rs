//! Canonical artifact records.
//!
//! These are the platform-neutral shapes used by every core operation. Each
//! platform adapter translates them into what its host understands before the
//! managers write them to disk.
//!
//! Markdown-backed artifacts ([`Command`], [`Skill`], [`Agent`]) keep their body
//! in an `instructions` field that is never serialized into frontmatter. MCP
//! servers ([`McpServer`]) never serialize their name; it is always the key of
//! the containing map.

pub mod agent;
pub mod command;
pub mod mcp;
pub mod skill;

pub use agent::Agent;
pub use command::Command;
pub use mcp::{McpConfig, McpServer, Transport};
pub use skill::Skill;

use crate::core::AixError;
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kinds of artifact aix manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// Slash command
    Command,
    /// Skill directory with a `SKILL.md`
    Skill,
    /// Agent definition
    Agent,
    /// MCP server entry
    Mcp,
}

impl ArtifactKind {
    /// Capitalized label used in user-facing messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Command => "Command",
            Self::Skill => "Skill",
            Self::Agent => "Agent",
            Self::Mcp => "MCP server",
        }
    }

    /// Directory name used for this kind inside a repository.
    #[must_use]
    pub const fn repo_dir(self) -> &'static str {
        match self {
            Self::Command => "commands",
            Self::Skill => "skills",
            Self::Agent => "agents",
            Self::Mcp => "mcp",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Command => "command",
            Self::Skill => "skill",
            Self::Agent => "agent",
            Self::Mcp => "mcp",
        })
    }
}

/// A record stored as a markdown file with YAML frontmatter.
///
/// Implemented by [`Command`], [`Skill`] and [`Agent`]. The frontmatter is the
/// serde representation of the record; the body is carried separately.
pub trait MarkdownArtifact:
    Serialize + DeserializeOwned + Default + Clone + fmt::Debug + Send + Sync
{
    /// Which kind of artifact this is
    const KIND: ArtifactKind;

    /// File name that marks the artifact inside a source directory
    /// (`command.md`, `agent.md`, `SKILL.md`).
    const MARKER_FILE: &'static str;

    /// The artifact name
    fn name(&self) -> &str;

    /// Replace the artifact name
    fn set_name(&mut self, name: String);

    /// One-line description, empty when absent
    fn description(&self) -> &str;

    /// Markdown body
    fn instructions(&self) -> &str;

    /// Replace the markdown body
    fn set_instructions(&mut self, body: String);

    /// Error for an unusable record (empty name and similar)
    fn invalid(reason: impl Into<String>) -> AixError;

    /// Error for a name that is not installed
    fn not_found(name: &str) -> AixError;

    /// Parse a document of this kind; `source` names it in errors.
    fn parse(content: &str, source: &str) -> anyhow::Result<Self> {
        let parsed = crate::markdown::parse::<Self>(content, source)?;
        let mut record = parsed.metadata;
        record.set_instructions(parsed.body);
        Ok(record)
    }

    /// Render the on-disk representation.
    fn render(&self) -> anyhow::Result<String> {
        crate::markdown::render(self, self.instructions())
    }
}

/// Accept either a YAML list or a comma-separated string.
///
/// Claude Code writes `allowed-tools: Read, Grep` as a single string; other
/// tools use a proper list. Both are normalized to a list.
pub(crate) fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrList {
        One(String),
        Many(Vec<String>),
        Nothing(()),
    }

    Ok(match StringOrList::deserialize(deserializer)? {
        StringOrList::One(s) => {
            s.split(',').map(str::trim).filter(|t| !t.is_empty()).map(String::from).collect()
        }
        StringOrList::Many(list) => list,
        StringOrList::Nothing(()) => Vec::new(),
    })
}
