//! Canonical skill.
//!
//! A skill is a directory holding a `SKILL.md` plus any supporting files the
//! instructions reference. The `SKILL.md` format is shared by every supported
//! host, so skills are written unchanged to each platform.

use super::{ArtifactKind, MarkdownArtifact, string_or_list};
use crate::core::AixError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// File name of the skill definition inside its directory.
pub const SKILL_FILE: &str = "SKILL.md";

/// A skill definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Skill {
    /// Skill name; matches the directory name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// What the skill does and when to use it
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Skill version (semver)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Author name or handle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Tools the skill relies on
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,

    /// Tools the skill may use without asking
    #[serde(default, deserialize_with = "string_or_list", skip_serializing_if = "Vec::is_empty")]
    pub allowed_tools: Vec<String>,

    /// Phrases that should activate the skill
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub triggers: Vec<String>,

    /// Platform id to version requirement (e.g. `claude: ">=1.0"`)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub compatibility: BTreeMap<String, String>,

    /// Free-form metadata
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_yaml::Value>,

    /// Markdown body
    #[serde(skip)]
    pub instructions: String,
}

impl Skill {
    /// Create a skill with a name, description and body.
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

impl MarkdownArtifact for Skill {
    const KIND: ArtifactKind = ArtifactKind::Skill;
    const MARKER_FILE: &'static str = SKILL_FILE;

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
        AixError::InvalidSkill {
            reason: reason.into(),
        }
    }

    fn not_found(name: &str) -> AixError {
        AixError::SkillNotFound {
            name: name.to_string(),
        }
    }

    // SKILL.md always carries at least the name, so a bodyless file still
    // gets a frontmatter block.
    fn render(&self) -> anyhow::Result<String> {
        crate::markdown::format(self, &self.instructions)
    }
}
