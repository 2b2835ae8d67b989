//! Artifact documents used across tests.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// A valid slash command.
pub const REVIEW_COMMAND: &str = "---\nname: review\ndescription: Review code changes\n---\n\nReview the code.\n";

/// A command whose name breaks the grammar.
pub const INVALID_NAME_COMMAND: &str =
    "---\nname: INVALID-NAME\ndescription: Review code changes\n---\n\nReview the code.\n";

/// A command using Claude-only fields.
pub const RICH_COMMAND: &str = "---\ndescription: Fix an issue\nargument-hint: \"[issue]\"\nallowed-tools: Bash, Edit\nmodel: sonnet\n---\n\nFix issue $ARGUMENTS.\n";

/// A valid skill.
pub const PDF_SKILL: &str =
    "---\nname: pdf\ndescription: Extract text and tables from PDF files\n---\n\n# PDF\n\nUse scripts/extract.py.\n";

/// A valid agent with OpenCode-only settings.
pub const REVIEWER_AGENT: &str = "---\nname: reviewer\ndescription: Reviews pull requests\nmode: subagent\ntemperature: 0.1\n---\n\nYou review code.\n";

/// A stdio MCP server definition.
pub const GITHUB_SERVER: &str = r#"{
  "command": "npx",
  "args": ["-y", "@modelcontextprotocol/server-github"],
  "env": {"GITHUB_TOKEN": "token"}
}
"#;

/// Builds a repository tree: `commands/`, `skills/`, `agents/`, `mcp/`.
#[derive(Debug, Default)]
pub struct RepoFixture {
    files: Vec<(PathBuf, String)>,
}

impl RepoFixture {
    /// An empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// `commands/<name>.md`
    pub fn command(mut self, name: &str, content: &str) -> Self {
        self.files.push((Path::new("commands").join(format!("{name}.md")), content.to_string()));
        self
    }

    /// `skills/<name>/SKILL.md` plus extra files inside the skill directory
    pub fn skill(mut self, name: &str, content: &str, extra: &[(&str, &str)]) -> Self {
        let dir = Path::new("skills").join(name);
        self.files.push((dir.join("SKILL.md"), content.to_string()));
        for (path, body) in extra {
            self.files.push((dir.join(path), (*body).to_string()));
        }
        self
    }

    /// `agents/<name>.md`
    pub fn agent(mut self, name: &str, content: &str) -> Self {
        self.files.push((Path::new("agents").join(format!("{name}.md")), content.to_string()));
        self
    }

    /// `mcp/<name>.json`
    pub fn mcp(mut self, name: &str, content: &str) -> Self {
        self.files.push((Path::new("mcp").join(format!("{name}.json")), content.to_string()));
        self
    }

    /// Write every file below `dir`.
    pub fn write_to(&self, dir: &Path) -> Result<()> {
        for (path, content) in &self.files {
            let full = dir.join(path);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(full, content)?;
        }
        Ok(())
    }
}
