//! Artifact validation.
//!
//! Validators never fail with an error; they collect [`Issue`]s into a
//! [`ValidationResult`]. A result with at least one error-level issue blocks
//! installation, warnings are printed and otherwise ignored.
//!
//! Names follow one grammar for every artifact kind:
//! `^[a-z][a-z0-9]*(-[a-z0-9]+)*$`, at most 64 characters.

use crate::core::AixError;
use crate::models::agent::AGENT_MODES;
use crate::models::{Agent, ArtifactKind, Command, McpServer, Skill, Transport};
use colored::Colorize;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

/// Longest accepted artifact name.
pub const MAX_NAME_LEN: usize = 64;

/// Fallback used by [`sanitize_default_name`] when nothing usable remains.
pub const DEFAULT_NAME: &str = "new-command";

static NAME_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^[a-z][a-z0-9]*(-[a-z0-9]+)*$").expect("name pattern is valid")
});

static DISALLOWED_RUN_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"[^a-z0-9]+").expect("sanitize pattern is valid"));

/// Severity of an [`Issue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Reported but does not block
    Warning,
    /// Blocks installation
    Error,
}

/// One validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Severity
    pub level: Level,
    /// Field the issue is about (`name`, `description`, ...)
    pub field: String,
    /// Human readable message
    pub message: String,
    /// Offending value, when useful to show
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Issue {
    /// An error-level issue.
    pub fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            field: field.into(),
            message: message.into(),
            value: None,
        }
    }

    /// A warning-level issue.
    pub fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: Level::Warning,
            field: field.into(),
            message: message.into(),
            value: None,
        }
    }

    /// Attach the offending value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)?;
        if let Some(value) = &self.value {
            write!(f, " (got {value:?})")?;
        }
        Ok(())
    }
}

/// Outcome of validating one artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// Blocking issues
    pub errors: Vec<Issue>,
    /// Non-blocking issues
    pub warnings: Vec<Issue>,
}

impl ValidationResult {
    /// Whether any error-level issue was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Whether nothing at all was recorded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// Record an issue in the list matching its level.
    pub fn push(&mut self, issue: Issue) {
        match issue.level {
            Level::Error => self.errors.push(issue),
            Level::Warning => self.warnings.push(issue),
        }
    }

    /// Append every issue from `other`.
    pub fn merge(&mut self, other: Self) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Print the issues to stderr under `Errors:` / `Warnings:` headers.
    pub fn print(&self) {
        if self.has_errors() {
            eprintln!("{}", "Errors:".red().bold());
            for issue in &self.errors {
                eprintln!("  {} {issue}", "✗".red());
            }
        }
        if !self.warnings.is_empty() {
            eprintln!("{}", "Warnings:".yellow().bold());
            for issue in &self.warnings {
                eprintln!("  {} {issue}", "⚠".yellow());
            }
        }
    }

    /// Turn error-level issues into [`AixError::ValidationFailed`].
    pub fn into_result(self, kind: ArtifactKind, name: &str) -> Result<Self, AixError> {
        if self.has_errors() {
            return Err(AixError::ValidationFailed {
                kind: kind.label().to_string(),
                name: name.to_string(),
                errors: self.errors.len(),
            });
        }
        Ok(self)
    }
}

/// Derive an artifact name from a file path: the base name with a trailing
/// `.md` removed. Case is preserved.
#[must_use]
pub fn infer_name(path: &Path) -> String {
    let base = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    base.strip_suffix(".md").unwrap_or(base).to_string()
}

/// Check `name` against the name grammar.
///
/// Returns the reason on failure; the messages tell the common mistakes apart.
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("name is required".to_string());
    }
    if name.len() > MAX_NAME_LEN {
        return Err(format!("name must be at most {MAX_NAME_LEN} characters (got {})", name.len()));
    }
    if NAME_RE.is_match(name) {
        return Ok(());
    }
    if name.chars().any(|c| c.is_ascii_uppercase()) {
        return Err("name must be lowercase".to_string());
    }
    if name.starts_with('-') || name.ends_with('-') {
        return Err("name must not start or end with a hyphen".to_string());
    }
    if name.contains("--") {
        return Err("name must not contain consecutive hyphens".to_string());
    }
    Err("name must be lowercase alphanumeric with single hyphens".to_string())
}

/// Turn free text into a name that satisfies the grammar.
///
/// Lowercases, collapses every run of disallowed characters into one hyphen,
/// trims hyphens from both ends and falls back to [`DEFAULT_NAME`]. Leading
/// digits are dropped as well, so `42 things` becomes `things`.
#[must_use]
pub fn sanitize_default_name(text: &str) -> String {
    let lowered = text.to_lowercase();
    let replaced = DISALLOWED_RUN_RE.replace_all(&lowered, "-");
    let trimmed = replaced.trim_matches('-');
    // The name grammar requires a leading letter, so leading digits and the
    // hyphens between them are dropped too.
    let trimmed = trimmed.trim_start_matches(|c: char| c.is_ascii_digit() || c == '-');

    if trimmed.is_empty() {
        return DEFAULT_NAME.to_string();
    }

    let mut name: String = trimmed.chars().take(MAX_NAME_LEN).collect();
    while name.ends_with('-') {
        name.pop();
    }
    name
}

/// Fill in a missing name from `path` and validate it.
///
/// Returns the name that was used.
fn check_name(result: &mut ValidationResult, name: &str, path: Option<&Path>) -> String {
    let name = if name.is_empty() {
        match path {
            Some(path) => {
                let inferred = infer_name(path);
                if inferred.is_empty() {
                    result.push(Issue::error("name", "could not infer a name from the file name"));
                    return String::new();
                }
                inferred
            }
            None => String::new(),
        }
    } else {
        name.to_string()
    };

    if let Err(message) = validate_name(&name) {
        let issue = Issue::error("name", message);
        result.push(if name.is_empty() { issue } else { issue.with_value(name.clone()) });
    }
    name
}

/// Validate a slash command.
pub fn validate_command(command: &Command, path: Option<&Path>) -> ValidationResult {
    let mut result = ValidationResult::default();
    check_name(&mut result, &command.name, path);

    if command.description.trim().is_empty() {
        result.push(Issue::warning("description", "description is recommended so the command shows up with context"));
    }
    if command.instructions.trim().is_empty() {
        result.push(Issue::warning("instructions", "command body is empty"));
    }
    result
}

/// Validate a skill.
pub fn validate_skill(skill: &Skill, path: Option<&Path>) -> ValidationResult {
    let mut result = ValidationResult::default();
    // SKILL.md is named after its directory, not itself.
    let dir = path.and_then(Path::parent);
    check_name(&mut result, &skill.name, dir);

    if skill.description.trim().is_empty() {
        result.push(Issue::error("description", "description is required"));
    }
    if let Some(version) = &skill.version
        && semver::Version::parse(version).is_err()
    {
        result.push(
            Issue::warning("version", "version is not a valid semantic version").with_value(version),
        );
    }
    for (platform, constraint) in &skill.compatibility {
        if semver::VersionReq::parse(constraint).is_err() {
            result.push(
                Issue::warning(
                    format!("compatibility.{platform}"),
                    "not a valid version requirement",
                )
                .with_value(constraint),
            );
        }
    }
    result
}

/// Validate an agent.
pub fn validate_agent(agent: &Agent, path: Option<&Path>) -> ValidationResult {
    let mut result = ValidationResult::default();
    check_name(&mut result, &agent.name, path);

    if agent.description.trim().is_empty() {
        result.push(Issue::warning("description", "description is recommended so hosts know when to use the agent"));
    }
    if let Some(mode) = &agent.mode
        && !AGENT_MODES.contains(&mode.as_str())
    {
        result.push(
            Issue::error("mode", format!("mode must be one of {}", AGENT_MODES.join(", ")))
                .with_value(mode),
        );
    }
    if let Some(temperature) = agent.temperature
        && !(0.0..=2.0).contains(&temperature)
    {
        result.push(
            Issue::error("temperature", "temperature must be between 0.0 and 2.0")
                .with_value(temperature.to_string()),
        );
    }
    result
}

/// Validate an MCP server entry.
///
/// Server names come from existing host configs that aix does not control, so
/// a name outside the grammar is only a warning here.
pub fn validate_mcp_server(server: &McpServer) -> ValidationResult {
    let mut result = ValidationResult::default();

    if server.name.is_empty() {
        result.push(Issue::error("name", "name is required"));
    } else if let Err(message) = validate_name(&server.name) {
        result.push(Issue::warning("name", message).with_value(server.name.clone()));
    }

    match server.transport {
        Transport::Stdio => {
            if server.command.trim().is_empty() {
                result.push(Issue::error("command", "stdio servers need a command"));
            }
            if !server.url.is_empty() {
                result.push(
                    Issue::error("url", "stdio servers must not set a url").with_value(server.url.clone()),
                );
            }
        }
        Transport::Sse | Transport::Http => {
            if server.url.trim().is_empty() {
                result.push(Issue::error("url", format!("{} servers need a url", server.transport.as_str())));
            } else if !server.url.starts_with("http://") && !server.url.starts_with("https://") {
                result.push(
                    Issue::warning("url", "url should start with http:// or https://")
                        .with_value(server.url.clone()),
                );
            }
        }
    }

    for platform in &server.platforms {
        if crate::platform::PlatformId::from_name(platform).is_none() {
            result.push(Issue::warning("platforms", "unknown platform").with_value(platform.clone()));
        }
    }
    result
}
