//! Error handling for aix
//!
//! All typed failures live in the [`AixError`] enum. Library functions return
//! [`anyhow::Result`] and wrap I/O failures with context naming the operation and
//! path; callers that need to react to a specific failure recover the typed error
//! with [`anyhow::Error::downcast_ref`].
//!
//! At the binary boundary, [`user_friendly_error`] turns any error into an
//! [`ErrorContext`] carrying optional details and a suggestion, which is printed
//! to stderr in color.
//!
//! # Error Categories
//!
//! - **Not found**: [`AixError::CommandNotFound`], [`AixError::SkillNotFound`],
//!   [`AixError::AgentNotFound`], [`AixError::McpServerNotFound`], [`AixError::FileNotFound`]
//! - **Invalid input**: [`AixError::InvalidCommand`], [`AixError::InvalidSkill`],
//!   [`AixError::InvalidAgent`], [`AixError::InvalidMcpServer`], [`AixError::InvalidScope`]
//! - **Parse**: [`AixError::MissingFrontmatter`], [`AixError::MissingFrontmatterClose`],
//!   [`AixError::InvalidYaml`], [`AixError::InvalidJson`]
//! - **Policy**: [`AixError::AlreadyExists`], [`AixError::NoRepositories`],
//!   [`AixError::NotFoundInRepositories`], [`AixError::UnknownPlatform`]
//! - **Git**: [`AixError::GitNotFound`], [`AixError::GitCloneFailed`],
//!   [`AixError::GitCommandError`]

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for aix operations.
///
/// Variants carry enough context to render a one-line message; the richer
/// guidance lives in the [`ErrorContext`] built by [`user_friendly_error`].
#[derive(Error, Debug)]
pub enum AixError {
    /// A slash command with this name is not installed
    #[error("Command '{name}' not found")]
    CommandNotFound {
        /// Name of the missing command
        name: String,
    },

    /// A skill with this name is not installed
    #[error("Skill '{name}' not found")]
    SkillNotFound {
        /// Name of the missing skill
        name: String,
    },

    /// An agent with this name is not installed
    #[error("Agent '{name}' not found")]
    AgentNotFound {
        /// Name of the missing agent
        name: String,
    },

    /// An MCP server entry with this name is not configured
    #[error("MCP server '{name}' not found")]
    McpServerNotFound {
        /// Name of the missing server
        name: String,
    },

    /// A file that was expected on disk does not exist
    #[error("File not found: {path}")]
    FileNotFound {
        /// The missing path
        path: String,
    },

    /// A directory was given as a source but holds no usable artifact file
    #[error("No {kind} file found in {path}")]
    NoArtifactFile {
        /// Artifact kind that was looked for
        kind: String,
        /// The directory that was searched
        path: String,
    },

    /// The command record is unusable (missing name, nil record)
    #[error("Invalid command: {reason}")]
    InvalidCommand {
        /// Why the record was rejected
        reason: String,
    },

    /// The skill record is unusable
    #[error("Invalid skill: {reason}")]
    InvalidSkill {
        /// Why the record was rejected
        reason: String,
    },

    /// The agent record is unusable
    #[error("Invalid agent: {reason}")]
    InvalidAgent {
        /// Why the record was rejected
        reason: String,
    },

    /// The MCP server record is unusable
    #[error("Invalid MCP server: {reason}")]
    InvalidMcpServer {
        /// Why the record was rejected
        reason: String,
    },

    /// The requested scope is not one of user, project or local
    #[error("Invalid scope '{scope}'")]
    InvalidScope {
        /// The scope text as given
        scope: String,
    },

    /// A document that requires frontmatter does not start with `---`
    #[error("Missing frontmatter in {path}")]
    MissingFrontmatter {
        /// Path of the offending document, or `<input>` when read from memory
        path: String,
    },

    /// A frontmatter block was opened but never closed
    #[error("Frontmatter in {path} is missing its closing '---' delimiter")]
    MissingFrontmatterClose {
        /// Path of the offending document
        path: String,
    },

    /// The frontmatter block is not valid YAML for the expected record
    #[error("Invalid YAML frontmatter in {path}: {reason}")]
    InvalidYaml {
        /// Path of the offending document
        path: String,
        /// Parser message
        reason: String,
    },

    /// A JSON configuration file could not be parsed
    #[error("Invalid JSON in {path}: {reason}")]
    InvalidJson {
        /// Path of the offending file
        path: String,
        /// Parser message
        reason: String,
    },

    /// Validation reported at least one error-level issue
    #[error("{kind} '{name}' failed validation with {errors} error(s)")]
    ValidationFailed {
        /// Artifact kind ("Command", "Skill", ...)
        kind: String,
        /// Artifact name
        name: String,
        /// Number of error-level issues
        errors: usize,
    },

    /// The artifact is already installed on a target platform
    #[error("{kind} '{name}' already exists on {platform}")]
    AlreadyExists {
        /// Artifact kind
        kind: String,
        /// Artifact name
        name: String,
        /// Display name of the conflicting platform
        platform: String,
    },

    /// A name lookup was attempted but no repositories are configured
    #[error("'{name}' is not a path and no repositories are configured")]
    NoRepositories {
        /// The name that was looked up
        name: String,
    },

    /// No configured repository provides an artifact with this name
    #[error("{kind} '{name}' not found in any configured repository")]
    NotFoundInRepositories {
        /// Artifact kind
        kind: String,
        /// The name that was looked up
        name: String,
    },

    /// The artifact is not installed on any of the selected platforms
    #[error("{kind} '{name}' is not installed on any platform")]
    NotInstalled {
        /// Artifact kind
        kind: String,
        /// Artifact name
        name: String,
    },

    /// Several repositories provide the same name and no prompt is possible
    #[error("'{name}' is provided by several repositories: {repos}")]
    AmbiguousSource {
        /// The name that was looked up
        name: String,
        /// Comma separated repository names
        repos: String,
    },

    /// A named repository is not configured
    #[error("Repository '{name}' is not configured")]
    RepositoryNotFound {
        /// The repository name
        name: String,
    },

    /// A repository with this name is already configured
    #[error("Repository '{name}' already exists")]
    RepositoryExists {
        /// The repository name
        name: String,
    },

    /// The platform name is not part of the supported set
    #[error("Unknown platform '{name}'")]
    UnknownPlatform {
        /// The platform name as given
        name: String,
        /// Closest supported name, if any is close enough
        suggestion: Option<String>,
    },

    /// `register` was called twice for the same platform
    #[error("Platform '{name}' is already registered")]
    PlatformAlreadyRegistered {
        /// The platform name
        name: String,
    },

    /// No registered platform passed its availability check
    #[error("No supported AI platforms were detected")]
    NoPlatformsAvailable,

    /// A path could not be resolved for the requested scope
    #[error("Cannot resolve {what} for {platform}")]
    UnresolvablePath {
        /// What was being resolved ("commands directory", ...)
        what: String,
        /// Display name of the platform
        platform: String,
    },

    /// Git executable is missing
    #[error("Git is not installed or not found in PATH")]
    GitNotFound,

    /// `git clone` failed
    #[error("Failed to clone repository: {url}")]
    GitCloneFailed {
        /// The repository URL
        url: String,
        /// stderr of the git process
        reason: String,
    },

    /// Any other git invocation failed
    #[error("Git operation failed: {operation}")]
    GitCommandError {
        /// The git operation ("pull", "clone", ...)
        operation: String,
        /// stderr of the git process
        stderr: String,
    },

    /// Configuration file problem
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the problem
        message: String,
    },

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl Clone for AixError {
    fn clone(&self) -> Self {
        match self {
            Self::CommandNotFound { name } => Self::CommandNotFound { name: name.clone() },
            Self::SkillNotFound { name } => Self::SkillNotFound { name: name.clone() },
            Self::AgentNotFound { name } => Self::AgentNotFound { name: name.clone() },
            Self::McpServerNotFound { name } => Self::McpServerNotFound { name: name.clone() },
            Self::FileNotFound { path } => Self::FileNotFound { path: path.clone() },
            Self::NoArtifactFile { kind, path } => Self::NoArtifactFile {
                kind: kind.clone(),
                path: path.clone(),
            },
            Self::InvalidCommand { reason } => Self::InvalidCommand { reason: reason.clone() },
            Self::InvalidSkill { reason } => Self::InvalidSkill { reason: reason.clone() },
            Self::InvalidAgent { reason } => Self::InvalidAgent { reason: reason.clone() },
            Self::InvalidMcpServer { reason } => Self::InvalidMcpServer { reason: reason.clone() },
            Self::InvalidScope { scope } => Self::InvalidScope { scope: scope.clone() },
            Self::MissingFrontmatter { path } => Self::MissingFrontmatter { path: path.clone() },
            Self::MissingFrontmatterClose { path } => {
                Self::MissingFrontmatterClose { path: path.clone() }
            }
            Self::InvalidYaml { path, reason } => Self::InvalidYaml {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::InvalidJson { path, reason } => Self::InvalidJson {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::ValidationFailed { kind, name, errors } => Self::ValidationFailed {
                kind: kind.clone(),
                name: name.clone(),
                errors: *errors,
            },
            Self::AlreadyExists { kind, name, platform } => Self::AlreadyExists {
                kind: kind.clone(),
                name: name.clone(),
                platform: platform.clone(),
            },
            Self::NoRepositories { name } => Self::NoRepositories { name: name.clone() },
            Self::NotFoundInRepositories { kind, name } => Self::NotFoundInRepositories {
                kind: kind.clone(),
                name: name.clone(),
            },
            Self::NotInstalled { kind, name } => Self::NotInstalled {
                kind: kind.clone(),
                name: name.clone(),
            },
            Self::AmbiguousSource { name, repos } => Self::AmbiguousSource {
                name: name.clone(),
                repos: repos.clone(),
            },
            Self::RepositoryNotFound { name } => Self::RepositoryNotFound { name: name.clone() },
            Self::RepositoryExists { name } => Self::RepositoryExists { name: name.clone() },
            Self::UnknownPlatform { name, suggestion } => Self::UnknownPlatform {
                name: name.clone(),
                suggestion: suggestion.clone(),
            },
            Self::PlatformAlreadyRegistered { name } => {
                Self::PlatformAlreadyRegistered { name: name.clone() }
            }
            Self::NoPlatformsAvailable => Self::NoPlatformsAvailable,
            Self::UnresolvablePath { what, platform } => Self::UnresolvablePath {
                what: what.clone(),
                platform: platform.clone(),
            },
            Self::GitNotFound => Self::GitNotFound,
            Self::GitCloneFailed { url, reason } => Self::GitCloneFailed {
                url: url.clone(),
                reason: reason.clone(),
            },
            Self::GitCommandError { operation, stderr } => Self::GitCommandError {
                operation: operation.clone(),
                stderr: stderr.clone(),
            },
            Self::ConfigError { message } => Self::ConfigError { message: message.clone() },
            // io::Error is not Clone
            Self::IoError(e) => Self::Other {
                message: format!("IO error: {e}"),
            },
            Self::Other { message } => Self::Other { message: message.clone() },
        }
    }
}

impl AixError {
    /// Returns true for the not-found family of errors.
    ///
    /// The CLI uses this to decide whether `show`/`remove` should fall through to
    /// the next platform instead of aborting.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::CommandNotFound { .. }
                | Self::SkillNotFound { .. }
                | Self::AgentNotFound { .. }
                | Self::McpServerNotFound { .. }
                | Self::FileNotFound { .. }
        )
    }
}

/// Returns true when `error` wraps one of the not-found [`AixError`] variants.
#[must_use]
pub fn is_not_found(error: &anyhow::Error) -> bool {
    error.downcast_ref::<AixError>().is_some_and(AixError::is_not_found)
}

/// Error wrapper carrying user-facing guidance.
///
/// Details are printed in yellow, suggestions in green.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying aix error
    pub error: AixError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no guidance attached.
    #[must_use]
    pub const fn new(error: AixError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error context to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions.
///
/// Recognizes [`AixError`] anywhere in the chain, then [`std::io::Error`] and
/// [`toml::de::Error`]; anything else is rendered with its full cause chain.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(ctx) = error.downcast_ref::<ErrorContext>() {
        return ErrorContext {
            error: ctx.error.clone(),
            suggestion: ctx.suggestion.clone(),
            details: ctx.details.clone(),
        };
    }

    if let Some(aix_error) = error.chain().find_map(|e| e.downcast_ref::<AixError>()) {
        return create_error_context(aix_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(AixError::Other {
                    message: chain_message(&error),
                })
                .with_suggestion("Check file ownership and permissions of the platform directories")
                .with_details("aix could not read or write one of the platform configuration files");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(AixError::Other {
                    message: chain_message(&error),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(AixError::ConfigError {
            message: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax of ~/.config/aix/config.toml");
    }

    ErrorContext::new(AixError::Other {
        message: chain_message(&error),
    })
}

fn chain_message(error: &anyhow::Error) -> String {
    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    message
}

fn create_error_context(error: AixError) -> ErrorContext {
    match &error {
        AixError::GitNotFound => ErrorContext::new(error)
            .with_suggestion("Install git from https://git-scm.com/ or your package manager (e.g., 'brew install git', 'apt install git')")
            .with_details("aix runs 'git clone' to fetch artifacts from git URLs and repositories"),

        AixError::GitCloneFailed { reason, .. } => {
            let reason = reason.trim().to_string();
            ErrorContext::new(error)
                .with_suggestion("Check the repository URL and your network access. Verify you can run 'git clone' on it manually")
                .with_details(reason)
        }

        AixError::GitCommandError { stderr, .. } => {
            let stderr = stderr.trim().to_string();
            ErrorContext::new(error)
                .with_suggestion("Run the git command manually inside the repository for more details")
                .with_details(stderr)
        }

        AixError::CommandNotFound { .. } => ErrorContext::new(error)
            .with_suggestion("Run 'aix command list' to see installed commands"),

        AixError::SkillNotFound { .. } => ErrorContext::new(error)
            .with_suggestion("Run 'aix skill list' to see installed skills"),

        AixError::AgentNotFound { .. } => ErrorContext::new(error)
            .with_suggestion("Run 'aix agent list' to see installed agents"),

        AixError::McpServerNotFound { .. } => ErrorContext::new(error)
            .with_suggestion("Run 'aix mcp list' to see configured servers"),

        AixError::AlreadyExists { .. } => ErrorContext::new(error)
            .with_suggestion("Use --force to overwrite the existing artifact"),

        AixError::NoRepositories { .. } => ErrorContext::new(error)
            .with_suggestion("Add a repository with 'aix repo add <url>', or pass a path (./name) or use --file"),

        AixError::NotFoundInRepositories { .. } => ErrorContext::new(error)
            .with_suggestion("Run 'aix repo update' to refresh repositories, or search with 'aix <kind> search <query>'"),

        AixError::AmbiguousSource { .. } => ErrorContext::new(error)
            .with_suggestion("Run interactively to pick one, or install from the repository path directly"),

        AixError::UnknownPlatform { suggestion, .. } => {
            let hint = match suggestion {
                Some(s) => format!("Did you mean '{s}'? Run 'aix platforms' to list supported platforms"),
                None => "Run 'aix platforms' to list supported platforms".to_string(),
            };
            ErrorContext::new(error).with_suggestion(hint)
        }

        AixError::NoPlatformsAvailable => ErrorContext::new(error)
            .with_suggestion("Install Claude Code or OpenCode, or select one explicitly with --platform")
            .with_details("A platform is detected when its user configuration directory exists (~/.claude, ~/.config/opencode)"),

        AixError::MissingFrontmatter { .. } | AixError::MissingFrontmatterClose { .. } => {
            ErrorContext::new(error)
                .with_suggestion("Start the file with a '---' line, the YAML metadata, and a closing '---' line")
        }

        AixError::InvalidYaml { .. } => ErrorContext::new(error)
            .with_suggestion("Check the YAML between the '---' delimiters for indentation and quoting mistakes"),

        AixError::InvalidJson { .. } => ErrorContext::new(error)
            .with_suggestion("Fix the JSON syntax; aix does not rewrite files it cannot parse"),

        AixError::UnresolvablePath { .. } => ErrorContext::new(error)
            .with_suggestion("Project and local scopes need a project directory; pass --project or run inside the project"),

        _ => ErrorContext::new(error),
    }
}
