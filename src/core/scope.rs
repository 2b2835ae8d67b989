//! Configuration scopes.
//!
//! A scope selects which configuration location an operation targets:
//! the per-user directory, a directory inside the project, or (for the one
//! platform that supports it) a per-project section of a user-level file.

use crate::core::AixError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A resolved configuration scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Per-user configuration directory
    User,
    /// Directory inside the project root
    Project,
    /// Per-project section stored inside the user configuration
    Local,
}

impl Scope {
    /// Lowercase name as accepted on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Project => "project",
            Self::Local => "local",
        }
    }

    /// Whether the scope needs a project root to resolve paths.
    #[must_use]
    pub const fn needs_project(self) -> bool {
        matches!(self, Self::Project | Self::Local)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = AixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "user" | "global" => Ok(Self::User),
            "project" => Ok(Self::Project),
            "local" => Ok(Self::Local),
            _ => Err(AixError::InvalidScope {
                scope: s.to_string(),
            }),
        }
    }
}

/// Scope as requested by a caller, before the platform picks its preference.
///
/// `Default` means "whatever the platform prefers"; see
/// [`Platform::default_scope`](crate::platform::Platform::default_scope).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScopeArg {
    /// Let the platform decide
    #[default]
    Default,
    /// A specific scope
    Explicit(Scope),
}

impl ScopeArg {
    /// Resolve against a platform's preferred scope.
    #[must_use]
    pub const fn resolve(self, preferred: Scope) -> Scope {
        match self {
            Self::Default => preferred,
            Self::Explicit(scope) => scope,
        }
    }
}

impl From<Option<Scope>> for ScopeArg {
    fn from(value: Option<Scope>) -> Self {
        value.map_or(Self::Default, Self::Explicit)
    }
}
