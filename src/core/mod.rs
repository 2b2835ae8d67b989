//! Core types shared across aix: the error taxonomy and configuration scopes.

pub mod error;
pub mod scope;

pub use error::{AixError, ErrorContext, is_not_found, user_friendly_error};
pub use scope::{Scope, ScopeArg};
