//! Test utilities for aix
//!
//! Helpers for isolated test environments: a temporary home with platform
//! directories, a project root, artifact fixtures and a git wrapper for
//! building repositories.
//!
//! # Example
//!
//! ```rust,no_run
//! use aix::test_utils::{TestEnvironment, fixtures};
//!
//! let env = TestEnvironment::new().unwrap();
//! env.write("review.md", fixtures::REVIEW_COMMAND).unwrap();
//! let claude = env.platform(aix::platform::PlatformId::Claude, None);
//! assert!(claude.is_available());
//! ```

pub mod environment;
pub mod fixtures;
pub mod git_helper;

pub use environment::TestEnvironment;
pub use git_helper::TestGit;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, else `RUST_LOG`; with neither, logging stays off.
/// Only the first call has an effect.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
