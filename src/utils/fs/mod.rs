//! File system helpers.
//!
//! - [`atomic`]: temp-file-and-rename writers for text and JSON documents
//! - [`dirs`]: directory creation and recursive copies

pub mod atomic;
pub mod dirs;

pub use atomic::{atomic_write, atomic_write_json};
pub use dirs::{copy_dir, copy_dir_filtered, ensure_dir};
