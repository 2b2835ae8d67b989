//! Cross-platform utilities: atomic file writes, directory copies, host
//! environment lookups, status output and progress spinners.

pub mod fs;
pub mod output;
pub mod platform;
pub mod progress;

pub use fs::{atomic_write, atomic_write_json, copy_dir, ensure_dir};
pub use output::{print_hint, print_success, print_warning};
pub use platform::{find_editor, get_git_command, get_home_dir, is_windows, resolve_path};
pub use progress::Spinner;
