//! Consistent user-facing status lines.

use colored::Colorize;

/// `✓ <msg>` on stdout.
pub fn print_success(msg: impl std::fmt::Display) {
    println!("{} {msg}", "✓".green());
}

/// `⚠ <msg>` on stderr.
pub fn print_warning(msg: impl std::fmt::Display) {
    eprintln!("{} {msg}", "⚠".yellow());
}

/// `ℹ <msg>` on stderr, for hints that are not problems.
pub fn print_hint(msg: impl std::fmt::Display) {
    eprintln!("{} {msg}", "ℹ".cyan());
}
