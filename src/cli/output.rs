//! Shared CLI output helpers for consistent operator-facing text.

use std::fmt::Display;

/// Print a successful status line.
pub fn ok(message: impl Display) {
    println!("✓ {message}");
}

/// Print a warning status line.
pub fn warn(message: impl Display) {
    println!("⚠ {message}");
}

/// Print a single-line note.
pub fn note(message: impl Display) {
    println!("{message}");
}

/// Print an indented table.
pub fn table(rendered: &str) {
    for line in rendered.lines() {
        println!("  {line}");
    }
}
