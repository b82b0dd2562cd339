//! TTY-aware color and styling helpers for human-friendly CLI output.
//!
//! Built on the [`console`] crate which automatically detects whether
//! stdout/stderr is a terminal and respects the `NO_COLOR` environment
//! variable (<https://no-color.org/>).

use console::Style;

/// A `Style` targeting **stdout** (auto-detects TTY + NO_COLOR).
fn out() -> Style {
    Style::new()
}

/// A `Style` targeting **stderr** (auto-detects TTY + NO_COLOR).
fn err() -> Style {
    Style::new().for_stderr()
}

// ---------------------------------------------------------------------------
// Semantic styles (stdout)
// ---------------------------------------------------------------------------

/// Bold text (for headers/titles).
pub fn bold(text: &str) -> String {
    out().bold().apply_to(text).to_string()
}

/// Dim / muted text (for secondary information).
pub fn dim(text: &str) -> String {
    out().dim().apply_to(text).to_string()
}

/// Green – an applied change.
pub fn green(text: &str) -> String {
    out().green().apply_to(text).to_string()
}

/// Yellow – a pending (dry-run) change.
pub fn yellow(text: &str) -> String {
    out().yellow().apply_to(text).to_string()
}

/// Cyan – a path or mode value worth highlighting.
pub fn cyan(text: &str) -> String {
    out().cyan().apply_to(text).to_string()
}

// ---------------------------------------------------------------------------
// Semantic styles (stderr)
// ---------------------------------------------------------------------------

/// Bold red on stderr – error labels.
pub fn err_red_bold(text: &str) -> String {
    err().red().bold().apply_to(text).to_string()
}

/// Dim on stderr – causal chains.
pub fn err_dim(text: &str) -> String {
    err().dim().apply_to(text).to_string()
}

/// Bold cyan on stderr – hint labels.
pub fn err_cyan_bold(text: &str) -> String {
    err().cyan().bold().apply_to(text).to_string()
}
