//! CLI subcommand implementations.

pub mod apply;
pub mod check;
pub mod explain;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

/// Default configuration file name, looked up inside the tree root.
pub const CONFIG_FILE: &str = "_curfew.yml";

/// Resolve the tree root argument to an absolute path.
fn resolve_root(root: Option<PathBuf>) -> Result<PathBuf> {
    let root = root.unwrap_or_else(|| PathBuf::from("."));
    root.canonicalize()
        .with_context(|| format!("cannot resolve tree root {}", root.display()))
}

/// The configuration file to load: explicit flag, or `<root>/_curfew.yml`.
fn config_path(root: &Path, config: Option<PathBuf>) -> PathBuf {
    config.unwrap_or_else(|| root.join(CONFIG_FILE))
}

/// The frozen traversal instant: `--now` if given, else the wall clock,
/// captured exactly once so every node agrees on the same instant.
fn frozen_now(now: Option<&str>) -> Result<DateTime<Local>> {
    match now {
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Local))
            .with_context(|| format!("--now must be an RFC 3339 instant (got '{s}')")),
        None => Ok(Local::now()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frozen_now_parses_rfc3339() {
        let dt = frozen_now(Some("2026-06-01T00:00:00+00:00")).unwrap();
        assert_eq!(dt.timestamp(), 1_780_272_000);
    }

    #[test]
    fn frozen_now_rejects_garbage() {
        assert!(frozen_now(Some("tomorrow")).is_err());
    }

    #[test]
    fn config_path_defaults_into_the_root() {
        let path = config_path(Path::new("/srv/handins"), None);
        assert_eq!(path, Path::new("/srv/handins/_curfew.yml"));

        let explicit = config_path(Path::new("/srv/handins"), Some("/etc/curfew.yml".into()));
        assert_eq!(explicit, Path::new("/etc/curfew.yml"));
    }
}
