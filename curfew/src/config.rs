//! Configuration document loading.
//!
//! A curfew configuration is a YAML document whose shape mirrors the
//! directory tree it governs. At every node four keys are reserved:
//!
//! - `mode`: a symbolic mode expression, or a `{dir, file}` mapping with one
//!   expression per target type;
//! - `group`: the group name entries under this node should be owned by;
//! - `exclude` / `include`: lists of glob patterns, relative to the node's
//!   path, that pin matching entries to the default (earliest) policy or lift
//!   such a pin back off.
//!
//! Keys that parse as timestamps declare additional dated policies that take
//! over once their instant has passed. Every other string key names a child
//! path segment whose value is that child's configuration fragment.
//!
//! Reserved keys are separated from child segments once, here, at load time;
//! the rest of the crate only ever sees the typed [`NodeConfig`] tree.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;

/// A mode declaration: one expression for everything, or split by type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ModeSpec {
    /// A single expression applied to directories and files alike.
    Uniform(String),
    /// Separate expressions for directories and files. Both are required.
    Split { dir: String, file: String },
}

impl ModeSpec {
    /// The expression to compile for a target of the given type.
    pub fn expr_for(&self, is_dir: bool) -> &str {
        match self {
            ModeSpec::Uniform(expr) => expr,
            ModeSpec::Split { dir, file } => {
                if is_dir {
                    dir
                } else {
                    file
                }
            }
        }
    }

    /// Every expression in this spec, for validation sweeps.
    pub fn exprs(&self) -> impl Iterator<Item = &str> {
        let (a, b) = match self {
            ModeSpec::Uniform(expr) => (expr.as_str(), None),
            ModeSpec::Split { dir, file } => (dir.as_str(), Some(file.as_str())),
        };
        std::iter::once(a).chain(b)
    }
}

/// The typed configuration fragment for one tree node.
#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    /// The node's default (epoch-dated) mode, if declared.
    pub mode: Option<ModeSpec>,
    /// Group name entries under this node should be owned by.
    pub group: Option<String>,
    /// Glob patterns, relative to the node's path, pinned to the default policy.
    pub exclude: Vec<String>,
    /// Glob patterns that override a matching exclude.
    pub include: Vec<String>,
    /// Dated policies: mode declarations that become eligible at an instant.
    pub deadlines: Vec<(DateTime<Local>, ModeSpec)>,
    /// Child path segments and their configuration fragments.
    pub children: BTreeMap<String, NodeConfig>,
}

/// Load a configuration document from a YAML file.
pub fn load(path: &Path) -> Result<NodeConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let value: serde_yaml::Value =
        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    let config = from_value(value, ".")?;
    debug!(path = %path.display(), "Loaded configuration document");
    Ok(config)
}

/// Convert a YAML value into a [`NodeConfig`] tree.
///
/// `key` is the node's path within the document, used in error messages.
pub fn from_value(value: serde_yaml::Value, key: &str) -> Result<NodeConfig, ConfigError> {
    let mapping = match value {
        // A null fragment is a node with nothing declared.
        serde_yaml::Value::Null => return Ok(NodeConfig::default()),
        serde_yaml::Value::Mapping(m) => m,
        _ => {
            return Err(ConfigError::NotAMapping {
                key: key.to_string(),
            })
        }
    };

    let mut config = NodeConfig::default();
    for (k, v) in mapping {
        let k = match k {
            serde_yaml::Value::String(s) => s,
            other => {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("non-string key {other:?}"),
                })
            }
        };

        match k.as_str() {
            "mode" => config.mode = Some(mode_spec(v, key)?),
            "group" => config.group = Some(string_value(v, "group")?),
            "exclude" => config.exclude = string_list(v, "exclude")?,
            "include" => config.include = string_list(v, "include")?,
            _ => {
                if let Some(timestamp) = parse_timestamp(&k) {
                    config.deadlines.push((timestamp, mode_spec(v, &k)?));
                } else {
                    let child_key = format!("{key}/{k}");
                    config.children.insert(k, from_value(v, &child_key)?);
                }
            }
        }
    }
    Ok(config)
}

fn mode_spec(value: serde_yaml::Value, key: &str) -> Result<ModeSpec, ConfigError> {
    serde_yaml::from_value(value).map_err(|e| ConfigError::InvalidMode {
        key: key.to_string(),
        message: e.to_string(),
    })
}

fn string_value(value: serde_yaml::Value, key: &str) -> Result<String, ConfigError> {
    match value {
        serde_yaml::Value::String(s) => Ok(s),
        other => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a string, got {other:?}"),
        }),
    }
}

fn string_list(value: serde_yaml::Value, key: &str) -> Result<Vec<String>, ConfigError> {
    let seq = match value {
        serde_yaml::Value::Sequence(seq) => seq,
        // A bare string is accepted as a one-element list.
        serde_yaml::Value::String(s) => return Ok(vec![s]),
        other => {
            return Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("expected a list of patterns, got {other:?}"),
            })
        }
    };
    seq.into_iter()
        .map(|v| string_value(v, key))
        .collect()
}

/// Parse a mapping key as a timestamp, if it is one.
///
/// Accepted forms: RFC 3339 (`2026-06-01T00:00:00+02:00`), `%Y-%m-%d %H:%M:%S`,
/// and a bare `%Y-%m-%d` date (midnight). Offset-less forms are local time.
pub fn parse_timestamp(key: &str) -> Option<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(key) {
        return Some(dt.with_timezone(&Local));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(key, "%Y-%m-%d %H:%M:%S") {
        return Local.from_local_datetime(&naive).earliest();
    }
    if let Ok(date) = NaiveDate::parse_from_str(key, "%Y-%m-%d") {
        let naive = date.and_hms_opt(0, 0, 0)?;
        return Local.from_local_datetime(&naive).earliest();
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> NodeConfig {
        from_value(serde_yaml::from_str(yaml).unwrap(), ".").unwrap()
    }

    #[test]
    fn reserved_keys_are_not_children() {
        let config = parse(
            "mode: u=rwX,go=rX\n\
             group: students\n\
             exclude: ['*.bak']\n\
             include: ['keep.bak']\n\
             hw1:\n  mode: a=rX\n",
        );
        assert_eq!(config.mode, Some(ModeSpec::Uniform("u=rwX,go=rX".into())));
        assert_eq!(config.group.as_deref(), Some("students"));
        assert_eq!(config.exclude, vec!["*.bak"]);
        assert_eq!(config.include, vec!["keep.bak"]);
        assert_eq!(config.children.len(), 1);
        assert!(config.children.contains_key("hw1"));
    }

    #[test]
    fn timestamp_keys_become_deadlines() {
        let config = parse(
            "mode: a=rwX\n\
             2026-06-01 12:00:00: a=rX\n\
             2026-06-02: a=\n",
        );
        assert_eq!(config.deadlines.len(), 2);
        assert!(config.children.is_empty());
        let naive = NaiveDateTime::parse_from_str("2026-06-01 12:00:00", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        assert_eq!(
            config.deadlines[0].0,
            Local.from_local_datetime(&naive).earliest().unwrap()
        );
    }

    #[test]
    fn rfc3339_timestamp_keys() {
        let config = parse("2026-06-01T00:00:00+00:00: a=rX\n");
        assert_eq!(config.deadlines.len(), 1);
        assert_eq!(config.deadlines[0].1, ModeSpec::Uniform("a=rX".into()));
    }

    #[test]
    fn split_mode_mapping() {
        let config = parse("mode:\n  dir: u=rwx\n  file: u=rw\n");
        let spec = config.mode.unwrap();
        assert_eq!(spec.expr_for(true), "u=rwx");
        assert_eq!(spec.expr_for(false), "u=rw");
    }

    #[test]
    fn half_specified_mode_mapping_is_rejected() {
        let err = from_value(
            serde_yaml::from_str("mode:\n  dir: u=rwx\n").unwrap(),
            ".",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMode { .. }));
    }

    #[test]
    fn null_fragment_is_empty_config() {
        let config = parse("hw1:\n");
        let child = &config.children["hw1"];
        assert!(child.mode.is_none());
        assert!(child.children.is_empty());
    }

    #[test]
    fn scalar_fragment_is_rejected() {
        let err = from_value(serde_yaml::from_str("hw1: 42\n").unwrap(), ".").unwrap_err();
        assert!(matches!(err, ConfigError::NotAMapping { key } if key == "./hw1"));
    }

    #[test]
    fn bare_string_pattern_is_a_one_element_list() {
        let config = parse("exclude: '*.tmp'\n");
        assert_eq!(config.exclude, vec!["*.tmp"]);
    }

    #[test]
    fn non_timestamp_dashed_key_is_a_child() {
        let config = parse("2026-vacation-photos:\n  mode: a=rX\n");
        assert!(config.deadlines.is_empty());
        assert!(config.children.contains_key("2026-vacation-photos"));
    }
}
