//! Domain error types for policy application.
//!
//! Every error here is fatal to the run: curfew fails fast and performs no
//! rollback of nodes it has already updated, so the operator sees exactly
//! where enforcement stopped.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while resolving or applying a policy tree.
#[derive(Error, Debug)]
pub enum ApplyError {
    /// A configured group name does not resolve to a group id.
    #[error("unknown group '{0}'")]
    UnknownGroup(String),

    /// A path could not be stat'ed, listed, or modified.
    #[error("path unavailable: {path}")]
    PathUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A symbolic mode expression failed to compile.
    #[error(transparent)]
    Mode(#[from] symbolic_mode::ModeError),

    /// An `exclude` or `include` entry is not a valid glob pattern.
    #[error("invalid glob pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        source: glob::PatternError,
    },
}

impl ApplyError {
    /// Return a help message suggesting how to fix this error, if applicable.
    pub fn help(&self) -> Option<String> {
        match self {
            ApplyError::UnknownGroup(name) => Some(format!(
                "'{name}' must exist in the group database; check /etc/group or the `group` keys in the configuration"
            )),
            ApplyError::PathUnavailable { .. } => Some(
                "a declared child or glob target must exist on disk when the tree is applied".into(),
            ),
            ApplyError::Mode(e) => e.help(),
            ApplyError::InvalidGlob { .. } => None,
        }
    }
}

/// Errors raised while loading the configuration document.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration from {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A node's value must be a mapping (or null for an empty fragment).
    #[error("configuration node '{key}' is not a mapping")]
    NotAMapping { key: String },

    /// A `mode` value was neither a string nor a `{dir, file}` mapping.
    #[error("invalid mode under '{key}': {message}")]
    InvalidMode { key: String, message: String },

    /// A reserved key held a value of the wrong shape.
    #[error("invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

impl ConfigError {
    /// Return a help message suggesting how to fix this error, if applicable.
    pub fn help(&self) -> Option<String> {
        match self {
            ConfigError::InvalidMode { .. } => Some(
                "a mode is either a single expression string or a mapping with both `dir` and `file` expressions".into(),
            ),
            ConfigError::InvalidValue { key, .. } if key == "exclude" || key == "include" => {
                Some(format!("`{key}` takes a list of glob patterns relative to the node's path"))
            }
            _ => None,
        }
    }
}
