//! Error types for symbolic mode compilation.

use thiserror::Error;

/// Errors produced while compiling a symbolic mode expression.
///
/// Every variant is a malformed-expression case. There is no partial
/// application; a clause that fails to compile aborts the whole expression.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ModeError {
    /// A clause had no `+`, `-`, or `=` operator (e.g. `"urw"`).
    #[error("missing operator in mode clause '{clause}'")]
    MissingOperator { clause: String },

    /// The clause target contained a character outside `u`, `g`, `o`, `a`.
    #[error("invalid class symbol '{symbol}' in mode expression '{expr}'")]
    InvalidClass { symbol: char, expr: String },

    /// A permission character was not one of the recognized symbols.
    #[error("invalid permission symbol '{symbol}' in mode expression '{expr}'")]
    InvalidPermission { symbol: char, expr: String },

    /// An all-digit expression was not a valid octal mode.
    #[error("invalid octal mode '{expr}'")]
    InvalidOctal { expr: String },
}

impl ModeError {
    /// Return a help message suggesting how to fix this error, if applicable.
    pub fn help(&self) -> Option<String> {
        match self {
            ModeError::MissingOperator { clause } => Some(format!(
                "each clause needs an operator, e.g. 'u+{clause}' or 'u={clause}'"
            )),
            ModeError::InvalidClass { .. } => {
                Some("valid class symbols are: u (user), g (group), o (other), a (all)".into())
            }
            ModeError::InvalidPermission { .. } => Some(
                "valid permission symbols are: r, w, x, X, s, t, and u/g/o for class copies".into(),
            ),
            ModeError::InvalidOctal { .. } => {
                Some("octal modes use digits 0-7 only, e.g. '0755'".into())
            }
        }
    }
}
