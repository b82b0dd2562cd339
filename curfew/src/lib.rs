//! Curfew library: time-windowed file-permission policy enforcement.
//!
//! Curfew walks a real directory tree in lock-step with a YAML configuration
//! tree that mirrors its shape, resolves the permission policy in effect for
//! every entry (choosing among time-windowed alternatives, honoring inherited
//! exclude/include globs and an inherited group), and applies mode and group
//! changes idempotently. It exists to lock down (or open up) whole trees on a
//! deadline, e.g. student submission directories that must stop accepting
//! writes at a due date, without hand-rolled chmod/chown sweeps.
//!
//! # Modules
//!
//! - [`config`]: YAML configuration loading into a typed node tree.
//! - [`policy`]: time-windowed policies and their eligibility rules.
//! - [`tree`]: the policy-resolution tree that mirrors the filesystem and
//!   applies resolved modes and groups, children first.
//! - [`fsops`]: stat/chmod/chown, group lookup, and glob primitives.
//! - [`error`]: domain error taxonomy; every error is fatal to the run.
//! - [`cmd`]: the `apply`, `check`, and `explain` subcommands.
//!
//! The symbolic mode expressions themselves are compiled by the
//! [`symbolic_mode`] crate.
//!
//! # Example
//!
//! ```no_run
//! use curfew::{config, tree::PathNode};
//! use std::path::PathBuf;
//!
//! let root = PathBuf::from("/srv/handins");
//! let cfg = config::load(&root.join("_curfew.yml")).unwrap();
//! let tree = PathNode::root(cfg, root).unwrap();
//! let changes = tree.apply(chrono::Local::now(), false).unwrap();
//! println!("{} change(s)", changes.len());
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod errors;
pub mod fsops;
pub mod policy;
pub mod style;
pub mod tracing_init;
pub mod tree;
