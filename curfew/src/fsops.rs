//! Filesystem and glob primitives.
//!
//! Thin wrappers over stat/chmod/chown, directory listing, group lookup, and
//! glob expansion. All failures surface as [`ApplyError`] and abort the run;
//! nothing here retries or rolls back.

use std::fs;
use std::os::unix::fs::{MetadataExt, PermissionsExt};
use std::path::{Path, PathBuf};

use nix::unistd::{Gid, Group};
use symbolic_mode::MODE_BITS;
use tracing::debug;

use crate::error::ApplyError;

/// The slice of an entry's metadata that policy resolution needs.
#[derive(Debug, Clone, Copy)]
pub struct EntryStat {
    /// Permission bits, 0–0o7777.
    pub mode: u32,
    /// Numeric group id of the owning group.
    pub gid: u32,
    pub is_dir: bool,
}

/// Stat an entry, following symlinks.
pub fn stat(path: &Path) -> Result<EntryStat, ApplyError> {
    let meta = fs::metadata(path).map_err(|source| ApplyError::PathUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(EntryStat {
        mode: meta.permissions().mode() & MODE_BITS,
        gid: meta.gid(),
        is_dir: meta.is_dir(),
    })
}

/// List a directory's entry names, sorted for deterministic traversal.
pub fn list_dir(path: &Path) -> Result<Vec<String>, ApplyError> {
    let unavailable = |source| ApplyError::PathUnavailable {
        path: path.to_path_buf(),
        source,
    };
    let mut names = Vec::new();
    for entry in fs::read_dir(path).map_err(unavailable)? {
        let entry = entry.map_err(unavailable)?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

/// Set an entry's permission bits.
pub fn chmod(path: &Path, mode: u32) -> Result<(), ApplyError> {
    debug!(path = %path.display(), mode = format_args!("{mode:04o}"), "chmod");
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|source| {
        ApplyError::PathUnavailable {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Change an entry's owning group, leaving the owner untouched.
pub fn chown_group(path: &Path, gid: u32) -> Result<(), ApplyError> {
    debug!(path = %path.display(), gid, "chown");
    nix::unistd::chown(path, None, Some(Gid::from_raw(gid))).map_err(|errno| {
        ApplyError::PathUnavailable {
            path: path.to_path_buf(),
            source: std::io::Error::from_raw_os_error(errno as i32),
        }
    })
}

/// Resolve a group name to its numeric id.
pub fn group_id(name: &str) -> Result<u32, ApplyError> {
    match Group::from_name(name) {
        Ok(Some(group)) => Ok(group.gid.as_raw()),
        Ok(None) | Err(_) => Err(ApplyError::UnknownGroup(name.to_string())),
    }
}

/// Expand a glob pattern rooted at `base` into a set of absolute paths.
///
/// A pattern that names an existing directory expands to that directory plus
/// everything beneath it, recursively; anything else goes through ordinary
/// glob matching.
pub fn expand_glob(base: &Path, pattern: &str) -> Result<Vec<PathBuf>, ApplyError> {
    let full = base.join(pattern);
    if full.is_dir() {
        let mut paths = Vec::new();
        collect_tree(&full, &mut paths)?;
        return Ok(paths);
    }

    let full_pattern = full.to_string_lossy();
    let matches = glob::glob(&full_pattern).map_err(|source| ApplyError::InvalidGlob {
        pattern: pattern.to_string(),
        source,
    })?;
    // Unreadable intermediate directories are fatal, like any other fs error.
    matches
        .map(|entry| {
            entry.map_err(|e| ApplyError::PathUnavailable {
                path: e.path().to_path_buf(),
                source: e.into_error(),
            })
        })
        .collect()
}

/// Push `dir` and every entry beneath it, depth-first.
fn collect_tree(dir: &Path, paths: &mut Vec<PathBuf>) -> Result<(), ApplyError> {
    paths.push(dir.to_path_buf());
    for name in list_dir(dir)? {
        let child = dir.join(name);
        if child.is_dir() {
            collect_tree(&child, paths)?;
        } else {
            paths.push(child);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
