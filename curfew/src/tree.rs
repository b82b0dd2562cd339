//! The policy-resolution tree.
//!
//! A [`PathNode`] mirrors one real (or declared) filesystem path. Nodes are
//! built recursively from the configuration tree: each node derives its
//! effective group, exclude/include path sets, and policy list from its own
//! configuration fragment plus the parent's already-derived values, in that
//! dependency order, at construction time. Derivation is monotonic down the
//! tree: a child only ever adds to what it inherits.
//!
//! [`PathNode::apply`] walks the tree depth-first, children before self, so
//! that permissions are tightened (or relaxed) leaf-to-root and the traversal
//! is never blocked by a directory it just locked down. The root node itself
//! is never chmodded or chowned.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::config::NodeConfig;
use crate::error::ApplyError;
use crate::fsops::{self, EntryStat};
use crate::policy::Policy;

/// One node of the policy tree, bound to an absolute filesystem path.
#[derive(Debug)]
pub struct PathNode {
    full_path: PathBuf,
    is_root: bool,
    group: String,
    excludes: BTreeSet<PathBuf>,
    includes: BTreeSet<PathBuf>,
    policies: Vec<Policy>,
    children: Vec<PathNode>,
}

/// A mode or group write performed (or, under dry-run, withheld) by `apply`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Mode {
        path: PathBuf,
        from: u32,
        to: u32,
    },
    Group {
        path: PathBuf,
        name: String,
        from: u32,
        to: u32,
    },
}

impl PathNode {
    /// Build the tree for `full_path` from the configuration root.
    pub fn root(config: NodeConfig, full_path: PathBuf) -> Result<Self, ApplyError> {
        Self::build(config, full_path, None)
    }

    fn build(
        config: NodeConfig,
        full_path: PathBuf,
        parent: Option<&PathNode>,
    ) -> Result<Self, ApplyError> {
        let NodeConfig {
            mode,
            group,
            exclude,
            include,
            deadlines,
            children,
        } = config;

        // Derivation order: group, then excludes/includes, then policies.
        // Each value is the parent's plus whatever this fragment adds.
        let group = group.unwrap_or_else(|| parent.map(|p| p.group.clone()).unwrap_or_default());

        let mut excludes = parent.map(|p| p.excludes.clone()).unwrap_or_default();
        for pattern in &exclude {
            excludes.extend(fsops::expand_glob(&full_path, pattern)?);
        }
        let mut includes = parent.map(|p| p.includes.clone()).unwrap_or_default();
        for pattern in &include {
            includes.extend(fsops::expand_glob(&full_path, pattern)?);
        }

        // The own-mode policy goes first so that a tie on the minimum
        // timestamp resolves to this node's default, not an inherited one.
        let mut policies = Vec::new();
        if let Some(spec) = mode {
            policies.push(Policy::epoch(spec));
        }
        if let Some(p) = parent {
            policies.extend(p.policies.iter().cloned());
        }
        policies.extend(
            deadlines
                .into_iter()
                .map(|(timestamp, spec)| Policy::new(timestamp, spec)),
        );

        let mut node = PathNode {
            full_path,
            is_root: parent.is_none(),
            group,
            excludes,
            includes,
            policies,
            children: Vec::new(),
        };

        // Declared children first, then one synthesized child (with an empty
        // fragment) per real directory entry the configuration doesn't name.
        // Together they cover every on-disk entry exactly once.
        let mut built = Vec::new();
        for (name, fragment) in children {
            built.push(Self::build(fragment, node.full_path.join(&name), Some(&node))?);
        }
        if node.full_path.is_dir() {
            let discovered: Vec<String> = {
                let declared: BTreeSet<&OsStr> = built
                    .iter()
                    .filter_map(|c| c.full_path.file_name())
                    .collect();
                fsops::list_dir(&node.full_path)?
                    .into_iter()
                    .filter(|name| !declared.contains(OsStr::new(name.as_str())))
                    .collect()
            };
            for name in discovered {
                built.push(Self::build(
                    NodeConfig::default(),
                    node.full_path.join(name),
                    Some(&node),
                )?);
            }
        }

        node.children = built;
        debug!(
            path = %node.full_path.display(),
            policies = node.policies.len(),
            children = node.children.len(),
            "Built policy node"
        );
        Ok(node)
    }

    /// Whether this node is pinned to the default policy by an exclude glob.
    /// A matching include always lifts the pin.
    pub fn excluded(&self) -> bool {
        self.excludes.contains(&self.full_path) && !self.includes.contains(&self.full_path)
    }

    /// The policy that governs this node at the frozen instant `now`.
    ///
    /// Two-tier resolution: the latest-dated policy governs when it is
    /// eligible and the node is not excluded; otherwise the earliest-dated
    /// (default) policy governs. Eligibility is only ever checked on the
    /// latest policy. `None` when the node has no policies at all.
    pub fn governing(&self, now: DateTime<Local>) -> Option<&Policy> {
        let latest = self.policies.iter().max()?;
        if self.excluded() || !latest.is_eligible(now) {
            self.policies.iter().min()
        } else {
            Some(latest)
        }
    }

    /// The absolute mode this node should have, given its current stat.
    pub fn resolved_mode(
        &self,
        st: &EntryStat,
        now: DateTime<Local>,
    ) -> Result<Option<u32>, ApplyError> {
        match self.governing(now) {
            Some(policy) => Ok(Some(symbolic_mode::compile(
                policy.expr_for(st.is_dir),
                st.mode,
                st.is_dir,
            )?)),
            None => Ok(None),
        }
    }

    /// Enforce the tree: resolve and apply mode and group for every node,
    /// children before self. Returns the changes that were written (or, with
    /// `dry_run`, would have been).
    pub fn apply(&self, now: DateTime<Local>, dry_run: bool) -> Result<Vec<Change>, ApplyError> {
        let mut changes = Vec::new();
        self.apply_inner(now, dry_run, &mut changes)?;
        Ok(changes)
    }

    fn apply_inner(
        &self,
        now: DateTime<Local>,
        dry_run: bool,
        changes: &mut Vec<Change>,
    ) -> Result<(), ApplyError> {
        for child in &self.children {
            child.apply_inner(now, dry_run, changes)?;
        }
        // The root is a container for the policy, never a target of it.
        if self.is_root {
            return Ok(());
        }

        let st = fsops::stat(&self.full_path)?;

        if let Some(target) = self.resolved_mode(&st, now)? {
            if target != st.mode {
                info!(
                    path = %self.full_path.display(),
                    from = format_args!("{:04o}", st.mode),
                    to = format_args!("{:04o}", target),
                    dry_run,
                    "mode change"
                );
                if !dry_run {
                    fsops::chmod(&self.full_path, target)?;
                }
                changes.push(Change::Mode {
                    path: self.full_path.clone(),
                    from: st.mode,
                    to: target,
                });
            }
        }

        if !self.group.is_empty() {
            let gid = fsops::group_id(&self.group)?;
            if gid != st.gid {
                info!(
                    path = %self.full_path.display(),
                    group = %self.group,
                    from = st.gid,
                    to = gid,
                    dry_run,
                    "group change"
                );
                if !dry_run {
                    fsops::chown_group(&self.full_path, gid)?;
                }
                changes.push(Change::Group {
                    path: self.full_path.clone(),
                    name: self.group.clone(),
                    from: st.gid,
                    to: gid,
                });
            }
        }
        Ok(())
    }

    /// Locate the node for an absolute path, if the tree covers it.
    pub fn find(&self, path: &Path) -> Option<&PathNode> {
        if self.full_path == path {
            return Some(self);
        }
        if !path.starts_with(&self.full_path) {
            return None;
        }
        self.children.iter().find_map(|c| c.find(path))
    }

    pub fn full_path(&self) -> &Path {
        &self.full_path
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn excludes(&self) -> &BTreeSet<PathBuf> {
        &self.excludes
    }

    pub fn includes(&self) -> &BTreeSet<PathBuf> {
        &self.includes
    }

    pub fn policies(&self) -> &[Policy] {
        &self.policies
    }

    pub fn children(&self) -> &[PathNode] {
        &self.children
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
