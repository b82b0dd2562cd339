//! `curfew apply`: resolve the policy tree and enforce it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::config;
use crate::style;
use crate::tree::{Change, PathNode};

pub fn run(
    root: Option<PathBuf>,
    config_file: Option<PathBuf>,
    dry_run: bool,
    now: Option<String>,
) -> Result<()> {
    let root = super::resolve_root(root)?;
    let config_path = super::config_path(&root, config_file);
    let config = config::load(&config_path)?;
    let now = super::frozen_now(now.as_deref())?;

    info!(
        root = %root.display(),
        config = %config_path.display(),
        %now,
        dry_run,
        "Applying policy tree"
    );

    let tree = PathNode::root(config, root.clone())
        .with_context(|| format!("failed to build the policy tree for {}", root.display()))?;
    let changes = tree
        .apply(now, dry_run)
        .with_context(|| format!("failed to enforce the policy tree at {}", root.display()))?;

    let verb = if dry_run {
        style::yellow("would set")
    } else {
        style::green("set")
    };
    for change in &changes {
        match change {
            Change::Mode { path, from, to } => println!(
                "{verb} mode  {}  {}",
                style::cyan(&format!("{from:04o} -> {to:04o}")),
                path.display()
            ),
            Change::Group { path, name, from, to } => println!(
                "{verb} group {}  {}",
                style::cyan(&format!("{from} -> {name} ({to})")),
                path.display()
            ),
        }
    }

    if changes.is_empty() {
        println!("{}", style::dim("nothing to do: tree already conforms"));
    } else {
        let suffix = if dry_run { " (dry run)" } else { "" };
        println!(
            "\n{} change(s){suffix}",
            style::bold(&changes.len().to_string())
        );
    }
    Ok(())
}
