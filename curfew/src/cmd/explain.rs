//! `curfew explain`: show how a path resolves, without applying anything.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config;
use crate::fsops;
use crate::style;
use crate::tree::PathNode;

pub fn run(
    path: PathBuf,
    root: Option<PathBuf>,
    config_file: Option<PathBuf>,
    now: Option<String>,
) -> Result<()> {
    let root = super::resolve_root(root)?;
    let config_path = super::config_path(&root, config_file);
    let config = config::load(&config_path)?;
    let now = super::frozen_now(now.as_deref())?;

    let path = path
        .canonicalize()
        .with_context(|| format!("cannot resolve {}", path.display()))?;

    let tree = PathNode::root(config, root.clone())
        .with_context(|| format!("failed to build the policy tree for {}", root.display()))?;
    let node = tree.find(&path).with_context(|| {
        format!(
            "{} is not covered by the tree rooted at {}",
            path.display(),
            root.display()
        )
    })?;

    println!("{} {}", style::bold("path:"), path.display());
    println!(
        "{} {}",
        style::bold("group:"),
        if node.group().is_empty() {
            "(none)".to_string()
        } else {
            node.group().to_string()
        }
    );
    println!("{} {}", style::bold("excluded:"), node.excluded());

    let governing = node.governing(now);
    println!("{}", style::bold("policies:"));
    for policy in node.policies() {
        let marker = match governing {
            Some(g) if std::ptr::eq(g, policy) => style::green("*"),
            _ => " ".to_string(),
        };
        println!(
            "  {marker} {}  dir={} file={}",
            policy.timestamp().to_rfc3339(),
            style::cyan(policy.expr_for(true)),
            style::cyan(policy.expr_for(false)),
        );
    }
    if node.policies().is_empty() {
        println!("  {}", style::dim("(none)"));
    }

    let st = fsops::stat(&path)?;
    match node.resolved_mode(&st, now)? {
        Some(target) if target != st.mode => println!(
            "{} {:04o} -> {:04o}",
            style::bold("mode:"),
            st.mode,
            target
        ),
        Some(target) => println!(
            "{} {:04o} {}",
            style::bold("mode:"),
            target,
            style::dim("(already conforms)")
        ),
        None => println!("{} {}", style::bold("mode:"), style::dim("(no policy)")),
    }
    Ok(())
}
