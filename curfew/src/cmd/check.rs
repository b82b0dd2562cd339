//! `curfew check`: validate a configuration without applying it.
//!
//! Compiles every mode expression (against representative file and directory
//! modes), resolves every configured group name, and verifies every glob
//! pattern parses. Fails on the first problem, with the offending node's
//! path within the document.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::{self, ModeSpec, NodeConfig};
use crate::fsops;
use crate::style;

#[derive(Debug, Default)]
struct Totals {
    nodes: usize,
    policies: usize,
}

pub fn run(root: Option<PathBuf>, config_file: Option<PathBuf>) -> Result<()> {
    let root = super::resolve_root(root)?;
    let config_path = super::config_path(&root, config_file);
    let config = config::load(&config_path)?;

    let mut totals = Totals::default();
    check_node(&config, ".", &mut totals)?;

    info!(
        config = %config_path.display(),
        nodes = totals.nodes,
        policies = totals.policies,
        "Configuration validated"
    );
    println!(
        "{} {} ({} nodes, {} policies)",
        style::green("configuration OK:"),
        config_path.display(),
        totals.nodes,
        totals.policies
    );
    Ok(())
}

fn check_node(config: &NodeConfig, key: &str, totals: &mut Totals) -> Result<()> {
    totals.nodes += 1;

    if let Some(spec) = &config.mode {
        check_spec(spec, key)?;
        totals.policies += 1;
    }
    for (timestamp, spec) in &config.deadlines {
        check_spec(spec, key)
            .with_context(|| format!("in the policy dated {timestamp} under '{key}'"))?;
        totals.policies += 1;
    }

    if let Some(group) = &config.group {
        fsops::group_id(group).with_context(|| format!("group declared under '{key}'"))?;
    }

    for pattern in config.exclude.iter().chain(&config.include) {
        glob::Pattern::new(pattern)
            .map_err(|e| anyhow::anyhow!("invalid glob pattern '{pattern}' under '{key}': {e}"))?;
    }

    for (name, child) in &config.children {
        check_node(child, &format!("{key}/{name}"), totals)?;
    }
    Ok(())
}

/// Compile each expression against representative file and directory modes.
fn check_spec(spec: &ModeSpec, key: &str) -> Result<()> {
    for expr in spec.exprs() {
        symbolic_mode::compile(expr, 0o644, false)
            .with_context(|| format!("invalid mode expression '{expr}' under '{key}'"))?;
        symbolic_mode::compile(expr, 0o755, true)
            .with_context(|| format!("invalid mode expression '{expr}' under '{key}'"))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
