// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI logic for the PaperModels tool.
//!
//! Reads an element set from JSON, runs one command against it and writes
//! results to a file or stdout. Diagnostics go through `tracing` to stderr.

pub mod args;
pub mod config;

pub use args::{Args, Command};
pub use config::Config;

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use papermodels_elements::{
    ConnectivityGraph, DiscoveryConfig, ElementSet, RelationshipDiscovery,
};

/// Which relationship lists a discovery run recomputes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Both,
    IntersectionsOnly,
    CorrespondentsOnly,
}

/// How a command finished when it did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Clean,
    /// `check` found relationship issues.
    IssuesFound,
}

/// Runs the command selected on the command line.
pub fn run(args: &Args) -> Result<Outcome> {
    match &args.command {
        Command::Discover {
            input,
            output,
            config,
            intersections_only,
            correspondents_only,
        } => {
            let config = match config {
                Some(path) => DiscoveryConfig::from_file(path)
                    .with_context(|| format!("loading discovery config {}", path.display()))?,
                None => DiscoveryConfig::default(),
            };
            let pass = match (*intersections_only, *correspondents_only) {
                (true, _) => Pass::IntersectionsOnly,
                (_, true) => Pass::CorrespondentsOnly,
                _ => Pass::Both,
            };

            let set = load_set(input)?;
            let found = discover(&set, config, pass)?;
            let json = found.to_json()?;

            match output {
                Some(path) => {
                    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
                    tracing::info!(
                        output = %path.display(),
                        elements = found.len(),
                        "Element set written"
                    );
                }
                None => println!("{json}"),
            }
            Ok(Outcome::Clean)
        }

        Command::Check { input } => {
            let set = load_set(input)?;
            let (report, clean) = check_report(&set);
            print!("{report}");
            Ok(if clean { Outcome::Clean } else { Outcome::IssuesFound })
        }

        Command::Graph { input } => {
            let set = load_set(input)?;
            print!("{}", graph_report(&ConnectivityGraph::from_elements(&set)));
            Ok(Outcome::Clean)
        }
    }
}

/// Reads an element set from a JSON file.
pub fn load_set(path: &Path) -> Result<ElementSet> {
    let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let set = ElementSet::from_json(&json).with_context(|| format!("parsing {}", path.display()))?;
    tracing::debug!(
        input = %path.display(),
        elements = set.len(),
        pages = set.page_count(),
        "Element set loaded"
    );
    Ok(set)
}

/// Runs one discovery pass over `set`.
pub fn discover(set: &ElementSet, config: DiscoveryConfig, pass: Pass) -> Result<ElementSet> {
    let discovery = RelationshipDiscovery::new(config);
    let found = match pass {
        Pass::Both => discovery.discover(set),
        Pass::IntersectionsOnly => discovery.discover_intersections(set),
        Pass::CorrespondentsOnly => discovery.discover_correspondents(set),
    }
    .context("relationship discovery failed")?;
    Ok(found)
}

/// Renders the consistency report for `set`. Returns the text and whether the
/// set is free of issues. Ambiguous correspondence is reported but is not an
/// issue.
pub fn check_report(set: &ElementSet) -> (String, bool) {
    let issues = set.validate_relationships();
    let ambiguous = set.ambiguous_correspondents();

    let mut out = String::new();
    for issue in &issues {
        let _ = writeln!(out, "error: {issue}");
    }
    for tag in &ambiguous {
        let _ = writeln!(out, "note: {tag} has several correspondents on one page");
    }
    let _ = writeln!(
        out,
        "{} elements, {} issues, {} ambiguous",
        set.len(),
        issues.len(),
        ambiguous.len()
    );
    (out, issues.is_empty())
}

/// Renders connected groups, multi-page stacks and unconnected elements.
pub fn graph_report(graph: &ConnectivityGraph) -> String {
    let mut out = String::new();
    let tags = |nodes: &[usize]| nodes.iter().map(|&n| graph.tag(n)).collect::<Vec<_>>();

    let components = graph.connected_components();
    let _ = writeln!(out, "groups: {}", components.len());
    for (i, component) in components.iter().enumerate().filter(|(_, c)| c.len() > 1) {
        let _ = writeln!(out, "  group {i}: {}", tags(component.as_slice()).join(", "));
    }

    let mut seen = vec![false; graph.node_count()];
    let _ = writeln!(out, "stacks:");
    for node in 0..graph.node_count() {
        if seen[node] {
            continue;
        }
        let stack = graph.vertical_stack(graph.tag(node));
        for &n in &stack {
            seen[n] = true;
        }
        if stack.len() > 1 {
            let _ = writeln!(out, "  {}", tags(&stack[..]).join(" -> "));
        }
    }

    let isolated = graph.isolated_nodes();
    if !isolated.is_empty() {
        let _ = writeln!(out, "unconnected: {}", tags(&isolated[..]).join(", "));
    }
    out
}
