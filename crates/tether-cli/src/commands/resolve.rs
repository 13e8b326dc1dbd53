//! Handler for `tether resolve`.

use miette::Result;
use serde_json::{json, Value};

use tether_core::config::GlobalConfig;
use tether_resolver::environment::Environment;
use tether_resolver::graph::DependencyGraph;
use tether_resolver::resolver::{try_resolve_dependencies, ResolutionResult};
use tether_util::errors::TetherError;
use tether_util::progress;

use crate::cli::Format;

pub fn exec(format: Format, tree: bool, depth: Option<usize>, why: Option<&str>) -> Result<()> {
    let config = GlobalConfig::load()?;
    let project = super::current_project(&config)?;
    let env = Environment::load(Some(&project.dir), &config)?;

    progress::status("Resolving", &project.descriptor.name);
    let result = try_resolve_dependencies(&project.descriptor, &env.resolution_order());
    let graph = DependencyGraph::from_resolution(&project.descriptor.name, &result);

    if let Some(target) = why {
        match graph.find_path(target) {
            Some(path) => {
                println!("Path to {target}:");
                for (i, node) in path.iter().enumerate() {
                    let indent = "  ".repeat(i);
                    println!("{indent}{node}");
                }
            }
            None => println!("Package '{target}' not found in the resolution."),
        }
    } else if tree {
        print!("{}", graph.print_tree(depth));
    } else {
        match format {
            Format::Text => print_text(&result),
            Format::Json => {
                let rendered = serde_json::to_string_pretty(&to_json(&project.descriptor.name, &result))
                    .map_err(|e| TetherError::Generic {
                        message: format!("Failed to render JSON: {e}"),
                    })?;
                println!("{rendered}");
            }
        }
    }

    if result.success {
        progress::status("Resolved", &format!("{} packages", result.entries.len()));
        Ok(())
    } else {
        Err(TetherError::Resolution {
            message: failure_summary(&result),
        }
        .into())
    }
}

fn print_text(result: &ResolutionResult) {
    for entry in &result.entries {
        match &entry.package {
            Some(package) => println!("{package} ({})", package.source),
            None => println!("{} (not found)", entry.requirement),
        }
    }
}

fn to_json(project: &str, result: &ResolutionResult) -> Value {
    let entries: Vec<Value> = result
        .entries
        .iter()
        .map(|entry| {
            json!({
                "requirement": entry.requirement.to_string(),
                "name": entry.name(),
                "version": entry.package.as_ref().map(|p| p.version.to_string()),
                "source": entry.package.as_ref().map(|p| p.source.clone()),
            })
        })
        .collect();
    let conflicts: Vec<String> = result
        .conflicts()
        .conflicts
        .into_iter()
        .map(|c| c.name)
        .collect();
    json!({
        "project": project,
        "success": result.success,
        "entries": entries,
        "conflicts": conflicts,
    })
}

fn failure_summary(result: &ResolutionResult) -> String {
    let mut lines = Vec::new();
    let missing: Vec<String> = result
        .unresolved()
        .map(|e| format!("`{}`", e.requirement))
        .collect();
    if !missing.is_empty() {
        lines.push(format!("no package satisfies {}", missing.join(", ")));
    }
    let conflicts = result.conflicts();
    if !conflicts.is_empty() {
        lines.push(conflicts.to_string().trim_end().to_string());
    }
    lines.join("\n")
}
