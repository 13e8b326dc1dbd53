//! Command dispatch and handler modules.

mod resolve;
mod update;

use std::path::PathBuf;

use miette::Result;
use tether_core::config::GlobalConfig;
use tether_core::descriptor::Descriptor;
use tether_resolver::environment::{find_project_descriptor, load_project_descriptor};
use tether_util::errors::TetherError;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Resolve {
            format,
            tree,
            depth,
            why,
        } => resolve::exec(format, tree, depth, why.as_deref()),
        Command::Update { system } => update::exec(system),
    }
}

/// The current project: its directory and its descriptor.
struct Project {
    dir: PathBuf,
    descriptor: Descriptor,
}

fn current_project(config: &GlobalConfig) -> Result<Project> {
    let cwd = std::env::current_dir().map_err(TetherError::Io)?;
    let path = find_project_descriptor(&cwd).ok_or_else(|| TetherError::Descriptor {
        message: format!(
            "Could not find {} in {} or any parent directory",
            tether_resolver::environment::PROJECT_DESCRIPTOR,
            cwd.display()
        ),
    })?;
    let descriptor = load_project_descriptor(&path, config)?;
    let dir = path.parent().map(PathBuf::from).unwrap_or(cwd);
    Ok(Project { dir, descriptor })
}
