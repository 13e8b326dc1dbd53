//! The set of repositories visible from a working directory.

use std::path::{Path, PathBuf};

use tether_core::config::{expand_home, GlobalConfig};
use tether_core::descriptor::Descriptor;
use tether_util::errors::TetherError;

use crate::repository::{DirectoryRepository, PackageRepository};

/// Project descriptor file name, looked up from the working directory upwards.
pub const PROJECT_DESCRIPTOR: &str = "tether.desc";

/// Directory next to the project descriptor holding project packages.
pub const PROJECT_PACKAGES_DIR: &str = "packages";

/// The project, system and remote repositories, opened from disk.
pub struct Environment {
    pub project: Option<DirectoryRepository>,
    pub system: DirectoryRepository,
    pub remotes: Vec<DirectoryRepository>,
}

impl Environment {
    /// Open every configured repository. `project_dir` is the directory holding
    /// the project descriptor, when there is one.
    pub fn load(project_dir: Option<&Path>, config: &GlobalConfig) -> miette::Result<Self> {
        let retry = config.descriptor.retry_policy();
        let project = project_dir
            .map(|dir| DirectoryRepository::open("project", &dir.join(PROJECT_PACKAGES_DIR), &retry))
            .transpose()?;
        let system = DirectoryRepository::open("system", &config.system_dir(), &retry)?;
        let remotes = config
            .repositories
            .iter()
            .map(|r| DirectoryRepository::open(r.name.as_str(), &expand_home(&r.dir), &retry))
            .collect::<miette::Result<Vec<_>>>()?;

        tracing::debug!(
            "Environment loaded: project={}, {} remote repositories",
            project.is_some(),
            remotes.len()
        );
        Ok(Self {
            project,
            system,
            remotes,
        })
    }

    /// Search order for resolving a project: project, system, then remotes.
    pub fn resolution_order(&self) -> Vec<&dyn PackageRepository> {
        let mut order: Vec<&dyn PackageRepository> = Vec::new();
        if let Some(project) = &self.project {
            order.push(project);
        }
        order.push(&self.system);
        order.extend(self.remotes());
        order
    }

    /// Search order when looking for updates: remotes first, then system.
    pub fn update_order(&self) -> Vec<&dyn PackageRepository> {
        let mut order = self.remotes();
        order.push(&self.system);
        order
    }

    pub fn remotes(&self) -> Vec<&dyn PackageRepository> {
        self.remotes
            .iter()
            .map(|r| r as &dyn PackageRepository)
            .collect()
    }
}

/// Locate the nearest project descriptor from `start` upwards.
pub fn find_project_descriptor(start: &Path) -> Option<PathBuf> {
    tether_util::fs::find_ancestor_with(start, PROJECT_DESCRIPTOR)
        .map(|dir| dir.join(PROJECT_DESCRIPTOR))
}

/// Load the project descriptor at `path`, named after its directory.
pub fn load_project_descriptor(path: &Path, config: &GlobalConfig) -> miette::Result<Descriptor> {
    let mut descriptor = Descriptor::from_path(path, &config.descriptor.retry_policy())?;
    descriptor.name = path
        .parent()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| TetherError::Descriptor {
            message: format!("Cannot name project at {}", path.display()),
        })?;
    Ok(descriptor)
}
