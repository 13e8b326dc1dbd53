//! Update scan: find installed packages that have a newer version elsewhere.

use std::fmt;
use std::sync::Arc;

use tether_core::dependency::DependencyRequirement;
use tether_core::descriptor::Descriptor;
use tether_core::version::Version;

use crate::package::Package;
use crate::repository::PackageRepository;
use crate::resolver::try_resolve_dependencies;

/// A single installed package with a newer version available.
#[derive(Debug, Clone)]
pub struct AvailableUpdate {
    pub name: String,
    pub installed: Version,
    pub available: Arc<Package>,
}

impl fmt::Display for AvailableUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} -> {} ({})",
            self.name, self.installed, self.available.version, self.available.source
        )
    }
}

/// A root descriptor asking for something newer than every installed name.
///
/// Names sharing several installed versions are compared against the highest.
pub fn installed_descriptor(installed: &dyn PackageRepository) -> Descriptor {
    let mut descriptor = Descriptor::new(installed.name());
    for name in installed.package_names() {
        let newest = installed
            .packages_named(name)
            .iter()
            .map(|p| &p.version)
            .max();
        if let Some(newest) = newest {
            descriptor
                .dependencies
                .push(DependencyRequirement::newer_than(name, newest.clone()));
        }
    }
    descriptor
}

/// Resolve `installed` against `remotes` and keep the names that found something newer.
///
/// Only root-level entries count: dependencies of the newer packages are not
/// updates of anything installed. Absent entries mean "up to date".
pub fn scan_for_updates(
    installed: &dyn PackageRepository,
    remotes: &[&dyn PackageRepository],
) -> Vec<AvailableUpdate> {
    let descriptor = installed_descriptor(installed);
    let declared = descriptor.dependencies.len();
    let result = try_resolve_dependencies(&descriptor, remotes);

    let updates: Vec<AvailableUpdate> = result
        .entries
        .iter()
        .take(declared)
        .filter_map(|entry| {
            let available = entry.package.clone()?;
            let installed = installed
                .packages_named(entry.name())
                .iter()
                .map(|p| p.version.clone())
                .max()?;
            Some(AvailableUpdate {
                name: entry.name().to_string(),
                installed,
                available,
            })
        })
        .collect();

    tracing::info!(
        "Scanned {} installed names in `{}`: {} updates available",
        declared,
        installed.name(),
        updates.len()
    );
    updates
}
