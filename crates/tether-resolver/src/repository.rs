//! Package repositories: the sources the resolver searches, in priority order.
//!
//! Every repository answers the same two questions (which packages carry a
//! name, and which of them best satisfies a requirement). Variants only differ
//! in how they populate their package set.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tether_core::dependency::DependencyRequirement;
use tether_core::descriptor::{Descriptor, PACKAGE_DESCRIPTOR_EXTENSION};
use tether_core::version::select_best;
use tether_util::errors::TetherError;
use tether_util::retry::RetryPolicy;

use crate::package::Package;

/// A read-only source of packages.
pub trait PackageRepository: Send + Sync {
    /// Diagnostic name. Priority comes from the caller's ordering, never from this.
    fn name(&self) -> &str;

    /// Every package carrying `name`, in no particular order.
    fn packages_named(&self, name: &str) -> &[Arc<Package>];

    /// Every distinct package name held, sorted.
    fn package_names(&self) -> Vec<&str>;

    /// The highest-version package named `requirement.name` that satisfies
    /// all of its constraints.
    fn find(&self, requirement: &DependencyRequirement) -> Option<Arc<Package>> {
        let candidates = self.packages_named(&requirement.name);
        let best = select_best(
            candidates.iter().map(|p| &p.version),
            &requirement.constraints,
        )?;
        candidates.iter().find(|p| &p.version == best).cloned()
    }
}

/// A repository whose packages are added programmatically.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    name: String,
    packages: BTreeMap<String, Vec<Arc<Package>>>,
}

impl InMemoryRepository {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            packages: BTreeMap::new(),
        }
    }

    /// Add a package, recording this repository as its source.
    pub fn add(&mut self, mut package: Package) -> Arc<Package> {
        package.source = self.name.clone();
        let package = Arc::new(package);
        self.packages
            .entry(package.name.clone())
            .or_default()
            .push(Arc::clone(&package));
        package
    }

    pub fn with_package(mut self, package: Package) -> Self {
        self.add(package);
        self
    }

    /// Total number of packages across all names.
    pub fn len(&self) -> usize {
        self.packages.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl PackageRepository for InMemoryRepository {
    fn name(&self) -> &str {
        &self.name
    }

    fn packages_named(&self, name: &str) -> &[Arc<Package>] {
        self.packages.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    fn package_names(&self) -> Vec<&str> {
        self.packages.keys().map(String::as_str).collect()
    }
}

/// A repository populated from the `*.tether` descriptor files in one directory.
///
/// A missing directory is an empty repository. Files that fail to parse or
/// carry no version are skipped with a warning.
#[derive(Debug, Clone)]
pub struct DirectoryRepository {
    dir: PathBuf,
    packages: InMemoryRepository,
}

impl DirectoryRepository {
    pub fn open(name: impl Into<String>, dir: &Path, retry: &RetryPolicy) -> miette::Result<Self> {
        let mut packages = InMemoryRepository::new(name);
        let files = tether_util::fs::files_with_extension(dir, PACKAGE_DESCRIPTOR_EXTENSION)
            .map_err(|e| TetherError::Repository {
                message: format!("Failed to scan {}: {e}", dir.display()),
            })?;

        for file in files {
            let parsed = Descriptor::from_path(&file, retry).and_then(Package::from_descriptor);
            match parsed {
                Ok(package) => {
                    packages.add(package);
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {e}", file.display());
                }
            }
        }

        tracing::debug!(
            "Opened repository `{}` at {} ({} packages)",
            packages.name(),
            dir.display(),
            packages.len()
        );
        Ok(Self {
            dir: dir.to_path_buf(),
            packages,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl PackageRepository for DirectoryRepository {
    fn name(&self) -> &str {
        self.packages.name()
    }

    fn packages_named(&self, name: &str) -> &[Arc<Package>] {
        self.packages.packages_named(name)
    }

    fn package_names(&self) -> Vec<&str> {
        self.packages.package_names()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tether_core::version::Version;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn repo() -> InMemoryRepository {
        InMemoryRepository::new("project")
            .with_package(Package::new("sauron", v("1.0.0")))
            .with_package(Package::new("sauron", v("1.1.0")))
            .with_package(Package::new("evil", v("1.0.0")))
    }

    #[test]
    fn add_records_source() {
        let mut repo = InMemoryRepository::new("system");
        let pkg = repo.add(Package::new("evil", v("1.0")));
        assert_eq!(pkg.source, "system");
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn find_picks_highest_satisfying_version() {
        let repo = repo();
        let found = repo.find(&DependencyRequirement::any("sauron")).unwrap();
        assert_eq!(found.version, v("1.1.0"));

        let exact = repo
            .find(&DependencyRequirement::exact("sauron", v("1.0.0")))
            .unwrap();
        assert_eq!(exact.version, v("1.0.0"));
    }

    #[test]
    fn find_none_when_unsatisfiable_or_unknown() {
        let repo = repo();
        assert!(repo
            .find(&DependencyRequirement::newer_than("sauron", v("1.1")))
            .is_none());
        assert!(repo.find(&DependencyRequirement::any("gandalf")).is_none());
    }

    #[test]
    fn names_are_sorted_and_distinct() {
        assert_eq!(repo().package_names(), vec!["evil", "sauron"]);
        assert_eq!(repo().packages_named("sauron").len(), 2);
        assert!(repo().packages_named("gandalf").is_empty());
    }

    #[test]
    fn directory_repository_loads_descriptors() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(tmp.path().join("sauron-1.0.0.tether"), "").unwrap();
        std::fs::write(
            tmp.path().join("rings-of-power-1.0.0.tether"),
            "depends: sauron = 1.0.0\n",
        )
        .unwrap();
        std::fs::write(tmp.path().join("broken-1.0.tether"), "depends: x = y").unwrap();
        std::fs::write(tmp.path().join("README.md"), "not a package").unwrap();

        let retry = RetryPolicy::new(1, Duration::ZERO);
        let repo = DirectoryRepository::open("system", tmp.path(), &retry).unwrap();
        assert_eq!(repo.len(), 2);
        assert_eq!(repo.package_names(), vec!["rings-of-power", "sauron"]);

        let rings = repo.find(&DependencyRequirement::any("rings-of-power")).unwrap();
        assert_eq!(rings.source, "system");
        assert_eq!(rings.dependencies.len(), 1);
    }

    #[test]
    fn missing_directory_is_empty() {
        let tmp = tempfile::TempDir::new().unwrap();
        let repo =
            DirectoryRepository::open("remote", &tmp.path().join("absent"), &RetryPolicy::once())
                .unwrap();
        assert!(repo.is_empty());
        assert_eq!(repo.name(), "remote");
    }
}
