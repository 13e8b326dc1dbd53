use std::fmt;

use tether_core::dependency::DependencyRequirement;
use tether_core::descriptor::Descriptor;
use tether_core::naming::{package_file_stem, split_package_file_name};
use tether_core::version::Version;
use tether_util::errors::TetherError;

/// A resolvable package: one version of one name, held by one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub version: Version,
    /// Name of the repository holding this package. Set when it is added to one.
    pub source: String,
    pub dependencies: Vec<DependencyRequirement>,
}

impl Package {
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        Self {
            name: name.into(),
            version,
            source: String::new(),
            dependencies: Vec::new(),
        }
    }

    pub fn with_dependency(mut self, requirement: DependencyRequirement) -> Self {
        self.dependencies.push(requirement);
        self
    }

    /// Build a package from a parsed descriptor. The descriptor must carry a version.
    pub fn from_descriptor(descriptor: Descriptor) -> miette::Result<Self> {
        let Some(version) = descriptor.version else {
            return Err(TetherError::Descriptor {
                message: format!("package `{}` has no version", descriptor.name),
            }
            .into());
        };
        Ok(Self {
            name: descriptor.name,
            version,
            source: String::new(),
            dependencies: descriptor.dependencies,
        })
    }

    /// Build a package from a `<name>-<version>` stem and descriptor text.
    pub fn parse(stem: &str, descriptor: &str) -> miette::Result<Self> {
        let (name, version) = split_package_file_name(stem);
        let mut parsed = Descriptor::parse(name, descriptor)?;
        parsed.version = version;
        Self::from_descriptor(parsed)
    }

    /// `<name>-<version>`.
    pub fn full_name(&self) -> String {
        package_file_stem(&self.name, &self.version)
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}
