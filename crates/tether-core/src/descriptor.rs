use std::path::Path;

use tether_util::errors::TetherError;
use tether_util::retry::RetryPolicy;

use crate::dependency::{DependencyRequirement, NameOverride};
use crate::grammar::DescriptorParser;
use crate::naming::split_package_file_name;
use crate::version::Version;

/// File extension of package descriptors inside a repository directory.
pub const PACKAGE_DESCRIPTOR_EXTENSION: &str = "tether";

/// Name of the sibling file that supplies a version missing from the file name.
pub const VERSION_FILE_NAME: &str = "version";

/// What a package (or a project) requires.
///
/// A project descriptor has no version. Resolution only reads descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Descriptor {
    pub name: String,
    pub version: Option<Version>,
    pub description: Option<String>,
    pub anchored: bool,
    pub dependencies: Vec<DependencyRequirement>,
    pub overrides: Vec<NameOverride>,
}

impl Descriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_dependency(mut self, requirement: DependencyRequirement) -> Self {
        self.dependencies.push(requirement);
        self
    }

    pub fn with_override(mut self, name_override: NameOverride) -> Self {
        self.overrides.push(name_override);
        self
    }

    /// Parse descriptor text with the default line parsers.
    pub fn parse(name: impl Into<String>, content: &str) -> miette::Result<Self> {
        let mut descriptor = Self::new(name);
        DescriptorParser::default().parse_into(content, &mut descriptor)?;
        Ok(descriptor)
    }

    /// Load and parse a descriptor file.
    ///
    /// Name and version come from the file stem (`<name>-<version>`). When the
    /// stem carries no version, a sibling `version` file supplies it if present.
    /// Reads are retried according to `retry` before giving up.
    pub fn from_path(path: &Path, retry: &RetryPolicy) -> miette::Result<Self> {
        let content = retry
            .run(&path.display().to_string(), || std::fs::read_to_string(path))
            .map_err(|e| TetherError::Descriptor {
                message: format!("Failed to read {}: {e}", path.display()),
            })?;

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (name, mut version) = split_package_file_name(&stem);

        if version.is_none() {
            let version_file = path
                .parent()
                .unwrap_or(Path::new("."))
                .join(VERSION_FILE_NAME);
            if version_file.is_file() {
                let raw = std::fs::read_to_string(&version_file).map_err(TetherError::Io)?;
                version = Some(Version::parse(&raw)?);
            }
        }

        let mut descriptor = Self::new(name);
        descriptor.version = version;
        DescriptorParser::default()
            .parse_into(&content, &mut descriptor)
            .map_err(|e| match e {
                TetherError::Descriptor { message } => TetherError::Descriptor {
                    message: format!("{}: {message}", path.display()),
                },
                other => other,
            })?;
        tracing::debug!(
            "Parsed descriptor {} ({} dependencies, {} overrides)",
            path.display(),
            descriptor.dependencies.len(),
            descriptor.overrides.len()
        );
        Ok(descriptor)
    }
}
