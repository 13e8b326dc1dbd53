use std::fmt;

use crate::version::{satisfies, Version, VersionConstraint};

/// A named dependency plus the constraints a candidate version must meet.
///
/// The constraints are conjoined; an empty list accepts any version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRequirement {
    pub name: String,
    pub constraints: Vec<VersionConstraint>,
}

impl DependencyRequirement {
    /// A requirement on `name` that accepts any version.
    pub fn any(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraints: Vec::new(),
        }
    }

    /// A requirement on exactly `version` of `name`.
    pub fn exact(name: impl Into<String>, version: Version) -> Self {
        Self::any(name).with_constraint(VersionConstraint::EqualTo(version))
    }

    /// A requirement on any version of `name` newer than `version`.
    pub fn newer_than(name: impl Into<String>, version: Version) -> Self {
        Self::any(name).with_constraint(VersionConstraint::GreaterThan(version))
    }

    pub fn with_constraint(mut self, constraint: VersionConstraint) -> Self {
        if constraint != VersionConstraint::Any {
            self.constraints.push(constraint);
        }
        self
    }

    pub fn is_satisfied_by(&self, version: &Version) -> bool {
        satisfies(version, &self.constraints)
    }
}

impl fmt::Display for DependencyRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for (i, c) in self.constraints.iter().enumerate() {
            let sep = if i == 0 { " " } else { " and " };
            write!(f, "{sep}{c}")?;
        }
        Ok(())
    }
}

/// Resolve `to` wherever a requirement named `from` would be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameOverride {
    pub from: String,
    pub to: String,
}

impl NameOverride {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl fmt::Display for NameOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.from, self.to)
    }
}
