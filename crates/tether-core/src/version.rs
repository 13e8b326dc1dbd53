//! Numeric package versions and the constraints evaluated against them.
//!
//! A version is a dotted sequence of non-negative integers of any arity.
//! Comparison walks the components pairwise and treats a missing trailing
//! component as zero, so `1.0` and `1.0.0` are equal while still displaying
//! the way they were written.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use tether_util::errors::TetherError;

/// A parsed package version with comparable numeric components.
#[derive(Debug, Clone)]
pub struct Version {
    components: Vec<u64>,
}

impl Version {
    /// Parse a dotted version such as `1.0` or `2.1.3`.
    pub fn parse(version: &str) -> Result<Self, TetherError> {
        let trimmed = version.trim();
        if trimmed.is_empty() {
            return Err(TetherError::Version {
                message: "empty version".to_string(),
            });
        }
        let components = trimmed
            .split('.')
            .map(|part| {
                part.parse::<u64>().map_err(|_| TetherError::Version {
                    message: format!("`{trimmed}` is not a dotted numeric version"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { components })
    }

    pub fn from_components(components: impl Into<Vec<u64>>) -> Self {
        Self {
            components: components.into(),
        }
    }

    /// The components exactly as written.
    pub fn components(&self) -> &[u64] {
        &self.components
    }

    /// Components with trailing zeros dropped, shared by `Eq` and `Hash`.
    fn significant(&self) -> &[u64] {
        let len = self
            .components
            .iter()
            .rposition(|&c| c != 0)
            .map_or(0, |i| i + 1);
        &self.components[..len]
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant().hash(state);
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let max_len = self.components.len().max(other.components.len());
        for i in 0..max_len {
            let a = self.components.get(i).copied().unwrap_or(0);
            let b = other.components.get(i).copied().unwrap_or(0);
            let ord = a.cmp(&b);
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Version {
    type Err = TetherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.components.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

/// A predicate over [`Version`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionConstraint {
    /// Always holds.
    Any,
    /// Holds for a version equal to the operand.
    EqualTo(Version),
    /// Holds for a version strictly greater than the operand.
    GreaterThan(Version),
}

impl VersionConstraint {
    pub fn matches(&self, version: &Version) -> bool {
        match self {
            Self::Any => true,
            Self::EqualTo(v) => version == v,
            Self::GreaterThan(v) => version > v,
        }
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("*"),
            Self::EqualTo(v) => write!(f, "= {v}"),
            Self::GreaterThan(v) => write!(f, "> {v}"),
        }
    }
}

/// True iff every constraint holds for `version`. An empty set always holds.
pub fn satisfies(version: &Version, constraints: &[VersionConstraint]) -> bool {
    constraints.iter().all(|c| c.matches(version))
}

/// The greatest candidate satisfying every constraint, if any.
pub fn select_best<'a>(
    candidates: impl IntoIterator<Item = &'a Version>,
    constraints: &[VersionConstraint],
) -> Option<&'a Version> {
    candidates
        .into_iter()
        .filter(|v| satisfies(v, constraints))
        .max()
}
