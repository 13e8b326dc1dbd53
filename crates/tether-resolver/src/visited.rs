//! Tracks which packages have had their own dependencies expanded.

use std::collections::HashSet;

use tether_core::version::Version;

/// `(name, version)` pairs already expanded during one resolution.
///
/// Expanding each pair at most once is what makes cyclic graphs terminate.
#[derive(Debug, Default)]
pub struct ExpandedSet {
    expanded: HashSet<(String, Version)>,
}

impl ExpandedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a package as expanded. Returns `false` if it already was.
    pub fn visit(&mut self, name: &str, version: &Version) -> bool {
        self.expanded.insert((name.to_string(), version.clone()))
    }

    pub fn contains(&self, name: &str, version: &Version) -> bool {
        self.expanded.contains(&(name.to_string(), version.clone()))
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }
}
