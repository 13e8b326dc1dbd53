//! Dependency conflict detection and resolution reporting.

use std::fmt;

use crate::resolver::ResolvedDependency;

/// A report of all names that ended up with more than one entry.
#[derive(Debug, Default)]
pub struct ConflictReport {
    pub conflicts: Vec<VersionConflict>,
}

/// A single package name requested by incompatible requirements, with what
/// each of them resolved to.
#[derive(Debug, Clone)]
pub struct VersionConflict {
    pub name: String,
    /// One `(requirement, resolved version)` pair per entry, in entry order.
    pub requests: Vec<(String, Option<String>)>,
}

impl ConflictReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group `entries` by name, keeping names with more than one entry.
    pub fn from_entries(entries: &[ResolvedDependency]) -> Self {
        let mut report = Self::new();
        let mut order: Vec<&str> = Vec::new();
        for entry in entries {
            if !order.contains(&entry.name()) {
                order.push(entry.name());
            }
        }
        for name in order {
            let requests: Vec<(String, Option<String>)> = entries
                .iter()
                .filter(|e| e.name() == name)
                .map(|e| {
                    (
                        e.requirement.to_string(),
                        e.package.as_ref().map(|p| p.version.to_string()),
                    )
                })
                .collect();
            if requests.len() > 1 {
                report.add(VersionConflict {
                    name: name.to_string(),
                    requests,
                });
            }
        }
        report
    }

    pub fn add(&mut self, conflict: VersionConflict) {
        self.conflicts.push(conflict);
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.conflicts.is_empty() {
            return write!(f, "No version conflicts.");
        }
        writeln!(f, "Version conflicts ({}):", self.conflicts.len())?;
        for c in &self.conflicts {
            writeln!(f, "  {c}")?;
        }
        Ok(())
    }
}

impl fmt::Display for VersionConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.name)?;
        for (i, (requirement, resolved)) in self.requests.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            let resolved = resolved.as_deref().unwrap_or("nothing");
            write!(f, "{sep}`{requirement}` -> {resolved}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tether_core::dependency::DependencyRequirement;
    use tether_core::version::Version;

    use crate::package::Package;

    fn entry(name: &str, exact: &str) -> ResolvedDependency {
        let version = Version::parse(exact).unwrap();
        ResolvedDependency {
            requirement: DependencyRequirement::exact(name, version.clone()),
            package: Some(Arc::new(Package::new(name, version))),
        }
    }

    #[test]
    fn empty_report() {
        let report = ConflictReport::new();
        assert!(report.is_empty());
        assert_eq!(report.len(), 0);
        assert_eq!(report.to_string(), "No version conflicts.");
    }

    #[test]
    fn unique_names_are_not_conflicts() {
        let report = ConflictReport::from_entries(&[entry("a", "1.0"), entry("b", "1.0")]);
        assert!(report.is_empty());
    }

    #[test]
    fn report_with_conflicts() {
        let report = ConflictReport::from_entries(&[
            entry("sauron", "1.0.0"),
            entry("tolkien", "1.0.0"),
            entry("sauron", "1.1.0"),
        ]);
        assert_eq!(report.len(), 1);
        assert_eq!(report.conflicts[0].name, "sauron");
        let s = report.to_string();
        assert!(s.contains("Version conflicts (1):"));
        assert!(s.contains("`sauron = 1.0.0` -> 1.0.0, `sauron = 1.1.0` -> 1.1.0"), "got: {s}");
    }

    #[test]
    fn unresolved_side_is_reported() {
        let missing = ResolvedDependency {
            requirement: DependencyRequirement::exact("sauron", Version::parse("9.0").unwrap()),
            package: None,
        };
        let report = ConflictReport::from_entries(&[entry("sauron", "1.0"), missing]);
        assert!(report.to_string().contains("`sauron = 9.0` -> nothing"));
    }
}
