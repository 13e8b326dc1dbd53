//! Core dependency resolution algorithm: root pins, name overrides,
//! priority-ordered repository search, and breadth-first expansion that
//! expands each package version at most once.
//!
//! Resolution is a single deterministic pass. It never backtracks: the root
//! descriptor's own declarations pin their names, the first transitive
//! discovery of any other name wins, and a later transitive requirement that
//! the earlier discovery cannot satisfy produces a second entry for that name.
//! Such duplicates, along with requirements nothing satisfies, are reported in
//! the result rather than raised as errors.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use tether_core::dependency::DependencyRequirement;
use tether_core::descriptor::Descriptor;

use crate::conflict::ConflictReport;
use crate::package::Package;
use crate::repository::PackageRepository;
use crate::visited::ExpandedSet;

/// One requirement as resolved: the requirement after overrides, and the
/// package chosen for it (absent when no repository can satisfy it).
#[derive(Debug, Clone)]
pub struct ResolvedDependency {
    pub requirement: DependencyRequirement,
    pub package: Option<Arc<Package>>,
}

impl ResolvedDependency {
    pub fn is_resolved(&self) -> bool {
        self.package.is_some()
    }

    /// The requirement name, which is also the package name when resolved.
    pub fn name(&self) -> &str {
        &self.requirement.name
    }
}

/// "`from` (or the root, when `None`) requested entry `to`".
///
/// Requests satisfied by a pin or by an earlier discovery still get an edge,
/// pointing at the entry that satisfied them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencyEdge {
    pub from: Option<usize>,
    pub to: usize,
}

/// The output of dependency resolution.
#[derive(Debug, Clone)]
pub struct ResolutionResult {
    /// True iff every entry has a package and no name has more than one entry.
    pub success: bool,
    /// Root declarations first, in declaration order, then transitive discoveries.
    pub entries: Vec<ResolvedDependency>,
    /// Who requested what, indexing into `entries`.
    pub edges: Vec<DependencyEdge>,
}

impl ResolutionResult {
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Entries whose requirement carries `name`.
    pub fn entries_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a ResolvedDependency> + 'a {
        self.entries.iter().filter(move |e| e.name() == name)
    }

    /// Entries no repository could satisfy.
    pub fn unresolved(&self) -> impl Iterator<Item = &ResolvedDependency> {
        self.entries.iter().filter(|e| !e.is_resolved())
    }

    /// Every resolved package, in entry order.
    pub fn packages(&self) -> impl Iterator<Item = &Arc<Package>> {
        self.entries.iter().filter_map(|e| e.package.as_ref())
    }

    /// Names carrying more than one entry.
    pub fn conflicts(&self) -> ConflictReport {
        ConflictReport::from_entries(&self.entries)
    }
}

/// Resolve `root`'s dependencies against `repositories`, earliest repository first.
///
/// Overrides declared on `root` apply at every depth. Root declarations pin
/// their names: a transitive requirement on a pinned name adds no entry and
/// is never checked for conflicts.
pub fn try_resolve_dependencies(
    root: &Descriptor,
    repositories: &[&dyn PackageRepository],
) -> ResolutionResult {
    let result = Resolution::new(root, repositories).run();
    tracing::info!(
        "Resolved `{}`: {} entries, {} unresolved, {} conflicting names ({})",
        root.name,
        result.entries.len(),
        result.unresolved().count(),
        result.conflicts().len(),
        if result.success { "success" } else { "failure" }
    );
    result
}

/// State for one resolution call.
struct Resolution<'a> {
    root: &'a Descriptor,
    repositories: &'a [&'a dyn PackageRepository],
    /// `from -> to`, first declaration wins.
    overrides: HashMap<&'a str, &'a str>,
    /// Names declared by the root, with their authoritative entry.
    pinned: HashMap<String, usize>,
    expanded: ExpandedSet,
    entries: Vec<ResolvedDependency>,
    edges: Vec<DependencyEdge>,
    /// Entries waiting for their package's dependencies to be expanded.
    queue: VecDeque<usize>,
}

impl<'a> Resolution<'a> {
    fn new(root: &'a Descriptor, repositories: &'a [&'a dyn PackageRepository]) -> Self {
        let mut overrides = HashMap::new();
        for o in &root.overrides {
            overrides.entry(o.from.as_str()).or_insert(o.to.as_str());
        }
        Self {
            root,
            repositories,
            overrides,
            pinned: HashMap::new(),
            expanded: ExpandedSet::new(),
            entries: Vec::new(),
            edges: Vec::new(),
            queue: VecDeque::new(),
        }
    }

    fn run(mut self) -> ResolutionResult {
        // Pin every root declaration before any transitive exploration.
        let root = self.root;
        for dependency in &root.dependencies {
            let requirement = self.apply_override(dependency);
            if let Some(&pinned) = self.pinned.get(&requirement.name) {
                tracing::debug!("`{requirement}` already declared by the root, keeping the first");
                self.edges.push(DependencyEdge {
                    from: None,
                    to: pinned,
                });
                continue;
            }
            let idx = self.push_entry(requirement);
            self.pinned.insert(self.entries[idx].name().to_string(), idx);
            self.edges.push(DependencyEdge {
                from: None,
                to: idx,
            });
        }

        while let Some(idx) = self.queue.pop_front() {
            self.expand(idx);
        }

        let success = is_consistent(&self.entries);
        ResolutionResult {
            success,
            entries: self.entries,
            edges: self.edges,
        }
    }

    /// Process the dependencies of the package behind entry `idx`, once per
    /// `(name, version)`.
    fn expand(&mut self, idx: usize) {
        let Some(package) = self.entries[idx].package.clone() else {
            return;
        };
        if !self.expanded.visit(&package.name, &package.version) {
            tracing::debug!("{package} already expanded");
            return;
        }
        for dependency in &package.dependencies {
            self.resolve_transitive(idx, dependency);
        }
    }

    fn resolve_transitive(&mut self, parent: usize, dependency: &DependencyRequirement) {
        let requirement = self.apply_override(dependency);

        if let Some(&pinned) = self.pinned.get(&requirement.name) {
            tracing::debug!("`{requirement}` satisfied by root declaration");
            self.edges.push(DependencyEdge {
                from: Some(parent),
                to: pinned,
            });
            return;
        }

        if let Some(existing) = self.find_reusable(&requirement) {
            tracing::debug!("`{requirement}` satisfied by earlier discovery");
            self.edges.push(DependencyEdge {
                from: Some(parent),
                to: existing,
            });
            return;
        }

        if self.entries.iter().any(|e| e.name() == requirement.name) {
            tracing::debug!("`{requirement}` conflicts with an earlier discovery");
        }
        let idx = self.push_entry(requirement);
        self.edges.push(DependencyEdge {
            from: Some(parent),
            to: idx,
        });
    }

    /// An earlier entry that already answers `requirement`: one whose package
    /// satisfies it, or an unresolved one for the identical requirement.
    fn find_reusable(&self, requirement: &DependencyRequirement) -> Option<usize> {
        self.entries.iter().position(|e| {
            e.name() == requirement.name
                && match &e.package {
                    Some(package) => requirement.is_satisfied_by(&package.version),
                    None => e.requirement == *requirement,
                }
        })
    }

    fn apply_override(&self, requirement: &DependencyRequirement) -> DependencyRequirement {
        match self.overrides.get(requirement.name.as_str()) {
            Some(&to) => {
                tracing::debug!("`{}` overridden to `{to}`", requirement.name);
                DependencyRequirement::any(to)
            }
            None => requirement.clone(),
        }
    }

    /// Search the repositories and append the outcome as a new entry.
    fn push_entry(&mut self, requirement: DependencyRequirement) -> usize {
        let package = self.search(&requirement);
        let idx = self.entries.len();
        if package.is_some() {
            self.queue.push_back(idx);
        }
        self.entries.push(ResolvedDependency {
            requirement,
            package,
        });
        idx
    }

    /// The best match from the first repository holding any match.
    fn search(&self, requirement: &DependencyRequirement) -> Option<Arc<Package>> {
        for repo in self.repositories {
            if let Some(package) = repo.find(requirement) {
                tracing::debug!("`{requirement}` found {package} in `{}`", repo.name());
                return Some(package);
            }
        }
        tracing::debug!("`{requirement}` not found in any repository");
        None
    }
}

fn is_consistent(entries: &[ResolvedDependency]) -> bool {
    let mut names = HashSet::new();
    entries
        .iter()
        .all(|e| e.is_resolved() && names.insert(e.name()))
}
