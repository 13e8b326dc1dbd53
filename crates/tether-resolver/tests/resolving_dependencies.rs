use std::time::Duration;

use tempfile::TempDir;
use tether_core::descriptor::Descriptor;
use tether_core::version::Version;
use tether_resolver::graph::DependencyGraph;
use tether_resolver::package::Package;
use tether_resolver::repository::{DirectoryRepository, InMemoryRepository, PackageRepository};
use tether_resolver::resolver::{try_resolve_dependencies, ResolutionResult};
use tether_util::retry::RetryPolicy;

/// Project, system and remote repositories searched in that order.
struct Context {
    project: InMemoryRepository,
    system: InMemoryRepository,
    remote: InMemoryRepository,
    descriptor: Descriptor,
}

impl Context {
    fn new() -> Self {
        Self {
            project: InMemoryRepository::new("project"),
            system: InMemoryRepository::new("system"),
            remote: InMemoryRepository::new("remote"),
            descriptor: Descriptor::new("middle-earth"),
        }
    }

    fn given_project_package(&mut self, stem: &str, lines: &[&str]) {
        self.project.add(package(stem, lines));
    }

    fn given_system_package(&mut self, stem: &str, lines: &[&str]) {
        self.system.add(package(stem, lines));
    }

    fn given_remote_package(&mut self, stem: &str, lines: &[&str]) {
        self.remote.add(package(stem, lines));
    }

    fn given_descriptor(&mut self, lines: &[&str]) {
        self.descriptor = Descriptor::parse("middle-earth", &lines.join("\n")).unwrap();
    }

    fn resolve(&self) -> ResolutionResult {
        try_resolve_dependencies(
            &self.descriptor,
            &[&self.project, &self.system, &self.remote],
        )
    }
}

fn package(stem: &str, lines: &[&str]) -> Package {
    Package::parse(stem, &lines.join("\n")).unwrap()
}

fn v(s: &str) -> Version {
    Version::parse(s).unwrap()
}

fn given_tolkien_packages(ctx: &mut Context) {
    ctx.given_project_package("sauron-1.0.0", &[]);
    ctx.given_project_package("sauron-1.1.0", &[]);
    ctx.given_project_package("rings-of-power-1.0.0", &["depends: sauron = 1.0.0"]);
    ctx.given_project_package(
        "one-ring-to-rule-them-all-1.0.0",
        &["depends: sauron = 1.1.0"],
    );
    ctx.given_project_package(
        "tolkien-1.0.0",
        &["depends: rings-of-power", "depends: one-ring-to-rule-them-all"],
    );
}

#[test]
fn dependency_not_found_is_reported_as_absent() {
    let mut ctx = Context::new();
    ctx.given_descriptor(&["depends: rings-of-power"]);

    let result = ctx.resolve();
    assert!(!result.success);
    assert_eq!(result.entries.len(), 1);
    assert_eq!(result.entries[0].name(), "rings-of-power");
    assert!(result.entries[0].package.is_none());
}

#[test]
fn cyclic_dependency_resolves_once() {
    let mut ctx = Context::new();
    ctx.given_system_package("evil-1.0.0", &["depends: evil"]);
    ctx.given_descriptor(&["depends: evil"]);

    let result = ctx.resolve();
    assert!(result.success);
    assert_eq!(result.entries.len(), 1);
    let evil = result.entries[0].package.as_ref().unwrap();
    assert_eq!(evil.name, "evil");
    assert_eq!(evil.version, v("1.0.0"));
}

#[test]
fn root_declaration_settles_transitive_conflict() {
    let mut ctx = Context::new();
    given_tolkien_packages(&mut ctx);
    ctx.given_descriptor(&["depends: tolkien", "depends: sauron = 1.0.0"]);

    let result = ctx.resolve();
    assert!(result.success, "conflicts: {}", result.conflicts());
    assert_eq!(result.entries.len(), 4);

    let saurons: Vec<_> = result.entries_named("sauron").collect();
    assert_eq!(saurons.len(), 1);
    assert_eq!(saurons[0].package.as_ref().unwrap().version, v("1.0.0"));
    assert!(result.conflicts().is_empty());
}

#[test]
fn transitive_conflict_without_root_declaration_fails() {
    let mut ctx = Context::new();
    given_tolkien_packages(&mut ctx);
    ctx.given_descriptor(&["depends: tolkien"]);

    let result = ctx.resolve();
    assert!(!result.success);
    assert_eq!(result.entries.len(), 5);

    let versions: Vec<Version> = result
        .entries_named("sauron")
        .map(|e| e.package.as_ref().unwrap().version.clone())
        .collect();
    assert_eq!(versions, vec![v("1.0.0"), v("1.1.0")]);

    let conflicts = result.conflicts();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts.conflicts[0].name, "sauron");
}

#[test]
fn remote_only_package_comes_from_remote() {
    let mut ctx = Context::new();
    ctx.given_remote_package("rings-of-power-1.0.0", &[]);
    ctx.given_descriptor(&["depends: rings-of-power"]);

    let result = ctx.resolve();
    assert!(result.success);
    assert_eq!(result.entries[0].package.as_ref().unwrap().source, "remote");
}

#[test]
fn system_only_package_comes_from_system() {
    let mut ctx = Context::new();
    ctx.given_system_package("rings-of-power-1.0.0", &[]);
    ctx.given_descriptor(&["depends: rings-of-power"]);

    let result = ctx.resolve();
    assert!(result.success);
    assert_eq!(result.entries[0].package.as_ref().unwrap().source, "system");
}

#[test]
fn earlier_repository_wins_over_newer_version_later() {
    let mut ctx = Context::new();
    ctx.given_remote_package("rings-of-power-1.1.0", &[]);
    ctx.given_project_package("rings-of-power-1.0.0", &[]);
    ctx.given_descriptor(&["depends: rings-of-power"]);

    let result = ctx.resolve();
    assert!(result.success);
    let rings = result.entries[0].package.as_ref().unwrap();
    assert_eq!(rings.version, v("1.0.0"));
    assert_eq!(rings.source, "project");
}

#[test]
fn later_repository_used_when_earlier_cannot_satisfy() {
    let mut ctx = Context::new();
    ctx.given_project_package("rings-of-power-1.0.0", &[]);
    ctx.given_remote_package("rings-of-power-1.1.0", &[]);
    ctx.given_descriptor(&["depends: rings-of-power = 1.1.0"]);

    let result = ctx.resolve();
    assert!(result.success);
    assert_eq!(result.entries[0].package.as_ref().unwrap().source, "remote");
}

#[test]
fn overrides_apply_at_every_depth() {
    let mut ctx = Context::new();
    ctx.given_remote_package("one-ring-1.0.0", &[]);
    ctx.given_remote_package("sauron-1.0.0", &["depends: ring-of-power"]);
    ctx.given_project_package("minas-tirith-1.0.0", &[]);
    ctx.given_descriptor(&[
        "depends: sauron",
        "depends: fangorn",
        "override: ring-of-power one-ring",
        "override: fangorn minas-tirith",
    ]);

    let result = ctx.resolve();
    assert!(result.success);
    assert_eq!(result.entries_named("fangorn").count(), 0);
    assert_eq!(result.entries_named("ring-of-power").count(), 0);

    let minas = result.entries_named("minas-tirith").next().unwrap();
    assert_eq!(minas.package.as_ref().unwrap().name, "minas-tirith");
    let ring = result.entries_named("one-ring").next().unwrap();
    assert_eq!(ring.package.as_ref().unwrap().name, "one-ring");
}

#[test]
fn version_arity_does_not_matter() {
    let mut ctx = Context::new();
    ctx.given_project_package("sauron-1.0", &[]);
    ctx.given_descriptor(&["depends: sauron = 1.0.0.0"]);

    let result = ctx.resolve();
    assert!(result.success);
    assert_eq!(result.entries[0].package.as_ref().unwrap().version, v("1"));
}

#[test]
fn conjoined_constraints_narrow_the_choice() {
    let mut ctx = Context::new();
    ctx.given_project_package("sauron-1.0.0", &[]);
    ctx.given_project_package("sauron-1.2.0", &[]);
    ctx.given_project_package("sauron-2.0.0", &[]);
    ctx.given_descriptor(&["depends: sauron > 1.0 and = 1.2"]);

    let result = ctx.resolve();
    assert!(result.success);
    assert_eq!(result.entries[0].package.as_ref().unwrap().version, v("1.2.0"));
}

#[test]
fn resolution_is_deterministic() {
    let mut ctx = Context::new();
    given_tolkien_packages(&mut ctx);
    ctx.given_descriptor(&["depends: tolkien"]);

    let render = |r: &ResolutionResult| -> Vec<String> {
        r.entries
            .iter()
            .map(|e| match &e.package {
                Some(p) => format!("{} => {p} ({})", e.requirement, p.source),
                None => format!("{} => none", e.requirement),
            })
            .collect()
    };
    let first = ctx.resolve();
    let second = ctx.resolve();
    assert_eq!(render(&first), render(&second));
    assert_eq!(first.edges, second.edges);
}

#[test]
fn graph_explains_why_a_package_is_present() {
    let mut ctx = Context::new();
    given_tolkien_packages(&mut ctx);
    ctx.given_descriptor(&["depends: tolkien", "depends: sauron = 1.0.0"]);

    let result = ctx.resolve();
    let graph = DependencyGraph::from_resolution("middle-earth", &result);
    let path: Vec<String> = graph
        .find_path("rings-of-power")
        .unwrap()
        .iter()
        .map(|n| n.name.clone())
        .collect();
    assert_eq!(path, vec!["middle-earth", "tolkien", "rings-of-power"]);

    let inverted = graph.print_inverted_tree("sauron");
    assert!(inverted.contains("rings-of-power 1.0.0"));
    assert!(inverted.contains("one-ring-to-rule-them-all 1.0.0"));
}

#[test]
fn directory_repositories_resolve_end_to_end() {
    let tmp = TempDir::new().unwrap();
    let project = tmp.path().join("project");
    let remote = tmp.path().join("remote");
    std::fs::create_dir_all(&project).unwrap();
    std::fs::create_dir_all(&remote).unwrap();
    std::fs::write(
        project.join("tolkien-1.0.0.tether"),
        "description: Author\n  of the legendarium\ndepends: sauron > 0.9\n",
    )
    .unwrap();
    std::fs::write(remote.join("sauron-1.0.0.tether"), "").unwrap();
    std::fs::write(remote.join("sauron-1.1.0.tether"), "").unwrap();

    let retry = RetryPolicy::new(1, Duration::ZERO);
    let project = DirectoryRepository::open("project", &project, &retry).unwrap();
    let remote = DirectoryRepository::open("remote", &remote, &retry).unwrap();
    let repositories: Vec<&dyn PackageRepository> = vec![&project, &remote];

    let root = Descriptor::parse("app", "depends: tolkien").unwrap();
    let result = try_resolve_dependencies(&root, &repositories);
    assert!(result.success);
    let packages: Vec<String> = result.packages().map(|p| p.to_string()).collect();
    assert_eq!(packages, vec!["tolkien 1.0.0", "sauron 1.1.0"]);
}
