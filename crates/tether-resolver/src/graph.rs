//! Dependency graph construction and traversal over a resolution result.

use std::collections::HashSet;
use std::fmt;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::resolver::ResolutionResult;

/// A node in the resolved dependency graph: the root, or one result entry.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct ResolvedNode {
    pub name: String,
    /// `None` for the root project or an unresolved requirement.
    pub version: Option<String>,
    /// The requirement as declared; empty for the root.
    pub requirement: String,
}

impl fmt::Display for ResolvedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.version, self.requirement.is_empty()) {
            (Some(v), _) => write!(f, "{} {v}", self.name),
            (None, true) => f.write_str(&self.name),
            (None, false) => write!(f, "{} (unresolved: {})", self.name, self.requirement),
        }
    }
}

/// A resolved dependency graph backed by petgraph.
///
/// Node `i + 1` is result entry `i`; node `0` is the root.
pub struct DependencyGraph {
    graph: DiGraph<ResolvedNode, ()>,
    root: NodeIndex,
}

impl DependencyGraph {
    /// Build the graph for `result`, whose root descriptor is named `root_name`.
    pub fn from_resolution(root_name: &str, result: &ResolutionResult) -> Self {
        let mut graph = DiGraph::new();
        let root = graph.add_node(ResolvedNode {
            name: root_name.to_string(),
            version: None,
            requirement: String::new(),
        });

        let nodes: Vec<NodeIndex> = result
            .entries
            .iter()
            .map(|entry| {
                graph.add_node(ResolvedNode {
                    name: entry.name().to_string(),
                    version: entry.package.as_ref().map(|p| p.version.to_string()),
                    requirement: entry.requirement.to_string(),
                })
            })
            .collect();

        for edge in &result.edges {
            let from = edge.from.map_or(root, |i| nodes[i]);
            let to = nodes[edge.to];
            if !graph.edges(from).any(|e| e.target() == to) {
                graph.add_edge(from, to, ());
            }
        }

        Self { graph, root }
    }

    /// Get the node data for an index.
    pub fn node(&self, idx: NodeIndex) -> &ResolvedNode {
        &self.graph[idx]
    }

    /// Look up the first node carrying `name`, excluding the root.
    pub fn find(&self, name: &str) -> Option<NodeIndex> {
        self.graph
            .node_indices()
            .find(|&idx| idx != self.root && self.graph[idx].name == name)
    }

    /// Direct dependencies of a node, in the order they were requested.
    pub fn dependencies_of(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut deps: Vec<NodeIndex> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| e.target())
            .collect();
        deps.sort();
        deps
    }

    /// Reverse dependencies (who depends on this node).
    pub fn dependents_of(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut deps: Vec<NodeIndex> = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .map(|e| e.source())
            .collect();
        deps.sort();
        deps
    }

    /// Print the dependency tree to a string. Cycles are cut where they close.
    pub fn print_tree(&self, max_depth: Option<usize>) -> String {
        let mut output = format!("{}\n", self.graph[self.root]);
        let mut visited = HashSet::new();
        visited.insert(self.root);

        let deps = self.dependencies_of(self.root);
        let count = deps.len();
        for (i, idx) in deps.into_iter().enumerate() {
            let is_last = i == count - 1;
            self.print_subtree(&mut output, idx, "", is_last, 1, max_depth, &mut visited);
        }
        output
    }

    #[allow(clippy::too_many_arguments)]
    fn print_subtree(
        &self,
        output: &mut String,
        idx: NodeIndex,
        prefix: &str,
        is_last: bool,
        depth: usize,
        max_depth: Option<usize>,
        visited: &mut HashSet<NodeIndex>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        let node = &self.graph[idx];
        if !visited.insert(idx) {
            output.push_str(&format!("{prefix}{connector}{node} (*)\n"));
            return;
        }
        output.push_str(&format!("{prefix}{connector}{node}\n"));

        if max_depth.map_or(true, |max| depth < max) {
            let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
            let deps = self.dependencies_of(idx);
            let count = deps.len();
            for (i, child) in deps.into_iter().enumerate() {
                let is_last = i == count - 1;
                self.print_subtree(
                    output,
                    child,
                    &child_prefix,
                    is_last,
                    depth + 1,
                    max_depth,
                    visited,
                );
            }
        }

        visited.remove(&idx);
    }

    /// Find the path from the root to the first node named `name`.
    pub fn find_path(&self, name: &str) -> Option<Vec<&ResolvedNode>> {
        let target = self.find(name)?;
        let mut path = Vec::new();
        let mut visited = HashSet::new();
        if self.dfs_path(self.root, target, &mut path, &mut visited) {
            Some(path.iter().map(|&idx| &self.graph[idx]).collect())
        } else {
            None
        }
    }

    fn dfs_path(
        &self,
        current: NodeIndex,
        target: NodeIndex,
        path: &mut Vec<NodeIndex>,
        visited: &mut HashSet<NodeIndex>,
    ) -> bool {
        path.push(current);
        if current == target {
            return true;
        }
        if !visited.insert(current) {
            path.pop();
            return false;
        }
        for child in self.dependencies_of(current) {
            if self.dfs_path(child, target, path, visited) {
                return true;
            }
        }
        path.pop();
        false
    }

    /// Build an inverted dependency tree (reverse edges) for the first node named `name`.
    pub fn print_inverted_tree(&self, name: &str) -> String {
        let mut output = String::new();
        let Some(idx) = self.find(name) else {
            return output;
        };

        output.push_str(&format!("{}\n", self.graph[idx]));

        let mut visited = HashSet::new();
        visited.insert(idx);

        let dependents = self.dependents_of(idx);
        let count = dependents.len();
        for (i, dep_idx) in dependents.into_iter().enumerate() {
            let is_last = i == count - 1;
            self.print_inverted_subtree(&mut output, dep_idx, "", is_last, &mut visited);
        }

        output
    }

    fn print_inverted_subtree(
        &self,
        output: &mut String,
        idx: NodeIndex,
        prefix: &str,
        is_last: bool,
        visited: &mut HashSet<NodeIndex>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        let node = &self.graph[idx];
        output.push_str(&format!("{prefix}{connector}{node}\n"));

        if !visited.insert(idx) {
            return;
        }

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let dependents = self.dependents_of(idx);
        let count = dependents.len();
        for (i, dep_idx) in dependents.into_iter().enumerate() {
            let is_last = i == count - 1;
            self.print_inverted_subtree(output, dep_idx, &child_prefix, is_last, visited);
        }

        visited.remove(&idx);
    }

    /// Number of entry nodes (excluding root).
    pub fn len(&self) -> usize {
        self.graph.node_count() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
