//! Install ordering.
//!
//! Edges point from dependent to dependency: if A depends on B, the edge is
//! `A -> B`, and B is installed before A.
//!
//! # Example
//!
//! ```
//! use libman_core::order::InstallGraph;
//!
//! let mut graph = InstallGraph::new();
//! graph.add_node("Foo");
//! graph.add_node("Bar");
//! graph.add_edge("Foo", "Bar");
//!
//! assert_eq!(graph.topological_sort(), vec!["Bar", "Foo"]);
//! ```

use std::collections::{BTreeMap, BTreeSet};

/// Dependency graph between the libraries of one install batch.
#[derive(Debug, Clone, Default)]
pub struct InstallGraph<'a> {
    nodes: BTreeSet<&'a str>,
    /// Adjacency list: key depends on each value.
    edges: BTreeMap<&'a str, BTreeSet<&'a str>>,
}

impl<'a> InstallGraph<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, name: &'a str) {
        self.nodes.insert(name);
        self.edges.entry(name).or_default();
    }

    /// Declare that `from` depends on `to`. Edges to unknown nodes and
    /// self-edges are ignored when sorting.
    pub fn add_edge(&mut self, from: &'a str, to: &'a str) {
        self.edges.entry(from).or_default().insert(to);
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Kahn's algorithm, always taking the smallest ready name.
    ///
    /// Nodes caught in a dependency cycle cannot be ordered; they are
    /// appended by name after everything else.
    pub fn topological_sort(&self) -> Vec<&'a str> {
        // Unsatisfied dependencies per node
        let mut pending: BTreeMap<&str, usize> = self
            .nodes
            .iter()
            .map(|&name| (name, self.known_dependencies(name).count()))
            .collect();

        let mut ready: BTreeSet<&str> = pending
            .iter()
            .filter(|&(_, &count)| count == 0)
            .map(|(&name, _)| name)
            .collect();

        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(current) = ready.pop_first() {
            order.push(current);
            pending.remove(current);

            for (&dependent, count) in pending.iter_mut() {
                if self.known_dependencies(dependent).any(|dep| dep == current) {
                    *count -= 1;
                    if *count == 0 {
                        ready.insert(dependent);
                    }
                }
            }
        }

        if !pending.is_empty() {
            tracing::debug!(
                cycle = ?pending.keys().collect::<Vec<_>>(),
                "Dependency cycle, installing remaining libraries by name"
            );
            order.extend(pending.into_keys());
        }
        order
    }

    fn known_dependencies(&self, name: &'a str) -> impl Iterator<Item = &'a str> + '_ {
        self.edges
            .get(name)
            .into_iter()
            .flatten()
            .copied()
            .filter(move |&dep| dep != name && self.nodes.contains(dep))
    }
}
