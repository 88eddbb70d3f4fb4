//! Dependency resolution.
//!
//! The resolver walks the catalog's declared dependencies from the requested
//! library and pins every reached library to one concrete release. The set
//! of reached releases depends only on the catalog graph, never on the order
//! the walk visits it, and so does the reported error: conflicts and lookup
//! failures are collected during the walk and the one for the smallest
//! library name is reported afterwards.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use libman_index::{Catalog, LibraryIdentity, LibraryRelease, VersionRequirement};
use libman_store::{InstallLocation, LibraryStore};
use semver::Version;

use crate::error::{Error, Result};
use crate::order::InstallGraph;

/// How a resolution runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Where the libraries will be installed.
    pub location: InstallLocation,
    /// Resolve the requested library alone.
    pub no_deps: bool,
    /// Prefer installed versions for dependencies that accept any version.
    pub no_overwrite: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            location: InstallLocation::User,
            no_deps: false,
            no_overwrite: false,
        }
    }
}

/// The conflict-free set of libraries a request needs, keyed by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyClosure {
    root: String,
    entries: BTreeMap<String, LibraryIdentity>,
    /// Dependent -> dependencies, restricted to names in the closure.
    edges: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyClosure {
    /// Closure holding only `root`, unpinned.
    pub fn singleton(root: LibraryIdentity) -> Self {
        let name = root.name.clone();
        Self {
            root: name.clone(),
            entries: BTreeMap::from([(name.clone(), root)]),
            edges: BTreeMap::from([(name, BTreeSet::new())]),
        }
    }

    /// Name of the requested library.
    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn get(&self, name: &str) -> Option<&LibraryIdentity> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Identities sorted by name.
    pub fn identities(&self) -> impl Iterator<Item = &LibraryIdentity> {
        self.entries.values()
    }

    /// Direct dependencies of `name` within the closure.
    pub fn dependencies_of(&self, name: &str) -> impl Iterator<Item = &str> {
        self.edges
            .get(name)
            .into_iter()
            .flat_map(|deps| deps.iter().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Identities with dependencies before their dependents.
    pub fn install_order(&self) -> Vec<&LibraryIdentity> {
        let mut graph = InstallGraph::new();
        for name in self.entries.keys() {
            graph.add_node(name);
        }
        for (from, deps) in &self.edges {
            for to in deps {
                graph.add_edge(from, to);
            }
        }
        graph
            .topological_sort()
            .into_iter()
            .filter_map(|name| self.entries.get(name))
            .collect()
    }
}

/// Expand `root` into its dependency closure.
///
/// Fails with [`Error::DependencyConflict`] when two different releases of
/// one library are reached, or with a catalog lookup error when a required
/// release does not exist. Conflicts are reported in preference to lookup
/// failures.
pub fn resolve_dependencies(
    catalog: &dyn Catalog,
    store: &dyn LibraryStore,
    root: &LibraryIdentity,
    options: &ResolveOptions,
) -> Result<DependencyClosure> {
    if options.no_deps {
        return Ok(DependencyClosure::singleton(root.clone()));
    }

    let mut pending: Vec<(LibraryIdentity, bool)> = vec![(root.clone(), true)];
    let mut expanded: HashSet<(String, Version)> = HashSet::new();
    let mut reached: BTreeMap<String, BTreeSet<Version>> = BTreeMap::new();
    let mut edges: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let mut failures: BTreeMap<(String, String), Error> = BTreeMap::new();

    while let Some((identity, is_root)) = pending.pop() {
        let release = match select_release(catalog, store, &identity, is_root, options) {
            Ok(release) => release,
            Err(e) => {
                failures
                    .entry((identity.name.clone(), identity.version_required.to_string()))
                    .or_insert(e);
                continue;
            }
        };

        if !expanded.insert((release.name.clone(), release.version.clone())) {
            continue;
        }
        tracing::trace!(library = %release, "Expanding dependencies");

        reached
            .entry(release.name.clone())
            .or_default()
            .insert(release.version.clone());
        let deps = edges.entry(release.name.clone()).or_default();
        for dep in catalog.dependencies_of(release) {
            deps.insert(dep.name.clone());
            pending.push((dep.clone(), false));
        }
    }

    if let Some((library, versions)) = reached.iter().find(|(_, versions)| versions.len() > 1) {
        let mut versions = versions.iter();
        if let (Some(first), Some(second)) = (versions.next(), versions.next()) {
            return Err(Error::DependencyConflict {
                library: library.clone(),
                first: first.clone(),
                second: second.clone(),
            });
        }
    }
    if let Some((_, err)) = failures.into_iter().next() {
        return Err(err);
    }

    let entries: BTreeMap<String, LibraryIdentity> = reached
        .into_iter()
        .filter_map(|(name, versions)| {
            let version = versions.into_iter().next()?;
            let identity = LibraryIdentity::new(name.clone(), VersionRequirement::exact(&version));
            Some((name, identity))
        })
        .collect();
    for deps in edges.values_mut() {
        deps.retain(|dep| entries.contains_key(dep));
    }

    tracing::debug!(root = %root, libraries = entries.len(), "Resolved dependencies");
    Ok(DependencyClosure {
        root: root.name.clone(),
        entries,
        edges,
    })
}

/// The release an identity resolves to during the walk.
fn select_release<'a>(
    catalog: &'a dyn Catalog,
    store: &dyn LibraryStore,
    identity: &LibraryIdentity,
    is_root: bool,
    options: &ResolveOptions,
) -> Result<&'a LibraryRelease> {
    if options.no_overwrite && !is_root && identity.version_required.is_latest() {
        if let Some(installed) = store.installed(&identity.name, options.location)? {
            let pinned = VersionRequirement::exact(&installed.version);
            if let Ok(release) = catalog.find_release(&identity.name, &pinned) {
                return Ok(release);
            }
        }
    }
    Ok(catalog.find_release(&identity.name, &identity.version_required)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singleton_closure() {
        let closure = DependencyClosure::singleton(LibraryIdentity::latest("Foo"));
        assert_eq!(closure.root(), "Foo");
        assert_eq!(closure.len(), 1);
        assert!(closure.get("Foo").unwrap().version_required.is_latest());
        assert_eq!(closure.dependencies_of("Foo").count(), 0);
    }
}
