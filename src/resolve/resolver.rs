//! Transitive local dependency resolution
//!
//! Resolving an import yields the import itself followed by every local
//! package it reaches. The walk is a depth-first search on an explicit stack,
//! so deep package graphs never hit the call-stack limit.
//!
//! Import cycles are common with paired test helpers. Packages caught in a
//! cycle form a strongly connected component and share one closure: a
//! component is only memoized once all of its members are fully expanded
//! (Tarjan's algorithm), so the cache never holds a partial view and every
//! member lists all the others.

use super::cache::{empty_closure, Closure, DependencyCache};
use super::lookup::LocalPathResolver;
use super::model::{Dependency, Resolution};
use crate::source::ImportExtractor;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Resolves import paths to their local dependency closures.
///
/// Cloning is cheap and clones share the same cache, which is how parallel
/// discovery hands one resolver to each worker.
#[derive(Clone)]
pub struct DependencyResolver {
    resolution: Resolution,
    extractor: Arc<dyn ImportExtractor>,
    paths: Arc<dyn LocalPathResolver>,
    cache: Arc<DependencyCache>,
}

/// A package being expanded during one top-level call
struct Node {
    dependency: Dependency,
    /// Local imports of the package directory
    edges: Vec<String>,
    lowlink: usize,
    on_path: bool,
}

/// Bookkeeping for one top-level call, dropped when it returns
#[derive(Default)]
struct Walk {
    /// Position in `nodes` doubles as the discovery index
    index_of: HashMap<String, usize>,
    nodes: Vec<Node>,
    /// Explicit call stack: (node, next edge to follow)
    frames: Vec<(usize, usize)>,
    /// Packages entered but whose component is not finished yet
    visiting: Vec<usize>,
}

impl DependencyResolver {
    pub fn new(
        resolution: Resolution,
        extractor: Arc<dyn ImportExtractor>,
        paths: Arc<dyn LocalPathResolver>,
    ) -> Self {
        Self {
            resolution,
            extractor,
            paths,
            cache: DependencyCache::shared(),
        }
    }

    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    pub fn cache(&self) -> &Arc<DependencyCache> {
        &self.cache
    }

    /// Resolve `import` to itself plus every local package it pulls in.
    ///
    /// Non-local and unresolvable imports yield an empty closure.
    pub fn resolve(&self, import: &str) -> Closure {
        if !self.resolution.is_local(import) {
            return empty_closure();
        }
        if let Some(hit) = self.cache.get(import) {
            trace!("Cache hit for {}", import);
            return hit;
        }

        let mut walk = Walk::default();
        if self.enter(import, &mut walk) {
            self.run(&mut walk);
        }

        self.cache.get(import).unwrap_or_else(empty_closure)
    }

    fn run(&self, walk: &mut Walk) {
        while let Some(frame) = walk.frames.last_mut() {
            let (node, next) = *frame;
            match walk.nodes[node].edges.get(next).cloned() {
                Some(child) => {
                    frame.1 += 1;
                    self.follow(node, &child, walk);
                }
                None => {
                    walk.frames.pop();
                    self.finish(node, walk);
                }
            }
        }
    }

    /// Handle the edge `parent -> child`
    fn follow(&self, parent: usize, child: &str, walk: &mut Walk) {
        if let Some(&seen) = walk.index_of.get(child) {
            if walk.nodes[seen].on_path {
                debug!(
                    "Import cycle: {} -> {}",
                    walk.nodes[parent].dependency.import, child
                );
                let low = walk.nodes[parent].lowlink.min(seen);
                walk.nodes[parent].lowlink = low;
            }
            // Otherwise its component already finished and is cached
            return;
        }

        if self.cache.contains(child) {
            return;
        }

        self.enter(child, walk);
    }

    /// Start expanding `import`. Returns false for dead ends, which are
    /// cached as empty right away.
    fn enter(&self, import: &str, walk: &mut Walk) -> bool {
        let path = match self.paths.resolve_local_path(import) {
            Ok(path) => path,
            Err(e) => {
                debug!("Not expanding unresolved import: {}", e);
                self.cache.insert(import, empty_closure());
                return false;
            }
        };

        let edges = match self
            .extractor
            .directory_imports(&path, self.resolution.include_tests)
        {
            Ok(imports) => imports
                .into_iter()
                .filter(|i| self.resolution.is_local(i))
                .collect(),
            Err(e) => {
                warn!("Not expanding {}: {}", import, e);
                Vec::new()
            }
        };

        let index = walk.nodes.len();
        walk.nodes.push(Node {
            dependency: Dependency::new(import, path),
            edges,
            lowlink: index,
            on_path: true,
        });
        walk.index_of.insert(import.to_string(), index);
        walk.visiting.push(index);
        walk.frames.push((index, 0));
        true
    }

    /// All edges of `node` are done
    fn finish(&self, node: usize, walk: &mut Walk) {
        let low = walk.nodes[node].lowlink;
        if let Some(&(parent, _)) = walk.frames.last() {
            let parent_low = walk.nodes[parent].lowlink.min(low);
            walk.nodes[parent].lowlink = parent_low;
        }

        if low != node {
            return;
        }

        // `node` roots a component: it and everything entered after it
        let start = walk
            .visiting
            .iter()
            .rposition(|&n| n == node)
            .unwrap_or(walk.visiting.len());
        let members = walk.visiting.split_off(start);
        for &m in &members {
            walk.nodes[m].on_path = false;
        }

        self.memoize(&members, walk);
    }

    /// Cache the shared closure of a finished component under each member
    fn memoize(&self, members: &[usize], walk: &Walk) {
        let component: HashSet<usize> = members.iter().copied().collect();
        let mut seen = HashSet::new();
        let mut shared: Vec<Dependency> = Vec::new();

        let mut push = |dep: &Dependency, shared: &mut Vec<Dependency>| {
            if seen.insert(dep.import.clone()) {
                shared.push(dep.clone());
            }
        };

        for &m in members {
            push(&walk.nodes[m].dependency, &mut shared);

            for edge in &walk.nodes[m].edges {
                match walk.index_of.get(edge) {
                    Some(i) if component.contains(i) => {
                        push(&walk.nodes[*i].dependency, &mut shared);
                    }
                    _ => {
                        if let Some(closure) = self.cache.get(edge) {
                            for dep in closure.iter() {
                                push(dep, &mut shared);
                            }
                        }
                    }
                }
            }
        }

        if members.len() > 1 {
            debug!(
                "Resolved cycle of {} packages ({} dependencies)",
                members.len(),
                shared.len()
            );
        }

        for &m in members {
            let own = &walk.nodes[m].dependency;
            let closure: Vec<Dependency> = std::iter::once(own.clone())
                .chain(shared.iter().filter(|d| d.import != own.import).cloned())
                .collect();
            trace!("Resolved {} ({} dependencies)", own.import, closure.len());
            self.cache.insert(&own.import, closure.into());
        }
    }
}
