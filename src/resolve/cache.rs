//! Run-scoped memo of resolved dependency closures
//!
//! Each import path maps to the full list of local packages it pulls in,
//! itself first. Entries are written once and never replaced, so a value read
//! from the cache is always a finished closure.

use super::model::Dependency;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Resolved closure for one import path
pub type Closure = Arc<[Dependency]>;

/// Shared resolution cache for one discovery run.
///
/// Safe to share between workers. Two workers may race to compute the same
/// key; the first insert wins and later inserts get the stored value back.
#[derive(Debug, Default)]
pub struct DependencyCache {
    entries: Mutex<HashMap<String, Closure>>,
}

impl DependencyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap in Arc for sharing across workers
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Look up a finished closure
    pub fn get(&self, import: &str) -> Option<Closure> {
        self.lock().get(import).cloned()
    }

    pub fn contains(&self, import: &str) -> bool {
        self.lock().contains_key(import)
    }

    /// Store a closure unless one is already present, returning the stored value
    pub fn insert(&self, import: &str, closure: Closure) -> Closure {
        self.lock()
            .entry(import.to_string())
            .or_insert(closure)
            .clone()
    }

    /// Number of memoized import paths (dead ends included)
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of import paths that resolved to a package (dead ends excluded)
    pub fn resolved(&self) -> usize {
        self.lock().values().filter(|c| !c.is_empty()).count()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Closure>> {
        // A panic while holding the lock cannot leave a half-written entry
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// The empty closure, used for non-local and unresolvable imports
pub fn empty_closure() -> Closure {
    Arc::from(Vec::new())
}
