//! Reference caches shared by one import run.
//!
//! Relation rows may only point at entities the run has already seen;
//! dangling references are suppressed at extraction time by consulting
//! these caches rather than enforced by constraints at write time.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

/// Concurrency-safe existence set for external entity ids.
#[derive(Debug, Default)]
pub struct IdCache(RwLock<HashSet<i32>>);

impl IdCache {
    /// Idempotent; concurrent stores of the same id are harmless.
    pub fn store(&self, id: i32) {
        self.0.write().unwrap().insert(id);
    }

    pub fn contains(&self, id: i32) -> bool {
        self.0.read().unwrap().contains(&id)
    }

    pub fn len(&self) -> usize {
        self.0.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Concurrency-safe natural-key resolver: name to surrogate id.
#[derive(Debug, Default)]
pub struct NameCache(RwLock<HashMap<String, i64>>);

impl NameCache {
    /// Last write wins under races; never errors.
    pub fn store(&self, name: impl Into<String>, id: i64) {
        self.0.write().unwrap().insert(name.into(), id);
    }

    pub fn lookup(&self, name: &str) -> Option<i64> {
        self.0.read().unwrap().get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.read().unwrap().contains_key(name)
    }
}

/// The cache bundle for one run: id existence for the primary entities,
/// name resolution for styles and genres. Dependency-injected, rebuilt
/// from scratch each run, never persisted, unbounded for the run.
///
/// Population and consultation run concurrently across windows, so a
/// relation can be dropped even though its target is inserted later in the
/// same run. This is best-effort by design; strengthening it would change
/// observed row counts.
#[derive(Debug, Default)]
pub struct RefCache {
    pub artists: IdCache,
    pub labels: IdCache,
    pub masters: IdCache,
    pub styles: NameCache,
    pub genres: NameCache,
}

impl RefCache {
    pub fn new() -> Self {
        Self::default()
    }
}
