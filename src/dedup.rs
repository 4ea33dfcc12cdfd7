//! Batch deduplication by explicit row identity.

use std::collections::HashSet;
use std::hash::Hash;

/// The tuple of fields defining a row's logical identity, independent of
/// reference identity. Rows with equal identity are structural duplicates
/// and only one representative is ever written.
pub trait Identity {
    type Key: Eq + Hash;

    fn identity(&self) -> Self::Key;
}

/// Collapse duplicates to the first representative, preserving order. O(n).
pub fn unique<T: Identity>(items: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::with_capacity(items.len());
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if seen.insert(item.identity()) {
            out.push(item);
        }
    }
    out
}
