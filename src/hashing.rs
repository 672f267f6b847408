//! This module provides deterministic `HashMap` and `HashSet` variants and the insertion-ordered
//! map used for every collection the engine iterates. The hashing data structures in the standard
//! library are not deterministic:
//!
//! > By default, HashMap uses a hashing algorithm selected to provide
//! > resistance against HashDoS attacks. The algorithm is randomly seeded, and a
//! > reasonable best-effort is made to generate this seed from a high quality,
//! > secure source of randomness provided by the host without blocking the program.
//!
//! A run must be reproducible from its seed, so any collection whose iteration order can reach a
//! random draw or a report uses either the `FxHasher` variants exported here or [`IndexMap`], which
//! iterates in insertion order. The standard library `HashMap` has a `new` method, but
//! `HashMap<K, V, S>` does not have a `new` method by default. Use `HashMap::default()` instead, or
//! bring the `HashMapExt` / `HashSetExt` traits into scope.

use rustc_hash::FxBuildHasher;

pub use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};

/// An insertion-ordered map with a deterministic hasher.
pub type IndexMap<K, V> = indexmap::IndexMap<K, V, FxBuildHasher>;

pub trait HashMapExt {
    fn new() -> Self;
}

impl<K, V> HashMapExt for HashMap<K, V> {
    fn new() -> Self {
        HashMap::default()
    }
}

pub trait HashSetExt {
    fn new() -> Self;
}

impl<T> HashSetExt for HashSet<T> {
    fn new() -> Self {
        HashSet::default()
    }
}
