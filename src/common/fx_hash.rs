//! Fast, non-cryptographic hash map/set aliases used throughout the analysis.
//!
//! Variable and node counts are small and local to one routine, so the
//! collision-resistance std's default hasher buys us isn't worth its cost here.

use std::collections::{HashMap, HashSet};

pub use fxhash::FxBuildHasher;

pub type FxHashMap<K, V> = HashMap<K, V, FxBuildHasher>;
pub type FxHashSet<T> = HashSet<T, FxBuildHasher>;
