//! Process-lifetime cache of compiled checkers.
//!
//! Created once with its owning compiler and never cleared. Concurrent
//! population is tolerated: two callers racing to compile the same spec
//! both produce behavior-equivalent checkers, so the insert is
//! last-writer-wins and needs no coordination beyond the map lock.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::SpecKey;
use crate::checker::Checker;

pub(crate) struct CheckerCache {
    map: RwLock<FxHashMap<SpecKey, Checker>>,
}

impl CheckerCache {
    pub(crate) fn new() -> Self {
        CheckerCache {
            map: RwLock::new(FxHashMap::default()),
        }
    }

    /// Look up a previously compiled checker.
    pub(crate) fn get(&self, key: &SpecKey) -> Option<Checker> {
        self.map.read().get(key).cloned()
    }

    /// Record a compiled checker. Last writer wins on a race.
    pub(crate) fn insert(&self, key: SpecKey, checker: Checker) {
        self.map.write().insert(key, checker);
    }

    /// Number of cached checkers.
    pub(crate) fn len(&self) -> usize {
        self.map.read().len()
    }
}
