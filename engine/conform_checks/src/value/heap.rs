//! Enforced-Arc wrapper for heap-allocated values.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Shared, immutable heap allocation.
///
/// The constructor is crate-private, so external code cannot build heap
/// values directly: all allocation goes through the `Value` factory
/// methods. Cloning shares the allocation (thread-safe reference
/// counting via `Arc`).
pub struct Heap<T: ?Sized>(pub(crate) Arc<T>);

impl<T> Heap<T> {
    /// Allocate a value on the heap.
    ///
    /// Crate-private: use the `Value` factory methods instead.
    pub(crate) fn new(value: T) -> Self {
        Heap(Arc::new(value))
    }
}

impl<T: ?Sized> Clone for Heap<T> {
    fn clone(&self) -> Self {
        Heap(Arc::clone(&self.0))
    }
}

impl<T: ?Sized> Deref for Heap<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T: ?Sized + fmt::Display> fmt::Display for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T: ?Sized + PartialEq> PartialEq for Heap<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T: ?Sized + Eq> Eq for Heap<T> {}

impl<T: ?Sized + std::hash::Hash> std::hash::Hash for Heap<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}
