//! Element ID allocation and tombstoning

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Stable identifier for a paragraph or table within one live document.
///
/// IDs are monotonically increasing and session-scoped: an ID refers to the
/// same logical element for the lifetime of the document, regardless of how
/// the element moves, and is never reused after the element is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(u64);

impl ElementId {
    /// Create an ElementId from a raw value (e.g. parsed from a tool call)
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "el-{}", self.0)
    }
}

/// Allocates element IDs for one document and tracks retired ones.
///
/// Assignment happens once per paragraph/table: at tree build time in
/// document order, then on creation by any mutation. Deleted IDs are
/// tombstoned so stale references resolve to not-found instead of aliasing
/// a later element.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u64,
    tombstones: HashSet<ElementId>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next ID
    pub fn assign(&mut self) -> ElementId {
        let id = ElementId(self.next);
        self.next += 1;
        id
    }

    /// Mark an ID as deleted; it will never be handed out again
    pub fn retire(&mut self, id: ElementId) {
        self.tombstones.insert(id);
    }

    /// Check whether an ID has been retired
    pub fn is_retired(&self, id: ElementId) -> bool {
        self.tombstones.contains(&id)
    }

    /// Check whether an ID was ever assigned by this allocator
    pub fn was_assigned(&self, id: ElementId) -> bool {
        id.0 < self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_is_monotonic() {
        let mut alloc = IdAllocator::new();
        let a = alloc.assign();
        let b = alloc.assign();
        let c = alloc.assign();
        assert!(a < b && b < c);
    }

    #[test]
    fn retired_ids_are_not_reused() {
        let mut alloc = IdAllocator::new();
        let a = alloc.assign();
        alloc.retire(a);
        assert!(alloc.is_retired(a));
        let b = alloc.assign();
        assert_ne!(a, b);
        assert!(!alloc.is_retired(b));
    }

    #[test]
    fn display_format() {
        assert_eq!(ElementId::from_raw(7).to_string(), "el-7");
    }
}
