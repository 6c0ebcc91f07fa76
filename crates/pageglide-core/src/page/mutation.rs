use std::collections::VecDeque;

use super::element::ElementId;

/// One child-list change: elements attached to or detached from a parent.
///
/// Only structural changes are recorded. Style, class and content-string
/// edits do not produce batches, mirroring child-list observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationBatch {
    /// Monotonically increasing, 1-based. Revision 0 means "before any
    /// mutation" and is the natural starting cursor.
    pub revision: u64,
    pub added: Vec<ElementId>,
    pub removed: Vec<ElementId>,
}

/// Bounded history of child-list changes with cursor-based reads.
#[derive(Debug)]
pub(crate) struct MutationLog {
    batches: VecDeque<MutationBatch>,
    next_revision: u64,
    capacity: usize,
}

impl MutationLog {
    const DEFAULT_CAPACITY: usize = 256;

    pub(crate) fn new() -> Self {
        Self {
            batches: VecDeque::new(),
            next_revision: 1,
            capacity: Self::DEFAULT_CAPACITY,
        }
    }

    pub(crate) fn record(&mut self, added: Vec<ElementId>, removed: Vec<ElementId>) -> u64 {
        let revision = self.next_revision;
        self.next_revision += 1;
        self.batches.push_back(MutationBatch {
            revision,
            added,
            removed,
        });
        while self.batches.len() > self.capacity {
            self.batches.pop_front();
        }
        revision
    }

    /// Last assigned revision, 0 when nothing has been recorded.
    pub(crate) fn revision(&self) -> u64 {
        self.next_revision - 1
    }

    /// Batches newer than `cursor`, oldest first. Batches evicted by the
    /// capacity bound are gone; callers that fall far behind miss them.
    pub(crate) fn since(&self, cursor: u64) -> impl Iterator<Item = &MutationBatch> {
        self.batches.iter().filter(move |b| b.revision > cursor)
    }

    pub(crate) fn clear(&mut self) {
        self.batches.clear();
    }
}
