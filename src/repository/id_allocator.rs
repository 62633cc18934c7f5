use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::record::{Record, RecordId};

/// Mints record ids from a monotonic counter.
///
/// The counter starts above the highest numeric id it has seen and never
/// moves backwards, so deleting a record and adding another can't reuse an
/// id that is still in the collection. Once the counter has handed out
/// `u64::MAX` it falls back to the lowest free numeric id.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
    exhausted: bool,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self {
            next: 1,
            exhausted: false,
        }
    }
}

impl IdAllocator {
    pub fn for_collection<R: Record>(collection: &[Arc<R>]) -> Self {
        let mut allocator = Self::default();
        allocator.observe(collection);
        allocator
    }

    /// Raises the counter past every numeric id in `collection`.
    pub fn observe<R: Record>(&mut self, collection: &[Arc<R>]) {
        if let Some(max) = collection.iter().filter_map(|r| r.id().numeric()).max() {
            self.next = self.next.max(max.saturating_add(1));
        }
    }

    /// Returns an id not present in `collection`.
    pub fn allocate<R: Record>(&mut self, collection: &[Arc<R>]) -> RecordId {
        while !self.exhausted {
            let candidate = RecordId::from(self.next);
            match self.next.checked_add(1) {
                Some(next) => self.next = next,
                None => self.exhausted = true,
            }
            if !collection.iter().any(|r| r.id() == &candidate) {
                return candidate;
            }
        }

        let used: HashSet<u64> = collection.iter().filter_map(|r| r.id().numeric()).collect();
        match (1..=u64::MAX).find(|n| !used.contains(n)) {
            Some(free) => RecordId::from(free),
            None => RecordId::new(Uuid::new_v4().to_string()),
        }
    }

    pub fn peek(&self) -> u64 {
        self.next
    }
}
