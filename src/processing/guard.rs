use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use crate::core::ItemId;

/// Ids currently being compressed.
#[derive(Clone, Default)]
pub struct ActiveSet {
    ids: Arc<Mutex<HashSet<ItemId>>>,
}

impl ActiveSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `id`, or returns `None` if it is already in flight.
    pub fn try_acquire(&self, id: ItemId) -> Option<ActiveGuard> {
        if !lock(&self.ids).insert(id) {
            return None;
        }
        Some(ActiveGuard {
            id,
            ids: Arc::clone(&self.ids),
        })
    }

    pub fn contains(&self, id: ItemId) -> bool {
        lock(&self.ids).contains(&id)
    }

    pub fn len(&self) -> usize {
        lock(&self.ids).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Releases its id on drop, including during unwinding.
#[must_use = "the id is released as soon as the guard is dropped"]
pub struct ActiveGuard {
    id: ItemId,
    ids: Arc<Mutex<HashSet<ItemId>>>,
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        lock(&self.ids).remove(&self.id);
    }
}

fn lock(ids: &Mutex<HashSet<ItemId>>) -> MutexGuard<'_, HashSet<ItemId>> {
    ids.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
