//! Item state container.
//!
//! Holds every accepted item in submission order and applies the
//! orchestrator's [`ItemUpdate`]s, enforcing the forward-only lifecycle.

use std::sync::Arc;
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::core::resources::{ObjectUrl, UrlRegistry};
use crate::core::{ImageItem, ItemId, ItemStatus, ItemUpdate};
use crate::utils::{download_name, StoreError};

struct Entry {
    item: ImageItem,
    /// Source preview first, then the compressed artifact once done
    urls: Vec<ObjectUrl>,
}

/// A compressed artifact ready to hand to the user.
#[derive(Debug, Clone)]
pub struct Download {
    pub file_name: String,
    pub url: String,
    pub bytes: Arc<[u8]>,
}

/// Collection of items for one session.
#[derive(Default)]
pub struct ItemStore {
    entries: IndexMap<ItemId, Entry>,
    registry: UrlRegistry,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking `item` and registers its source preview URL.
    pub fn insert(&mut self, item: ImageItem) -> Result<(), StoreError> {
        if self.entries.contains_key(&item.id) {
            return Err(StoreError::Duplicate(item.id));
        }
        let preview = self.registry.create(Arc::clone(&item.source));
        self.entries.insert(item.id, Entry { item, urls: vec![preview] });
        Ok(())
    }

    /// Applies one update.
    ///
    /// Updates for ids no longer tracked are dropped silently: removing an
    /// item detaches any work still in flight for it.
    pub fn apply(&mut self, update: ItemUpdate) -> Result<(), StoreError> {
        match update {
            ItemUpdate::Added(item) => self.insert(item),
            ItemUpdate::Compressing(id) => match self.entries.get_mut(&id) {
                Some(entry) => transition(entry, ItemStatus::Compressing),
                None => detached(id),
            },
            ItemUpdate::Compressed { id, bytes } => {
                let Some(entry) = self.entries.get_mut(&id) else {
                    return detached(id);
                };
                transition(entry, ItemStatus::Done { bytes: Arc::clone(&bytes) })?;
                entry.urls.push(self.registry.create(bytes));
                Ok(())
            }
            ItemUpdate::Failed { id, message } => match self.entries.get_mut(&id) {
                Some(entry) => transition(entry, ItemStatus::Error { message }),
                None => detached(id),
            },
            ItemUpdate::Analysed { id, text } => {
                let Some(entry) = self.entries.get_mut(&id) else {
                    return detached(id);
                };
                if entry.item.analysis_text.is_some() {
                    debug!("Item {id} already has an analysis; keeping the first");
                } else {
                    entry.item.analysis_text = Some(text);
                }
                Ok(())
            }
        }
    }

    pub fn get(&self, id: ItemId) -> Option<&ImageItem> {
        self.entries.get(&id).map(|e| &e.item)
    }

    /// Items in submission order.
    pub fn items(&self) -> impl Iterator<Item = &ImageItem> {
        self.entries.values().map(|e| &e.item)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// URLs currently held by an item.
    pub fn urls(&self, id: ItemId) -> Vec<&str> {
        self.entries
            .get(&id)
            .map(|e| e.urls.iter().map(ObjectUrl::as_str).collect())
            .unwrap_or_default()
    }

    /// Download handle for a finished item.
    pub fn download(&self, id: ItemId) -> Option<Download> {
        let entry = self.entries.get(&id)?;
        let ItemStatus::Done { bytes } = &entry.item.status else {
            return None;
        };
        Some(Download {
            file_name: download_name(&entry.item.file_name),
            url: entry.urls.last()?.as_str().to_string(),
            bytes: Arc::clone(bytes),
        })
    }

    /// Removes an item and releases every URL it held.
    pub fn remove(&mut self, id: ItemId) -> Option<ImageItem> {
        let entry = self.entries.shift_remove(&id)?;
        debug!("Removed item {id}, releasing {} URL(s)", entry.urls.len());
        Some(entry.item)
    }

    pub fn registry(&self) -> &UrlRegistry {
        &self.registry
    }
}

fn detached(id: ItemId) -> Result<(), StoreError> {
    debug!("Dropping update for detached item {id}");
    Ok(())
}

fn transition(entry: &mut Entry, next: ItemStatus) -> Result<(), StoreError> {
    let current = &entry.item.status;
    if next.rank() != current.rank() + 1 {
        let err = StoreError::InvalidTransition {
            id: entry.item.id,
            from: current.label(),
            to: next.label(),
        };
        warn!("{err}");
        return Err(err);
    }
    entry.item.status = next;
    Ok(())
}
