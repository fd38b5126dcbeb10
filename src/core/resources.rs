//! Displayable-URL resources.
//!
//! Every blob shown to the user (source preview, compressed download) is
//! registered under a `blob:` URL. Each [`ObjectUrl`] revokes its entry
//! exactly once, when dropped, so removing an item releases everything it
//! held.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;
use uuid::Uuid;

type Entries = HashMap<String, Arc<[u8]>>;

/// Registry of live object URLs.
#[derive(Clone, Default)]
pub struct UrlRegistry {
    entries: Arc<Mutex<Entries>>,
}

impl UrlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `bytes` and returns the owning handle.
    pub fn create(&self, bytes: Arc<[u8]>) -> ObjectUrl {
        let url = format!("blob:shrinker/{}", Uuid::new_v4());
        lock(&self.entries).insert(url.clone(), bytes);
        debug!("Created object URL {url}");
        ObjectUrl {
            url,
            entries: Arc::clone(&self.entries),
        }
    }

    /// Bytes behind a live URL.
    pub fn resolve(&self, url: &str) -> Option<Arc<[u8]>> {
        lock(&self.entries).get(url).cloned()
    }

    /// Number of URLs not yet released.
    pub fn live_count(&self) -> usize {
        lock(&self.entries).len()
    }
}

/// Owning handle to one registered URL.
#[derive(Debug)]
pub struct ObjectUrl {
    url: String,
    entries: Arc<Mutex<Entries>>,
}

impl ObjectUrl {
    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        lock(&self.entries).remove(&self.url);
        debug!("Revoked object URL {}", self.url);
    }
}

// A poisoned map is still structurally valid; keep releasing.
fn lock(entries: &Mutex<Entries>) -> MutexGuard<'_, Entries> {
    entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
