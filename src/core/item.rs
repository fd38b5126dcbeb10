//! Image item definition and lifecycle state.

use std::fmt;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier assigned when a file is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One accepted upload: its display name and untouched bytes.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Arc<[u8]>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Lifecycle of an item. Transitions only move forward:
/// `Pending -> Compressing -> {Done | Error}`.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemStatus {
    Pending,
    Compressing,
    Done { bytes: Arc<[u8]> },
    Error { message: String },
}

impl ItemStatus {
    /// Position in the state machine; terminal states share the last rank.
    pub(crate) fn rank(&self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Compressing => 1,
            Self::Done { .. } | Self::Error { .. } => 2,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.rank() == 2
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Compressing => "compressing",
            Self::Done { .. } => "done",
            Self::Error { .. } => "error",
        }
    }
}

/// One submitted image and its derived state through the pipeline.
#[derive(Debug, Clone)]
pub struct ImageItem {
    pub id: ItemId,
    pub file_name: String,
    pub source: Arc<[u8]>,
    pub original_size: usize,
    pub status: ItemStatus,
    pub analysis_text: Option<String>,
}

impl ImageItem {
    /// Creates a pending item with a fresh id.
    pub fn new(file: SourceFile) -> Self {
        Self {
            id: ItemId::new(),
            original_size: file.bytes.len(),
            file_name: file.name,
            source: file.bytes,
            status: ItemStatus::Pending,
            analysis_text: None,
        }
    }

    pub fn compressed_bytes(&self) -> Option<&[u8]> {
        match &self.status {
            ItemStatus::Done { bytes } => Some(bytes),
            _ => None,
        }
    }

    pub fn compressed_size(&self) -> Option<usize> {
        self.compressed_bytes().map(<[u8]>::len)
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            ItemStatus::Error { message } => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_item_is_pending_with_source_size() {
        let item = ImageItem::new(SourceFile::new("a.png", vec![1u8, 2, 3]));
        assert_eq!(item.status, ItemStatus::Pending);
        assert_eq!(item.original_size, 3);
        assert!(item.compressed_bytes().is_none());
        assert!(item.error_message().is_none());
    }

    #[test]
    fn compressed_size_tracks_blob_length() {
        let mut item = ImageItem::new(SourceFile::new("a.png", vec![0u8; 10]));
        item.status = ItemStatus::Done { bytes: Arc::from(vec![7u8; 4]) };
        assert_eq!(item.compressed_size(), Some(4));
        assert_eq!(item.compressed_bytes().map(<[u8]>::len), item.compressed_size());
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(ItemId::new(), ItemId::new());
    }
}
