use std::sync::Arc;
use crate::core::{ItemId, ImageItem};

/// State change reported by the orchestrator.
///
/// The main flow and the analysis side channel share this one message type
/// and one channel; the state container applies them in arrival order.
#[derive(Debug, Clone)]
pub enum ItemUpdate {
    /// A new item was accepted
    Added(ImageItem),
    /// Compression started
    Compressing(ItemId),
    /// Compression finished with these bytes
    Compressed { id: ItemId, bytes: Arc<[u8]> },
    /// Compression failed
    Failed { id: ItemId, message: String },
    /// The analyzer produced a description
    Analysed { id: ItemId, text: String },
}

impl ItemUpdate {
    pub fn id(&self) -> ItemId {
        match self {
            Self::Added(item) => item.id,
            Self::Compressing(id)
            | Self::Compressed { id, .. }
            | Self::Failed { id, .. }
            | Self::Analysed { id, .. } => *id,
        }
    }
}
