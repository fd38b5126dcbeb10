//! Core application types and state management.
//!
//! This module contains the fundamental types used throughout the application:
//! - [`ImageItem`]: One submitted image and its lifecycle status
//! - [`ItemUpdate`]: State change messages emitted by the orchestrator
//! - [`ItemStore`]: The session's item collection
//! - [`CompressionSettings`]: Configuration for size-targeting compression
//! - [`UrlRegistry`]: Displayable-URL resources backing previews and downloads

mod item;
mod progress;
mod state;
mod types;
pub mod resources;

pub use item::{ImageItem, ItemId, ItemStatus, SourceFile};
pub use progress::ItemUpdate;
pub use resources::{ObjectUrl, UrlRegistry};
pub use state::{Download, ItemStore};
pub use types::{
    CompressionOutcome, CompressionSettings, QualitySettings,
    DEFAULT_MAX_DIMENSION, DEFAULT_TARGET_SIZE_KB,
};
