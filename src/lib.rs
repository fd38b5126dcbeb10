// Module declarations in dependency order
pub mod utils;
pub mod core;
pub mod processing;
pub mod analysis;
pub mod commands;

#[cfg(test)]
pub(crate) mod test_support;

// Public exports for external consumers
pub use self::core::{CompressionSettings, ImageItem, ItemId, ItemStatus, ItemStore, ItemUpdate, SourceFile};
pub use processing::{Compressor, Orchestrator};
pub use analysis::{Analyzer, AnalyzerConfig, VisionAnalyzer};
pub use utils::{ShrinkError, ShrinkResult};
pub use commands::*;

// This library file is used as a public API for consuming this crate as a library.
// The command-line entry point is in main.rs.
