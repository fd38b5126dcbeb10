//! Image processing pipeline.
//!
//! - [`Compressor`]: Decode, width-bound resize, then the size-targeting encode loop.
//! - [`Encoder`] / [`JpegSurface`]: The encoding surface the loop drives.
//! - [`Orchestrator`]: Runs each submitted item through compression and analysis.
//! - [`ActiveSet`]: Per-id guard against duplicate in-flight processing.

mod compressor;
mod encoder;
mod guard;
mod orchestrator;
pub mod resize;

pub use compressor::Compressor;
pub use encoder::{Encoder, JpegSurface};
pub use guard::{ActiveGuard, ActiveSet};
pub use orchestrator::Orchestrator;
