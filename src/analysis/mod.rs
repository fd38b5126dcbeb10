//! Image analysis side channel.
//!
//! The orchestrator hands compressed bytes to an [`Analyzer`] and merges
//! whatever text comes back. Analyzers never fail outward: the HTTP-backed
//! [`VisionAnalyzer`] reduces every failure to [`ANALYSIS_FALLBACK`].

mod config;
mod vision;

use async_trait::async_trait;

pub use config::AnalyzerConfig;
pub use vision::{extract_text, request_body, AnalysisError, VisionAnalyzer, ANALYSIS_FALLBACK};

/// Produces a short natural-language description of an encoded image.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, image: &[u8]) -> String;
}
