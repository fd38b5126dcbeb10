//! Size-targeting compression.
//!
//! Decode and resize happen once; the encode loop then re-renders the same
//! in-memory raster at descending quality until the result fits the budget
//! or the quality floor has been tried. Every blocking step runs on tokio's
//! blocking pool, so each attempt is a suspend point for the caller.

use std::sync::Arc;
use image::RgbImage;
use tracing::debug;

use crate::core::{CompressionOutcome, CompressionSettings, QualitySettings};
use crate::utils::{validate_settings, ShrinkError, ShrinkResult};

use super::encoder::{Encoder, JpegSurface};
use super::resize::{decode, fit_to_width};

/// Drives one [`Encoder`] through the quality schedule.
#[derive(Clone)]
pub struct Compressor {
    encoder: Arc<dyn Encoder>,
}

impl Compressor {
    pub fn new(encoder: Arc<dyn Encoder>) -> Self {
        Self { encoder }
    }

    /// Compressor backed by the JPEG surface.
    pub fn jpeg() -> Self {
        Self::new(Arc::new(JpegSurface))
    }

    /// Compresses `image` toward `target_size_kb`, bounding the width by
    /// `max_dimension`, with the default quality schedule.
    ///
    /// The caller-supplied bound is authoritative; there is no fallback.
    pub async fn compress(
        &self,
        image: Arc<[u8]>,
        target_size_kb: f64,
        max_dimension: u32,
    ) -> ShrinkResult<CompressionOutcome> {
        let settings = CompressionSettings {
            target_size_kb,
            max_dimension,
            quality: QualitySettings::default(),
        };
        self.compress_with(image, &settings).await
    }

    /// Same as [`Compressor::compress`] with an explicit quality schedule.
    ///
    /// Best-effort: once the floor has been encoded the result is returned
    /// even if it is still above target.
    pub async fn compress_with(
        &self,
        image: Arc<[u8]>,
        settings: &CompressionSettings,
    ) -> ShrinkResult<CompressionOutcome> {
        validate_settings(settings)?;

        let max_dimension = settings.max_dimension;
        let raster = tokio::task::spawn_blocking(move || {
            decode(&image).map(|raster| fit_to_width(raster, max_dimension))
        })
        .await??;
        let (width, height) = raster.dimensions();
        debug!("Working raster {width}x{height}");

        let raster: Arc<RgbImage> = Arc::new(raster);
        let target = settings.target_bytes();
        let mut attempt_sizes = Vec::new();
        let mut last = None;

        for quality in settings.quality.levels() {
            let bytes = self.encode_once(&raster, quality).await?;
            debug!(
                "Attempt {} at q{}: {:.1} KB (target {:.1} KB)",
                attempt_sizes.len() + 1,
                quality,
                bytes.len() as f64 / 1024.0,
                settings.target_size_kb
            );
            attempt_sizes.push(bytes.len());

            let fits = bytes.len() as f64 <= target;
            last = Some((quality, bytes));
            if fits {
                break;
            }
        }

        let (quality, bytes) =
            last.ok_or_else(|| ShrinkError::processing("Quality schedule is empty"))?;

        Ok(CompressionOutcome {
            bytes,
            width,
            height,
            quality,
            attempt_sizes,
        })
    }

    async fn encode_once(&self, raster: &Arc<RgbImage>, quality: u8) -> ShrinkResult<Vec<u8>> {
        let encoder = Arc::clone(&self.encoder);
        let raster = Arc::clone(raster);
        tokio::task::spawn_blocking(move || encoder.encode(&raster, quality)).await?
    }
}
