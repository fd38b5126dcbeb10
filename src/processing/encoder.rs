//! Encoding surface: turns a raster into JPEG bytes at a given quality.
//!
//! The compressor only sees the [`Encoder`] trait, so the surface can be
//! swapped (tests script sizes per quality level).

use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;
use crate::utils::{ShrinkError, ShrinkResult};

/// A surface that encodes a raster at a quality given in percent (1-100).
pub trait Encoder: Send + Sync + 'static {
    fn encode(&self, raster: &RgbImage, quality: u8) -> ShrinkResult<Vec<u8>>;
}

/// Baseline JPEG via the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegSurface;

impl Encoder for JpegSurface {
    fn encode(&self, raster: &RgbImage, quality: u8) -> ShrinkResult<Vec<u8>> {
        let (width, height) = raster.dimensions();
        if width == 0 || height == 0 {
            return Err(ShrinkError::encode("Cannot encode an empty raster"));
        }

        let mut buf = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100));
        raster
            .write_with_encoder(encoder)
            .map_err(|e| ShrinkError::encode(format!("JPEG encode failed: {e}")))?;

        if buf.is_empty() {
            return Err(ShrinkError::encode("Encoder produced no output"));
        }
        Ok(buf)
    }
}
