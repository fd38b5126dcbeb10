//! Decode and width-bounded downscale.

use image::imageops::{self, FilterType};
use image::RgbImage;
use crate::utils::{ShrinkError, ShrinkResult};

/// Decodes `bytes` into an RGB raster.
///
/// The format is sniffed from the content, never from a filename. Alpha is
/// dropped because the output format has none.
pub fn decode(bytes: &[u8]) -> ShrinkResult<RgbImage> {
    if bytes.is_empty() {
        return Err(ShrinkError::decode("Input is empty"));
    }

    let image = image::load_from_memory(bytes)
        .map_err(|e| ShrinkError::decode(format!("Unreadable image data: {e}")))?;

    if image.width() == 0 || image.height() == 0 {
        return Err(ShrinkError::decode(format!(
            "Image has zero dimensions ({}x{})",
            image.width(),
            image.height()
        )));
    }

    Ok(image.into_rgb8())
}

/// Dimensions after bounding the width by `max_dimension`.
///
/// Wider images scale uniformly so the width lands exactly on the bound;
/// anything within the bound is returned as is (never upscaled).
pub fn target_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    if width <= max_dimension {
        return (width, height);
    }
    let scaled = (f64::from(height) * f64::from(max_dimension) / f64::from(width)).round();
    (max_dimension, (scaled as u32).max(1))
}

/// Applies [`target_dimensions`] to `raster`.
pub fn fit_to_width(raster: RgbImage, max_dimension: u32) -> RgbImage {
    let (width, height) = raster.dimensions();
    let (w, h) = target_dimensions(width, height, max_dimension);
    if (w, h) == (width, height) {
        return raster;
    }
    imageops::resize(&raster, w, h, FilterType::Triangle)
}
