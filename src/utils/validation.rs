use crate::core::CompressionSettings;
use crate::utils::{ShrinkError, ShrinkResult};

/// Validates compression settings before any image is touched
pub fn validate_settings(settings: &CompressionSettings) -> ShrinkResult<()> {
    if !settings.target_size_kb.is_finite() || settings.target_size_kb <= 0.0 {
        return Err(ShrinkError::validation(format!(
            "Invalid target size: {} KB. Must be a positive number",
            settings.target_size_kb
        )));
    }

    if settings.max_dimension == 0 {
        return Err(ShrinkError::validation("Max dimension cannot be 0"));
    }

    let q = &settings.quality;
    if !(q.floor > 0.0 && q.floor <= q.start && q.start <= 1.0) {
        return Err(ShrinkError::validation(format!(
            "Invalid quality range: start {} / floor {}. Need 0 < floor <= start <= 1",
            q.start, q.floor
        )));
    }

    // Anything below one percent would round to a zero step and never reach the floor
    if !(q.step >= 0.01) {
        return Err(ShrinkError::validation(format!(
            "Invalid quality step: {}. Must be at least 0.01",
            q.step
        )));
    }

    Ok(())
}
