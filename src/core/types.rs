//! Core types for compression settings and results.

use serde::{Deserialize, Serialize};

/// Byte budget used when the caller supplies none.
pub const DEFAULT_TARGET_SIZE_KB: f64 = 800.0;
/// Width bound used by the front end.
pub const DEFAULT_MAX_DIMENSION: u32 = 800;

/// Configuration for one size-targeting compression run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionSettings {
    /// Size ceiling in KB (1 KB = 1024 bytes). Best-effort, not guaranteed.
    pub target_size_kb: f64,
    /// Images wider than this are downscaled to exactly this width
    pub max_dimension: u32,
    /// Quality stepping for the encode loop
    pub quality: QualitySettings,
}

impl Default for CompressionSettings {
    fn default() -> Self {
        Self {
            target_size_kb: DEFAULT_TARGET_SIZE_KB,
            max_dimension: DEFAULT_MAX_DIMENSION,
            quality: QualitySettings::default(),
        }
    }
}

impl CompressionSettings {
    /// Target size converted to bytes.
    pub fn target_bytes(&self) -> f64 {
        self.target_size_kb * 1024.0
    }
}

/// Encoder quality stepping, expressed as fractions in `(0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualitySettings {
    /// First attempt
    pub start: f32,
    /// Decrement between attempts
    pub step: f32,
    /// Last attempt; reaching it stops the loop unconditionally
    pub floor: f32,
}

impl Default for QualitySettings {
    fn default() -> Self {
        Self {
            start: 0.92,
            step: 0.08,
            floor: 0.10,
        }
    }
}

impl QualitySettings {
    /// Quality levels to try, as whole percents, in descending order.
    ///
    /// Stepping happens on integers so `0.92 - 11 * 0.08` lands on the floor
    /// rather than on a float just past it. The last level is always the floor.
    pub fn levels(&self) -> Vec<u8> {
        let start = to_percent(self.start);
        let floor = to_percent(self.floor).min(start);
        let step = to_percent(self.step).max(1);

        let mut levels = Vec::new();
        let mut q = start;
        loop {
            levels.push(q);
            if q <= floor {
                break;
            }
            q = q.saturating_sub(step).max(floor);
        }
        levels
    }

    /// Upper bound on encode attempts for these settings.
    pub fn max_attempts(&self) -> usize {
        self.levels().len()
    }
}

fn to_percent(fraction: f32) -> u8 {
    (fraction * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Result of a successful size-targeting run.
#[derive(Debug, Clone)]
pub struct CompressionOutcome {
    /// Encoded JPEG bytes of the last attempt
    pub bytes: Vec<u8>,
    /// Width of the encoded raster
    pub width: u32,
    /// Height of the encoded raster
    pub height: u32,
    /// Quality (percent) the returned bytes were encoded at
    pub quality: u8,
    /// Byte size of every attempt, in the order they ran
    pub attempt_sizes: Vec<usize>,
}

impl CompressionOutcome {
    /// Number of encode passes performed.
    pub fn attempts(&self) -> usize {
        self.attempt_sizes.len()
    }

    /// Whether the returned bytes fit the budget they were compressed for.
    pub fn met_target(&self, settings: &CompressionSettings) -> bool {
        self.bytes.len() as f64 <= settings.target_bytes()
    }
}
