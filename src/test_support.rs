//! Synthetic images and scripted collaborators for unit tests.

use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use async_trait::async_trait;
use image::{ImageFormat, RgbImage};

use crate::analysis::Analyzer;
use crate::processing::Encoder;
use crate::utils::ShrinkResult;

/// Deterministic high-entropy raster: compresses poorly, like a photo.
pub fn noisy_raster(width: u32, height: u32) -> RgbImage {
    let mut state: u32 = 0x9E37_79B9;
    RgbImage::from_fn(width, height, |x, y| {
        // xorshift
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let n = state.to_le_bytes();
        image::Rgb([
            n[0] / 2 + (x % 128) as u8,
            n[1] / 2 + (y % 128) as u8,
            n[2],
        ])
    })
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode_as(&noisy_raster(width, height), ImageFormat::Png)
}

pub fn encode_as(raster: &RgbImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    raster.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

/// Encoder whose output size is a pure function of quality.
///
/// `bytes_per_quality * quality` bytes per attempt; records every call.
pub struct ScriptedEncoder {
    pub bytes_per_quality: usize,
    pub calls: AtomicUsize,
    pub seen: std::sync::Mutex<Vec<(u32, u32, u8)>>,
}

impl ScriptedEncoder {
    pub fn new(bytes_per_quality: usize) -> Arc<Self> {
        Arc::new(Self {
            bytes_per_quality,
            calls: AtomicUsize::new(0),
            seen: std::sync::Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Encoder for ScriptedEncoder {
    fn encode(&self, raster: &RgbImage, quality: u8) -> ShrinkResult<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push((raster.width(), raster.height(), quality));
        Ok(vec![0u8; self.bytes_per_quality * usize::from(quality)])
    }
}

/// Analyzer returning a fixed text and counting the bytes it was given.
pub struct FixedAnalyzer {
    pub text: String,
    pub received: std::sync::Mutex<Vec<usize>>,
}

impl FixedAnalyzer {
    pub fn new(text: &str) -> Arc<Self> {
        Arc::new(Self {
            text: text.to_string(),
            received: std::sync::Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl Analyzer for FixedAnalyzer {
    async fn analyze(&self, image: &[u8]) -> String {
        self.received.lock().unwrap().push(image.len());
        self.text.clone()
    }
}

/// Analyzer that blows up mid-call.
pub struct PanickingAnalyzer;

#[async_trait]
impl Analyzer for PanickingAnalyzer {
    async fn analyze(&self, _image: &[u8]) -> String {
        panic!("analyzer exploded");
    }
}
