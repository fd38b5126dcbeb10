//! Front-end command for shrinking a set of files.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::analysis::Analyzer;
use crate::core::{CompressionSettings, ImageItem, ItemStore, SourceFile};
use crate::processing::{Compressor, Orchestrator};
use crate::utils::{
    download_name, extract_filename, numbered_name, read_input, validate_settings, write_artifact,
    ShrinkResult,
};

/// Per-file summary handed back to the user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShrinkReport {
    /// Name of the input file
    pub file_name: String,
    /// Final item status (`done` or `error`)
    pub status: String,
    /// Input size in bytes
    pub original_size: usize,
    /// Compressed size in bytes, when done
    pub compressed_size: Option<usize>,
    /// Where the artifact was written, when done
    pub output_path: Option<PathBuf>,
    /// Analyzer commentary, when it arrived
    pub analysis: Option<String>,
    /// Failure message, when failed
    pub error: Option<String>,
    /// Bytes saved (can be negative if the file grew)
    pub saved_bytes: i64,
    /// Saved bytes as a percentage of the original
    pub compression_ratio: f64,
}

impl ShrinkReport {
    fn from_item(item: &ImageItem, output_path: Option<PathBuf>) -> Self {
        let compressed_size = item.compressed_size();
        let saved_bytes = compressed_size
            .map(|size| item.original_size as i64 - size as i64)
            .unwrap_or(0);
        let compression_ratio = if item.original_size > 0 {
            saved_bytes as f64 / item.original_size as f64 * 100.0
        } else {
            0.0
        };

        Self {
            file_name: item.file_name.clone(),
            status: item.status.label().to_string(),
            original_size: item.original_size,
            compressed_size,
            output_path,
            analysis: item.analysis_text.clone(),
            error: item.error_message().map(str::to_string),
            saved_bytes,
            compression_ratio,
        }
    }

    /// Marks a compressed item whose artifact never reached the disk.
    fn unwritten(mut self, message: String) -> Self {
        self.status = "error".to_string();
        self.compressed_size = None;
        self.output_path = None;
        self.error = Some(message);
        self.saved_bytes = 0;
        self.compression_ratio = 0.0;
        self
    }

    fn unreadable(path: &Path, message: String) -> Self {
        Self {
            file_name: extract_filename(path),
            status: "error".to_string(),
            original_size: 0,
            compressed_size: None,
            output_path: None,
            analysis: None,
            error: Some(message),
            saved_bytes: 0,
            compression_ratio: 0.0,
        }
    }
}

/// Shrinks every file in `paths`, writing `compressed_<name>` artifacts into `out_dir`.
///
/// Each file is processed independently; a file that cannot be read, decoded
/// or written yields an error report and does not affect the others. Inputs
/// sharing a filename get numbered artifacts (`compressed_photo.png`,
/// `compressed_photo-2.png`). Reports come back in input order.
///
/// # Errors
/// Invalid `settings`.
pub async fn shrink_files(
    paths: &[PathBuf],
    out_dir: &Path,
    settings: CompressionSettings,
    analyzer: Option<Arc<dyn Analyzer>>,
) -> ShrinkResult<Vec<ShrinkReport>> {
    validate_settings(&settings)?;
    debug!("Received {} file(s)", paths.len());

    let (orchestrator, mut updates) = Orchestrator::new(Compressor::jpeg(), analyzer, settings);

    let mut submitted = Vec::with_capacity(paths.len());
    for path in paths {
        match read_input(path).await {
            Ok(bytes) => {
                let item = orchestrator.submit(SourceFile::new(extract_filename(path), bytes));
                submitted.push(Ok(item.id));
            }
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                submitted.push(Err(ShrinkReport::unreadable(path, e.to_string())));
            }
        }
    }

    orchestrator.wait_idle().await;

    let mut store = ItemStore::new();
    while let Ok(update) = updates.try_recv() {
        if let Err(e) = store.apply(update) {
            warn!("Ignoring update: {e}");
        }
    }

    let mut taken = HashSet::new();
    let mut reports = Vec::with_capacity(submitted.len());
    for entry in submitted {
        let id = match entry {
            Ok(id) => id,
            Err(report) => {
                reports.push(report);
                continue;
            }
        };
        let Some(item) = store.get(id) else {
            continue;
        };

        let report = match store.download(id) {
            Some(download) => {
                let name = claim_name(&mut taken, &item.file_name);
                match write_artifact(out_dir, &name, &download.bytes).await {
                    Ok(path) => ShrinkReport::from_item(item, Some(path)),
                    Err(e) => {
                        warn!("Could not save '{}': {}", item.file_name, e);
                        ShrinkReport::from_item(item, None).unwritten(e.to_string())
                    }
                }
            }
            None => ShrinkReport::from_item(item, None),
        };
        info!(
            "{}: {} ({:.0}% saved)",
            report.file_name, report.status, report.compression_ratio
        );
        reports.push(report);
    }

    Ok(reports)
}

// First free artifact name for `original` within this batch.
fn claim_name(taken: &mut HashSet<String>, original: &str) -> String {
    let mut n = 1;
    loop {
        let name = download_name(&numbered_name(original, n));
        if taken.insert(name.clone()) {
            return name;
        }
        n += 1;
    }
}
