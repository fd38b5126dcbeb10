use std::path::{Path, PathBuf};
use tokio::fs;
use crate::utils::{ShrinkError, ShrinkResult};

/// Reads an input file fully into memory
pub async fn read_input(path: impl AsRef<Path>) -> ShrinkResult<Vec<u8>> {
    let path = path.as_ref();
    fs::read(path)
        .await
        .map_err(|e| ShrinkError::io(format!("Failed to read {}: {}", path.display(), e)))
}

/// Returns the final path component, or the whole path when it has none
pub fn extract_filename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Writes `bytes` to `dir/name`, creating `dir` when missing
pub async fn write_artifact(dir: impl AsRef<Path>, name: &str, bytes: &[u8]) -> ShrinkResult<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)
        .await
        .map_err(|e| ShrinkError::io(format!("Cannot create output directory: {e}")))?;

    let path = dir.join(name);
    fs::write(&path, bytes)
        .await
        .map_err(|e| ShrinkError::io(format!("Failed to write {}: {}", path.display(), e)))?;
    Ok(path)
}
