//! The single lossy output format.
//!
//! Whatever the input format, every artifact is written as baseline JPEG.

/// MIME type of every compressed artifact.
pub const OUTPUT_MIME: &str = "image/jpeg";

/// Prefix prepended to the original filename for downloads.
pub const DOWNLOAD_PREFIX: &str = "compressed_";

/// Derives the download filename for an artifact produced from `original_name`.
///
/// The original name is kept verbatim, extension included.
pub fn download_name(original_name: &str) -> String {
    format!("{DOWNLOAD_PREFIX}{original_name}")
}

/// Numbers `name` for the `n`th artifact sharing it: `photo.png` becomes
/// `photo-2.png`. The first artifact (`n <= 1`) keeps the name as is.
pub fn numbered_name(name: &str, n: usize) -> String {
    if n <= 1 {
        return name.to_string();
    }
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}-{n}.{ext}"),
        _ => format!("{name}-{n}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_original_name() {
        assert_eq!(download_name("holiday.png"), "compressed_holiday.png");
        assert_eq!(download_name(""), "compressed_");
    }

    #[test]
    fn numbering_goes_before_the_extension() {
        assert_eq!(numbered_name("photo.png", 1), "photo.png");
        assert_eq!(numbered_name("photo.png", 2), "photo-2.png");
        assert_eq!(numbered_name("archive.tar.gz", 3), "archive.tar-3.gz");
        assert_eq!(numbered_name("README", 2), "README-2");
        assert_eq!(numbered_name(".hidden", 2), ".hidden-2");
    }
}
