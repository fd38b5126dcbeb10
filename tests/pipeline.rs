use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use image::{ImageFormat, RgbImage};
use image_shrinker_lib::{shrink_files, Analyzer, CompressionSettings};

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x * y) % 251) as u8])
    })
}

fn write_image(dir: &std::path::Path, name: &str, raster: &RgbImage, format: ImageFormat) -> PathBuf {
    let mut buf = Cursor::new(Vec::new());
    raster.write_to(&mut buf, format).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, buf.into_inner()).unwrap();
    path
}

struct Describer;

#[async_trait]
impl Analyzer for Describer {
    async fn analyze(&self, image: &[u8]) -> String {
        format!("A colourful gradient ({} bytes).", image.len())
    }
}

#[tokio::test]
async fn shrinks_mixed_batch_into_output_dir() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    let wide = write_image(input.path(), "wide.png", &gradient(1600, 900), ImageFormat::Png);
    let small = write_image(input.path(), "small.bmp", &gradient(200, 100), ImageFormat::Bmp);
    let broken = input.path().join("broken.jpg");
    std::fs::write(&broken, b"not really a jpeg").unwrap();
    let missing = input.path().join("missing.png");

    let reports = shrink_files(
        &[wide, small, broken, missing],
        output.path(),
        CompressionSettings::default(),
        Some(Arc::new(Describer)),
    )
    .await
    .unwrap();

    let names: Vec<&str> = reports.iter().map(|r| r.file_name.as_str()).collect();
    assert_eq!(names, ["wide.png", "small.bmp", "broken.jpg", "missing.png"]);

    // Wide PNG: downscaled to 800 px wide, written as JPEG under the prefixed name
    let wide = &reports[0];
    assert_eq!(wide.status, "done");
    let path = wide.output_path.as_ref().unwrap();
    assert_eq!(path, &output.path().join("compressed_wide.png"));
    let written = std::fs::read(path).unwrap();
    assert_eq!(Some(written.len()), wide.compressed_size);
    let decoded = image::load_from_memory(&written).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (800, 450));
    assert_eq!(image::guess_format(&written).unwrap(), ImageFormat::Jpeg);
    assert_eq!(
        wide.analysis.as_deref(),
        Some(format!("A colourful gradient ({} bytes).", written.len()).as_str())
    );

    // Small BMP: kept at its own size; the name keeps .bmp but the content is JPEG
    let small = &reports[1];
    assert_eq!(small.status, "done");
    let written = std::fs::read(small.output_path.as_ref().unwrap()).unwrap();
    assert_eq!(image::guess_format(&written).unwrap(), ImageFormat::Jpeg);
    let decoded = image::load_from_memory(&written).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (200, 100));

    // Undecodable and unreadable inputs fail without artifacts
    for failed in &reports[2..] {
        assert_eq!(failed.status, "error");
        assert!(failed.output_path.is_none());
        assert!(failed.compressed_size.is_none());
        assert!(!failed.error.as_deref().unwrap_or_default().is_empty());
        assert!(failed.analysis.is_none());
    }
    assert!(!output.path().join("compressed_broken.jpg").exists());
}

#[tokio::test]
async fn tight_budget_still_produces_best_effort_artifact() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let photo = write_image(input.path(), "photo.png", &gradient(640, 480), ImageFormat::Png);

    let settings = CompressionSettings {
        target_size_kb: 0.5,
        ..CompressionSettings::default()
    };
    let reports = shrink_files(&[photo], output.path(), settings, None).await.unwrap();

    let report = &reports[0];
    assert_eq!(report.status, "done");
    assert!(report.compressed_size.unwrap() > 512, "half a KB is unreachable for 640x480");
    assert!(report.analysis.is_none());
    assert!(report.output_path.as_ref().unwrap().exists());
}

#[tokio::test]
async fn invalid_settings_are_rejected_up_front() {
    let output = tempfile::tempdir().unwrap();
    let settings = CompressionSettings {
        max_dimension: 0,
        ..CompressionSettings::default()
    };
    let err = shrink_files(&[], output.path(), settings, None).await.unwrap_err();
    assert!(err.to_string().contains("Max dimension"));
}

#[tokio::test]
async fn same_named_inputs_get_separate_artifacts() {
    let root = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    std::fs::create_dir(root.path().join("a")).unwrap();
    std::fs::create_dir(root.path().join("b")).unwrap();
    let narrow = write_image(&root.path().join("a"), "photo.png", &gradient(100, 60), ImageFormat::Png);
    let wider = write_image(&root.path().join("b"), "photo.png", &gradient(300, 60), ImageFormat::Png);

    let reports = shrink_files(&[narrow, wider], output.path(), CompressionSettings::default(), None)
        .await
        .unwrap();

    let paths: Vec<PathBuf> = reports.iter().map(|r| r.output_path.clone().unwrap()).collect();
    assert_eq!(
        paths,
        [output.path().join("compressed_photo.png"), output.path().join("compressed_photo-2.png")]
    );

    // Each report describes the bytes at its own path
    for (report, width) in reports.iter().zip([100, 300]) {
        let written = std::fs::read(report.output_path.as_ref().unwrap()).unwrap();
        assert_eq!(Some(written.len()), report.compressed_size);
        assert_eq!(image::load_from_memory(&written).unwrap().width(), width);
    }
}

#[tokio::test]
async fn unwritable_artifact_fails_only_its_own_item() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let good = write_image(input.path(), "good.png", &gradient(80, 60), ImageFormat::Png);
    let blocked = write_image(input.path(), "other.png", &gradient(80, 60), ImageFormat::Png);
    let broken = input.path().join("broken.jpg");
    std::fs::write(&broken, b"garbage").unwrap();

    // A directory squatting on the artifact path makes the write fail
    std::fs::create_dir(output.path().join("compressed_other.png")).unwrap();

    let reports = shrink_files(&[good, blocked, broken], output.path(), CompressionSettings::default(), None)
        .await
        .unwrap();

    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0].status, "done");
    assert!(reports[0].output_path.as_ref().unwrap().is_file());

    let blocked = &reports[1];
    assert_eq!(blocked.status, "error");
    assert!(blocked.output_path.is_none());
    assert!(blocked.compressed_size.is_none());
    assert!(blocked.error.as_deref().unwrap().contains("compressed_other.png"));

    assert_eq!(reports[2].status, "error");
}
