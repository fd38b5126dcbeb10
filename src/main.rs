// Command-line entry point for the image shrinker.
// The library (lib.rs) holds everything; this file only wires arguments,
// logging and the runtime together.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use image_shrinker_lib::{shrink_files, Analyzer, AnalyzerConfig, CompressionSettings, VisionAnalyzer};

/// Shrink images toward an 800 KB budget and describe them.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Images to shrink
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Directory the compressed_<name> artifacts are written to
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Skip the AI description
    #[arg(long)]
    no_analysis: bool,

    /// Print reports as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)       // Remove module path
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let args = Args::parse();
    info!("=== Image shrinker starting ===");

    let analyzer: Option<Arc<dyn Analyzer>> = if args.no_analysis {
        None
    } else {
        let config = AnalyzerConfig::from_env();
        if config.api_key.is_none() {
            debug!("GEMINI_API_KEY not set; analysis will report as unavailable");
        }
        Some(Arc::new(VisionAnalyzer::new(config).context("building analyzer client")?))
    };

    let reports = shrink_files(&args.files, &args.out_dir, CompressionSettings::default(), analyzer)
        .await
        .context("shrinking images")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for report in &reports {
        match (&report.output_path, &report.error) {
            (Some(path), _) => println!(
                "{}: {} -> {} bytes ({:.0}% saved) => {}",
                report.file_name,
                report.original_size,
                report.compressed_size.unwrap_or_default(),
                report.compression_ratio,
                path.display()
            ),
            (None, Some(error)) => println!("{}: failed: {}", report.file_name, error),
            (None, None) => println!("{}: {}", report.file_name, report.status),
        }
        if let Some(analysis) = &report.analysis {
            println!("    {analysis}");
        }
    }

    info!("Application exiting");
    Ok(())
}
