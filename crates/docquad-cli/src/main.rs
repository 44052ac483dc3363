// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docquad — Command-line front end for the document scanner core.
//
// Reads a photo from disk, detects (or accepts) the document corners, and
// writes the rectified crop. Everything file-shaped lives here; the library
// crates only see decoded images.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use docquad_core::error::{DocQuadError, Result};
use docquad_core::human_errors::humanize_error;
use docquad_core::{CornerOrigin, Quad, ScanConfig};
use docquad_document::Document;
use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use serde::{Deserialize, Serialize};

#[derive(Debug, Parser)]
#[command(name = "docquad")]
#[command(about = "Find a photographed document's corners and straighten it")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Detect document corners and print them as JSON.
    Detect(DetectArgs),

    /// Crop and rectify the document, writing the result to a file.
    Crop(CropArgs),

    /// Print the default detection configuration as JSON.
    Config,
}

#[derive(Debug, Clone, Args)]
struct DetectArgs {
    /// Path to the input photo.
    #[arg(long)]
    image: PathBuf,

    /// JSON file overriding detection parameters.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct CropArgs {
    /// Path to the input photo.
    #[arg(long)]
    image: PathBuf,

    /// Where to write the rectified document. The format follows the extension.
    #[arg(long)]
    out: PathBuf,

    /// JSON file with corners in photo pixels (a quad, or `detect` output).
    /// Detection runs when omitted.
    #[arg(long)]
    corners: Option<PathBuf>,

    /// JPEG quality, 0-100.
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u8).range(0..=100))]
    quality: u8,

    /// JSON file overriding detection parameters.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// What `detect` prints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct DetectReport {
    corners: Quad,
    origin: CornerOrigin,
}

/// Accepted shapes of a `--corners` file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CornersFile {
    Report(DetectReport),
    Quad(Quad),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "docquad failed");
            let human = humanize_error(&err);
            eprintln!("{}", human.message);
            eprintln!("{}", human.suggestion);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Detect(args) => {
            let report = run_detect(&args)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Commands::Crop(args) => {
            let (width, height) = run_crop(&args)?;
            tracing::info!(width, height, "Crop written to {}", args.out.display());
            Ok(())
        }
        Commands::Config => {
            println!("{}", ScanConfig::default().to_json_string()?);
            Ok(())
        }
    }
}

// ── detect ────────────────────────────────────────────────────────────

fn run_detect(args: &DetectArgs) -> Result<DetectReport> {
    let config = load_config(args.config.as_deref())?;
    let image = open_image(&args.image)?;
    let document = Document::scan(image, &config)?;
    Ok(DetectReport {
        corners: *document.corners(),
        origin: document.origin(),
    })
}

// ── crop ──────────────────────────────────────────────────────────────

fn run_crop(args: &CropArgs) -> Result<(u32, u32)> {
    let config = load_config(args.config.as_deref())?;
    let image = open_image(&args.image)?;

    let document = match &args.corners {
        Some(path) => Document::with_corners(image, load_corners(path)?),
        None => Document::scan(image, &config)?,
    };

    let cropped = document.crop()?;
    save_image(&cropped, &args.out, args.quality)?;
    Ok((cropped.width(), cropped.height()))
}

// ── file helpers ──────────────────────────────────────────────────────

fn load_config(path: Option<&Path>) -> Result<ScanConfig> {
    match path {
        Some(path) => {
            tracing::debug!("Loading config: {}", path.display());
            ScanConfig::from_json_str(&fs::read_to_string(path)?)
        }
        None => Ok(ScanConfig::default()),
    }
}

fn load_corners(path: &Path) -> Result<Quad> {
    let parsed: CornersFile = serde_json::from_str(&fs::read_to_string(path)?)?;
    Ok(match parsed {
        CornersFile::Report(report) => report.corners,
        CornersFile::Quad(quad) => quad,
    })
}

fn open_image(path: &Path) -> Result<DynamicImage> {
    tracing::info!("Loading image: {}", path.display());
    image::open(path).map_err(|err| {
        DocQuadError::ImageError(format!("failed to open {}: {}", path.display(), err))
    })
}

fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"))
}

fn save_image(image: &DynamicImage, path: &Path, quality: u8) -> Result<()> {
    if is_jpeg(path) {
        let writer = BufWriter::new(File::create(path)?);
        // The encoder's scale starts at 1.
        let encoder = JpegEncoder::new_with_quality(writer, quality.max(1));
        image.to_rgb8().write_with_encoder(encoder).map_err(|err| {
            DocQuadError::ImageError(format!("JPEG encoding failed: {}", err))
        })
    } else {
        image.save(path).map_err(|err| {
            DocQuadError::ImageError(format!("failed to write {}: {}", path.display(), err))
        })
    }
}
