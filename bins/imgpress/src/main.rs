//! imgpress: batch image conversion and compression CLI.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use walkdir::WalkDir;

use imgpress_cli::output::{self, Status};
use imgpress_cli::progress;
use imgpress_codec::{
    media_type_from_extension, sniff_media_type, NativeCodec, OutputFormat, PixelCodec, Quality,
};
use imgpress_queue::{
    compression_ratio, export_completed, find_preset, AppConfig, CandidateFile, ConversionQueue,
    EntryStatus, Orchestrator,
};

#[derive(Parser)]
#[command(name = "imgpress")]
#[command(about = "Convert and compress images between JPEG, PNG, WebP and AVIF")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a TOML configuration file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert images to the configured format and quality
    Convert {
        /// Image files or directories to convert
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output format (jpeg, png, webp, avif)
        #[arg(short, long, value_parser = parse_format)]
        format: Option<OutputFormat>,

        /// Quality from 10 to 100
        #[arg(short, long, value_parser = parse_quality)]
        quality: Option<Quality>,

        /// Named preset applied before explicit --format/--quality overrides
        #[arg(short, long)]
        preset: Option<String>,

        /// Directory converted artifacts are written to
        #[arg(short, long, default_value = "converted")]
        output: PathBuf,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the sniffed media type and dimensions of an image
    Inspect {
        /// Path to image file
        path: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List output formats and their encoder coverage
    Formats,

    /// List built-in and configured presets
    Presets {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_format(value: &str) -> Result<OutputFormat, String> {
    OutputFormat::from_str(value).map_err(|e| e.to_string())
}

fn parse_quality(value: &str) -> Result<Quality, String> {
    let number: u8 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    Quality::new(number).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("imgpress=debug,imgpress_queue=debug,imgpress_codec=debug")
            .init();
    }

    let config = AppConfig::load(cli.config.as_deref())?;

    let code = match cli.command {
        Commands::Convert {
            paths,
            format,
            quality,
            preset,
            output,
            json,
        } => run_convert(&paths, format, quality, preset.as_deref(), &output, json, &config)?,
        Commands::Inspect { path, json } => run_inspect(&path, json)?,
        Commands::Formats => run_formats(),
        Commands::Presets { json } => run_presets(&config, json)?,
    };

    std::process::exit(code);
}

#[allow(clippy::too_many_arguments)]
fn run_convert(
    paths: &[PathBuf],
    format: Option<OutputFormat>,
    quality: Option<Quality>,
    preset: Option<&str>,
    output: &Path,
    json: bool,
    config: &AppConfig,
) -> Result<i32> {
    let mut settings = config.defaults;
    if let Some(name) = preset {
        let presets = config.all_presets();
        match find_preset(&presets, name) {
            Some(found) => settings = found.settings(),
            None => {
                Status::error(&format!("unknown preset '{}'", name));
                return Ok(1);
            }
        }
    }
    if let Some(format) = format {
        settings.format = format;
    }
    if let Some(quality) = quality {
        settings.quality = quality;
    }

    let candidates = collect_candidates(paths);
    let offered = candidates.len();

    let mut queue = ConversionQueue::new();
    let admitted = queue.admit(candidates);
    if admitted.is_empty() {
        Status::warning("no image files found");
        return Ok(1);
    }
    let skipped = offered - admitted.len();
    if skipped > 0 && !json {
        Status::info(&format!(
            "skipped {} without an image media type",
            output::format_count(skipped, "file", "files")
        ));
    }

    let orchestrator = Orchestrator::new(NativeCodec::default());
    if let Some(effective) = orchestrator.resolve_format(settings.format) {
        if effective != settings.format {
            Status::warning(&format!(
                "no native {} encoder; writing {} instead",
                settings.format, effective
            ));
        }
    }

    let pb = progress::batch_progress(admitted.len() as u64);
    let summary =
        orchestrator.run_with_progress(&mut queue, &settings, |event| progress::observe(&pb, &event));
    if summary.failed == 0 {
        progress::finish_success(
            &pb,
            &format!(
                "{} converted",
                output::format_count(summary.completed, "image", "images")
            ),
        );
    } else {
        progress::finish_error(
            &pb,
            &format!(
                "{} converted, {} failed",
                summary.completed, summary.failed
            ),
        );
    }

    std::fs::create_dir_all(output)?;
    let written = export_completed(&queue, output)?;

    if json {
        print_convert_json(&queue, &summary)?;
    } else {
        print_convert_report(&queue, output, written.len(), summary.failed);
    }

    Ok(if summary.completed == 0 && summary.failed > 0 { 1 } else { 0 })
}

fn print_convert_report(queue: &ConversionQueue, output: &Path, written: usize, failed: usize) {
    println!();
    for entry in queue.iter() {
        let detail = match entry.status() {
            EntryStatus::Completed => output::format_reduction(
                entry.original_size(),
                entry.converted_size().unwrap_or(0),
                compression_ratio(entry.original_size(), entry.converted_size()),
            ),
            EntryStatus::Error => "conversion failed".to_string(),
            other => other.to_string(),
        };
        println!("  {} {}  {}", output::status_badge(entry.status()), entry.file_name(), detail);
    }

    output::print_stats(&queue.stats());

    if written > 0 {
        Status::success(&format!(
            "wrote {} to {}",
            output::format_count(written, "artifact", "artifacts"),
            output.display()
        ));
    }
    if failed > 0 {
        Status::warning(&format!(
            "{} left in error state",
            output::format_count(failed, "entry", "entries")
        ));
    }
}

fn print_convert_json(queue: &ConversionQueue, summary: &imgpress_queue::RunSummary) -> Result<()> {
    let entries: Vec<_> = queue
        .iter()
        .map(|entry| {
            serde_json::json!({
                "file": entry.file_name(),
                "media_type": entry.media_type(),
                "status": entry.status(),
                "progress": entry.progress(),
                "original_bytes": entry.original_size(),
                "converted_bytes": entry.converted_size(),
                "ratio": compression_ratio(entry.original_size(), entry.converted_size()),
            })
        })
        .collect();

    let report = serde_json::json!({
        "entries": entries,
        "stats": queue.stats(),
        "summary": summary,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Gather candidate files from paths, walking directories recursively.
fn collect_candidates(paths: &[PathBuf]) -> Vec<CandidateFile> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(
                WalkDir::new(path)
                    .into_iter()
                    .filter_map(|entry| entry.ok())
                    .filter(|entry| entry.file_type().is_file())
                    .map(|entry| entry.into_path()),
            );
        } else {
            files.push(path.clone());
        }
    }

    let mut candidates = Vec::new();
    for path in files {
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) => {
                Status::warning(&format!("skipping {}: {}", path.display(), err));
                continue;
            }
        };
        let media_type = sniff_media_type(&bytes)
            .or_else(|| media_type_from_extension(&path))
            .unwrap_or("application/octet-stream");
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("image")
            .to_string();
        candidates.push(CandidateFile::new(name, media_type, bytes));
    }
    candidates
}

fn run_inspect(path: &Path, json: bool) -> Result<i32> {
    let data = std::fs::read(path)?;

    let Some(media_type) = sniff_media_type(&data) else {
        Status::error("unrecognized image format");
        return Ok(1);
    };

    let codec = NativeCodec::default();
    let dimensions = codec.decode(&data).ok().map(|img| (img.width(), img.height()));

    if json {
        let report = serde_json::json!({
            "path": path.display().to_string(),
            "media_type": media_type,
            "width": dimensions.map(|d| d.0),
            "height": dimensions.map(|d| d.1),
            "size_bytes": data.len(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Media type: {}", media_type);
        match dimensions {
            Some((width, height)) => println!("Dimensions: {}x{}", width, height),
            None => println!("Dimensions: unavailable (no decoder for this input)"),
        }
        println!("Size: {}", output::format_size(data.len() as u64));
    }

    Ok(0)
}

fn run_formats() -> i32 {
    let orchestrator = Orchestrator::new(NativeCodec::default());

    Status::header("Output formats");
    for format in OutputFormat::ALL {
        let encoder = match orchestrator.resolve_format(format) {
            Some(resolved) if resolved == format => "native encoder".to_string(),
            Some(substitute) => format!("falls back to {}", substitute),
            None => "unavailable".to_string(),
        };
        let quality = match format {
            OutputFormat::Jpeg => "quality 10-100",
            OutputFormat::Png => "lossless, quality ignored",
            OutputFormat::WebP => "lossless encoder, quality ignored",
            OutputFormat::Avif => "quality 10-100 where supported",
        };
        println!("  {:5}  {:12}  {}  ({})", format.to_string(), format.mime_type(), encoder, quality);
    }
    0
}

fn run_presets(config: &AppConfig, json: bool) -> Result<i32> {
    let presets = config.all_presets();

    if json {
        println!("{}", serde_json::to_string_pretty(&presets)?);
    } else {
        Status::header("Presets");
        for preset in &presets {
            println!("  {:16}  {}@{}", preset.name, preset.format, preset.quality);
        }
    }
    Ok(0)
}
