use clap::{Parser, Subcommand};
use imagemark::config::PipelineConfig;
use imagemark::imaging::{self, OptimizeOptions, Quality, ThumbnailSize};
use imagemark::shortcode::{ShortcodeOptions, rewrite_image_shortcodes};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Input extensions considered images when expanding directory arguments.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "tif", "tiff"];

#[derive(Parser)]
#[command(name = "imagemark")]
#[command(about = "Markdown image shortcodes and web image optimization")]
#[command(long_about = "\
Markdown image shortcodes and web image optimization

Rewrites {{img:path|position|width|caption}} tokens in markdown into
semantic <figure> HTML, and re-encodes uploaded images for the web:
resized to a maximum width, re-compressed, format preserved (JPEG, PNG,
WebP, GIF) or forced to WebP, with bounded-box JPEG thumbnails.

Directory arguments are expanded recursively; files are processed in
parallel. Every transform is a pure function of its input file, so runs
are independent and repeatable.

Run 'imagemark gen-config' to print a documented imagemark.toml.")]
#[command(version)]
struct Cli {
    /// Pipeline config file (defaults to ./imagemark.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Re-encode images for web delivery (resize, quality, format)
    Optimize(OptimizeArgs),
    /// Generate bounded-box JPEG thumbnails
    Thumbnail(ThumbnailArgs),
    /// Rewrite {{img:...}} shortcodes in a markdown file to HTML
    Render(RenderArgs),
    /// Print a stock imagemark.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct OptimizeArgs {
    /// Image files or directories
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Directory for optimized output
    #[arg(long, default_value = "optimized")]
    out_dir: PathBuf,

    /// Override the configured maximum width
    #[arg(long)]
    max_width: Option<u32>,

    /// Override the configured JPEG/WebP quality (1-100)
    #[arg(long)]
    quality: Option<u32>,

    /// Force WebP output regardless of input format
    #[arg(long)]
    webp: bool,

    /// Emit a JSON report instead of the text summary
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args)]
struct ThumbnailArgs {
    /// Image files or directories
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Directory for thumbnail output
    #[arg(long, default_value = "thumbs")]
    out_dir: PathBuf,

    /// Override the configured bounding-box width
    #[arg(long)]
    width: Option<u32>,

    /// Override the configured bounding-box height
    #[arg(long)]
    height: Option<u32>,

    /// Emit a JSON report instead of the text summary
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Markdown file ('-' reads stdin)
    input: PathBuf,

    /// Override the configured media root for relative paths
    #[arg(long)]
    media_root: Option<String>,
}

/// One processed file in the report.
#[derive(Serialize)]
struct ReportEntry {
    input: PathBuf,
    output: PathBuf,
    width: u32,
    height: u32,
    bytes_in: usize,
    bytes_out: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Optimize(args) => {
            let mut options = config.optimize;
            if let Some(max_width) = args.max_width {
                options.max_width = max_width;
            }
            if let Some(quality) = args.quality {
                options.quality = Quality::new(quality);
            }
            if args.webp {
                options.force_webp = true;
            }

            let files = collect_images(&args.inputs)?;
            process_files(&files, &args.out_dir, args.json, |bytes, name| {
                imaging::optimize_image(bytes, name, &options)
            })
        }
        Command::Thumbnail(args) => {
            let size = ThumbnailSize {
                width: args.width.unwrap_or(config.thumbnail.width),
                height: args.height.unwrap_or(config.thumbnail.height),
            };

            let files = collect_images(&args.inputs)?;
            process_files(&files, &args.out_dir, args.json, |bytes, name| {
                imaging::thumbnail_image(bytes, Some(name), size)
            })
        }
        Command::Render(args) => {
            let options = match args.media_root {
                Some(media_root) => ShortcodeOptions { media_root },
                None => config.shortcode_options(),
            };
            let text = if args.input.as_os_str() == "-" {
                std::io::read_to_string(std::io::stdin())?
            } else {
                std::fs::read_to_string(&args.input)?
            };
            print!("{}", rewrite_image_shortcodes(&text, &options));
            Ok(())
        }
        Command::GenConfig => {
            print!("{}", PipelineConfig::stock_toml());
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(PipelineConfig::load(path)?),
        None => {
            let default_path = Path::new("imagemark.toml");
            if default_path.exists() {
                Ok(PipelineConfig::load(default_path)?)
            } else {
                Ok(PipelineConfig::default())
            }
        }
    }
}

/// Expand file and directory arguments into a sorted list of image files.
fn collect_images(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input).sort_by_file_name() {
                let entry = entry?;
                if entry.file_type().is_file() && is_image(entry.path()) {
                    files.push(entry.into_path());
                }
            }
        } else {
            files.push(input.clone());
        }
    }
    if files.is_empty() {
        return Err("no image files found".into());
    }
    Ok(files)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Run one transform over all files in parallel and report the outcome.
///
/// Each file is an independent pure call; failures are collected rather than
/// aborting the batch, and the exit status reflects whether any occurred.
fn process_files<F>(
    files: &[PathBuf],
    out_dir: &Path,
    json: bool,
    transform: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: Fn(&[u8], &str) -> Result<imaging::OptimizedImage, imaging::ImagingError> + Sync,
{
    std::fs::create_dir_all(out_dir)?;

    let results: Vec<Result<ReportEntry, String>> = files
        .par_iter()
        .map(|path| {
            let run = || -> Result<ReportEntry, Box<dyn std::error::Error>> {
                let bytes = std::fs::read(path)?;
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let result = transform(&bytes, &name)?;
                let output = out_dir.join(&result.filename);
                std::fs::write(&output, &result.bytes)?;
                Ok(ReportEntry {
                    input: path.clone(),
                    output,
                    width: result.width,
                    height: result.height,
                    bytes_in: bytes.len(),
                    bytes_out: result.bytes.len(),
                })
            };
            run().map_err(|e| format!("{}: {}", path.display(), e))
        })
        .collect();

    let mut entries = Vec::new();
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(entry) => entries.push(entry),
            Err(message) => failures.push(message),
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for entry in &entries {
            println!(
                "{} → {} ({}x{}, {} → {})",
                entry.input.display(),
                entry.output.display(),
                entry.width,
                entry.height,
                human_size(entry.bytes_in),
                human_size(entry.bytes_out),
            );
        }
    }

    for message in &failures {
        eprintln!("error: {message}");
    }
    if failures.is_empty() {
        Ok(())
    } else {
        Err(format!("{} file(s) failed", failures.len()).into())
    }
}

fn human_size(bytes: usize) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} kB", bytes as f64 / 1024.0)
    } else {
        format!("{bytes} B")
    }
}
