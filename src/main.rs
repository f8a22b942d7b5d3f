// Thin command line shell: reads files, hands them to the converter, writes results.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use webp_shrink::core::{DEFAULT_MAX_WIDTH, DEFAULT_QUALITY};
use webp_shrink::utils::{format_kb, read_input, write_output};
use webp_shrink::{
    BatchSummary, ConversionOptions, ConversionOutcome, ConverterError, MaxWidth, run,
};

/// Convert images to WebP, downscaling anything wider than a maximum width.
#[derive(Debug, Parser)]
#[command(name = "webp-shrink", version, about)]
struct Cli {
    /// Images to convert; non-image files are skipped
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Maximum output width in pixels, or "original"
    #[arg(long, default_value_t = MaxWidth::Pixels(DEFAULT_MAX_WIDTH))]
    max_width: MaxWidth,

    /// Lossy quality, 1-100
    #[arg(long, short, default_value_t = DEFAULT_QUALITY)]
    quality: u32,

    /// JSON file with {"maxWidth": ..., "quality": ...}; takes precedence over flags
    #[arg(long)]
    options: Option<PathBuf>,

    /// Directory for converted files
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

impl Cli {
    async fn conversion_options(&self) -> anyhow::Result<ConversionOptions> {
        match &self.options {
            Some(path) => {
                let raw = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("reading options from {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("parsing options in {}", path.display()))
            }
            None => Ok(ConversionOptions {
                max_width: self.max_width,
                quality: self.quality,
            }),
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)         // Remove file path
        .with_line_number(false)  // Remove line numbers
        .with_thread_ids(false)   // Remove thread IDs
        .with_thread_names(false) // Remove thread names
        .with_target(false)       // Remove module path
        .with_writer(std::io::stderr)
        .compact();

    subscriber.init();
}

fn describe(outcome: &ConversionOutcome, quality: u32) -> String {
    match outcome {
        ConversionOutcome::Success {
            original_name,
            new_name,
            original_byte_size,
            encoded_byte_size,
            target_dimensions,
            ..
        } => format!(
            "{original_name}: {} -> {} ({}%) {} px / quality {quality} -> {new_name}",
            format_kb(*original_byte_size),
            format_kb(*encoded_byte_size),
            -outcome.reduction_percent().unwrap_or_default(),
            target_dimensions,
        ),
        ConversionOutcome::Failure { original_name, reason } => {
            format!("{original_name}: failed ({reason})")
        }
    }
}

async fn convert(cli: Cli) -> anyhow::Result<ExitCode> {
    let options = cli.conversion_options().await?;

    let mut images = Vec::with_capacity(cli.files.len());
    for path in &cli.files {
        match read_input(path).await {
            Ok(handle) => images.push(handle),
            Err(e) => warn!("Skipping {}: {}", path.display(), e),
        }
    }

    let started = Instant::now();
    let outcomes = match run(
        images,
        options,
        |index, total, name| debug!("[{index}/{total}] {name}"),
        |outcome| println!("{}", describe(outcome, options.quality)),
    )
    .await
    {
        Ok(outcomes) => outcomes,
        Err(e @ ConverterError::Configuration(_)) => {
            eprintln!("{e}");
            return Ok(ExitCode::from(2));
        }
        Err(e) => return Err(e.into()),
    };

    for outcome in &outcomes {
        if let ConversionOutcome::Success { new_name, encoded_bytes, .. } = outcome {
            let path = write_output(&cli.out_dir, new_name, encoded_bytes)
                .await
                .with_context(|| format!("saving {new_name}"))?;
            debug!("Wrote {}", path.display());
        }
    }

    let summary = BatchSummary::from_outcomes(&outcomes, started.elapsed());
    info!(
        "{} converted, {} failed: {} -> {} ({:.0}% smaller) in {}ms",
        summary.succeeded,
        summary.failed,
        format_kb(summary.total_original_bytes),
        format_kb(summary.total_encoded_bytes),
        summary.compression_ratio,
        summary.total_time_ms
    );

    Ok(if summary.failed > 0 { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();
    convert(cli).await
}
